//! Video routes - upload, list/search, fetch, update, delete
//!
//! Store calls block on the shared connection, so each handler moves its
//! work onto the blocking pool.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::debug;

use crate::catalog::{self, Upload, UploadedFile};
use crate::http::ApiError;
use crate::models::{Entry, EntryUpdate, ValidationError};
use crate::state::AppState;

/// Where a successful upload sends the browser
const UPLOAD_REDIRECT: &str = "/index.html";

/// Query parameters for GET /video
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
}

/// GET /video - every entry, or those matching `?search=`
async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let entries = blocking(move || match params.search {
        Some(needle) => state
            .store()
            .search(&needle)
            .map_err(|e| ApiError::store("failed to search entries", e)),
        None => state
            .store()
            .get_all()
            .map_err(|e| ApiError::store("failed to list entries", e)),
    })
    .await?;

    Ok(Json(entries))
}

/// GET /video/{id}
///
/// An all-digit segment is an entry id. Anything else is a blob URL
/// (`/video/<name><file>`) and is served from the web root instead.
async fn get_video(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    if !is_entry_id(&segment) {
        return Ok(serve_blob(&state, request).await);
    }
    let id = segment
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request(format!("invalid entry id '{}'", segment)))?;

    let entry = blocking(move || {
        state
            .store()
            .get_one(id)
            .map_err(|e| ApiError::store("failed to look up entry", e))
    })
    .await?;

    Ok(Json(entry).into_response())
}

fn is_entry_id(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

async fn serve_blob(state: &AppState, request: Request) -> Response {
    ServeDir::new(state.blobs().root())
        .oneshot(request)
        .await
        .map(IntoResponse::into_response)
        .unwrap_or_else(|never| match never {})
}

/// PUT /video/{id} - rename / re-describe; blob paths stay put
async fn update_video(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<EntryUpdate>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let Json(update) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    blocking(move || {
        state
            .store()
            .update(id, &update)
            .map_err(|e| ApiError::store("failed to update entry", e))
    })
    .await?;

    Ok(StatusCode::OK)
}

/// DELETE /video/{id} - row first, then its blobs
async fn delete_video(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::bad_request(e.body_text()))?;

    blocking(move || {
        catalog::remove(state.store(), state.blobs(), id).map_err(ApiError::from)
    })
    .await?;

    Ok(StatusCode::OK)
}

/// POST /video - multipart upload with parts `name`, `info`, `video`, `image`
async fn upload_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let upload = read_upload(multipart).await?;

    blocking(move || {
        catalog::publish(state.store(), state.blobs(), upload).map_err(ApiError::from)
    })
    .await?;

    Ok(Redirect::to(UPLOAD_REDIRECT))
}

#[derive(Default)]
struct UploadForm {
    name: Option<String>,
    info: Option<String>,
    video: Option<UploadedFile>,
    image: Option<UploadedFile>,
}

impl UploadForm {
    fn complete(self) -> Result<Upload, ValidationError> {
        Ok(Upload {
            name: self.name.ok_or(ValidationError::MissingPart { part: "name" })?,
            description: self.info.ok_or(ValidationError::MissingPart { part: "info" })?,
            video: self.video.ok_or(ValidationError::MissingPart { part: "video" })?,
            image: self.image.ok_or(ValidationError::MissingPart { part: "image" })?,
        })
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(part) = field.name().map(str::to_owned) else {
            continue;
        };
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        match part.as_str() {
            "name" => form.name = Some(text_part("name", bytes.to_vec())?),
            "info" => form.info = Some(text_part("info", bytes.to_vec())?),
            "video" => {
                form.video = Some(UploadedFile {
                    file_name,
                    bytes: Vec::from(bytes),
                })
            }
            "image" => {
                form.image = Some(UploadedFile {
                    file_name,
                    bytes: Vec::from(bytes),
                })
            }
            other => debug!(part = other, "ignoring unknown form part"),
        }
    }

    Ok(form.complete()?)
}

fn text_part(part: &str, bytes: Vec<u8>) -> Result<String, ApiError> {
    String::from_utf8(bytes)
        .map_err(|_| ApiError::bad_request(format!("form field '{}' is not valid UTF-8", part)))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::bad_request(format!("malformed upload: {}", e.body_text()))
    }
}

/// Run a store call on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal {
            message: format!("store task failed: {}", e),
        })?
}

/// Video routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/video", get(list_videos).post(upload_video))
        .route(
            "/video/{id}",
            get(get_video).put(update_video).delete(delete_video),
        )
}

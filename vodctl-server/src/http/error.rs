//! API error type with IntoResponse
//!
//! Every failure renders as `{"result": false, "reason": "..."}` with a
//! 4xx status for caller mistakes and 5xx for storage trouble.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::{BlobError, CatalogError, StoreError};
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Request could not be understood (400)
    BadRequest { reason: String },

    /// Entry not found (404)
    NotFound { id: i64 },

    /// Upload would replace another entry's file (409)
    Conflict { reason: String },

    /// Upload over the configured body limit (413)
    PayloadTooLarge,

    /// Metadata store failure (500, logged)
    Store {
        reason: &'static str,
        source: StoreError,
    },

    /// Blob write failure (500, logged)
    Blob {
        reason: &'static str,
        source: BlobError,
    },

    /// Internal error (500)
    Internal { message: String },
}

impl ApiError {
    /// Wrap a store failure; not-found and validation keep their 4xx status.
    pub fn store(reason: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::NotFound { id } => Self::NotFound { id },
            StoreError::Validation(e) => Self::Validation(e),
            source => Self::Store { reason, source },
        }
    }

    /// Wrap a blob failure; a name clash with an existing file is a conflict.
    pub fn blob(reason: &'static str, source: BlobError) -> Self {
        match source {
            BlobError::Exists { path } => Self::Conflict {
                reason: format!("{} is already used by another entry", path),
            },
            source => Self::Blob { reason, source },
        }
    }

    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest {
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Store { .. } | Self::Blob { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn reason(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest { reason } | Self::Conflict { reason } => reason.clone(),
            Self::NotFound { id } => format!("entry {} does not exist", id),
            Self::PayloadTooLarge => "upload exceeds the size limit".to_string(),
            Self::Store { reason, .. } | Self::Blob { reason, .. } => reason.to_string(),
            Self::Internal { .. } => "an internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log the underlying cause, return the short reason
        match &self {
            Self::Store { reason, source } => tracing::error!(error = %source, "{}", reason),
            Self::Blob { reason, source } => tracing::error!(error = %source, "{}", reason),
            Self::Internal { message } => tracing::error!("internal error: {}", message),
            _ => {}
        }

        let body = json!({
            "result": false,
            "reason": self.reason(),
        });

        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Validation(e) => Self::Validation(e),
            CatalogError::BlobWrite { kind: "video", source } => {
                Self::blob("failed to store video file", source)
            }
            CatalogError::BlobWrite { source, .. } => Self::blob("failed to store image file", source),
            CatalogError::Insert(e) => Self::store("failed to add entry to database", e),
            CatalogError::Lookup(e) => Self::store("failed to look up entry", e),
            CatalogError::Delete(e) => Self::store("failed to delete entry from database", e),
        }
    }
}

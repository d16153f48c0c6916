use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use vodctl_server::http::build_router;
use vodctl_server::{AppState, BlobStore, MetadataStore};

const BOUNDARY: &str = "vodctl-test-boundary";

struct TestApp {
    router: Router,
    store: MetadataStore,
    www: TempDir,
}

fn app() -> TestApp {
    app_with_limit(1024 * 1024)
}

fn app_with_limit(max_upload_bytes: usize) -> TestApp {
    let www = tempfile::tempdir().unwrap();
    let blobs = BlobStore::new(www.path());
    blobs.bootstrap().unwrap();
    std::fs::write(www.path().join("index.html"), "<h1>catalog</h1>").unwrap();

    let store = MetadataStore::open_in_memory().unwrap();
    let router = build_router(AppState::new(store.clone(), blobs), max_upload_bytes);
    TestApp { router, store, www }
}

/// (part name, file name, content)
fn multipart(parts: &[(&str, Option<&str>, &str)]) -> Body {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn upload_request(body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/video")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body)
        .unwrap()
}

fn cats_upload() -> Request<Body> {
    upload_request(multipart(&[
        ("name", None, "cats"),
        ("info", None, "a film about cats"),
        ("video", Some("clip.mp4"), "video-bytes"),
        ("image", Some("cover.jpg"), "image-bytes"),
    ]))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn upload_stores_blobs_and_redirects() {
    let app = app();

    let response = app.router.clone().oneshot(cats_upload()).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/index.html");

    assert_eq!(
        std::fs::read(app.www.path().join("video/catsclip.mp4")).unwrap(),
        b"video-bytes"
    );
    assert!(app.www.path().join("image/catscover.jpg").exists());

    let (status, listed) = send_json(&app.router, get("/video")).await;
    assert_eq!(status, StatusCode::OK);
    let id = listed[0]["id"].as_i64().unwrap();
    assert_eq!(
        listed,
        json!([{
            "id": id,
            "name": "cats",
            "info": "a film about cats",
            "video": "/video/catsclip.mp4",
            "image": "/image/catscover.jpg"
        }])
    );
}

#[tokio::test]
async fn upload_missing_part_is_400() {
    let app = app();
    let request = upload_request(multipart(&[
        ("name", None, "cats"),
        ("info", None, "d"),
        ("video", Some("clip.mp4"), "v"),
    ]));

    let (status, body) = send_json(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"result": false, "reason": "missing form field 'image'"}));
    assert!(app.store.get_all().unwrap().is_empty());
}

#[tokio::test]
async fn upload_with_empty_name_is_400_and_writes_nothing() {
    let app = app();
    let request = upload_request(multipart(&[
        ("name", None, ""),
        ("info", None, "d"),
        ("video", Some("clip.mp4"), "v"),
        ("image", Some("cover.jpg"), "i"),
    ]));

    let (status, body) = send_json(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["result"], false);
    assert!(!app.www.path().join("video/clip.mp4").exists());
}

#[tokio::test]
async fn upload_over_size_limit_is_413() {
    let app = app_with_limit(64);
    let big_video = "v".repeat(4096);
    let request = upload_request(multipart(&[
        ("name", None, "cats"),
        ("info", None, "d"),
        ("video", Some("clip.mp4"), big_video.as_str()),
        ("image", Some("cover.jpg"), "i"),
    ]));

    let (status, body) = send_json(&app.router, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["result"], false);
    assert!(app.store.get_all().unwrap().is_empty());
    assert!(!app.www.path().join("video/catsclip.mp4").exists());
    assert!(!app.www.path().join("image/catscover.jpg").exists());
}

#[tokio::test]
async fn duplicate_upload_is_409_and_keeps_first_files() {
    let app = app();
    let (status, _) = send(&app.router, cats_upload()).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let again = upload_request(multipart(&[
        ("name", None, "cats"),
        ("info", None, "a different film"),
        ("video", Some("clip.mp4"), "other-bytes"),
        ("image", Some("cover.jpg"), "other-image"),
    ]));
    let (status, body) = send_json(&app.router, again).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["result"], false);

    assert_eq!(app.store.get_all().unwrap().len(), 1);
    assert_eq!(
        std::fs::read(app.www.path().join("video/catsclip.mp4")).unwrap(),
        b"video-bytes"
    );
}

#[tokio::test]
async fn oversized_numeric_id_is_400_envelope() {
    let app = app();
    let (status, body) = send_json(&app.router, get("/video/99999999999999999999")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["result"], false);
    assert_eq!(body["reason"], "invalid entry id '99999999999999999999'");
}

#[tokio::test]
async fn search_filters_by_name() {
    let app = app();
    send(&app.router, cats_upload()).await;

    let (_, hits) = send_json(&app.router, get("/video?search=at")).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["name"], "cats");

    let (status, misses) = send_json(&app.router, get("/video?search=zzz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(misses, json!([]));
}

#[tokio::test]
async fn get_update_and_delete_by_id() {
    let app = app();
    send(&app.router, cats_upload()).await;
    let id = app.store.get_all().unwrap()[0].id;

    let (status, one) = send_json(&app.router, get(&format!("/video/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["name"], "cats");

    let update = Request::builder()
        .method("PUT")
        .uri(format!("/video/{id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name": "dogs", "info": "now about dogs"}"#))
        .unwrap();
    let (status, _) = send(&app.router, update).await;
    assert_eq!(status, StatusCode::OK);

    let (_, one) = send_json(&app.router, get(&format!("/video/{id}"))).await;
    assert_eq!(one["name"], "dogs");
    assert_eq!(one["info"], "now about dogs");
    assert_eq!(one["video"], "/video/catsclip.mp4");

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/video/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app.router, delete).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!app.www.path().join("video/catsclip.mp4").exists());
    assert!(!app.www.path().join("image/catscover.jpg").exists());

    let (status, body) = send_json(&app.router, get(&format!("/video/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["result"], false);
}

#[tokio::test]
async fn delete_missing_entry_is_404() {
    let app = app();
    let delete = Request::builder()
        .method("DELETE")
        .uri("/video/77")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send_json(&app.router, delete).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["reason"], "entry 77 does not exist");
}

#[tokio::test]
async fn malformed_update_is_400_envelope() {
    let app = app();
    send(&app.router, cats_upload()).await;
    let id = app.store.get_all().unwrap()[0].id;

    let update = Request::builder()
        .method("PUT")
        .uri(format!("/video/{id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send_json(&app.router, update).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["result"], false);
    assert_eq!(app.store.get_one(id).unwrap().name, "cats");
}

#[tokio::test]
async fn blobs_and_frontend_are_served_statically() {
    let app = app();
    send(&app.router, cats_upload()).await;

    let (status, bytes) = send(&app.router, get("/video/catsclip.mp4")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"video-bytes");

    let (status, bytes) = send(&app.router, get("/image/catscover.jpg")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"image-bytes");

    let (status, bytes) = send(&app.router, get("/index.html")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"<h1>catalog</h1>");
}

#[tokio::test]
async fn health_reports_catalog_size() {
    let app = app();
    send(&app.router, cats_upload()).await;

    let (status, body) = send_json(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["entries"], 1);
    assert_eq!(body["database"]["location"], ":memory:");
}

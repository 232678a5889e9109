use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::config::ConfigError;
use crate::AppState;

/// Room on top of the image cap for boundaries and the text fields of an upload.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_router(state: Arc<AppState>) -> Result<Router, ConfigError> {
    let upload_limit = state.config.max_upload_size as usize + MULTIPART_OVERHEAD;

    let cors = CorsLayer::new()
        .allow_origin(state.config.allowed_origin()?)
        .allow_credentials(false)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(AllowHeaders::any());

    let router = Router::new()
        .route("/", get(handlers::root))
        // Items
        .route("/items", get(handlers::list_items))
        .route(
            "/items",
            post(handlers::create_item).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/items/:id", get(handlers::get_item))
        .route("/search", get(handlers::search_items))
        // Images
        .route("/images/:filename", get(handlers::serve_image))
        // Internal
        .route("/_internal/health", get(handlers::health));

    Ok(router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::create_router;
    use crate::image_store::content_filename;
    use crate::testutil::{test_state, test_state_with_upload_limit, DEFAULT_IMAGE_BYTES};

    const BOUNDARY: &str = "item-listing-test-boundary";

    fn multipart_body(
        name: Option<&str>,
        category: Option<&str>,
        image: Option<&[u8]>,
    ) -> Vec<u8> {
        let mut body = Vec::new();
        for (field, value) in [("name", name), ("category", category)] {
            if let Some(value) = value {
                body.extend_from_slice(
                    format!(
                        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n"
                    )
                    .as_bytes(),
                );
            }
        }
        if let Some(image) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"photo.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(image);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn post_item(
        name: Option<&str>,
        category: Option<&str>,
        image: Option<&[u8]>,
    ) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/items")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(name, category, image)))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn test_app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;
        let app = create_router(state).unwrap();
        (dir, app)
    }

    #[tokio::test]
    async fn test_root_greeting() {
        let (_dir, app) = test_app().await;
        let (status, body) = send_json(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Hello, world!");
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, app) = test_app().await;
        let (status, body) = send_json(&app, get("/_internal/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_items_empty() {
        let (_dir, app) = test_app().await;
        let (status, body) = send_json(&app, get("/items")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_then_get_item() {
        let (_dir, app) = test_app().await;
        let image: &[u8] = b"jacket photo bytes";

        let (status, created) = send_json(
            &app,
            post_item(Some("jacket"), Some("fashion"), Some(image)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["message"], "item received: jacket");
        assert_eq!(created["image_filename"], content_filename(image));

        let id = created["id"].as_i64().unwrap();
        let (status, item) = send_json(&app, get(&format!("/items/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item["id"], id);
        assert_eq!(item["name"], "jacket");
        assert_eq!(item["category"], "fashion");
        assert_eq!(item["image_filename"], content_filename(image));

        let (status, listed) = send_json(&app, get("/items")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["items"].as_array().unwrap().len(), 1);
        assert_eq!(listed["items"][0]["name"], "jacket");

        let filename = created["image_filename"].as_str().unwrap();
        let (status, bytes) = send(&app, get(&format!("/images/{filename}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, image);
    }

    #[tokio::test]
    async fn test_create_item_missing_field() {
        let (_dir, app) = test_app().await;
        let request = post_item(Some("jacket"), None, Some(b"bytes".as_slice()));
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["data"]["message"], "category field is required");
    }

    #[tokio::test]
    async fn test_create_item_blank_name() {
        let (_dir, app) = test_app().await;
        let request = post_item(Some("  "), Some("fashion"), Some(b"bytes".as_slice()));
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
    }

    #[tokio::test]
    async fn test_get_item_not_found() {
        let (_dir, app) = test_app().await;
        let (status, body) = send_json(&app, get("/items/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "fail");
    }

    #[tokio::test]
    async fn test_get_item_non_numeric_id() {
        let (_dir, app) = test_app().await;
        let (status, _) = send_json(&app, get("/items/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_item_image_at_upload_limit() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(test_state_with_upload_limit(&dir, 1024).await).unwrap();

        let image = vec![7u8; 1024];
        let request = post_item(Some("rug"), Some("home"), Some(image.as_slice()));
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["image_filename"], content_filename(&image));
    }

    #[tokio::test]
    async fn test_create_item_image_over_upload_limit() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(test_state_with_upload_limit(&dir, 1024).await).unwrap();

        // Fits in the request body limit, caught by the per-image check
        let image = vec![7u8; 1025];
        let request = post_item(Some("rug"), Some("home"), Some(image.as_slice()));
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["status"], "fail");

        // Exceeds the request body limit while the multipart stream is read
        let image = vec![7u8; 200 * 1024];
        let request = post_item(Some("rug"), Some("home"), Some(image.as_slice()));
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["status"], "fail");

        let (_, listed) = send_json(&app, get("/items")).await;
        assert_eq!(listed["items"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_image_nul_byte_is_bad_request() {
        let (_dir, app) = test_app().await;
        let (status, body) = send_json(&app, get("/images/a%00.jpg")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
    }

    #[tokio::test]
    async fn test_image_name_with_double_dot_is_plain_name() {
        let (_dir, app) = test_app().await;
        let (status, bytes) = send(&app, get("/images/a..b.jpg")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, DEFAULT_IMAGE_BYTES);
    }

    #[tokio::test]
    async fn test_image_wrong_extension() {
        let (_dir, app) = test_app().await;
        let (status, body) = send_json(&app, get("/images/foo.png")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
    }

    #[tokio::test]
    async fn test_missing_image_serves_placeholder() {
        let (_dir, app) = test_app().await;
        let response = app
            .clone()
            .oneshot(get("/images/doesnotexist.jpg"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/jpeg"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), DEFAULT_IMAGE_BYTES);
    }

    #[tokio::test]
    async fn test_search() {
        let (_dir, app) = test_app().await;
        for (name, image) in [("red jacket", b"a"), ("blue jacket", b"b"), ("mug", b"c")] {
            let image: &[u8] = image;
            let (status, _) =
                send_json(&app, post_item(Some(name), Some("misc"), Some(image))).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send_json(&app, get("/search?keyword=jacket")).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["red jacket", "blue jacket"]);

        let (_, body) = send_json(&app, get("/search")).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_cors_allows_front_url_only() {
        let (_dir, app) = test_app().await;

        let allowed = Request::builder()
            .uri("/items")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(allowed).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:3000"
        );

        let other = Request::builder()
            .uri("/items")
            .header(header::ORIGIN, "http://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(other).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}

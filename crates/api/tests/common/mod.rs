#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use nbt_api::config::ServerConfig;
use nbt_api::router::build_app_router;
use nbt_api::state::AppState;

/// Multipart boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "nbt-test-boundary";

/// Build a test `ServerConfig` with safe defaults pointing at `backend_url`.
pub fn test_config(backend_url: &str, mock_mode: bool) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        backend_url: backend_url.to_string(),
        mock_mode,
    }
}

/// Build the full application router with all middleware layers.
///
/// Uses the same [`build_app_router`] as `main.rs`, so integration tests
/// exercise the production middleware stack.
pub fn build_test_app(config: ServerConfig) -> Router {
    build_app_router(AppState::new(config))
}

/// Serve `router` as a fake backend on an ephemeral local port and return
/// its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("fake backend address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake backend");
    });
    format!("http://{addr}")
}

/// A base URL on which nothing is listening.
pub fn unreachable_backend_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("reserve port");
    let addr = listener.local_addr().expect("reserved address");
    drop(listener);
    format!("http://{addr}")
}

/// A small multipart body with `file`, `mode` and `rewrite` fields.
pub fn multipart_body(mode: &str, rewrite: bool) -> Vec<u8> {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"test.wav\"\r\n\
         Content-Type: audio/wav\r\n\r\n\
         RIFF-fake-audio\r\n\
         --{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"mode\"\r\n\r\n\
         {mode}\r\n\
         --{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"rewrite\"\r\n\r\n\
         {rewrite}\r\n\
         --{BOUNDARY}--\r\n"
    )
    .into_bytes()
}

/// Send a GET request through the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a multipart POST through the app, the way a browser would.
pub async fn post_multipart(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("host", "gateway.local")
        .header("content-length", body.len().to_string())
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

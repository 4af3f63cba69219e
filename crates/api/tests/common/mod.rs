#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use snapbooth_core::caption::{CaptionError, CaptionProvider, ImagePayload};
use snapbooth_store::gallery::{GalleryStore, MemoryGalleryStore};
use tower::ServiceExt;

use snapbooth_api::config::ServerConfig;
use snapbooth_api::router::build_app_router;
use snapbooth_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Any CORS origin, a 30-second request timeout, and the standard gallery
/// capacity of 50.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        gallery_capacity: 50,
        api_key: None,
        gemini_model: "gemini-2.5-flash".to_string(),
        gemini_api_url: "http://127.0.0.1:9".to_string(),
        database_url: None,
    }
}

/// Scripted caption model.
pub enum StubCaptions {
    Answer(&'static str),
    Empty,
    Fail,
}

#[async_trait::async_trait]
impl CaptionProvider for StubCaptions {
    async fn generate(&self, _image: &ImagePayload) -> Result<String, CaptionError> {
        match self {
            StubCaptions::Answer(text) => Ok((*text).to_string()),
            StubCaptions::Empty => Err(CaptionError::Empty),
            StubCaptions::Fail => Err(CaptionError::Provider("upstream exploded".into())),
        }
    }
}

/// Build the full application router over the given gallery and caption
/// model, with the production middleware stack.
pub fn build_test_app(
    gallery: Arc<dyn GalleryStore>,
    captions: Option<Arc<dyn CaptionProvider>>,
) -> Router {
    build_test_app_with_config(test_config(), gallery, captions)
}

/// Same as [`build_test_app`] with a caller-supplied configuration.
pub fn build_test_app_with_config(
    config: ServerConfig,
    gallery: Arc<dyn GalleryStore>,
    captions: Option<Arc<dyn CaptionProvider>>,
) -> Router {
    let state = AppState {
        gallery,
        captions,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// App over an empty in-memory gallery and no caption model.
pub fn default_app() -> Router {
    build_test_app(Arc::new(MemoryGalleryStore::new()), None)
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

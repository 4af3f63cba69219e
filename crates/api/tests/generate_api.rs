//! Integration tests for `/api/generate`.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json, post_raw, StubCaptions};
use serde_json::json;
use snapbooth_core::caption::DEFAULT_CAPTION;
use snapbooth_store::gallery::MemoryGalleryStore;

fn app_with(captions: StubCaptions) -> axum::Router {
    build_test_app(Arc::new(MemoryGalleryStore::new()), Some(Arc::new(captions)))
}

// ---------------------------------------------------------------------------
// Test: a caption comes back in the data envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn returns_caption_for_data_uri_and_raw_payload() {
    let app = app_with(StubCaptions::Answer(" (TwT) "));

    for image in ["data:image/jpeg;base64,/9j/4AAQ", "/9j/4AAQ"] {
        let response = post_json(app.clone(), "/api/generate", json!({"imageBase64": image})).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"data": {"caption": "(TwT)"}}));
    }
}

#[tokio::test]
async fn empty_model_answer_becomes_default_glyph() {
    let response = post_json(
        app_with(StubCaptions::Empty),
        "/api/generate",
        json!({"imageBase64": "AAAA"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_matches!(json["data"]["caption"].as_str(), Some(c) if c == DEFAULT_CAPTION);
}

// ---------------------------------------------------------------------------
// Test: missing credential wins over a missing payload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_api_key_returns_configuration_error() {
    let app = build_test_app(Arc::new(MemoryGalleryStore::new()), None);

    let response = post_json(app.clone(), "/api/generate", json!({"imageBase64": "AAAA"})).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFIGURATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("API key"));

    let response = post_json(app, "/api/generate", json!({})).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "CONFIGURATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: payload validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_or_empty_payload_returns_400() {
    let app = app_with(StubCaptions::Answer("(o_O)"));

    for body in [json!({}), json!({"imageBase64": ""}), json!({"imageBase64": "data:image/png;base64,"})] {
        let response = post_json(app.clone(), "/api/generate", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    }

    let response = post_raw(app, "/api/generate", "not json".into()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: provider failure is a sanitized 500
// ---------------------------------------------------------------------------

#[tokio::test]
async fn provider_failure_returns_500() {
    let response = post_json(
        app_with(StubCaptions::Fail),
        "/api/generate",
        json!({"imageBase64": "AAAA"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json["error"].as_str().unwrap().contains("exploded"));
}

#[tokio::test]
async fn get_returns_405() {
    let response = get(app_with(StubCaptions::Empty), "/api/generate").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await["code"], "METHOD_NOT_ALLOWED");
}

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the gallery backend is reachable.
    pub gallery_healthy: bool,
}

/// GET /health -- returns service and gallery backend health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let gallery_healthy = match state.gallery.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Gallery backend unreachable");
            false
        }
    };

    let status = if gallery_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        gallery_healthy,
    })
}

/// Mount health check routes (root level, not under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

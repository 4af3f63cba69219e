use axum::routing::post;
use axum::Router;

use crate::handlers::{self, generate};
use crate::state::AppState;

/// Caption route: `POST /generate -> generate_caption`.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/generate",
        post(generate::generate_caption).fallback(handlers::method_not_allowed),
    )
}

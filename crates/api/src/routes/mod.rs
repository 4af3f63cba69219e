pub mod gallery;
pub mod generate;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /gallery      GET list, POST publish
/// /generate     POST caption
/// ```
///
/// `OPTIONS` is answered by the CORS layer; any other method on these
/// paths gets a 405 JSON error.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(gallery::router())
        .merge(generate::router())
}

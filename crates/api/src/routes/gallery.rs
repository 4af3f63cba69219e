use axum::routing::get;
use axum::Router;

use crate::handlers::{self, gallery};
use crate::state::AppState;

/// Gallery routes.
///
/// ```text
/// GET  /gallery  -> list_gallery
/// POST /gallery  -> publish_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/gallery",
        get(gallery::list_gallery)
            .post(gallery::publish_photo)
            .fallback(handlers::method_not_allowed),
    )
}

//! Handlers for the public gallery list.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use snapbooth_core::gallery::validate_snapshot;
use snapbooth_core::photo::Photo;
use snapbooth_store::gallery::publish_snapshot;

use crate::error::AppResult;
use crate::handlers::json_body;
use crate::response::{Ack, DataResponse};
use crate::state::AppState;

/// GET /api/gallery
///
/// The most recent published snapshots, newest first, at most the
/// configured capacity (never above 50).
///
/// Answers `{"data": [Photo, ...]}`. The list sits inside the `data`
/// envelope, so a web frontend expecting a bare array must unwrap it.
pub async fn list_gallery(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Photo>>>> {
    let photos = state.gallery.range(state.config.gallery_limit()).await?;
    tracing::debug!(count = photos.len(), "Gallery listed");
    Ok(Json(DataResponse { data: photos }))
}

/// POST /api/gallery
///
/// Prepend a snapshot and trim the list. Rejects snapshots without
/// `imageData`.
///
/// Answers `{"data": {"success": true}}` rather than a bare
/// `{"success": true}`.
pub async fn publish_photo(
    State(state): State<AppState>,
    payload: Result<Json<Photo>, JsonRejection>,
) -> AppResult<Json<DataResponse<Ack>>> {
    let photo = json_body(payload)?;
    validate_snapshot(&photo)?;

    publish_snapshot(
        state.gallery.as_ref(),
        &photo,
        state.config.gallery_limit(),
    )
    .await?;

    Ok(Json(DataResponse { data: Ack::ok() }))
}

//! Handler for caption generation.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use snapbooth_core::caption::{CaptionError, ImagePayload, DEFAULT_CAPTION};

use crate::error::{AppError, AppResult};
use crate::handlers::json_body;
use crate::response::DataResponse;
use crate::state::AppState;

const MISSING_KEY_MESSAGE: &str = "Server configuration error: API key is missing";

/// Request body for `POST /api/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateCaptionRequest {
    /// Raw base64 or a `data:` URI.
    #[serde(rename = "imageBase64", default)]
    pub image_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub caption: String,
}

/// POST /api/generate
///
/// Caption one image. The credential is checked before the payload so a
/// misconfigured server always answers `CONFIGURATION_ERROR`. An empty
/// model answer becomes the default glyph.
pub async fn generate_caption(
    State(state): State<AppState>,
    payload: Result<Json<GenerateCaptionRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<CaptionResponse>>> {
    let Some(provider) = state.captions.clone() else {
        return Err(AppError::Configuration(MISSING_KEY_MESSAGE.into()));
    };

    let request = json_body(payload)?;
    let image = request
        .image_base64
        .as_deref()
        .map(ImagePayload::parse)
        .filter(|image| !image.is_empty())
        .ok_or_else(|| AppError::BadRequest("imageBase64 is required".into()))?;

    let caption = match provider.generate(&image).await {
        Ok(text) => text.trim().to_string(),
        Err(CaptionError::Empty) => String::new(),
        Err(CaptionError::MissingCredential) => {
            return Err(AppError::Configuration(MISSING_KEY_MESSAGE.into()))
        }
        Err(CaptionError::Provider(msg)) => return Err(AppError::InternalError(msg)),
    };
    let caption = if caption.is_empty() {
        DEFAULT_CAPTION.to_string()
    } else {
        caption
    };

    tracing::info!(mime_type = %image.mime_type, caption = %caption, "Caption generated");
    Ok(Json(DataResponse {
        data: CaptionResponse { caption },
    }))
}

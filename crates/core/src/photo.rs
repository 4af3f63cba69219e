//! The photo entity and its value-level helpers.
//!
//! A [`Photo`] is the only persisted record. It serializes in camelCase so
//! the local blob and gallery payloads stay readable by the web frontend.

use serde::{Deserialize, Serialize};

use crate::types::{PhotoId, Point, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Caption shown while the caption service has not answered yet.
pub const PLACEHOLDER_CAPTION: &str = "显影中...";

/// Stacking order of a freshly captured photo (behind the camera body).
pub const EJECTING_Z_INDEX: i64 = 10;

/// Floor for wall z-indices; placed photos always stack above the camera.
pub const BASE_Z_INDEX: i64 = 50;

/// Stacking order used by gallery snapshots, which render in a grid.
pub const GALLERY_Z_INDEX: i64 = 1;

/// Placement tilt range in degrees, `[-MAX_TILT, MAX_TILT)`.
pub const MAX_TILT_DEGREES: f64 = 5.0;

/// Display date format, e.g. `2025.11.23`.
pub const DATE_FORMAT: &str = "%Y.%m.%d";

// ---------------------------------------------------------------------------
// Photo
// ---------------------------------------------------------------------------

/// One captured still plus its metadata.
///
/// Every field has a serde default so partially filled payloads still
/// deserialize; boundary code validates what it needs (see
/// [`crate::gallery::validate_snapshot`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Photo {
    pub id: PhotoId,
    pub image_data: String,
    pub caption: String,
    pub date: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub is_developing: bool,
    pub z_index: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl Photo {
    /// Build a freshly captured photo, still developing and not yet placed.
    pub fn captured(id: PhotoId, image_data: String, now: Timestamp) -> Self {
        Self {
            id,
            image_data,
            caption: PLACEHOLDER_CAPTION.to_string(),
            date: format_capture_date(now),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            is_developing: true,
            z_index: EJECTING_Z_INDEX,
            secret_message: None,
            is_public: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_public(&self) -> bool {
        self.is_public.unwrap_or(false)
    }

    /// Value copy mirrored to the public gallery.
    ///
    /// Wall-only fields are reset to neutral values because the gallery
    /// renders in a fixed grid.
    pub fn gallery_snapshot(&self) -> Photo {
        Photo {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            z_index: GALLERY_Z_INDEX,
            is_developing: false,
            is_public: Some(true),
            ..self.clone()
        }
    }

    /// File name used when the card is exported as an image.
    pub fn download_file_name(&self) -> String {
        format!("bao-polaroid-{}.png", self.date)
    }
}

/// Format a capture timestamp for display on the card.
pub fn format_capture_date(now: Timestamp) -> String {
    now.format(DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

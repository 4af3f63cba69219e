/// Photo identifiers are UUID v4 strings.
///
/// Kept as plain text because gallery payloads written by older clients
/// may carry arbitrary identifiers.
pub type PhotoId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A point on the wall, in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Generate a fresh photo identifier.
pub fn new_photo_id() -> PhotoId {
    uuid::Uuid::new_v4().to_string()
}

use std::sync::Arc;

use snapbooth_core::caption::CaptionProvider;
use snapbooth_store::gallery::GalleryStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Public gallery list.
    pub gallery: Arc<dyn GalleryStore>,
    /// Caption model, absent when no credential is configured.
    pub captions: Option<Arc<dyn CaptionProvider>>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

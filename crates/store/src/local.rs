//! The committed wall, persisted as a single JSON blob.

use snapbooth_core::photo::Photo;

use crate::blob::BlobStore;
use crate::StoreError;

/// Blob key holding the serialized wall.
pub const STORAGE_KEY: &str = "bao-retro-photos";

/// Loads and saves the committed photo collection.
pub struct PhotoRepo;

impl PhotoRepo {
    /// Read the wall once at startup.
    ///
    /// Missing, unreadable, or malformed content yields an empty wall; the
    /// problem is logged and never propagated.
    pub fn load(store: &dyn BlobStore) -> Vec<Photo> {
        let raw = match store.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read saved photos, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Photo>>(&raw) {
            Ok(photos) => {
                tracing::debug!(count = photos.len(), "Loaded saved photos");
                photos
            }
            Err(e) => {
                tracing::warn!(error = %e, "Saved photos are malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Rewrite the whole wall.
    pub fn save(store: &dyn BlobStore, photos: &[Photo]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(photos)?;
        store.set(STORAGE_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;

    fn photo(id: &str) -> Photo {
        Photo {
            id: id.into(),
            image_data: "data:image/jpeg;base64,AAAA".into(),
            caption: "(≧◡≦)".into(),
            z_index: 51,
            secret_message: Some(String::new()),
            ..Default::default()
        }
    }

    #[test]
    fn save_then_load_preserves_order_and_fields() {
        let store = MemoryBlobStore::new();
        let photos = vec![photo("a"), photo("b")];
        PhotoRepo::save(&store, &photos).unwrap();
        assert_eq!(PhotoRepo::load(&store), photos);
    }

    #[test]
    fn missing_blob_loads_empty() {
        assert!(PhotoRepo::load(&MemoryBlobStore::new()).is_empty());
    }

    #[test]
    fn malformed_blob_loads_empty() {
        let store = MemoryBlobStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        assert!(PhotoRepo::load(&store).is_empty());

        store.set(STORAGE_KEY, r#"{"id":"not-a-list"}"#).unwrap();
        assert!(PhotoRepo::load(&store).is_empty());
    }

    #[test]
    fn reads_blob_written_by_web_frontend() {
        let store = MemoryBlobStore::new();
        store
            .set(
                STORAGE_KEY,
                r#"[{"id":"p1","imageData":"data:image/jpeg;base64,AAAA","caption":"(｡♥‿♥｡)",
                    "date":"2025.11.23","x":12,"y":34.5,"rotation":-3,"isDeveloping":false,
                    "zIndex":51,"secretMessage":"hi","isPublic":true}]"#,
            )
            .unwrap();

        let photos = PhotoRepo::load(&store);
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].x, 12.0);
        assert_eq!(photos[0].secret_message.as_deref(), Some("hi"));
        assert!(photos[0].is_public());
    }
}

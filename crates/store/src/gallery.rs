//! The public gallery list.
//!
//! Semantics mirror a key-value list with `push_front` + `trim`: newest
//! entries first, oldest insertions evicted once the list exceeds its
//! capacity. Ordering is by insertion only, never by content.

use std::collections::VecDeque;

use snapbooth_core::photo::Photo;
use sqlx::types::Json;
use tokio::sync::RwLock;

use crate::{DbPool, StoreError};

/// Backend for the public gallery list.
#[async_trait::async_trait]
pub trait GalleryStore: Send + Sync {
    /// Insert a snapshot at the front of the list.
    async fn push_front(&self, photo: &Photo) -> Result<(), StoreError>;

    /// Keep only the `keep` most recent entries.
    async fn trim(&self, keep: usize) -> Result<(), StoreError>;

    /// The `limit` most recent entries, newest first.
    async fn range(&self, limit: usize) -> Result<Vec<Photo>, StoreError>;

    /// Whether the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Append a snapshot and trim the list to `capacity`.
pub async fn publish_snapshot(
    store: &dyn GalleryStore,
    photo: &Photo,
    capacity: usize,
) -> Result<(), StoreError> {
    store.push_front(photo).await?;
    store.trim(capacity).await?;
    tracing::info!(photo_id = %photo.id, capacity, "Photo published to gallery");
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local gallery list, used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryGalleryStore {
    photos: RwLock<VecDeque<Photo>>,
}

impl MemoryGalleryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.photos.read().await.len()
    }
}

#[async_trait::async_trait]
impl GalleryStore for MemoryGalleryStore {
    async fn push_front(&self, photo: &Photo) -> Result<(), StoreError> {
        self.photos.write().await.push_front(photo.clone());
        Ok(())
    }

    async fn trim(&self, keep: usize) -> Result<(), StoreError> {
        self.photos.write().await.truncate(keep);
        Ok(())
    }

    async fn range(&self, limit: usize) -> Result<Vec<Photo>, StoreError> {
        Ok(self.photos.read().await.iter().take(limit).cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// Gallery list stored in the `gallery_photos` table.
///
/// `seq` (BIGSERIAL) carries insertion order; payloads are stored as JSONB
/// snapshots.
#[derive(Debug, Clone)]
pub struct PgGalleryStore {
    pool: DbPool,
}

impl PgGalleryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl GalleryStore for PgGalleryStore {
    async fn push_front(&self, photo: &Photo) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO gallery_photos (payload) VALUES ($1)")
            .bind(Json(photo))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn trim(&self, keep: usize) -> Result<(), StoreError> {
        sqlx::query(
            "DELETE FROM gallery_photos WHERE seq NOT IN \
             (SELECT seq FROM gallery_photos ORDER BY seq DESC LIMIT $1)",
        )
        .bind(keep as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn range(&self, limit: usize) -> Result<Vec<Photo>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<Photo>>(
            "SELECT payload FROM gallery_photos ORDER BY seq DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(photo)| photo).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

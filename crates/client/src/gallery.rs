//! HTTP access to the public gallery.

use serde::Deserialize;
use snapbooth_core::photo::Photo;

use crate::error::ClientError;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
struct Ack {
    success: bool,
}

/// Thin client for `/api/gallery`.
#[derive(Debug, Clone)]
pub struct GalleryClient {
    client: reqwest::Client,
    base_url: String,
}

impl GalleryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The most recent public snapshots, newest first.
    pub async fn fetch(&self) -> Result<Vec<Photo>, ClientError> {
        let response = self.client.get(self.url()).send().await?;
        let envelope: DataEnvelope<Vec<Photo>> = parse_response(response).await?;
        Ok(envelope.data)
    }

    /// Push a snapshot to the front of the remote list.
    pub async fn publish(&self, snapshot: &Photo) -> Result<(), ClientError> {
        let response = self.client.post(self.url()).json(snapshot).send().await?;
        let envelope: DataEnvelope<Ack> = parse_response(response).await?;
        if !envelope.data.success {
            return Err(ClientError::Api {
                status: 200,
                body: "gallery did not acknowledge the snapshot".into(),
            });
        }
        tracing::info!(photo_id = %snapshot.id, "Snapshot published to gallery");
        Ok(())
    }

    fn url(&self) -> String {
        format!("{}/api/gallery", self.base_url)
    }
}

/// Check the status, then decode the JSON body.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ClientError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<T>().await?)
}

/// Cached view of the remote gallery.
///
/// Refreshing never fails: on any transport or decode error the previous
/// list is kept and a warning is logged.
#[derive(Debug, Clone)]
pub struct GalleryFeed {
    client: GalleryClient,
    photos: Vec<Photo>,
}

impl GalleryFeed {
    pub fn new(client: GalleryClient) -> Self {
        Self {
            client,
            photos: Vec::new(),
        }
    }

    pub fn client(&self) -> &GalleryClient {
        &self.client
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Re-fetch the remote list, keeping the cache on failure.
    pub async fn refresh(&mut self) -> &[Photo] {
        match self.client.fetch().await {
            Ok(photos) => {
                tracing::debug!(count = photos.len(), "Gallery refreshed");
                self.photos = photos;
            }
            Err(e) => {
                tracing::warn!(error = %e, cached = self.photos.len(), "Gallery fetch failed, keeping cached list");
            }
        }
        &self.photos
    }
}

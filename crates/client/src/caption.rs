//! Caption provider that goes through the booth's own API server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use snapbooth_core::caption::{CaptionError, CaptionProvider, ImagePayload};

use crate::error::ClientError;
use crate::gallery::{parse_response, DataEnvelope};

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    #[serde(rename = "imageBase64")]
    image_base64: &'a str,
}

#[derive(Debug, Deserialize)]
struct CaptionBody {
    caption: String,
}

/// Calls `POST /api/generate` so the model credential stays on the server.
#[derive(Debug, Clone)]
pub struct RemoteCaptioner {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteCaptioner {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn request(&self, image: &ImagePayload) -> Result<String, ClientError> {
        // The server accepts either form; send the data URI so the media
        // type survives the hop.
        let data_uri = format!("data:{};base64,{}", image.mime_type, image.data);
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&GenerateBody {
                image_base64: &data_uri,
            })
            .send()
            .await?;
        let envelope: DataEnvelope<CaptionBody> = parse_response(response).await?;
        Ok(envelope.data.caption)
    }
}

#[async_trait]
impl CaptionProvider for RemoteCaptioner {
    async fn generate(&self, image: &ImagePayload) -> Result<String, CaptionError> {
        match self.request(image).await {
            Ok(caption) if caption.trim().is_empty() => Err(CaptionError::Empty),
            Ok(caption) => Ok(caption),
            Err(ClientError::Api { body, .. }) if body.contains("CONFIGURATION_ERROR") => {
                Err(CaptionError::MissingCredential)
            }
            Err(e) => Err(CaptionError::Provider(e.to_string())),
        }
    }
}

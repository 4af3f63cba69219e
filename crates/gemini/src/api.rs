//! REST client for the Gemini `generateContent` endpoint.
//!
//! Sends one image plus the caption prompt and returns the model's text
//! answer, using [`reqwest`].

use serde::{Deserialize, Serialize};
use snapbooth_core::caption::{CaptionError, CaptionProvider, ImagePayload, CAPTION_PROMPT};

/// Public endpoint of the hosted model API.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used for captions.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// HTTP client for the hosted model.
#[derive(Clone)]
pub struct GeminiApi {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

/// Errors from the Gemini REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    #[serde(rename_all = "camelCase")]
    Image { inline_data: InlineData<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

/// Subset of the `generateContent` response we read.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, trimmed.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl GeminiApi {
    /// Create a client for the public endpoint and default model.
    pub fn new(api_key: String) -> Self {
        Self::with_client(reqwest::Client::new(), DEFAULT_API_URL.to_string(), api_key)
    }

    /// Create a client reusing an existing [`reqwest::Client`] and a custom
    /// base URL (useful for proxies and tests).
    pub fn with_client(client: reqwest::Client, api_url: String, api_key: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Use a different model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for a caption of `image`.
    ///
    /// Returns `None` when the model answered without any text.
    pub async fn generate_caption(
        &self,
        image: &ImagePayload,
    ) -> Result<Option<String>, GeminiApiError> {
        let body = build_request(image);
        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.api_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: GenerateResponse = Self::parse_response(response).await?;
        Ok(parsed.text())
    }

    // ---- private helpers ----

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GeminiApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeminiApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

fn build_request(image: &ImagePayload) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![
                Part::Image {
                    inline_data: InlineData {
                        mime_type: &image.mime_type,
                        data: &image.data,
                    },
                },
                Part::Text {
                    text: CAPTION_PROMPT,
                },
            ],
        }],
    }
}

#[async_trait::async_trait]
impl CaptionProvider for GeminiApi {
    async fn generate(&self, image: &ImagePayload) -> Result<String, CaptionError> {
        if self.api_key.is_empty() {
            return Err(CaptionError::MissingCredential);
        }
        match self.generate_caption(image).await {
            Ok(Some(text)) => Ok(text),
            Ok(None) => Err(CaptionError::Empty),
            Err(e) => {
                tracing::error!(error = %e, model = %self.model, "Gemini caption request failed");
                Err(CaptionError::Provider(e.to_string()))
            }
        }
    }
}

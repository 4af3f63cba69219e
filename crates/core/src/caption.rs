//! Caption contract: image in, short mood glyph out.
//!
//! Providers ([`CaptionProvider`]) may fail; [`Captioner`] never does. Any
//! provider error or empty answer is replaced by a glyph drawn uniformly
//! from [`FALLBACK_CAPTIONS`].

use std::sync::{Arc, LazyLock};

use rand::seq::IndexedRandom;
use regex::Regex;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Mood glyphs used when the provider cannot answer.
pub const FALLBACK_CAPTIONS: &[&str] = &["(｡♥‿♥｡)", "(⊙_⊙)", "(≧◡≦)", "(TwT)", "(o_O)", "(*^▽^*)"];

/// Caption used by the server when the model answers with no text.
pub const DEFAULT_CAPTION: &str = "(*^▽^*)";

/// Media type assumed for raw payloads.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Instruction sent alongside the image.
pub const CAPTION_PROMPT: &str = "Analyze this image. Return a SINGLE, cute, and relevant Kaomoji \
(颜文字) that matches the mood of the photo. Example outputs: (｡♥‿♥｡), (⊙_⊙), (≧◡≦), (TwT), \
(o_O), (*^▽^*). ONLY return the Kaomoji string. No text.";

static DATA_URI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^data:([^;,]+)(?:;[^,]*)?,(.*)$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Image payload
// ---------------------------------------------------------------------------

/// A normalized image ready to send to a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Base64 data without any data-URI prefix.
    pub data: String,
}

impl ImagePayload {
    /// Accept either a raw base64 payload or a `data:<mime>;base64,<data>`
    /// URI; both produce the same payload shape.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match DATA_URI_RE.captures(input) {
            Some(caps) => Self {
                mime_type: caps[1].to_string(),
                data: caps[2].to_string(),
            },
            None => Self {
                mime_type: DEFAULT_MIME_TYPE.to_string(),
                data: input.to_string(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Provider contract
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    #[error("Caption credential is not configured")]
    MissingCredential,

    #[error("Caption provider failed: {0}")]
    Provider(String),

    #[error("Caption provider returned no text")]
    Empty,
}

/// Something that can describe an image in a short string.
#[async_trait::async_trait]
pub trait CaptionProvider: Send + Sync {
    async fn generate(&self, image: &ImagePayload) -> Result<String, CaptionError>;
}

/// Pick a fallback glyph uniformly at random.
pub fn fallback_caption() -> &'static str {
    FALLBACK_CAPTIONS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(DEFAULT_CAPTION)
}

/// Infallible captioning front for a provider.
///
/// Constructed once and shared; cloning is cheap.
#[derive(Clone)]
pub struct Captioner {
    provider: Option<Arc<dyn CaptionProvider>>,
}

impl Captioner {
    pub fn new(provider: Arc<dyn CaptionProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A captioner with no provider; always answers with a fallback.
    pub fn offline() -> Self {
        Self { provider: None }
    }

    /// Caption an image given as raw base64 or a data URI.
    ///
    /// Never fails and never returns an empty string.
    pub async fn caption(&self, image: &str) -> String {
        let Some(provider) = &self.provider else {
            tracing::warn!("No caption provider configured, using fallback caption");
            return fallback_caption().to_string();
        };

        let payload = ImagePayload::parse(image);
        match provider.generate(&payload).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!("Caption provider returned empty text, using fallback caption");
                fallback_caption().to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Caption generation failed, using fallback caption");
                fallback_caption().to_string()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Gemini REST client used to caption booth photos.
//!
//! Wraps the `generateContent` endpoint and adapts it to the
//! [`CaptionProvider`](snapbooth_core::caption::CaptionProvider) contract.

pub mod api;

pub use api::{GeminiApi, GeminiApiError};

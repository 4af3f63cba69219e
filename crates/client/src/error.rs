use snapbooth_core::booth::CaptureRejected;
use snapbooth_core::error::CoreError;
use snapbooth_store::StoreError;

/// Errors surfaced by the booth client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The shutter press was not accepted.
    #[error("Capture rejected: {0}")]
    Capture(#[from] CaptureRejected),

    /// The camera had no frame to hand out.
    #[error("Camera has no frame ready")]
    NoFrame,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

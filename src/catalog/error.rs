//! Error types for catalog and collections requests.

use thiserror::Error;

/// Errors that can occur while talking to the catalog service.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure (DNS, connect, reset, ...)
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Service answered with a non-2xx status
    #[error("Catalog service returned {status} for '{url}'")]
    Status { url: String, status: u16 },

    /// Body was not the expected JSON shape
    #[error("Failed to decode response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the configured timeout
    #[error("Request timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Request was superseded and aborted before completing
    #[error("Request cancelled")]
    Cancelled,

    /// Operation needs a signed-in user and no token is available
    #[error("Not signed in: set a token to manage collections")]
    Unauthenticated,

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The configured base URL cannot be combined with the request path
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    /// Cancellation is internal and never surfaced to the user.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    /// Short machine-readable label, used in log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "transport_error",
            FetchError::Status { .. } => "status_error",
            FetchError::Decode { .. } => "decode_error",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Cancelled => "cancelled",
            FetchError::Unauthenticated => "unauthenticated",
            FetchError::Client(_) => "client_error",
            FetchError::InvalidUrl { .. } => "invalid_url",
        }
    }
}

//! Error types shared across the wayfarer crates.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the sync façade and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// Client-side invariant violation. Never reaches the network.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport-level failure (unreachable host, timeout, abort).
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx rejection from the hosted backend.
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Local cache store failure. Callers treat this as "entry absent".
    #[error("Cache error: {0}")]
    Cache(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Entity lookup miss.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a remote rejection from status and message.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Create a cache-store error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }

    /// HTTP status if this is a remote rejection.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures worth degrading to cached data: transport errors
    /// and server-side 5xx/408/429 responses.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Remote { status, .. } => matches!(status, 408 | 429 | 500..=599),
            _ => false,
        }
    }
}

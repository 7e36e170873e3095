//! Error types for the queue client

use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors that can occur when fetching from the backend
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response arrived within the timeout
    #[error("Request timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// HTTP request failed (connection refused, DNS failure, reset, ...)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Response body is not the expected JSON
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Coarse classification of a [`FetchError`]
///
/// This is what pollers branch on; the variants above keep the detail for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response within the bound
    Timeout,
    /// Connection or DNS failure, or a non-2xx status
    Network,
    /// Malformed response body
    Decode,
}

impl FetchError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::RequestFailed(e) if e.is_timeout() => ErrorKind::Timeout,
            Self::RequestFailed(e) if e.is_decode() => ErrorKind::Decode,
            Self::RequestFailed(_) | Self::ApiError { .. } => ErrorKind::Network,
            Self::ParseError(_) => ErrorKind::Decode,
        }
    }
}

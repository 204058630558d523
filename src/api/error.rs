//! Client Error Types

use thiserror::Error;

/// Errors returned by [`ApiClient`](super::ApiClient)
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure or an unusable URL
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered outside the 2xx range
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    /// Body was not the expected JSON
    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Caller supplied a header that cannot be sent
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Envelope reported `success: false`
    #[error("{0}")]
    Rejected(String),
}

impl ClientError {
    /// HTTP status for [`ClientError::Status`]
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

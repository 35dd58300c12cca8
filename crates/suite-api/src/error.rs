//! Error types for service gateway calls

use suite_core::CoreError;
use thiserror::Error;

/// Gateway failures
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success HTTP status, carrying the user-facing message built from the body
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// The service answered with success but the body was not valid JSON
    #[error("Failed to parse successful API response. Expected JSON.")]
    MalformedResponse(#[source] serde_json::Error),

    /// JSON was valid but did not have the expected dataset shape
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(#[from] CoreError),

    /// Rejected before any network call
    #[error("{0}")]
    InvalidRequest(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// HTTP status for request failures
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, ApiError>;

//! Client error types

use thiserror::Error;

/// Client error type
///
/// Display strings are written for end users: the console prints them
/// as-is when a command fails.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, TLS, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status with the best message found in the body
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 401 from the backend
    #[error("{0}")]
    Unauthorized(String),

    /// 404 from the backend
    #[error("{0}")]
    NotFound(String),

    /// Success status but the body could not be used
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Upload produced no rows, neither from the backend nor the fallback parser
    #[error("No data found in uploaded file")]
    NoDataFound,

    /// Local file error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing or unusable session
    #[error("Session error: {0}")]
    Session(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status for backend-reported failures
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

//! Client error type

use thiserror::Error;

/// Shown when a failed response carries no usable message
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message fit for display: the server's own message for API errors,
    /// the generic fallback for everything else
    pub fn user_message(&self) -> &str {
        match self {
            ClientError::Api { message, .. } => message,
            _ => FALLBACK_MESSAGE,
        }
    }
}

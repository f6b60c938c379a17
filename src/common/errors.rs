//! Error types for the application

use thiserror::Error;

/// Result type alias using our ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Non-2xx response from the strategy API
    #[error("Server returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Invalid user-supplied value (risk level, sort option, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request superseded by a newer query cycle
    #[error("Request cancelled")]
    Cancelled,

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Returns true if the request was cancelled rather than failed
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    /// Message suitable for showing to an end user
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
            ClientError::HttpRequest(e) if e.is_timeout() => "The strategy service timed out".to_string(),
            ClientError::HttpRequest(e) if e.is_connect() => {
                "Could not reach the strategy service".to_string()
            }
            ClientError::JsonParse(_) => "The strategy service returned malformed data".to_string(),
            other => other.to_string(),
        }
    }
}

/// Client error type
///
/// Transport failures and non-success responses are kept apart so callers
/// can tell "server unreachable" from "server said no".

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Request could not be sent or the response could not be read
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// API answered with a non-success status
    #[error("API returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

impl ClientError {
    /// HTTP status of an API error response, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

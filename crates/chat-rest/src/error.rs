//! REST client errors

use thiserror::Error;

/// Errors of the REST bootstrap exchanges
#[derive(Debug, Error)]
pub enum RestError {
    /// The request never got a response
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-success status without usable detail
    #[error("Request failed with status {0}")]
    Status(u16),

    /// Non-success status with per-field messages from the server
    #[error("Request rejected ({status}): {}", details.join("; "))]
    Rejected { status: u16, details: Vec<String> },

    /// Success status but the body is not what was expected
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RestError {
    /// Messages to surface to the user, one per line
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            Self::Rejected { details, .. } => details.clone(),
            other => vec![other.to_string()],
        }
    }

    /// HTTP status of the failed exchange, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(status) | Self::Rejected { status, .. } => Some(*status),
            Self::Transport(_) | Self::InvalidResponse(_) => None,
        }
    }
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<RestError> for chat_common::AppError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::Rejected { details, .. } => Self::LoginRejected(details.join(" ")),
            other => Self::Rest(other.to_string()),
        }
    }
}

/// Result type alias for REST operations
pub type RestResult<T> = Result<T, RestError>;

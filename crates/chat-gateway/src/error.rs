//! Gateway error types

use chat_rest::RestError;
use thiserror::Error;

/// A frame could not be turned into an event
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not JSON, or not an object at the top level
    #[error("Malformed gateway frame: {0}")]
    Malformed(String),

    /// Frame bytes are not valid UTF-8
    #[error("Gateway frame is not valid UTF-8")]
    InvalidUtf8,

    /// Frame grew past the configured cap
    #[error("Gateway frame exceeds {max} bytes")]
    Oversized { max: usize },
}

impl DecodeError {
    /// Check if the connection can no longer be trusted after this error
    ///
    /// Only a frame whose top-level shape is wrong ends the session; a bad
    /// frame at the byte level is discarded.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

/// Transport substrate failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Unable to connect to {host}: {reason}")]
    Connect { host: String, reason: String },

    #[error("Unable to send frame: {0}")]
    Send(String),

    #[error("Transport is not connected")]
    NotConnected,
}

/// Umbrella error for the session engine and its driver
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Rest(#[from] RestError),

    /// Outbound frame could not be serialized
    #[error("Unable to encode gateway frame: {0}")]
    Encode(#[from] serde_json::Error),

    /// Operation attempted in a phase that does not allow it
    #[error("Session is {0}")]
    InvalidPhase(&'static str),

    #[error("Session closed")]
    Closed,
}

impl GatewayError {
    /// Check if the session must be torn down after this error
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Decode(e) => e.is_fatal(),
            Self::InvalidPhase(_) => false,
            Self::Transport(_) | Self::Rest(_) | Self::Encode(_) | Self::Closed => true,
        }
    }
}

impl From<GatewayError> for chat_common::AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Transport(e) => Self::transport(e),
            GatewayError::Encode(e) => Self::transport(e),
            GatewayError::Decode(e) => Self::Decode(e.to_string()),
            GatewayError::Rest(e) => e.into(),
            GatewayError::InvalidPhase(_) | GatewayError::Closed => Self::SessionClosed,
        }
    }
}

/// Gateway result type
pub type GatewayResult<T> = Result<T, GatewayError>;

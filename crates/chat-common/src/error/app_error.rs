//! Application error types
//!
//! Unified error handling for the client binary. Library crates keep their
//! own typed errors and convert into this one at the top level.

use chat_core::DomainError;
use std::fmt;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Login rejected: {0}")]
    LoginRejected(String),

    // Remote errors
    #[error("REST request failed: {0}")]
    Rest(String),

    #[error("Gateway transport error: {0}")]
    Transport(String),

    #[error("Gateway decode error: {0}")]
    Decode(String),

    #[error("Session closed")]
    SessionClosed,

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Get error code for diagnostics
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LoginRejected(_) => "LOGIN_REJECTED",
            Self::Rest(_) => "REST_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::SessionClosed => "SESSION_CLOSED",
            Self::Domain(e) => e.code(),
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Check if the session cannot continue after this error
    ///
    /// Domain errors are absorbed locally; everything else ends the session
    /// and requires a fresh login.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Domain(_))
    }

    /// Create a REST error from any displayable value
    #[must_use]
    pub fn rest(msg: impl fmt::Display) -> Self {
        Self::Rest(msg.to_string())
    }

    /// Create a transport error from any displayable value
    #[must_use]
    pub fn transport(msg: impl fmt::Display) -> Self {
        Self::Transport(msg.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

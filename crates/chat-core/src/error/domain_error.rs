//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::ConversationHandle;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Guild not found: {0}")]
    GuildNotFound(String),

    #[error("No channel for {0}")]
    ConversationNotFound(ConversationHandle),

    #[error("No private channel with {0}")]
    PeerNotFound(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Guild already known: {0}")]
    DuplicateGuild(String),

    #[error("Channel already known: {0}")]
    DuplicateChannel(String),
}

impl DomainError {
    /// Get an error code string for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",
            Self::PeerNotFound(_) => "UNKNOWN_PEER",

            // Conflict
            Self::DuplicateGuild(_) => "DUPLICATE_GUILD",
            Self::DuplicateChannel(_) => "DUPLICATE_CHANNEL",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GuildNotFound(_) | Self::ConversationNotFound(_) | Self::PeerNotFound(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateGuild(_) | Self::DuplicateChannel(_))
    }
}

//! Gateway event types
//!
//! Dispatch event names the engine acts on. Every other name is carried
//! through as an unrecognized event.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dispatch event names (the `t` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEventType {
    /// Session ready, carries the snapshot
    Ready,
    /// User status changed
    PresenceUpdate,
    /// New message
    MessageCreate,
}

impl GatewayEventType {
    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::PresenceUpdate => "PRESENCE_UPDATE",
            Self::MessageCreate => "MESSAGE_CREATE",
        }
    }

    /// Parse an event type from a string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "READY" => Some(Self::Ready),
            "PRESENCE_UPDATE" => Some(Self::PresenceUpdate),
            "MESSAGE_CREATE" => Some(Self::MessageCreate),
            _ => None,
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

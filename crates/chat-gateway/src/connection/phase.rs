//! Connection phases

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a gateway session
///
/// `Idle -> Connecting -> Connected -> Ready`, and `Closed` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionPhase {
    /// Waiting for a gateway host
    #[default]
    Idle,
    /// Transport connection requested
    Connecting,
    /// Handshake done, identify sent, waiting for READY
    Connected,
    /// Snapshot applied; heartbeats running
    Ready,
    /// Terminal
    Closed,
}

impl ConnectionPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Ready => "ready",
            Self::Closed => "closed",
        }
    }

    /// Check if the account counts as online (no offline-only changes)
    #[must_use]
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Connecting | Self::Connected | Self::Ready)
    }

    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

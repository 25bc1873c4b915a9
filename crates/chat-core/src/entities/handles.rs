//! Opaque handles to objects owned by the host messaging framework
//!
//! The directory only keeps back-references: the host decides the lifetime
//! of buddies and conversations, the engine just remembers which one belongs
//! to which channel or user.

use std::fmt;

/// Handle to a group conversation created by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationHandle(u64);

impl ConversationHandle {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConversationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conversation#{}", self.0)
    }
}

/// Handle to a buddy (contact) registered with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuddyHandle(u64);

impl BuddyHandle {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BuddyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buddy#{}", self.0)
    }
}

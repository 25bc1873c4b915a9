//! User entity - a guild member known to this account

use super::BuddyHandle;

/// A user seen in a guild member list
///
/// Users are keyed by display name within an account; the first member
/// seen under a name wins and later sightings reuse the same record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub buddy: BuddyHandle,
}

impl User {
    /// Create a new User linked to a host buddy
    pub fn new(id: impl Into<String>, name: impl Into<String>, buddy: BuddyHandle) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            buddy,
        }
    }
}

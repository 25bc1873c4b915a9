//! Guild entity - represents a server from the session snapshot

/// Guild (server) entity
///
/// Created once during snapshot ingestion and never updated afterwards.
/// Members are stored by display name, which is the key of the account's
/// user table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: String,
    pub name: String,
    members: Vec<String>,
}

impl Guild {
    /// Create a new Guild with no members
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Add a member by display name; returns false if already present
    pub fn add_member(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.has_member(&name) {
            return false;
        }
        self.members.push(name);
        true
    }

    /// Check if a display name is a member of this guild
    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    /// Member display names in snapshot order
    pub fn members(&self) -> &[String] {
        &self.members
    }
}

//! Directory - the in-memory graph of guilds, channels and users
//!
//! Built once from the READY snapshot and torn down wholesale at logout.
//! Nothing is removed individually in between.

use std::collections::{BTreeMap, HashMap};

use super::{Channel, ConversationHandle, Guild, User};
use crate::error::DomainError;

/// Guilds, channels and users of one logged-in account
#[derive(Debug, Default)]
pub struct Directory {
    guilds: BTreeMap<String, Guild>,
    channels: HashMap<String, Channel>,
    /// Keyed by display name
    users: HashMap<String, User>,
}

impl Directory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Guilds ===

    /// Add a guild; an id seen twice is rejected and the first one kept
    pub fn insert_guild(&mut self, guild: Guild) -> Result<&mut Guild, DomainError> {
        use std::collections::btree_map::Entry;

        match self.guilds.entry(guild.id.clone()) {
            Entry::Occupied(_) => Err(DomainError::DuplicateGuild(guild.id)),
            Entry::Vacant(slot) => Ok(slot.insert(guild)),
        }
    }

    pub fn guild(&self, id: &str) -> Option<&Guild> {
        self.guilds.get(id)
    }

    pub fn guild_mut(&mut self, id: &str) -> Result<&mut Guild, DomainError> {
        self.guilds
            .get_mut(id)
            .ok_or_else(|| DomainError::GuildNotFound(id.to_string()))
    }

    pub fn guilds(&self) -> impl Iterator<Item = &Guild> {
        self.guilds.values()
    }

    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }

    // === Users ===

    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    /// Add a user unless one with the same display name exists (first seen wins)
    pub fn insert_user(&mut self, user: User) -> bool {
        if self.users.contains_key(&user.name) {
            return false;
        }
        self.users.insert(user.name.clone(), user);
        true
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    // === Channels ===

    /// Add a channel; an id seen twice is rejected and the first one kept
    pub fn insert_channel(&mut self, channel: Channel) -> Result<(), DomainError> {
        if self.channels.contains_key(&channel.id) {
            return Err(DomainError::DuplicateChannel(channel.id));
        }
        self.channels.insert(channel.id.clone(), channel);
        Ok(())
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.get(id)
    }

    pub fn channel_mut(&mut self, id: &str) -> Option<&mut Channel> {
        self.channels.get_mut(id)
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// The guild channel backing a group conversation
    pub fn channel_for_conversation(
        &self,
        conversation: ConversationHandle,
    ) -> Result<&Channel, DomainError> {
        self.channels
            .values()
            .find(|c| c.conversation() == Some(conversation))
            .ok_or(DomainError::ConversationNotFound(conversation))
    }

    /// Every private channel configured for `peer`, ordered by id
    pub fn private_channels_with(&self, peer: &str) -> Vec<&Channel> {
        let mut channels: Vec<&Channel> = self
            .channels
            .values()
            .filter(|c| c.peer() == Some(peer))
            .collect();
        channels.sort_by(|a, b| a.id.cmp(&b.id));
        channels
    }

    pub fn is_empty(&self) -> bool {
        self.guilds.is_empty() && self.channels.is_empty() && self.users.is_empty()
    }

    /// Drop everything, returning the conversations that were bound to channels
    ///
    /// Channels go first, then guilds, then users, so no guild is released
    /// while a channel still points at it.
    pub fn clear(&mut self) -> Vec<ConversationHandle> {
        let mut conversations: Vec<ConversationHandle> = self
            .channels
            .drain()
            .filter_map(|(_, channel)| channel.conversation())
            .collect();
        conversations.sort();
        self.guilds.clear();
        self.users.clear();
        conversations
    }
}

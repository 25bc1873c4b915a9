//! Channel entity - a guild text channel or a private conversation

use serde_json::Value;

use super::ConversationHandle;
use crate::value_objects::Snowflake;

/// Channel type as announced in the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ChannelType {
    /// Guild text channel
    #[default]
    GuildText = 0,
    /// Direct message between users
    Dm = 1,
    /// Guild voice channel
    GuildVoice = 2,
    /// Group direct message
    GroupDm = 3,
    /// Guild category for organizing channels
    GuildCategory = 4,
    /// Anything this client does not know about
    Other = u8::MAX,
}

impl ChannelType {
    /// Interpret the `type` field of a channel object
    ///
    /// Older gateway versions send the string `"text"`/`"voice"`, newer
    /// ones send an integer.
    #[must_use]
    pub fn from_wire(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => match s.as_str() {
                "text" => Self::GuildText,
                "voice" => Self::GuildVoice,
                "category" => Self::GuildCategory,
                _ => Self::Other,
            },
            Some(Value::Number(n)) => n.as_u64().map_or(Self::Other, Self::from_u64),
            _ => Self::Other,
        }
    }

    fn from_u64(value: u64) -> Self {
        match value {
            0 => Self::GuildText,
            1 => Self::Dm,
            2 => Self::GuildVoice,
            3 => Self::GroupDm,
            4 => Self::GuildCategory,
            _ => Self::Other,
        }
    }

    /// Check if this is a guild text channel
    #[inline]
    #[must_use]
    pub fn is_guild_text(self) -> bool {
        matches!(self, Self::GuildText)
    }
}

/// Where messages of a channel are delivered
///
/// The variant is fixed when the channel is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelTarget {
    /// Guild channel mapped onto a host group conversation
    Group {
        conversation: ConversationHandle,
        guild_id: String,
    },
    /// Private channel with a single peer, identified by display name
    Private { peer: String },
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    last_message_id: Snowflake,
    target: ChannelTarget,
}

impl Channel {
    /// Create a guild channel bound to a group conversation
    #[must_use]
    pub fn new_group(
        id: impl Into<String>,
        guild_id: impl Into<String>,
        conversation: ConversationHandle,
    ) -> Self {
        Self {
            id: id.into(),
            last_message_id: Snowflake::NONE,
            target: ChannelTarget::Group {
                conversation,
                guild_id: guild_id.into(),
            },
        }
    }

    /// Create a private channel with a peer
    #[must_use]
    pub fn new_private(id: impl Into<String>, peer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            last_message_id: Snowflake::NONE,
            target: ChannelTarget::Private { peer: peer.into() },
        }
    }

    /// Seed the watermark, typically from the snapshot's last message id
    #[must_use]
    pub fn with_watermark(mut self, last_message_id: Snowflake) -> Self {
        self.last_message_id = last_message_id;
        self
    }

    /// Highest message id already handled (zero when none seen)
    #[inline]
    pub fn watermark(&self) -> Snowflake {
        self.last_message_id
    }

    #[inline]
    pub fn target(&self) -> &ChannelTarget {
        &self.target
    }

    /// Check if this is a private channel
    #[inline]
    #[must_use]
    pub fn is_private(&self) -> bool {
        matches!(self.target, ChannelTarget::Private { .. })
    }

    /// Peer display name for private channels
    pub fn peer(&self) -> Option<&str> {
        match &self.target {
            ChannelTarget::Private { peer } => Some(peer),
            ChannelTarget::Group { .. } => None,
        }
    }

    /// Conversation handle for guild channels
    pub fn conversation(&self) -> Option<ConversationHandle> {
        match &self.target {
            ChannelTarget::Group { conversation, .. } => Some(*conversation),
            ChannelTarget::Private { .. } => None,
        }
    }

    /// Check a message id against the watermark and advance it
    ///
    /// Returns true only if `message_id` is strictly newer than anything
    /// handled so far; the watermark then moves to `message_id`.
    pub fn advance(&mut self, message_id: Snowflake) -> bool {
        if message_id > self.last_message_id {
            self.last_message_id = message_id;
            true
        } else {
            false
        }
    }
}

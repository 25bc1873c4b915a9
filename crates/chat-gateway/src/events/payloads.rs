//! Event payload definitions
//!
//! Views over dispatch payloads. Every field is optional and every nested
//! object or list is parsed on its own: a wrong-typed sub-field becomes
//! absent, a malformed list entry is dropped, and the rest still parses.

use chat_core::{ChannelType, Snowflake};
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

// === Connection Events ===

/// READY event payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReadyPayload {
    /// Heartbeat interval in milliseconds
    #[serde(deserialize_with = "lenient")]
    pub heartbeat_interval: Option<u64>,

    /// Current user
    #[serde(deserialize_with = "lenient")]
    pub user: Option<UserPayload>,

    #[serde(deserialize_with = "lenient_list")]
    pub guilds: Vec<GuildPayload>,

    #[serde(deserialize_with = "lenient_list")]
    pub private_channels: Vec<PrivateChannelPayload>,
}

impl ReadyPayload {
    /// Parse a READY `d` field; anything unusable yields an empty snapshot
    pub fn from_data(data: Option<Value>) -> Self {
        match data {
            Some(data) => serde_json::from_value(data).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "READY payload is not an object");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

// === User Payload ===

/// User data included in events
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserPayload {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub username: Option<String>,
}

// === Guild Payloads ===

/// Guild entry of the READY snapshot
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GuildPayload {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub members: Vec<MemberPayload>,
    #[serde(deserialize_with = "lenient_list")]
    pub channels: Vec<ChannelPayload>,
}

/// Guild member entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemberPayload {
    #[serde(deserialize_with = "lenient")]
    pub user: Option<UserPayload>,
}

impl MemberPayload {
    /// Display name of the member, if the user sub-object carried one
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref()?.username.as_deref()
    }
}

// === Channel Payloads ===

/// Guild channel entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChannelPayload {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub topic: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    #[serde(deserialize_with = "lenient_id")]
    pub last_message_id: Option<String>,
}

impl ChannelPayload {
    pub fn channel_type(&self) -> ChannelType {
        ChannelType::from_wire(self.kind.as_ref())
    }

    /// Watermark to seed the channel with
    pub fn watermark(&self) -> Snowflake {
        Snowflake::parse_opt(self.last_message_id.as_deref()).unwrap_or(Snowflake::NONE)
    }
}

/// Private channel entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrivateChannelPayload {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub recipient: Option<UserPayload>,
    #[serde(deserialize_with = "lenient_list")]
    pub recipients: Vec<UserPayload>,
    #[serde(deserialize_with = "lenient_id")]
    pub last_message_id: Option<String>,
}

impl PrivateChannelPayload {
    /// Peer display name: `recipient`, else the first of `recipients`
    pub fn peer(&self) -> Option<&str> {
        self.recipient
            .as_ref()
            .and_then(|r| r.username.as_deref())
            .or_else(|| self.recipients.first()?.username.as_deref())
    }

    pub fn watermark(&self) -> Snowflake {
        Snowflake::parse_opt(self.last_message_id.as_deref()).unwrap_or(Snowflake::NONE)
    }
}

// === Message Events ===

/// MESSAGE_CREATE event payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessagePayload {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_id")]
    pub channel_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub author: Option<UserPayload>,
    #[serde(deserialize_with = "lenient")]
    pub content: Option<String>,
}

impl MessagePayload {
    pub fn from_data(data: Option<Value>) -> Self {
        data.and_then(|data| serde_json::from_value(data).ok())
            .unwrap_or_default()
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref()?.username.as_deref()
    }
}

// === Lenient field parsers ===

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed field");
            Ok(None)
        }
    }
}

/// Identifiers arrive as strings, older servers sometimes send numbers
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        tracing::debug!("Ignoring list field that is not an array");
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed list entry");
                None
            }
        })
        .collect())
}

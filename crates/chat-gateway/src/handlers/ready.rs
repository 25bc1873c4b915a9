//! READY handler - builds the directory from the session snapshot

use chat_core::{Channel, Directory, Guild, User};

use crate::events::{ChannelPayload, GuildPayload, PrivateChannelPayload, ReadyPayload};
use crate::host::Host;

/// Who the session is logged in as
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelfIdentity {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl SelfIdentity {
    pub fn is(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// Applies the READY snapshot
pub struct ReadyHandler;

impl ReadyHandler {
    /// Populate `directory` from a snapshot
    ///
    /// Guilds and their channels come first, then private channels.
    /// Entries missing an identifier are skipped. The caller signals the
    /// host that the account is connected once this returns.
    pub fn handle<H: Host>(
        host: &mut H,
        directory: &mut Directory,
        snapshot: &ReadyPayload,
    ) -> SelfIdentity {
        let me = SelfIdentity {
            id: snapshot.user.as_ref().and_then(|u| u.id.clone()),
            name: snapshot.user.as_ref().and_then(|u| u.username.clone()),
        };
        if me.name.is_none() {
            tracing::debug!("READY carries no self user");
        }

        for guild in &snapshot.guilds {
            Self::add_guild(host, directory, guild, &me);
        }

        for private in &snapshot.private_channels {
            Self::add_private_channel(directory, private);
        }

        tracing::info!(
            guilds = directory.guild_count(),
            channels = directory.channel_count(),
            users = directory.user_count(),
            "Directory built"
        );

        me
    }

    fn add_guild<H: Host>(
        host: &mut H,
        directory: &mut Directory,
        payload: &GuildPayload,
        me: &SelfIdentity,
    ) {
        let Some(guild_id) = payload.id.as_deref() else {
            tracing::debug!("Skipping guild without id");
            return;
        };
        if directory.guild(guild_id).is_some() {
            tracing::debug!(guild_id, "Skipping duplicate guild");
            return;
        }

        let mut guild = Guild::new(guild_id, payload.name.as_deref().unwrap_or(guild_id));

        for member in &payload.members {
            let Some(name) = member.username() else {
                tracing::debug!(guild_id, "Skipping member without username");
                continue;
            };
            let user_id = member
                .user
                .as_ref()
                .and_then(|u| u.id.as_deref())
                .unwrap_or_default();

            resolve_user(host, directory, user_id, name);
            guild.add_member(name);
        }

        for channel in &payload.channels {
            Self::add_group_channel(host, directory, &guild, channel, me);
        }

        if let Err(e) = directory.insert_guild(guild) {
            tracing::debug!(error = %e, "Guild not added");
        }
    }

    fn add_group_channel<H: Host>(
        host: &mut H,
        directory: &mut Directory,
        guild: &Guild,
        payload: &ChannelPayload,
        me: &SelfIdentity,
    ) {
        if !payload.channel_type().is_guild_text() {
            tracing::trace!(channel_id = ?payload.id, "Skipping non-text channel");
            return;
        }
        let Some(channel_id) = payload.id.as_deref() else {
            tracing::debug!(guild_id = %guild.id, "Skipping channel without id");
            return;
        };
        if directory.channel(channel_id).is_some() {
            tracing::debug!(channel_id, "Skipping duplicate channel");
            return;
        }

        let name = payload.name.as_deref().unwrap_or(channel_id);
        let title = format!("{}/{name}", guild.name);
        let conversation = host.create_conversation(&title, name);

        if let Some(topic) = payload.topic.as_deref().filter(|t| !t.is_empty()) {
            host.set_conversation_topic(conversation, topic);
        }

        for member in guild.members().iter().filter(|m| !me.is(m)) {
            host.add_participant(conversation, member);
        }
        if let Some(self_name) = me.name.as_deref() {
            host.add_participant(conversation, self_name);
        }

        let channel =
            Channel::new_group(channel_id, &guild.id, conversation).with_watermark(payload.watermark());
        if let Err(e) = directory.insert_channel(channel) {
            tracing::debug!(error = %e, "Channel not added");
        }
    }

    fn add_private_channel(directory: &mut Directory, payload: &PrivateChannelPayload) {
        let (Some(channel_id), Some(peer)) = (payload.id.as_deref(), payload.peer()) else {
            tracing::debug!(channel_id = ?payload.id, "Skipping private channel without id or peer");
            return;
        };

        let channel = Channel::new_private(channel_id, peer).with_watermark(payload.watermark());
        if let Err(e) = directory.insert_channel(channel) {
            tracing::debug!(error = %e, "Private channel not added");
        }
    }
}

/// Reuse the user already known under `name`, else the host's buddy, else add one
fn resolve_user<H: Host>(host: &mut H, directory: &mut Directory, id: &str, name: &str) {
    if directory.user(name).is_some() {
        return;
    }
    let buddy = match host.find_buddy(name) {
        Some(buddy) => buddy,
        None => host.add_buddy(name),
    };
    directory.insert_user(User::new(id, name, buddy));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{HostCall, RecordingHost};
    use chat_core::{ChannelTarget, Snowflake};
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> ReadyPayload {
        ReadyPayload::from_data(Some(value))
    }

    fn three_member_guild() -> ReadyPayload {
        snapshot(json!({
            "user": {"id": "1", "username": "me"},
            "guilds": [{
                "id": "100",
                "name": "rust",
                "members": [
                    {"user": {"id": "2", "username": "alice"}},
                    {"user": {"id": "1", "username": "me"}},
                    {"user": {"id": "3", "username": "bob"}}
                ],
                "channels": [
                    {"id": "200", "name": "general", "type": "text", "topic": "hello", "last_message_id": "77"},
                    {"id": "201", "name": "voice", "type": "voice"},
                    {"id": "202", "name": "random", "type": 0}
                ]
            }]
        }))
    }

    #[test]
    fn test_self_identity() {
        let mut host = RecordingHost::new();
        let mut directory = Directory::new();
        let me = ReadyHandler::handle(&mut host, &mut directory, &three_member_guild());

        assert_eq!(me.id.as_deref(), Some("1"));
        assert_eq!(me.name.as_deref(), Some("me"));
        assert!(me.is("me"));
        assert!(!me.is("alice"));
    }

    #[test]
    fn test_self_added_once_per_conversation() {
        let mut host = RecordingHost::new();
        let mut directory = Directory::new();
        ReadyHandler::handle(&mut host, &mut directory, &three_member_guild());

        let conversation = directory.channel("200").and_then(Channel::conversation).unwrap();
        assert_eq!(host.participants(conversation), vec!["alice", "bob", "me"]);
    }

    #[test]
    fn test_text_channels_only() {
        let mut host = RecordingHost::new();
        let mut directory = Directory::new();
        ReadyHandler::handle(&mut host, &mut directory, &three_member_guild());

        assert_eq!(directory.channel_count(), 2);
        assert!(directory.channel("201").is_none());
        assert_eq!(directory.channel("200").unwrap().watermark(), Snowflake::new(77));
        assert!(directory.channel("202").unwrap().watermark().is_zero());
        assert_eq!(
            host.conversation_titles(),
            vec![("rust/general".to_string(), "general".to_string()), ("rust/random".to_string(), "random".to_string())]
        );

        let conversation = directory.channel("200").and_then(Channel::conversation).unwrap();
        assert!(host.calls().contains(&HostCall::SetTopic(conversation, "hello".to_string())));
    }

    #[test]
    fn test_users_are_first_seen_wins() {
        let mut host = RecordingHost::new();
        let mut directory = Directory::new();
        let payload = snapshot(json!({
            "user": {"id": "1", "username": "me"},
            "guilds": [
                {"id": "100", "name": "a", "members": [{"user": {"id": "2", "username": "alice"}}]},
                {"id": "101", "name": "b", "members": [{"user": {"id": "9", "username": "alice"}}]}
            ]
        }));
        ReadyHandler::handle(&mut host, &mut directory, &payload);

        assert_eq!(directory.guild_count(), 2);
        assert_eq!(directory.user_count(), 1);
        assert_eq!(directory.user("alice").unwrap().id, "2");
        assert_eq!(host.added_buddies(), vec!["alice"]);
    }

    #[test]
    fn test_existing_buddy_is_reused() {
        let mut host = RecordingHost::new().with_buddy("alice");
        let mut directory = Directory::new();
        let payload = snapshot(json!({
            "guilds": [{"id": "100", "name": "a", "members": [{"user": {"id": "2", "username": "alice"}}]}]
        }));
        ReadyHandler::handle(&mut host, &mut directory, &payload);

        assert!(host.added_buddies().is_empty());
        assert_eq!(
            Some(directory.user("alice").unwrap().buddy),
            host.find_buddy("alice")
        );
    }

    #[test]
    fn test_private_channels() {
        let mut host = RecordingHost::new();
        let mut directory = Directory::new();
        let payload = snapshot(json!({
            "private_channels": [
                {"id": "300", "recipient": {"username": "alice"}, "last_message_id": "12"},
                {"id": "301", "recipients": [{"username": "bob"}]},
                {"recipient": {"username": "carol"}},
                {"id": "303"}
            ]
        }));
        ReadyHandler::handle(&mut host, &mut directory, &payload);

        assert_eq!(directory.channel_count(), 2);
        let alice = directory.channel("300").unwrap();
        assert_eq!(alice.target(), &ChannelTarget::Private { peer: "alice".to_string() });
        assert_eq!(alice.watermark(), Snowflake::new(12));
        assert_eq!(directory.channel("301").unwrap().peer(), Some("bob"));
    }

    #[test]
    fn test_entries_without_id_are_skipped() {
        let mut host = RecordingHost::new();
        let mut directory = Directory::new();
        let payload = snapshot(json!({
            "guilds": [
                {"name": "anonymous", "channels": [{"id": "1", "type": "text"}]},
                {"id": "100", "name": "ok", "channels": [{"name": "no-id", "type": "text"}]}
            ]
        }));
        ReadyHandler::handle(&mut host, &mut directory, &payload);

        assert_eq!(directory.guild_count(), 1);
        assert_eq!(directory.channel_count(), 0);
        assert!(host.conversation_titles().is_empty());
    }

    #[test]
    fn test_empty_snapshot() {
        let mut host = RecordingHost::new();
        let mut directory = Directory::new();
        let me = ReadyHandler::handle(&mut host, &mut directory, &ReadyPayload::default());

        assert_eq!(me, SelfIdentity::default());
        assert!(directory.is_empty());
        assert!(host.calls().is_empty());
    }
}

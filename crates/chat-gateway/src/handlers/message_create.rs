//! MESSAGE_CREATE handler - watermark check and delivery

use chat_core::{ChannelTarget, Directory, Snowflake};

use crate::events::MessagePayload;
use crate::host::Host;

/// What happened to an inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Handed to the host
    Delivered,
    /// New, but the private-channel author check failed
    Suppressed,
    /// Not newer than the channel watermark
    Stale,
    /// Channel is not in the directory
    UnknownChannel,
    /// Message id or channel id missing or unparsable
    Malformed,
}

/// Routes new messages to their conversation
pub struct MessageCreateHandler;

impl MessageCreateHandler {
    /// Deliver `message` if it is newer than its channel's watermark
    ///
    /// The watermark advances for every new message, including private
    /// messages dropped because the author is not the channel's peer.
    pub fn handle<H: Host>(
        host: &mut H,
        directory: &mut Directory,
        message: &MessagePayload,
    ) -> RouteOutcome {
        let (Some(message_id), Some(channel_id)) = (
            Snowflake::parse_opt(message.id.as_deref()),
            message.channel_id.as_deref(),
        ) else {
            tracing::trace!(id = ?message.id, channel_id = ?message.channel_id, "Dropping message without ids");
            return RouteOutcome::Malformed;
        };

        let Some(channel) = directory.channel_mut(channel_id) else {
            tracing::trace!(channel_id, "Dropping message for untracked channel");
            return RouteOutcome::UnknownChannel;
        };

        if !channel.advance(message_id) {
            tracing::trace!(channel_id, %message_id, "Dropping already seen message");
            return RouteOutcome::Stale;
        }

        let author = message.author_name().unwrap_or_default();
        let content = message.content.as_deref().unwrap_or_default();

        match channel.target() {
            ChannelTarget::Private { peer } if peer == author => {
                host.deliver_private_message(peer, content);
                RouteOutcome::Delivered
            }
            ChannelTarget::Private { peer } => {
                // watermark already moved past this id
                tracing::debug!(channel_id, %message_id, peer, author, "Private message author does not match peer");
                RouteOutcome::Suppressed
            }
            ChannelTarget::Group { conversation, .. } => {
                host.deliver_group_message(*conversation, author, content);
                RouteOutcome::Delivered
            }
        }
    }
}

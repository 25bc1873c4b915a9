//! Host framework boundary
//!
//! The engine never owns buddy lists, conversation windows or the account
//! itself. Everything user-facing goes through this trait.

use chat_core::{BuddyHandle, ConversationHandle};

use crate::transport::Interest;

/// Registration handle for a periodic I/O watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

impl WatchId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Services the host messaging framework provides to a session
pub trait Host {
    /// Show an account-level error to the user
    fn report_error(&mut self, message: &str);

    /// The account finished connecting (directory is populated)
    fn notify_connected(&mut self);

    /// The session is gone; the account goes offline
    ///
    /// Called at most once per session.
    fn logout(&mut self);

    /// Look up an existing buddy by display name
    fn find_buddy(&self, name: &str) -> Option<BuddyHandle>;

    /// Add a buddy to the account's list
    fn add_buddy(&mut self, name: &str) -> BuddyHandle;

    /// Open a group conversation
    fn create_conversation(&mut self, title: &str, name_hint: &str) -> ConversationHandle;

    fn set_conversation_topic(&mut self, conversation: ConversationHandle, topic: &str);

    fn add_participant(&mut self, conversation: ConversationHandle, name: &str);

    /// Release a conversation created by `create_conversation`
    fn free_conversation(&mut self, conversation: ConversationHandle);

    fn deliver_group_message(&mut self, conversation: ConversationHandle, author: &str, text: &str);

    fn deliver_private_message(&mut self, peer: &str, text: &str);

    /// Ask to be serviced whenever `fd` becomes ready for `interest`
    fn register_periodic_io(&mut self, fd: i32, interest: Interest) -> WatchId;

    fn unregister_periodic_io(&mut self, watch: WatchId);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn report_error(&mut self, message: &str) {
        (**self).report_error(message);
    }

    fn notify_connected(&mut self) {
        (**self).notify_connected();
    }

    fn logout(&mut self) {
        (**self).logout();
    }

    fn find_buddy(&self, name: &str) -> Option<BuddyHandle> {
        (**self).find_buddy(name)
    }

    fn add_buddy(&mut self, name: &str) -> BuddyHandle {
        (**self).add_buddy(name)
    }

    fn create_conversation(&mut self, title: &str, name_hint: &str) -> ConversationHandle {
        (**self).create_conversation(title, name_hint)
    }

    fn set_conversation_topic(&mut self, conversation: ConversationHandle, topic: &str) {
        (**self).set_conversation_topic(conversation, topic);
    }

    fn add_participant(&mut self, conversation: ConversationHandle, name: &str) {
        (**self).add_participant(conversation, name);
    }

    fn free_conversation(&mut self, conversation: ConversationHandle) {
        (**self).free_conversation(conversation);
    }

    fn deliver_group_message(&mut self, conversation: ConversationHandle, author: &str, text: &str) {
        (**self).deliver_group_message(conversation, author, text);
    }

    fn deliver_private_message(&mut self, peer: &str, text: &str) {
        (**self).deliver_private_message(peer, text);
    }

    fn register_periodic_io(&mut self, fd: i32, interest: Interest) -> WatchId {
        (**self).register_periodic_io(fd, interest)
    }

    fn unregister_periodic_io(&mut self, watch: WatchId) {
        (**self).unregister_periodic_io(watch);
    }
}

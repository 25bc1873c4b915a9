//! Test doubles for the host, transport and clock seams
//!
//! Available to this crate's tests and, behind the `test-util` feature,
//! to other crates.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chat_core::{BuddyHandle, ConversationHandle};

use crate::clock::Clock;
use crate::error::TransportError;
use crate::host::{Host, WatchId};
use crate::protocol::GatewayMessage;
use crate::transport::{Interest, Transport};

/// One call made on a [`RecordingHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ReportError(String),
    Connected,
    Logout,
    AddBuddy(String),
    CreateConversation {
        conversation: ConversationHandle,
        title: String,
        name_hint: String,
    },
    SetTopic(ConversationHandle, String),
    AddParticipant(ConversationHandle, String),
    FreeConversation(ConversationHandle),
    GroupMessage {
        conversation: ConversationHandle,
        author: String,
        text: String,
    },
    PrivateMessage {
        peer: String,
        text: String,
    },
    RegisterIo {
        fd: i32,
        interest: Interest,
        watch: WatchId,
    },
    UnregisterIo(WatchId),
}

/// Host that records every call in order
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    buddies: Vec<(String, BuddyHandle)>,
    next_handle: u64,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the buddy list
    #[must_use]
    pub fn with_buddy(mut self, name: &str) -> Self {
        let handle = BuddyHandle::new(self.next_id());
        self.buddies.push((name.to_string(), handle));
        self
    }

    fn next_id(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn errors(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::ReportError(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &HostCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn logout_count(&self) -> usize {
        self.count(&HostCall::Logout)
    }

    pub fn connected_count(&self) -> usize {
        self.count(&HostCall::Connected)
    }

    pub fn added_buddies(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::AddBuddy(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// `(title, name_hint)` of every conversation created, in order
    pub fn conversation_titles(&self) -> Vec<(String, String)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::CreateConversation {
                    title, name_hint, ..
                } => Some((title.clone(), name_hint.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn participants(&self, conversation: ConversationHandle) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::AddParticipant(conv, name) if *conv == conversation => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn group_messages(&self) -> Vec<(ConversationHandle, String, String)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::GroupMessage {
                    conversation,
                    author,
                    text,
                } => Some((*conversation, author.clone(), text.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn private_messages(&self) -> Vec<(String, String)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::PrivateMessage { peer, text } => Some((peer.clone(), text.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn freed_conversations(&self) -> Vec<ConversationHandle> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::FreeConversation(conv) => Some(*conv),
                _ => None,
            })
            .collect()
    }

    /// Position of the first call matching `pred`
    pub fn position(&self, pred: impl Fn(&HostCall) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }
}

impl Host for RecordingHost {
    fn report_error(&mut self, message: &str) {
        self.calls.push(HostCall::ReportError(message.to_string()));
    }

    fn notify_connected(&mut self) {
        self.calls.push(HostCall::Connected);
    }

    fn logout(&mut self) {
        self.calls.push(HostCall::Logout);
    }

    fn find_buddy(&self, name: &str) -> Option<BuddyHandle> {
        self.buddies
            .iter()
            .find(|(buddy, _)| buddy == name)
            .map(|(_, handle)| *handle)
    }

    fn add_buddy(&mut self, name: &str) -> BuddyHandle {
        let handle = BuddyHandle::new(self.next_id());
        self.buddies.push((name.to_string(), handle));
        self.calls.push(HostCall::AddBuddy(name.to_string()));
        handle
    }

    fn create_conversation(&mut self, title: &str, name_hint: &str) -> ConversationHandle {
        let conversation = ConversationHandle::new(self.next_id());
        self.calls.push(HostCall::CreateConversation {
            conversation,
            title: title.to_string(),
            name_hint: name_hint.to_string(),
        });
        conversation
    }

    fn set_conversation_topic(&mut self, conversation: ConversationHandle, topic: &str) {
        self.calls.push(HostCall::SetTopic(conversation, topic.to_string()));
    }

    fn add_participant(&mut self, conversation: ConversationHandle, name: &str) {
        self.calls.push(HostCall::AddParticipant(conversation, name.to_string()));
    }

    fn free_conversation(&mut self, conversation: ConversationHandle) {
        self.calls.push(HostCall::FreeConversation(conversation));
    }

    fn deliver_group_message(&mut self, conversation: ConversationHandle, author: &str, text: &str) {
        self.calls.push(HostCall::GroupMessage {
            conversation,
            author: author.to_string(),
            text: text.to_string(),
        });
    }

    fn deliver_private_message(&mut self, peer: &str, text: &str) {
        self.calls.push(HostCall::PrivateMessage {
            peer: peer.to_string(),
            text: text.to_string(),
        });
    }

    fn register_periodic_io(&mut self, fd: i32, interest: Interest) -> WatchId {
        let watch = WatchId::new(self.next_id());
        self.calls.push(HostCall::RegisterIo {
            fd,
            interest,
            watch,
        });
        watch
    }

    fn unregister_periodic_io(&mut self, watch: WatchId) {
        self.calls.push(HostCall::UnregisterIo(watch));
    }
}

/// Transport that records what the session asked of it
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub connects: Vec<String>,
    pub sent: Vec<String>,
    pub close_count: usize,
    /// Refuse `connect` with this reason
    pub refuse_connect: Option<String>,
    /// Fail every `send_text`
    pub fail_sends: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sent frames parsed back into messages; unparsable frames are skipped
    pub fn sent_messages(&self) -> Vec<GatewayMessage> {
        self.sent
            .iter()
            .filter_map(|text| GatewayMessage::from_json(text).ok())
            .collect()
    }

    /// Timestamps of every heartbeat sent
    pub fn heartbeats(&self) -> Vec<i64> {
        self.sent_messages()
            .iter()
            .filter_map(GatewayMessage::as_heartbeat_time)
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn connect(&mut self, host: &str) -> Result<(), TransportError> {
        if let Some(reason) = &self.refuse_connect {
            return Err(TransportError::Connect {
                host: host.to_string(),
                reason: reason.clone(),
            });
        }
        self.connects.push(host.to_string());
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::Send("broken pipe".to_string()));
        }
        self.sent.push(text.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.close_count += 1;
    }
}

/// Clock moved by hand; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self(Arc::new(AtomicI64::new(now)))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

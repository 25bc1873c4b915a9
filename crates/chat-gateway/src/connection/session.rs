//! Session state machine
//!
//! Owns one gateway connection from connect to logout. All work happens
//! inside [`Session::connect`], [`Session::handle_event`],
//! [`Session::service`] and [`Session::logout`]; nothing blocks and
//! nothing runs in the background.

use chat_common::{AccountSettings, ClientConfig, ConfigError};
use chat_core::{ConversationHandle, Directory, DomainError};
use chat_rest::RestError;
use uuid::Uuid;

use super::{ConnectionPhase, FrameBuffer, HeartbeatTimer};
use crate::clock::{Clock, SystemClock};
use crate::error::{GatewayError, GatewayResult};
use crate::events::{decode_frame, GatewayEvent, MessagePayload, ReadyPayload};
use crate::handlers::{MessageCreateHandler, ReadyHandler, RouteOutcome, SelfIdentity};
use crate::host::{Host, WatchId};
use crate::protocol::{
    describe_close, CloseCode, GatewayMessage, IdentifyPayload, IdentifyProperties,
};
use crate::transport::{Interest, Transport, TransportEvent};

/// Tunables of a session
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Heartbeat interval when the server announces none (or zero)
    pub default_heartbeat_secs: u64,
    /// Largest inbound frame accepted
    pub max_frame_bytes: usize,
    /// Properties sent with Identify
    pub identify: IdentifyProperties,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_heartbeat_secs: 30,
            max_frame_bytes: 4 * 1024 * 1024,
            identify: IdentifyProperties::new()
                .with_browser("chat-gateway")
                .with_device("chat-gateway")
                .with_os(std::env::consts::OS),
        }
    }
}

impl From<&ClientConfig> for SessionSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            default_heartbeat_secs: config.gateway.default_heartbeat_secs,
            max_frame_bytes: config.gateway.max_frame_bytes,
            identify: IdentifyProperties::from(&config.identify),
        }
    }
}

/// Where an outgoing message should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundTarget {
    /// A group conversation created from a guild channel
    Conversation(ConversationHandle),
    /// Every private channel with this peer
    Peer(String),
}

/// A gateway session for one account
pub struct Session<H, T, C = SystemClock> {
    id: Uuid,
    host: H,
    transport: T,
    clock: C,
    phase: ConnectionPhase,
    token: Option<String>,
    gateway_host: Option<String>,
    me: SelfIdentity,
    heartbeat: HeartbeatTimer,
    frames: FrameBuffer,
    identify: IdentifyProperties,
    watch: Option<WatchId>,
    directory: Directory,
    logged_out: bool,
}

impl<H: Host, T: Transport> Session<H, T, SystemClock> {
    /// Create a session timed by the system clock
    pub fn new(host: H, transport: T, settings: SessionSettings) -> Self {
        Self::with_clock(host, transport, SystemClock, settings)
    }
}

impl<H: Host, T: Transport, C: Clock> Session<H, T, C> {
    pub fn with_clock(host: H, transport: T, clock: C, settings: SessionSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            host,
            transport,
            clock,
            phase: ConnectionPhase::Idle,
            token: None,
            gateway_host: None,
            me: SelfIdentity::default(),
            heartbeat: HeartbeatTimer::new(settings.default_heartbeat_secs),
            frames: FrameBuffer::new(settings.max_frame_bytes),
            identify: settings.identify,
            watch: None,
            directory: Directory::new(),
            logged_out: false,
        }
    }

    // === Accessors ===

    /// Identifier used to correlate this session's log lines
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Gateway host the session connected to, scheme stripped
    pub fn gateway_host(&self) -> Option<&str> {
        self.gateway_host.as_deref()
    }

    pub fn self_id(&self) -> Option<&str> {
        self.me.id.as_deref()
    }

    pub fn self_name(&self) -> Option<&str> {
        self.me.name.as_deref()
    }

    /// Check if `name` is the logged-in user
    pub fn is_self(&self, name: &str) -> bool {
        self.me.is(name)
    }

    pub fn heartbeat_interval_secs(&self) -> u64 {
        self.heartbeat.interval_secs()
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn watch(&self) -> Option<WatchId> {
        self.watch
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Tear the session apart, returning the host
    pub fn into_host(self) -> H {
        self.host
    }

    // === Lifecycle ===

    /// Start connecting to the gateway (`Idle -> Connecting`)
    ///
    /// `gateway_url` may carry a scheme; only the host part is kept. A
    /// transport that refuses to connect ends the session.
    pub fn connect(&mut self, token: impl Into<String>, gateway_url: &str) -> GatewayResult<()> {
        if self.phase != ConnectionPhase::Idle {
            return Err(GatewayError::InvalidPhase(self.phase.as_str()));
        }

        let host = chat_rest::gateway_host(gateway_url).to_string();
        self.token = Some(token.into());
        self.gateway_host = Some(host.clone());
        self.set_phase(ConnectionPhase::Connecting);

        tracing::info!(session = %self.id, gateway = %host, "Connecting to gateway");

        if let Err(e) = self.transport.connect(&host) {
            self.fail(&e.to_string());
            return Err(e.into());
        }
        Ok(())
    }

    /// Feed one notification from the transport substrate
    pub fn handle_event(&mut self, event: TransportEvent) {
        if self.phase.is_closed() {
            tracing::trace!(session = %self.id, ?event, "Ignoring transport event after close");
            return;
        }

        match event {
            TransportEvent::Established => self.on_established(),
            TransportEvent::Writable => self.service(),
            TransportEvent::Received {
                fragment,
                remaining,
            } => {
                self.on_received(&fragment, remaining);
                self.service();
            }
            TransportEvent::ConnectionError(reason) => {
                tracing::warn!(session = %self.id, %reason, "Gateway connection failed");
                self.fail(&reason);
            }
            TransportEvent::Closed { code, reason } => {
                let description = describe_close(code, &reason);
                if code.and_then(CloseCode::from_u16).is_some_and(CloseCode::is_auth_failure) {
                    tracing::error!(session = %self.id, ?code, %description, "Gateway refused the token");
                } else {
                    tracing::warn!(session = %self.id, ?code, %description, "Gateway closed the connection");
                }
                self.fail(&format!("Connection closed: {description}"));
            }
            TransportEvent::PollAdded { fd, interest } => self.on_poll_added(fd, interest),
            TransportEvent::PollRemoved => self.release_watch(),
        }
    }

    /// Periodic tick: send a heartbeat if one is owed
    ///
    /// Does nothing outside `Ready`.
    pub fn service(&mut self) {
        if self.phase != ConnectionPhase::Ready {
            return;
        }

        let now = self.clock.now_unix();
        if !self.heartbeat.is_due(now) {
            return;
        }

        tracing::trace!(session = %self.id, now, interval = self.heartbeat.interval_secs(), "Sending heartbeat");
        if self.send(&GatewayMessage::heartbeat(now)).is_ok() {
            self.heartbeat.mark_sent(now);
        }
    }

    /// End the session and release everything it holds
    ///
    /// Safe to call any number of times; the host sees one logout.
    pub fn logout(&mut self) {
        if self.logged_out {
            tracing::debug!(session = %self.id, "Logout already done");
            return;
        }
        self.logged_out = true;

        self.release_watch();

        for conversation in self.directory.clear() {
            self.host.free_conversation(conversation);
        }

        self.token = None;
        self.gateway_host = None;
        self.me = SelfIdentity::default();
        self.frames.clear();
        self.heartbeat.reset();

        self.transport.close();
        self.set_phase(ConnectionPhase::Closed);
        self.host.logout();

        tracing::info!(session = %self.id, "Logged out");
    }

    /// Change the account's REST host
    ///
    /// Only allowed while no connection is in flight; a connecting,
    /// connected or ready session refuses with `OfflineOnly`.
    pub fn set_api_host(
        &self,
        account: &mut AccountSettings,
        api_host: impl Into<String>,
    ) -> Result<(), ConfigError> {
        match account.set_api_host(api_host, self.phase.is_online()) {
            Ok(()) => {
                tracing::info!(session = %self.id, api_host = account.api_host(), "API host changed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(session = %self.id, phase = %self.phase, error = %e, "API host not changed");
                Err(e)
            }
        }
    }

    // === Outbound ===

    /// Channel ids an outgoing message to `target` is posted to
    pub fn outbound_channels(&self, target: &OutboundTarget) -> Result<Vec<String>, DomainError> {
        match target {
            OutboundTarget::Conversation(conversation) => {
                let channel = self.directory.channel_for_conversation(*conversation)?;
                Ok(vec![channel.id.clone()])
            }
            OutboundTarget::Peer(peer) => {
                let channels = self.directory.private_channels_with(peer);
                if channels.is_empty() {
                    return Err(DomainError::PeerNotFound(peer.clone()));
                }
                Ok(channels.into_iter().map(|c| c.id.clone()).collect())
            }
        }
    }

    /// Tell the user that posting a message failed
    pub fn report_send_failure(&mut self, err: &RestError) {
        let message = match err.status() {
            Some(status) => format!("Failed to send message ({status})."),
            None => format!("Failed to send message ({err})."),
        };
        tracing::warn!(session = %self.id, error = %err, "Message not sent");
        self.host.report_error(&message);
    }

    // === Internals ===

    fn set_phase(&mut self, phase: ConnectionPhase) {
        tracing::debug!(session = %self.id, from = %self.phase, to = %phase, "Phase change");
        self.phase = phase;
    }

    /// Report a fatal error and log out
    fn fail(&mut self, message: &str) {
        tracing::error!(session = %self.id, %message, "Session failed");
        self.host.report_error(message);
        self.logout();
    }

    /// Write one frame; a frame that cannot be encoded or written ends the session
    fn send(&mut self, message: &GatewayMessage) -> GatewayResult<()> {
        debug_assert!(message.op.is_client_op());
        let sent = message
            .to_json()
            .map_err(GatewayError::from)
            .and_then(|text| self.transport.send_text(&text).map_err(GatewayError::from));
        if let Err(e) = sent {
            self.fail(&e.to_string());
            return Err(e);
        }
        Ok(())
    }

    fn on_established(&mut self) {
        if self.phase != ConnectionPhase::Connecting {
            tracing::warn!(session = %self.id, phase = %self.phase, "Unexpected handshake completion");
            return;
        }
        self.set_phase(ConnectionPhase::Connected);

        let token = self.token.clone().unwrap_or_default();
        let identify = IdentifyPayload::new(token, self.identify.clone());
        let message = match GatewayMessage::identify(&identify) {
            Ok(message) => message,
            Err(e) => {
                self.fail(&GatewayError::from(e).to_string());
                return;
            }
        };
        if self.send(&message).is_ok() {
            tracing::info!(session = %self.id, "Identify sent");
        }
    }

    fn on_received(&mut self, fragment: &[u8], remaining: usize) {
        if self.phase == ConnectionPhase::Idle {
            tracing::warn!(session = %self.id, "Data received before connecting");
            return;
        }

        let frame = match self.frames.push(fragment, remaining) {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "Frame discarded");
                self.host.report_error(&e.to_string());
                return;
            }
        };

        tracing::trace!(session = %self.id, bytes = frame.len(), "Frame received");

        match decode_frame(&frame) {
            Ok(event) => self.dispatch(event),
            Err(e) if e.is_fatal() => self.fail(&e.to_string()),
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "Frame discarded");
                self.host.report_error(&e.to_string());
            }
        }
    }

    fn dispatch(&mut self, event: GatewayEvent) {
        tracing::trace!(session = %self.id, event = event.name(), "Dispatching event");
        match event {
            GatewayEvent::Hello { heartbeat_interval } => {
                self.heartbeat.set_interval_ms(heartbeat_interval);
                tracing::debug!(session = %self.id, interval = self.heartbeat.interval_secs(), "Hello received");
            }
            GatewayEvent::HeartbeatAck => {
                tracing::trace!(session = %self.id, "Heartbeat acknowledged");
            }
            GatewayEvent::Ready(snapshot) => self.on_ready(&snapshot),
            GatewayEvent::PresenceUpdate => {
                tracing::trace!(session = %self.id, "Presence update ignored");
            }
            GatewayEvent::MessageCreate(message) => self.on_message(&message),
            GatewayEvent::Unrecognized(name) => {
                tracing::debug!(session = %self.id, event = name.as_deref().unwrap_or("<none>"), "Unrecognized event");
            }
        }
    }

    fn on_ready(&mut self, snapshot: &ReadyPayload) {
        if self.phase != ConnectionPhase::Connected {
            tracing::warn!(session = %self.id, phase = %self.phase, "Ignoring READY");
            return;
        }

        self.heartbeat.set_interval_ms(snapshot.heartbeat_interval);
        self.me = ReadyHandler::handle(&mut self.host, &mut self.directory, snapshot);
        self.set_phase(ConnectionPhase::Ready);

        tracing::info!(
            session = %self.id,
            user = self.me.name.as_deref().unwrap_or_default(),
            heartbeat_secs = self.heartbeat.interval_secs(),
            "Session ready"
        );
        self.host.notify_connected();
    }

    fn on_message(&mut self, message: &MessagePayload) {
        let outcome = MessageCreateHandler::handle(&mut self.host, &mut self.directory, message);
        if outcome == RouteOutcome::Delivered {
            tracing::trace!(session = %self.id, channel_id = ?message.channel_id, "Message delivered");
        }
    }

    fn on_poll_added(&mut self, fd: i32, interest: Interest) {
        self.release_watch();
        let watch = self.host.register_periodic_io(fd, interest);
        tracing::trace!(session = %self.id, fd, ?interest, "Watching descriptor");
        self.watch = Some(watch);
    }

    fn release_watch(&mut self) {
        if let Some(watch) = self.watch.take() {
            self.host.unregister_periodic_io(watch);
        }
    }
}

impl<H, T, C> std::fmt::Debug for Session<H, T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("gateway_host", &self.gateway_host)
            .field("channels", &self.directory.channel_count())
            .finish()
    }
}

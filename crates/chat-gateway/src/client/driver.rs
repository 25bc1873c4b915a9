//! Gateway client - REST bootstrap plus the websocket event loop

use std::time::Duration;

use chat_common::ClientConfig;
use chat_rest::{RestClient, RestError};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::connect_async;

use super::{ChannelTransport, TransportCommand};
use crate::connection::{OutboundTarget, Session, SessionSettings};
use crate::error::{GatewayError, GatewayResult, TransportError};
use crate::host::Host;
use crate::transport::TransportEvent;

/// Requests accepted from the rest of the application while running
#[derive(Debug)]
enum ClientRequest {
    Send {
        target: OutboundTarget,
        content: String,
    },
    Logout,
}

/// Handle for talking to a running [`GatewayClient`]
#[derive(Debug, Clone)]
pub struct ClientHandle {
    tx: mpsc::UnboundedSender<ClientRequest>,
}

impl ClientHandle {
    /// Queue an outgoing message
    pub fn send_message(&self, target: OutboundTarget, content: impl Into<String>) -> GatewayResult<()> {
        self.tx
            .send(ClientRequest::Send {
                target,
                content: content.into(),
            })
            .map_err(|_| GatewayError::Closed)
    }

    /// Ask the session to log out; the client's `run` then returns
    pub fn logout(&self) -> GatewayResult<()> {
        self.tx
            .send(ClientRequest::Logout)
            .map_err(|_| GatewayError::Closed)
    }
}

/// Drives one account from login to logout
pub struct GatewayClient<H> {
    config: ClientConfig,
    rest: RestClient,
    host: H,
    gateway_scheme: String,
    requests: mpsc::UnboundedReceiver<ClientRequest>,
}

impl<H: Host> GatewayClient<H> {
    /// Create a client and the handle used to steer it
    pub fn new(config: ClientConfig, host: H) -> GatewayResult<(Self, ClientHandle)> {
        let rest = RestClient::new(&config.account)?;
        Ok(Self::with_rest(config, rest, host))
    }

    /// Create a client around an existing REST client
    pub fn with_rest(config: ClientConfig, rest: RestClient, host: H) -> (Self, ClientHandle) {
        let (tx, requests) = mpsc::unbounded_channel();
        let client = Self {
            config,
            rest,
            host,
            gateway_scheme: "wss".to_string(),
            requests,
        };
        (client, ClientHandle { tx })
    }

    /// Scheme used to reach the discovered gateway host (default `wss`)
    #[must_use]
    pub fn with_gateway_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.gateway_scheme = scheme.into();
        self
    }

    /// Log in, connect and process events until the session closes
    ///
    /// REST failures are reported to the host, which is then logged out.
    pub async fn run(self) -> GatewayResult<()> {
        let Self {
            config,
            rest,
            mut host,
            gateway_scheme,
            mut requests,
        } = self;

        let token = match rest.login(&config.credentials).await {
            Ok(token) => token,
            Err(e) => return Err(abort(&mut host, e)),
        };
        let gateway_url = match rest.discover_gateway(&token).await {
            Ok(url) => url,
            Err(e) => return Err(abort(&mut host, e)),
        };

        let (tx, mut commands) = mpsc::unbounded_channel();
        let mut session = Session::new(host, ChannelTransport::new(tx), SessionSettings::from(&config));
        session.connect(token, &gateway_url)?;

        let gateway_host = match commands.recv().await {
            Some(TransportCommand::Connect(host)) => host,
            _ => return Err(GatewayError::Closed),
        };
        let url = format!("{gateway_scheme}://{gateway_host}");

        let ws = match connect_async(url.as_str()).await {
            Ok((ws, _)) => ws,
            Err(e) => {
                let reason = e.to_string();
                session.handle_event(TransportEvent::ConnectionError(reason.clone()));
                return Err(TransportError::Connect {
                    host: gateway_host,
                    reason,
                }
                .into());
            }
        };
        tracing::info!(session = %session.id(), %url, "Gateway connection established");

        let (mut sink, mut stream) = ws.split();
        session.handle_event(TransportEvent::Established);

        let mut tick = interval(Duration::from_millis(config.gateway.service_tick_ms));
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            while let Ok(command) = commands.try_recv() {
                match command {
                    TransportCommand::Send(text) => {
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            session.handle_event(TransportEvent::ConnectionError(e.to_string()));
                        }
                    }
                    TransportCommand::Close => {
                        let _ = sink.close().await;
                    }
                    TransportCommand::Connect(host) => {
                        tracing::warn!(%host, "Ignoring connect request on a live connection");
                    }
                }
            }

            if session.phase().is_closed() {
                break;
            }

            tokio::select! {
                frame = stream.next() => {
                    if let Some(event) = transport_event(frame) {
                        session.handle_event(event);
                    }
                }
                _ = tick.tick() => session.service(),
                Some(request) = requests.recv() => {
                    handle_request(&mut session, &rest, request).await;
                }
            }
        }

        tracing::info!(session = %session.id(), "Gateway client stopped");
        Ok(())
    }
}

fn abort<H: Host>(host: &mut H, err: RestError) -> GatewayError {
    tracing::error!(error = %err, "REST bootstrap failed");
    for message in err.user_messages() {
        host.report_error(&message);
    }
    host.logout();
    err.into()
}

/// Map one websocket read onto a transport event
fn transport_event(frame: Option<Result<Message, WsError>>) -> Option<TransportEvent> {
    match frame {
        Some(Ok(Message::Text(text))) => Some(TransportEvent::text(text)),
        Some(Ok(Message::Binary(bytes))) => Some(TransportEvent::Received {
            fragment: bytes,
            remaining: 0,
        }),
        Some(Ok(Message::Close(frame))) => {
            let (code, reason) = match frame {
                Some(frame) => (Some(u16::from(frame.code)), frame.reason.into_owned()),
                None => (None, String::new()),
            };
            Some(TransportEvent::Closed { code, reason })
        }
        Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => None,
        Some(Err(e)) => Some(TransportEvent::ConnectionError(e.to_string())),
        None => Some(TransportEvent::Closed {
            code: None,
            reason: "connection ended".to_string(),
        }),
    }
}

async fn handle_request<H: Host>(
    session: &mut Session<H, ChannelTransport>,
    rest: &RestClient,
    request: ClientRequest,
) {
    match request {
        ClientRequest::Logout => session.logout(),
        ClientRequest::Send { target, content } => {
            let channels = match session.outbound_channels(&target) {
                Ok(channels) => channels,
                Err(e) => {
                    tracing::warn!(?target, error = %e, "No channel for outgoing message");
                    session.host_mut().report_error(&e.to_string());
                    return;
                }
            };
            let Some(token) = session.token().map(str::to_owned) else {
                return;
            };

            for channel_id in channels {
                if let Err(e) = rest.send_message(&token, &channel_id, &content).await {
                    session.report_send_failure(&e);
                }
            }
        }
    }
}

//! Test helpers for integration tests
//!
//! Provides a fake REST API (axum) and a fake gateway (tokio-tungstenite)
//! bound to ephemeral localhost ports, plus config builders.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chat_common::ClientConfig;
use chat_gateway::protocol::{GatewayMessage, OpCode};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

use crate::fixtures::{login_rejection, EMAIL, PASSWORD, TOKEN};

/// Upper bound for any single wait in a test
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a client configuration pointing at a fake API
pub fn client_config(api_host: &str) -> ClientConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("CHAT_API_HOST", api_host.to_string()),
        ("CHAT_EMAIL", EMAIL.to_string()),
        ("CHAT_PASSWORD", PASSWORD.to_string()),
        ("CHAT_SERVICE_TICK_MS", "50".to_string()),
    ]);
    ClientConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config is valid")
}

/// Wait for a notification, failing the test after [`TEST_TIMEOUT`]
pub async fn wait_for(notify: &Notify, what: &str) {
    if tokio::time::timeout(TEST_TIMEOUT, notify.notified()).await.is_err() {
        panic!("timed out waiting for {what}");
    }
}

// ============================================================================
// Fake REST API
// ============================================================================

/// A message posted through the fake API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub channel_id: String,
    pub authorization: String,
    pub content: String,
}

#[derive(Debug, Default)]
struct ApiLog {
    logins: Vec<Value>,
    gateway_authorizations: Vec<String>,
    posts: Vec<PostedMessage>,
}

/// Knobs for the fake API
#[derive(Debug, Clone)]
pub struct ApiOptions {
    /// URL returned by `GET /api/gateway`
    pub gateway_url: String,
    /// Answer logins with a 400 and per-field errors
    pub reject_login: bool,
    /// Status returned when posting messages
    pub post_status: StatusCode,
}

impl ApiOptions {
    pub fn with_gateway(gateway_url: impl Into<String>) -> Self {
        Self {
            gateway_url: gateway_url.into(),
            reject_login: false,
            post_status: StatusCode::OK,
        }
    }
}

#[derive(Clone)]
struct ApiState {
    options: ApiOptions,
    log: Arc<Mutex<ApiLog>>,
    posted: Arc<Notify>,
}

/// Fake REST API instance
pub struct FakeApi {
    pub addr: SocketAddr,
    log: Arc<Mutex<ApiLog>>,
    posted: Arc<Notify>,
    _handle: JoinHandle<()>,
}

impl FakeApi {
    /// Start the fake API on an ephemeral port
    pub async fn start(options: ApiOptions) -> Result<Self> {
        let log = Arc::new(Mutex::new(ApiLog::default()));
        let posted = Arc::new(Notify::new());
        let state = ApiState {
            options,
            log: log.clone(),
            posted: posted.clone(),
        };

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/gateway", get(gateway))
            .route("/api/channels/:channel_id/messages", post(create_message))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            log,
            posted,
            _handle: handle,
        })
    }

    /// Value for `CHAT_API_HOST`
    pub fn api_host(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn logins(&self) -> Vec<Value> {
        self.log.lock().expect("api log").logins.clone()
    }

    pub fn gateway_authorizations(&self) -> Vec<String> {
        self.log.lock().expect("api log").gateway_authorizations.clone()
    }

    pub fn posts(&self) -> Vec<PostedMessage> {
        self.log.lock().expect("api log").posts.clone()
    }

    /// Wait until a message has been posted
    pub async fn wait_for_post(&self) {
        wait_for(&self.posted, "a posted message").await;
    }
}

async fn login(State(state): State<ApiState>, Json(body): Json<Value>) -> Response {
    state.log.lock().expect("api log").logins.push(body);

    if state.options.reject_login {
        return (StatusCode::BAD_REQUEST, Json(login_rejection())).into_response();
    }
    Json(json!({ "token": TOKEN })).into_response()
}

async fn gateway(State(state): State<ApiState>, headers: HeaderMap) -> Json<Value> {
    state
        .log
        .lock()
        .expect("api log")
        .gateway_authorizations
        .push(authorization(&headers));

    Json(json!({ "url": state.options.gateway_url }))
}

async fn create_message(
    State(state): State<ApiState>,
    Path(channel_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let content = body["content"].as_str().unwrap_or_default().to_string();
    state.log.lock().expect("api log").posts.push(PostedMessage {
        channel_id,
        authorization: authorization(&headers),
        content,
    });
    state.posted.notify_one();

    state.options.post_status
}

fn authorization(headers: &HeaderMap) -> String {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// ============================================================================
// Fake gateway
// ============================================================================

/// One step of what the fake gateway sends after identify
#[derive(Debug, Clone)]
pub enum Frame {
    /// A JSON payload sent as a text frame
    Json(Value),
    /// Raw text, possibly not JSON at all
    Raw(String),
    /// Close the connection with a code and reason
    Close(u16, &'static str),
}

/// Fake gateway accepting a single connection
pub struct FakeGateway {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<GatewayMessage>>>,
    heartbeat: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl FakeGateway {
    /// Start the gateway; `script` is played once identify arrives
    pub async fn start(script: Vec<Frame>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));
        let heartbeat = Arc::new(Notify::new());

        let handle = tokio::spawn(serve_one(
            listener,
            script,
            received.clone(),
            heartbeat.clone(),
        ));

        Ok(Self {
            addr,
            received,
            heartbeat,
            handle,
        })
    }

    /// URL handed out by the fake API's gateway endpoint
    pub fn url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    /// Every client frame received so far
    pub fn received(&self) -> Vec<GatewayMessage> {
        self.received.lock().expect("gateway log").clone()
    }

    /// Wait until the client sends a heartbeat
    pub async fn wait_for_heartbeat(&self) {
        wait_for(&self.heartbeat, "a heartbeat").await;
    }

    /// Wait for the client connection to end
    pub async fn finished(self) {
        let _ = tokio::time::timeout(TEST_TIMEOUT, self.handle).await;
    }
}

async fn serve_one(
    listener: TcpListener,
    script: Vec<Frame>,
    received: Arc<Mutex<Vec<GatewayMessage>>>,
    heartbeat: Arc<Notify>,
) {
    let Ok((stream, _)) = listener.accept().await else {
        return;
    };
    let Ok(ws) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };
    let (mut sink, mut stream) = ws.split();

    let mut record = |text: &str| {
        let Ok(message) = GatewayMessage::from_json(text) else {
            return None;
        };
        if message.op == OpCode::Heartbeat {
            heartbeat.notify_one();
        }
        received.lock().expect("gateway log").push(message.clone());
        Some(message)
    };

    // the client speaks first
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => {
                if record(&text).is_some_and(|m| m.op == OpCode::Identify) {
                    break;
                }
            }
            Some(Ok(_)) => {}
            _ => return,
        }
    }

    for frame in script {
        let message = match frame {
            Frame::Json(value) => Message::Text(value.to_string()),
            Frame::Raw(text) => Message::Text(text),
            Frame::Close(code, reason) => Message::Close(Some(CloseFrame {
                code: CloseCode::from(code),
                reason: reason.into(),
            })),
        };
        if sink.send(message).await.is_err() {
            return;
        }
    }

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => {
                record(&text);
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

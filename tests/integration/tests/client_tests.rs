//! Gateway client end-to-end tests
//!
//! Each test runs the real client against a fake REST API and a fake
//! gateway on localhost. No external services are needed.
//!
//! Run with: cargo test -p integration-tests --test client_tests

use axum::http::StatusCode;
use chat_gateway::testing::RecordingHost;
use chat_gateway::{GatewayClient, OutboundTarget};
use integration_tests::*;

async fn start(script: Vec<Frame>, options: impl FnOnce(&mut ApiOptions)) -> (FakeApi, FakeGateway) {
    let gateway = FakeGateway::start(script).await.expect("Failed to start gateway");
    let mut api_options = ApiOptions::with_gateway(gateway.url());
    options(&mut api_options);
    let api = FakeApi::start(api_options).await.expect("Failed to start API");
    (api, gateway)
}

// ============================================================================
// Bootstrap
// ============================================================================

#[tokio::test]
async fn test_login_rejection_reports_field_errors() {
    let (api, _gateway) = start(Vec::new(), |o| o.reject_login = true).await;
    let mut host = RecordingHost::new();

    let (client, _handle) =
        GatewayClient::new(client_config(&api.api_host()), &mut host).expect("client");
    let result = client.with_gateway_scheme("ws").run().await;

    assert!(result.is_err());
    assert_eq!(
        host.errors(),
        vec![
            "email: Not a well formed email address.".to_string(),
            "password: This field is required. Too short.".to_string(),
        ]
    );
    assert_eq!(host.logout_count(), 1);
    assert_eq!(host.connected_count(), 0);

    let logins = api.logins();
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0]["email"], EMAIL);
    assert_eq!(logins[0]["password"], PASSWORD);
    assert!(api.gateway_authorizations().is_empty());
}

#[tokio::test]
async fn test_unreachable_gateway_logs_out() {
    // grab a free port and release it again
    let closed = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let api = FakeApi::start(ApiOptions::with_gateway(format!("ws://{closed}/")))
        .await
        .unwrap();
    let mut host = RecordingHost::new();

    let (client, _handle) = GatewayClient::new(client_config(&api.api_host()), &mut host).unwrap();
    let result = client.with_gateway_scheme("ws").run().await;

    assert!(result.is_err());
    assert_eq!(host.errors().len(), 1);
    assert_eq!(host.logout_count(), 1);
    assert_eq!(api.gateway_authorizations(), vec![TOKEN.to_string()]);
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_identify_and_delivery() {
    let script = vec![
        Frame::Json(hello(41_250)),
        Frame::Json(ready(41_250)),
        Frame::Json(message_create(2, "6", GUILD_CHANNEL_ID, "alice", "hi all")),
        Frame::Json(message_create(3, "5", GUILD_CHANNEL_ID, "alice", "old news")),
        Frame::Json(message_create(4, "8", PRIVATE_CHANNEL_ID, "alice", "psst")),
        Frame::Json(message_create(5, "9", PRIVATE_CHANNEL_ID, "mallory", "spoofed")),
        Frame::Json(message_create(6, "1", "999", "bob", "elsewhere")),
        Frame::Close(1000, "bye"),
    ];
    let (api, gateway) = start(script, |_| {}).await;
    let mut host = RecordingHost::new();

    let (client, _handle) = GatewayClient::new(client_config(&api.api_host()), &mut host).unwrap();
    client
        .with_gateway_scheme("ws")
        .run()
        .await
        .expect("session ran");

    let received = gateway.received();
    let identify = received[0].as_identify().expect("identify first");
    assert_eq!(identify.token, TOKEN);

    assert_eq!(host.connected_count(), 1);
    assert_eq!(host.conversation_titles().len(), 1);
    assert_eq!(host.conversation_titles()[0].0, "Rustaceans/general");

    let groups = host.group_messages();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].1, "alice");
    assert_eq!(groups[0].2, "hi all");

    assert_eq!(
        host.private_messages(),
        vec![("alice".to_string(), "psst".to_string())]
    );

    assert_eq!(host.errors(), vec!["Connection closed: bye (1000)".to_string()]);
    assert_eq!(host.logout_count(), 1);
    assert_eq!(host.freed_conversations().len(), 1);
    gateway.finished().await;
}

#[tokio::test]
async fn test_auth_failure_close_code() {
    let (api, _gateway) = start(vec![Frame::Close(4004, "")], |_| {}).await;
    let mut host = RecordingHost::new();

    let (client, _handle) = GatewayClient::new(client_config(&api.api_host()), &mut host).unwrap();
    client.with_gateway_scheme("ws").run().await.unwrap();

    assert_eq!(host.connected_count(), 0);
    assert_eq!(host.errors().len(), 1);
    assert!(host.errors()[0].contains("Authentication failed"));
    assert_eq!(host.logout_count(), 1);
}

#[tokio::test]
async fn test_malformed_frame_ends_session() {
    let script = vec![Frame::Raw("this is not json".to_string())];
    let (api, _gateway) = start(script, |_| {}).await;
    let mut host = RecordingHost::new();

    let (client, _handle) = GatewayClient::new(client_config(&api.api_host()), &mut host).unwrap();
    client.with_gateway_scheme("ws").run().await.unwrap();

    assert_eq!(host.errors().len(), 1);
    assert!(host.errors()[0].starts_with("Malformed gateway frame"));
    assert_eq!(host.logout_count(), 1);
}

// ============================================================================
// Outgoing messages
// ============================================================================

#[tokio::test]
async fn test_send_message_and_logout() {
    let script = vec![Frame::Json(hello(41_250)), Frame::Json(ready(41_250))];
    let (api, gateway) = start(script, |_| {}).await;
    let mut host = RecordingHost::new();

    let (client, handle) = GatewayClient::new(client_config(&api.api_host()), &mut host).unwrap();

    let driver = async {
        gateway.wait_for_heartbeat().await;
        handle
            .send_message(OutboundTarget::Peer("carol".to_string()), "anyone?")
            .unwrap();
        handle
            .send_message(OutboundTarget::Peer("alice".to_string()), "hello alice")
            .unwrap();
        api.wait_for_post().await;
        handle.logout().unwrap();
    };

    let (result, ()) = tokio::join!(client.with_gateway_scheme("ws").run(), driver);
    result.expect("session ran");

    assert_eq!(
        api.posts(),
        vec![PostedMessage {
            channel_id: PRIVATE_CHANNEL_ID.to_string(),
            authorization: TOKEN.to_string(),
            content: "hello alice".to_string(),
        }]
    );
    assert!(gateway.received().iter().any(|m| m.as_heartbeat_time().is_some()));
    assert_eq!(host.errors(), vec!["No private channel with carol".to_string()]);
    assert_eq!(host.logout_count(), 1);
    assert!(handle.logout().is_err());
}

#[tokio::test]
async fn test_rejected_post_is_reported() {
    let script = vec![Frame::Json(ready(41_250))];
    let (api, gateway) = start(script, |o| o.post_status = StatusCode::FORBIDDEN).await;
    let mut host = RecordingHost::new();

    let (client, handle) = GatewayClient::new(client_config(&api.api_host()), &mut host).unwrap();

    let driver = async {
        gateway.wait_for_heartbeat().await;
        handle
            .send_message(OutboundTarget::Peer("alice".to_string()), "let me in")
            .unwrap();
        api.wait_for_post().await;
        handle.logout().unwrap();
    };

    let (result, ()) = tokio::join!(client.with_gateway_scheme("ws").run(), driver);
    result.unwrap();

    assert_eq!(api.posts().len(), 1);
    assert_eq!(host.errors(), vec!["Failed to send message (403).".to_string()]);
    assert_eq!(host.logout_count(), 1);
}

//! REST bootstrap tests against the fake API
//!
//! Run with: cargo test -p integration-tests --test rest_tests

use chat_common::Credentials;
use chat_rest::{RestClient, RestError};
use integration_tests::*;

fn credentials() -> Credentials {
    Credentials {
        email: EMAIL.to_string(),
        password: PASSWORD.to_string(),
    }
}

async fn client_for(api: &FakeApi) -> RestClient {
    RestClient::with_base_url(format!("{}/api", api.api_host())).expect("client")
}

#[tokio::test]
async fn test_login_returns_token() {
    let api = FakeApi::start(ApiOptions::with_gateway("wss://gateway.example.com"))
        .await
        .unwrap();
    let rest = client_for(&api).await;

    assert_eq!(rest.login(&credentials()).await.unwrap(), TOKEN);
}

#[tokio::test]
async fn test_login_rejection_keeps_field_detail() {
    let mut options = ApiOptions::with_gateway("wss://gateway.example.com");
    options.reject_login = true;
    let api = FakeApi::start(options).await.unwrap();
    let rest = client_for(&api).await;

    let err = rest.login(&credentials()).await.unwrap_err();
    assert!(matches!(err, RestError::Rejected { status: 400, .. }));
    assert_eq!(err.user_messages().len(), 2);
}

#[tokio::test]
async fn test_discover_gateway_strips_scheme() {
    let api = FakeApi::start(ApiOptions::with_gateway("wss://gateway.example.com/"))
        .await
        .unwrap();
    let rest = client_for(&api).await;

    let host = rest.discover_gateway(TOKEN).await.unwrap();
    assert_eq!(host, "gateway.example.com");
    assert_eq!(api.gateway_authorizations(), vec![TOKEN.to_string()]);
}

#[tokio::test]
async fn test_send_message_posts_content() {
    let api = FakeApi::start(ApiOptions::with_gateway("wss://gateway.example.com"))
        .await
        .unwrap();
    let rest = client_for(&api).await;

    rest.send_message(TOKEN, GUILD_CHANNEL_ID, "hello").await.unwrap();

    assert_eq!(
        api.posts(),
        vec![PostedMessage {
            channel_id: GUILD_CHANNEL_ID.to_string(),
            authorization: TOKEN.to_string(),
            content: "hello".to_string(),
        }]
    );
}

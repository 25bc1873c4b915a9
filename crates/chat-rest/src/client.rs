//! HTTP client for the bootstrap exchanges around a gateway session

use std::time::Duration;

use chat_common::{AccountSettings, Credentials};
use reqwest::{Client, Response};
use serde_json::Value;

use crate::error::{RestError, RestResult};
use crate::models::{
    field_errors, gateway_host, CreateMessageRequest, GatewayResponse, LoginRequest,
    LoginResponse,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("chat-gateway/", env!("CARGO_PKG_VERSION"));

/// REST API client
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
}

impl RestClient {
    /// Build a client for the account's API host
    pub fn new(account: &AccountSettings) -> RestResult<Self> {
        Self::with_base_url(account.api_base_url())
    }

    /// Build a client against an explicit base URL (`https://host/api`)
    pub fn with_base_url(base_url: impl Into<String>) -> RestResult<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for a session token
    pub async fn login(&self, credentials: &Credentials) -> RestResult<String> {
        let url = format!("{}/auth/login", self.base_url);
        tracing::debug!(%url, "Logging in");

        let resp = self
            .http
            .post(&url)
            .json(&LoginRequest {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await?;
        let resp = check_status(resp).await?;

        let body: LoginResponse = resp
            .json()
            .await
            .map_err(|e| RestError::InvalidResponse(format!("invalid login response: {e}")))?;
        if body.token.is_empty() {
            return Err(RestError::InvalidResponse("empty token".to_string()));
        }

        tracing::info!("Login accepted");
        Ok(body.token)
    }

    /// Ask the API where the gateway lives
    ///
    /// Returns the bare host, scheme and trailing slash removed.
    pub async fn discover_gateway(&self, token: &str) -> RestResult<String> {
        let url = format!("{}/gateway", self.base_url);

        let resp = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, token)
            .send()
            .await?;
        let resp = check_status(resp).await?;

        let body: GatewayResponse = resp
            .json()
            .await
            .map_err(|e| RestError::InvalidResponse(format!("invalid gateway response: {e}")))?;

        let host = gateway_host(&body.url);
        if host.is_empty() {
            return Err(RestError::InvalidResponse("empty gateway url".to_string()));
        }

        tracing::debug!(gateway = %host, "Gateway discovered");
        Ok(host.to_string())
    }

    /// Post a message into a channel
    pub async fn send_message(&self, token: &str, channel_id: &str, content: &str) -> RestResult<()> {
        let url = format!("{}/channels/{channel_id}/messages", self.base_url);

        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, token)
            .json(&CreateMessageRequest { content })
            .send()
            .await?;
        check_status(resp).await?;

        tracing::debug!(channel_id, "Message posted");
        Ok(())
    }
}

/// Turn a non-success response into an error, keeping per-field detail
async fn check_status(resp: Response) -> RestResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let code = status.as_u16();
    let details = match resp.json::<Value>().await {
        Ok(body) => field_errors(&body),
        Err(_) => Vec::new(),
    };

    tracing::warn!(status = code, ?details, "REST request rejected");
    if details.is_empty() {
        Err(RestError::Status(code))
    } else {
        Err(RestError::Rejected {
            status: code,
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_from_account() {
        let client = RestClient::new(&AccountSettings::new("chat.example.com")).unwrap();
        assert_eq!(client.base_url(), "https://chat.example.com/api");

        let client = RestClient::new(&AccountSettings::new("http://127.0.0.1:8080")).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/api");
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let client = RestClient::with_base_url("http://localhost:3000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[tokio::test]
    async fn test_login_unreachable_is_transport_error() {
        // Port 9 (discard) is essentially never listening on loopback
        let client = RestClient::with_base_url("http://127.0.0.1:9/api").unwrap();
        let credentials = Credentials {
            email: "me@example.com".to_string(),
            password: "secret".to_string(),
        };

        let err = client.login(&credentials).await.unwrap_err();
        assert!(matches!(err, RestError::Transport(_)));
    }
}

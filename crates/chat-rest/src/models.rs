//! Request and response bodies of the REST API

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login reply
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Reply of `GET /gateway`
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayResponse {
    pub url: String,
}

/// Body of `POST /channels/{id}/messages`
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest<'a> {
    pub content: &'a str,
}

/// Flatten an error body of the form `{"field": ["msg", ...]}`
///
/// Every array-valued field becomes one `"<field>: <messages>"` line;
/// non-string array entries and non-array fields are ignored.
pub fn field_errors(body: &Value) -> Vec<String> {
    let Some(object) = body.as_object() else {
        return Vec::new();
    };

    object
        .iter()
        .filter_map(|(field, value)| {
            let messages: Vec<&str> = value
                .as_array()?
                .iter()
                .filter_map(Value::as_str)
                .collect();
            Some(format!("{field}: {}", messages.join(" ")))
        })
        .collect()
}

/// Reduce a discovered gateway URL to the host handed to the session
///
/// A leading `scheme://` is removed, as is a trailing slash.
pub fn gateway_host(url: &str) -> &str {
    let url = url.trim();
    let host = match url.split_once("://") {
        Some((scheme, rest))
            if !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+') =>
        {
            rest
        }
        _ => url,
    };
    host.trim_end_matches('/')
}

//! # chat-rest
//!
//! Thin REST client used before and beside the gateway session: credential
//! exchange, gateway discovery, and posting outbound chat messages.

mod client;
mod error;
mod models;

pub use client::RestClient;
pub use error::{RestError, RestResult};
pub use models::{
    field_errors, gateway_host, CreateMessageRequest, GatewayResponse, LoginRequest,
    LoginResponse,
};

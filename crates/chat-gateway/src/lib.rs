//! # chat-gateway
//!
//! Client side of a chat gateway: log in over REST, hold a websocket
//! session open, decode events and route messages into a host messaging
//! framework.
//!
//! The [`Session`] state machine does no I/O of its own. It is driven by
//! [`TransportEvent`]s and talks back through the [`Transport`] and
//! [`Host`] traits, which keeps it usable from any event loop.
//! [`GatewayClient`] is the tokio driver used by the binary.

pub mod client;
pub mod clock;
pub mod connection;
pub mod error;
pub mod events;
pub mod handlers;
pub mod host;
pub mod protocol;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use client::{ClientHandle, GatewayClient};
pub use clock::{Clock, SystemClock};
pub use connection::{ConnectionPhase, OutboundTarget, Session, SessionSettings};
pub use error::{DecodeError, GatewayError, GatewayResult, TransportError};
pub use host::{Host, WatchId};
pub use transport::{Interest, Transport, TransportEvent};

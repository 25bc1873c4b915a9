//! Async driver
//!
//! Runs a [`Session`](crate::connection::Session) over a real websocket on
//! a single tokio task: REST bootstrap, connect, then a select loop feeding
//! transport events in and pushing queued frames out.

mod driver;
mod transport;

pub use driver::{ClientHandle, GatewayClient};
pub use transport::{ChannelTransport, TransportCommand};

//! Transport substrate seam
//!
//! The session engine does no I/O of its own. A transport opens the
//! connection and carries text frames; whatever drives it reports back
//! through [`TransportEvent`].

use bitflags::bitflags;

use crate::error::TransportError;

bitflags! {
    /// Readiness a poll descriptor is watched for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Interest: u8 {
        const READ = 0b01;
        const WRITE = 0b10;
    }
}

/// Outbound side of a gateway connection
pub trait Transport {
    /// Start connecting to the gateway host
    ///
    /// Completion is reported later as [`TransportEvent::Established`].
    fn connect(&mut self, host: &str) -> Result<(), TransportError>;

    /// Queue one complete text frame
    fn send_text(&mut self, text: &str) -> Result<(), TransportError>;

    /// Drop the connection; must be safe to call repeatedly
    fn close(&mut self);
}

/// Everything the transport substrate can tell the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed
    Established,
    /// Socket is writable again
    Writable,
    /// Part of an inbound frame; `remaining` is zero on the last fragment
    Received { fragment: Vec<u8>, remaining: usize },
    /// Connection refused, reset or otherwise failed
    ConnectionError(String),
    /// Remote end closed the connection
    Closed { code: Option<u16>, reason: String },
    /// A descriptor the host should poll on the session's behalf
    PollAdded { fd: i32, interest: Interest },
    /// The polled descriptor went away
    PollRemoved,
}

impl TransportEvent {
    /// A whole text frame delivered in one piece
    pub fn text(text: impl Into<String>) -> Self {
        Self::Received {
            fragment: text.into().into_bytes(),
            remaining: 0,
        }
    }
}

//! Transport that hands frames to the driver loop

use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::transport::Transport;

/// Work the session asks the driver to perform on the socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    Connect(String),
    Send(String),
    Close,
}

/// [`Transport`] backed by an unbounded queue drained by the driver
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<TransportCommand>,
}

impl ChannelTransport {
    pub fn new(tx: mpsc::UnboundedSender<TransportCommand>) -> Self {
        Self { tx }
    }

    fn push(&self, command: TransportCommand) -> Result<(), TransportError> {
        self.tx.send(command).map_err(|_| TransportError::NotConnected)
    }
}

impl Transport for ChannelTransport {
    fn connect(&mut self, host: &str) -> Result<(), TransportError> {
        self.push(TransportCommand::Connect(host.to_string()))
            .map_err(|_| TransportError::Connect {
                host: host.to_string(),
                reason: "driver stopped".to_string(),
            })
    }

    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        self.push(TransportCommand::Send(text.to_string()))
    }

    fn close(&mut self) {
        // nothing to close once the driver is gone
        let _ = self.push(TransportCommand::Close);
    }
}

//! Frame-to-event decoding

use serde_json::{Map, Value};

use super::{GatewayEventType, MessagePayload, ReadyPayload};
use crate::error::DecodeError;
use crate::protocol::{HelloPayload, OpCode};

/// A decoded inbound frame
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// op 10; may carry a heartbeat interval in milliseconds
    Hello { heartbeat_interval: Option<u64> },
    /// op 11
    HeartbeatAck,
    /// READY dispatch with its snapshot
    Ready(Box<ReadyPayload>),
    /// PRESENCE_UPDATE dispatch; the payload is not used
    PresenceUpdate,
    MessageCreate(MessagePayload),
    /// Any other frame, with its event name if it had one
    Unrecognized(Option<String>),
}

impl GatewayEvent {
    /// Short name for logging
    pub fn name(&self) -> &str {
        match self {
            Self::Hello { .. } => "HELLO",
            Self::HeartbeatAck => "HEARTBEAT_ACK",
            Self::Ready(_) => GatewayEventType::Ready.as_str(),
            Self::PresenceUpdate => GatewayEventType::PresenceUpdate.as_str(),
            Self::MessageCreate(_) => GatewayEventType::MessageCreate.as_str(),
            Self::Unrecognized(name) => name.as_deref().unwrap_or("<none>"),
        }
    }
}

/// Decode a complete frame given as raw bytes
pub fn decode_frame(bytes: &[u8]) -> Result<GatewayEvent, DecodeError> {
    let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
    decode(text)
}

/// Decode a complete text frame
///
/// Only the top level is strict: it must be a JSON object. Payload
/// contents are parsed leniently.
pub fn decode(text: &str) -> Result<GatewayEvent, DecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let Value::Object(mut envelope) = value else {
        return Err(DecodeError::Malformed("top level is not an object".to_string()));
    };

    let op = envelope
        .get("op")
        .and_then(Value::as_u64)
        .and_then(OpCode::from_u64);
    let data = take_data(&mut envelope);

    match op {
        Some(OpCode::Hello) => {
            let hello: HelloPayload = data
                .and_then(|d| serde_json::from_value(d).ok())
                .unwrap_or_default();
            return Ok(GatewayEvent::Hello {
                heartbeat_interval: hello.heartbeat_interval,
            });
        }
        Some(OpCode::HeartbeatAck) => return Ok(GatewayEvent::HeartbeatAck),
        _ => {}
    }

    let name = match envelope.remove("t") {
        Some(Value::String(name)) => name,
        _ => return Ok(GatewayEvent::Unrecognized(None)),
    };

    Ok(match GatewayEventType::from_str(&name) {
        Some(GatewayEventType::Ready) => GatewayEvent::Ready(Box::new(ReadyPayload::from_data(data))),
        Some(GatewayEventType::PresenceUpdate) => GatewayEvent::PresenceUpdate,
        Some(GatewayEventType::MessageCreate) => {
            GatewayEvent::MessageCreate(MessagePayload::from_data(data))
        }
        None => GatewayEvent::Unrecognized(Some(name)),
    })
}

fn take_data(envelope: &mut Map<String, Value>) -> Option<Value> {
    match envelope.remove("d") {
        Some(Value::Null) | None => None,
        other => other,
    }
}

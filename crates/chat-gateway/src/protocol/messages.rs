//! Gateway frame envelope

use super::{IdentifyPayload, OpCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway frame
///
/// Outbound frames are built here. Inbound frames go through the event
/// decoder instead, which tolerates unknown op codes and odd payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event name (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl GatewayMessage {
    /// Create a Heartbeat message (op=1) carrying the current unix time
    #[must_use]
    pub fn heartbeat(unix_time: i64) -> Self {
        Self {
            op: OpCode::Heartbeat,
            t: None,
            s: None,
            d: Some(Value::from(unix_time)),
        }
    }

    /// Create an Identify message (op=2)
    pub fn identify(payload: &IdentifyPayload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            op: OpCode::Identify,
            t: None,
            s: None,
            d: Some(serde_json::to_value(payload)?),
        })
    }

    /// Try to parse as an Identify payload (op=2)
    pub fn as_identify(&self) -> Option<IdentifyPayload> {
        if self.op != OpCode::Identify {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// Timestamp carried by a Heartbeat (op=1)
    pub fn as_heartbeat_time(&self) -> Option<i64> {
        if self.op != OpCode::Heartbeat {
            return None;
        }
        self.d.as_ref().and_then(Value::as_i64)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.t {
            Some(t) => write!(f, "GatewayMessage(op={}, t={t})", self.op),
            None => write!(f, "GatewayMessage(op={})", self.op),
        }
    }
}

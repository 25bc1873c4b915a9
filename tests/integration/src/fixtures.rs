//! Test fixtures and gateway payloads
//!
//! The snapshot describes one guild with a text and a voice channel plus
//! a private channel with alice.

use serde_json::{json, Value};

pub const TOKEN: &str = "tok-123";
pub const EMAIL: &str = "me@example.com";
pub const PASSWORD: &str = "hunter2";

pub const SELF_ID: &str = "1";
pub const SELF_NAME: &str = "me";
pub const GUILD_CHANNEL_ID: &str = "200";
pub const PRIVATE_CHANNEL_ID: &str = "300";

/// HELLO frame with the given interval in milliseconds
pub fn hello(heartbeat_interval_ms: u64) -> Value {
    json!({
        "op": 10,
        "d": { "heartbeat_interval": heartbeat_interval_ms }
    })
}

/// READY dispatch for the standard snapshot
pub fn ready(heartbeat_interval_ms: u64) -> Value {
    json!({
        "op": 0,
        "t": "READY",
        "s": 1,
        "d": {
            "heartbeat_interval": heartbeat_interval_ms,
            "user": { "id": SELF_ID, "username": SELF_NAME },
            "guilds": [{
                "id": "100",
                "name": "Rustaceans",
                "members": [
                    { "user": { "id": SELF_ID, "username": SELF_NAME } },
                    { "user": { "id": "2", "username": "alice" } },
                    { "user": { "id": "3", "username": "bob" } }
                ],
                "channels": [
                    {
                        "id": GUILD_CHANNEL_ID,
                        "name": "general",
                        "topic": "be nice",
                        "type": 0,
                        "last_message_id": "5"
                    },
                    { "id": "201", "name": "Lounge", "type": "voice" }
                ]
            }],
            "private_channels": [{
                "id": PRIVATE_CHANNEL_ID,
                "recipient": { "id": "2", "username": "alice" },
                "last_message_id": "7"
            }]
        }
    })
}

/// MESSAGE_CREATE dispatch
pub fn message_create(seq: u64, id: &str, channel_id: &str, author: &str, content: &str) -> Value {
    json!({
        "op": 0,
        "t": "MESSAGE_CREATE",
        "s": seq,
        "d": {
            "id": id,
            "channel_id": channel_id,
            "author": { "id": "2", "username": author },
            "content": content
        }
    })
}

/// Validation failure body as returned by the login endpoint
pub fn login_rejection() -> Value {
    json!({
        "email": ["Not a well formed email address."],
        "password": ["This field is required.", "Too short."]
    })
}

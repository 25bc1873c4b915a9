//! Gateway events
//!
//! Turns a complete inbound frame into a typed [`GatewayEvent`].

mod decoder;
mod event_types;
mod payloads;

pub use decoder::{decode, decode_frame, GatewayEvent};
pub use event_types::GatewayEventType;
pub use payloads::{
    ChannelPayload, GuildPayload, MemberPayload, MessagePayload, PrivateChannelPayload,
    ReadyPayload, UserPayload,
};

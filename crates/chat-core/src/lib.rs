//! # chat-core
//!
//! Domain layer for the gateway client: the in-memory directory of guilds,
//! channels and users built from the READY snapshot, and the snowflake
//! identifiers used as per-channel message watermarks.
//! This crate has zero dependencies on infrastructure (network, host framework, etc.).

pub mod entities;
pub mod error;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    BuddyHandle, Channel, ChannelTarget, ChannelType, ConversationHandle, Directory, Guild, User,
};
pub use error::DomainError;
pub use value_objects::{Snowflake, SnowflakeParseError};

//! Dispatch event handlers
//!
//! Each handler applies one decoded event to the directory and reports
//! the user-visible effects through the [`Host`](crate::host::Host).

mod message_create;
mod ready;

pub use message_create::{MessageCreateHandler, RouteOutcome};
pub use ready::{ReadyHandler, SelfIdentity};

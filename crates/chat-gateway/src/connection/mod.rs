//! Gateway session
//!
//! The connection state machine and the pieces it owns.

mod frame_buffer;
mod heartbeat;
mod phase;
mod session;

pub use frame_buffer::FrameBuffer;
pub use heartbeat::HeartbeatTimer;
pub use phase::ConnectionPhase;
pub use session::{OutboundTarget, Session, SessionSettings};

//! Domain entities - the directory built from the session snapshot

mod channel;
mod directory;
mod guild;
mod handles;
mod user;

pub use channel::{Channel, ChannelTarget, ChannelType};
pub use directory::Directory;
pub use guild::Guild;
pub use handles::{BuddyHandle, ConversationHandle};
pub use user::User;

//! Chat module - rooms, messages and connection lifecycle.

mod connection;
mod errors;
mod message;
mod room;

pub use connection::{CloseReason, ConnectionState};
pub use errors::ChatError;
pub use message::{Message, MessageContent, DEFAULT_MAX_MESSAGE_LENGTH};
pub use room::{ParticipantPair, Room};

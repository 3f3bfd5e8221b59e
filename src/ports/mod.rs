//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the chat core and the outside world. Adapters implement these ports.
//!
//! - `ChatRepository` - Durable rooms and message history
//! - `RoomFanout` - Delivery of a stored message to a room's live connections
//! - `SessionValidator` - Resolves a presented credential to a participant
//! - `UserDirectory` - Lists known participants

mod chat_repository;
mod room_fanout;
mod session_validator;
mod user_directory;

pub use chat_repository::ChatRepository;
pub use room_fanout::{FanoutReport, RoomFanout};
pub use session_validator::SessionValidator;
pub use user_directory::UserDirectory;

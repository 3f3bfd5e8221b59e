//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the chat core to external systems:
//! - `postgres` - durable rooms and messages (sqlx)
//! - `memory` - in-process store for tests and local runs
//! - `websocket` - live connections, room registry, fan-out
//! - `auth` - identity validation
//! - `http` - REST endpoints and the assembled router

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;

pub use auth::StaticTokenValidator;
pub use memory::InMemoryChatRepository;
pub use postgres::PostgresChatRepository;
pub use websocket::{ChatContext, ConnectionHandler, RoomRegistry, ShutdownSignal};

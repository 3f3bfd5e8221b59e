//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresChatRepository` - rooms and message history

mod chat_repository;

pub use chat_repository::PostgresChatRepository;

//! In-memory adapters for tests and local runs.

mod chat_repository;

pub use chat_repository::InMemoryChatRepository;

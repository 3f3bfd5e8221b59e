//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, auth types)
//! - `chat` - Two-party rooms, messages and connection lifecycle

pub mod chat;
pub mod foundation;

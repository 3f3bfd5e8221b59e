//! PairChat - real-time two-party chat with durable history.
//!
//! Clients hold a WebSocket connection scoped to a room shared by exactly two
//! participants. Every message is persisted first and then pushed to each live
//! connection in the room, in the same order for everyone.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations through ports.

pub mod chat;

pub use chat::{
    // Commands
    BroadcastCoordinator, PublishMessageCommand, PublishMessageResult,
    // Queries
    AuthorizeRoomAccessHandler, AuthorizeRoomAccessQuery,
    GetRoomHistoryHandler, GetRoomHistoryQuery,
    ListPeersHandler, ListPeersQuery,
    ResolveRoomHandler, ResolveRoomQuery, ResolveRoomResult,
};

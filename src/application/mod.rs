//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (publish) are separated from queries (room access, resolution,
//! history, peer listing).

pub mod handlers;

pub use handlers::{
    AuthorizeRoomAccessHandler, AuthorizeRoomAccessQuery, BroadcastCoordinator,
    GetRoomHistoryHandler, GetRoomHistoryQuery, ListPeersHandler, ListPeersQuery,
    PublishMessageCommand, PublishMessageResult,
    ResolveRoomHandler, ResolveRoomQuery, ResolveRoomResult,
};

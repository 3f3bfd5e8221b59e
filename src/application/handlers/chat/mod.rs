//! Chat command and query handlers.

mod list_peers;
mod publish_message;
mod resolve_room;
mod room_access;
mod room_history;
mod room_sequencer;

pub use list_peers::{ListPeersHandler, ListPeersQuery};
pub use publish_message::{BroadcastCoordinator, PublishMessageCommand, PublishMessageResult};
pub use resolve_room::{ResolveRoomHandler, ResolveRoomQuery, ResolveRoomResult};
pub use room_access::{AuthorizeRoomAccessHandler, AuthorizeRoomAccessQuery};
pub use room_history::{GetRoomHistoryHandler, GetRoomHistoryQuery};
pub use room_sequencer::{RoomSequencer, RoomTurn};

//! HTTP routes for room endpoints.

use axum::{routing::get, Router};

use super::handlers::{list_messages, resolve_room, RoomHandlers};

/// Creates the room router with all endpoints.
pub fn room_routes(handlers: RoomHandlers) -> Router {
    Router::new()
        .route("/with/:peer_id", get(resolve_room))
        .route("/:room_id/messages", get(list_messages))
        .with_state(handlers)
}

//! Room access check used before a connection may join a room.

use std::sync::Arc;

use crate::domain::chat::{ChatError, Room};
use crate::domain::foundation::{RoomId, UserId};
use crate::ports::ChatRepository;

/// Query: may `user_id` attach to `room_id`?
#[derive(Debug, Clone, Copy)]
pub struct AuthorizeRoomAccessQuery {
    pub room_id: RoomId,
    pub user_id: UserId,
}

/// Resolves a room for a connecting participant.
pub struct AuthorizeRoomAccessHandler {
    repository: Arc<dyn ChatRepository>,
}

impl AuthorizeRoomAccessHandler {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// Returns the room when the user is one of its participants.
    pub async fn handle(&self, query: AuthorizeRoomAccessQuery) -> Result<Room, ChatError> {
        let room = self
            .repository
            .find_room(query.room_id)
            .await?
            .ok_or(ChatError::RoomNotFound(query.room_id))?;

        if !room.is_participant(query.user_id) {
            return Err(ChatError::NotParticipant {
                room_id: query.room_id,
                user_id: query.user_id,
            });
        }

        Ok(room)
    }
}

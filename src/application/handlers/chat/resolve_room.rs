//! ResolveRoomHandler - finds or creates the room for two participants and
//! returns it with its full history.

use std::sync::Arc;

use tracing::debug;

use crate::domain::chat::{ChatError, Message, ParticipantPair, Room};
use crate::domain::foundation::UserId;
use crate::ports::ChatRepository;

/// Query to resolve the room between the requester and a peer.
#[derive(Debug, Clone, Copy)]
pub struct ResolveRoomQuery {
    pub user_id: UserId,
    pub peer_id: UserId,
}

/// The canonical room and its history, oldest first.
#[derive(Debug, Clone)]
pub struct ResolveRoomResult {
    pub room: Room,
    pub history: Vec<Message>,
}

pub struct ResolveRoomHandler {
    repository: Arc<dyn ChatRepository>,
}

impl ResolveRoomHandler {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ResolveRoomQuery) -> Result<ResolveRoomResult, ChatError> {
        let pair = ParticipantPair::new(query.user_id, query.peer_id)?;

        let room = self.repository.find_or_create_room(pair).await?;
        let history = self.repository.list_messages(room.id()).await?;

        debug!(
            room_id = %room.id(),
            user_id = %query.user_id,
            messages = history.len(),
            "Room resolved"
        );

        Ok(ResolveRoomResult { room, history })
    }
}

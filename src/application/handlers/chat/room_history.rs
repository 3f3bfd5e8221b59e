//! GetRoomHistoryHandler - lists a room's messages for one of its participants.

use std::sync::Arc;

use super::room_access::{AuthorizeRoomAccessHandler, AuthorizeRoomAccessQuery};
use crate::domain::chat::{ChatError, Message};
use crate::domain::foundation::{RoomId, UserId};
use crate::ports::ChatRepository;

#[derive(Debug, Clone, Copy)]
pub struct GetRoomHistoryQuery {
    pub room_id: RoomId,
    pub user_id: UserId,
}

pub struct GetRoomHistoryHandler {
    repository: Arc<dyn ChatRepository>,
    access: AuthorizeRoomAccessHandler,
}

impl GetRoomHistoryHandler {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self {
            access: AuthorizeRoomAccessHandler::new(repository.clone()),
            repository,
        }
    }

    pub async fn handle(&self, query: GetRoomHistoryQuery) -> Result<Vec<Message>, ChatError> {
        let room = self
            .access
            .handle(AuthorizeRoomAccessQuery {
                room_id: query.room_id,
                user_id: query.user_id,
            })
            .await?;

        Ok(self.repository.list_messages(room.id()).await?)
    }
}

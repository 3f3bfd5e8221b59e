//! BroadcastCoordinator - validates, persists, then fans out a chat message.

use std::sync::Arc;

use tracing::{debug, warn};

use super::room_sequencer::RoomSequencer;
use crate::domain::chat::{ChatError, Message, MessageContent, DEFAULT_MAX_MESSAGE_LENGTH};
use crate::domain::foundation::{RoomId, UserId};
use crate::ports::{ChatRepository, FanoutReport, RoomFanout};

/// Command to publish a message into a room.
#[derive(Debug, Clone)]
pub struct PublishMessageCommand {
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub content: String,
}

/// Result of a successful publish.
#[derive(Debug, Clone)]
pub struct PublishMessageResult {
    pub message: Arc<Message>,
    pub report: FanoutReport,
}

/// Coordinates persistence and live delivery of chat messages.
///
/// For a single room, publishes are persisted and delivered strictly in the
/// order they acquire the room's turn; rooms never wait on each other.
pub struct BroadcastCoordinator {
    repository: Arc<dyn ChatRepository>,
    fanout: Arc<dyn RoomFanout>,
    sequencer: RoomSequencer,
    max_message_length: usize,
}

impl BroadcastCoordinator {
    pub fn new(repository: Arc<dyn ChatRepository>, fanout: Arc<dyn RoomFanout>) -> Self {
        Self {
            repository,
            fanout,
            sequencer: RoomSequencer::new(),
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }

    pub fn with_max_message_length(mut self, max_message_length: usize) -> Self {
        self.max_message_length = max_message_length;
        self
    }

    pub async fn handle(&self, cmd: PublishMessageCommand) -> Result<PublishMessageResult, ChatError> {
        // 1. Validate before touching the store
        let content = MessageContent::new(cmd.content, self.max_message_length)?;

        // 2. Wait for this room's turn
        let _turn = self.sequencer.acquire(cmd.room_id).await;

        // 3. Persist
        let message = self
            .repository
            .append_message(cmd.room_id, cmd.sender_id, &content)
            .await
            .map_err(|err| {
                warn!(
                    room_id = %cmd.room_id,
                    sender_id = %cmd.sender_id,
                    error = %err,
                    "Message not persisted; skipping fan-out"
                );
                ChatError::from(err)
            })?;

        // 4. Fan out while still holding the turn
        let message = Arc::new(message);
        let report = self.fanout.fan_out(Arc::clone(&message)).await;

        debug!(
            room_id = %message.room_id,
            message_id = %message.id,
            recipients = report.recipients,
            delivered = report.delivered,
            evicted = report.evicted,
            "Message published"
        );

        Ok(PublishMessageResult { message, report })
    }
}

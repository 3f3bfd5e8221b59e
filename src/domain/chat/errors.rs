//! Chat-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, RoomId, UserId, ValidationError};

/// Errors surfaced by chat operations.
///
/// Only `Persistence` is a room-wide failure; every other variant is local to
/// the request or connection that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Input failed validation (empty or oversized message, bad pair).
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("User {user_id} is not a participant of room {room_id}")]
    NotParticipant { room_id: RoomId, user_id: UserId },

    /// The store was unavailable or rejected the write.
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl ChatError {
    pub fn persistence(message: impl Into<String>) -> Self {
        ChatError::Persistence(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ChatError::Validation(_) => ErrorCode::ValidationFailed,
            ChatError::RoomNotFound(_) => ErrorCode::RoomNotFound,
            ChatError::NotParticipant { .. } => ErrorCode::NotParticipant,
            ChatError::Persistence(_) => ErrorCode::DatabaseError,
        }
    }

    /// True for errors caused by the client's own input.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, ChatError::Validation(_))
    }
}

impl From<DomainError> for ChatError {
    fn from(err: DomainError) -> Self {
        let room_id = err
            .details
            .get("room_id")
            .and_then(|raw| raw.parse::<RoomId>().ok());
        let user_id = err
            .details
            .get("user_id")
            .and_then(|raw| raw.parse::<UserId>().ok());

        match (err.code, room_id, user_id) {
            (ErrorCode::RoomNotFound, Some(room_id), _) => ChatError::RoomNotFound(room_id),
            (ErrorCode::NotParticipant, Some(room_id), Some(user_id)) => {
                ChatError::NotParticipant { room_id, user_id }
            }
            (ErrorCode::ValidationFailed, _, _) => {
                ChatError::Validation(ValidationError::invalid_format("input", err.message))
            }
            _ => ChatError::Persistence(err.to_string()),
        }
    }
}

//! Chat messages and their validated content.

use crate::domain::foundation::{MessageId, RoomId, Timestamp, UserId, ValidationError};

/// Default upper bound on message length, in characters.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 4096;

/// Message text that has passed validation.
///
/// Content is kept exactly as sent; whitespace-only text counts as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    /// Validates raw text from a client.
    pub fn new(raw: impl Into<String>, max_length: usize) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::empty_field("message"));
        }
        let length = raw.chars().count();
        if length > max_length {
            return Err(ValidationError::too_long("message", max_length, length));
        }
        Ok(Self(raw))
    }

    /// Wraps text read back from storage, which was validated on the way in.
    pub fn from_persisted(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A persisted, immutable chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

impl Message {
    pub fn text(&self) -> &str {
        self.content.as_str()
    }
}

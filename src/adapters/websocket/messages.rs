//! WebSocket frame types for the chat protocol.
//!
//! - Client → Server: `{"message": "<text>"}`
//! - Server → Client: chat `{"message": "<text>", "user_id": <int>}`,
//!   readiness `{"ready": {...}}`, error `{"error": {...}}`

use serde::{Deserialize, Serialize};

use crate::domain::chat::{ChatError, Message};
use crate::domain::foundation::{ErrorCode, RoomId};

use super::connection::ConnectionId;

// ============================================
// Server → Client Frames
// ============================================

/// All frames the server writes to a chat connection.
///
/// Untagged so chat frames keep the bare `{message, user_id}` shape clients
/// already understand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServerFrame {
    /// A persisted message, pushed to every member including its sender.
    Chat { message: String, user_id: i64 },

    /// Sent once, after the connection joined its room.
    Ready { ready: ReadyPayload },

    /// A request from this connection failed; the connection stays open.
    Error { error: ErrorPayload },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadyPayload {
    pub room_id: i64,
    pub connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl ServerFrame {
    pub fn chat(message: &Message) -> Self {
        ServerFrame::Chat {
            message: message.text().to_string(),
            user_id: message.sender_id.as_i64(),
        }
    }

    pub fn ready(room_id: RoomId, connection_id: ConnectionId) -> Self {
        ServerFrame::Ready {
            ready: ReadyPayload {
                room_id: room_id.as_i64(),
                connection_id: connection_id.to_string(),
            },
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerFrame::Error {
            error: ErrorPayload {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&ChatError> for ServerFrame {
    fn from(err: &ChatError) -> Self {
        ServerFrame::error(err.code(), err.to_string())
    }
}

// ============================================
// Client → Server Frames
// ============================================

/// A chat message sent by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    pub message: String,
}

impl InboundFrame {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

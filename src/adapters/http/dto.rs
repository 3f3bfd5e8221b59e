//! Response bodies shared by every HTTP endpoint.

use serde::Serialize;

use crate::domain::chat::ChatError;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&ChatError> for ErrorResponse {
    fn from(err: &ChatError) -> Self {
        let details = match err {
            ChatError::NotParticipant { room_id, user_id } => Some(serde_json::json!({
                "room_id": room_id,
                "user_id": user_id,
            })),
            ChatError::RoomNotFound(room_id) => Some(serde_json::json!({ "room_id": room_id })),
            _ => None,
        };

        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            details,
        }
    }
}

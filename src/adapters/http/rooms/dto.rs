//! Request/response types for room endpoints.

use serde::Serialize;

use crate::domain::chat::{Message, Room};

/// A room with its full history.
#[derive(Debug, Clone, Serialize)]
pub struct RoomResponse {
    pub room_id: i64,
    pub participants: [i64; 2],
    pub created_at: String,
    pub messages: Vec<MessageResponse>,
}

impl RoomResponse {
    pub fn new(room: &Room, history: &[Message]) -> Self {
        let pair = room.participants();
        Self {
            room_id: room.id().as_i64(),
            participants: [pair.first().as_i64(), pair.second().as_i64()],
            created_at: room.created_at().to_rfc3339(),
            messages: history.iter().map(MessageResponse::from).collect(),
        }
    }
}

/// One message in a history listing.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub created_at: String,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.as_i64(),
            user_id: message.sender_id.as_i64(),
            message: message.text().to_string(),
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

/// History for a room the caller already knows.
#[derive(Debug, Clone, Serialize)]
pub struct MessageListResponse {
    pub room_id: i64,
    pub messages: Vec<MessageResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::{MessageContent, ParticipantPair, DEFAULT_MAX_MESSAGE_LENGTH};
    use crate::domain::foundation::{MessageId, RoomId, Timestamp, UserId};

    #[test]
    fn room_response_lists_canonical_participants_and_messages() {
        let pair =
            ParticipantPair::new(UserId::new(9).unwrap(), UserId::new(4).unwrap()).unwrap();
        let room = Room::new(RoomId::new(2), pair, Timestamp::now());
        let message = Message {
            id: MessageId::new(1),
            room_id: room.id(),
            sender_id: UserId::new(9).unwrap(),
            content: MessageContent::new("hey", DEFAULT_MAX_MESSAGE_LENGTH).unwrap(),
            created_at: Timestamp::now(),
        };

        let json = serde_json::to_value(RoomResponse::new(&room, &[message])).unwrap();

        assert_eq!(json["room_id"], 2);
        assert_eq!(json["participants"], serde_json::json!([4, 9]));
        assert_eq!(json["messages"][0]["message"], "hey");
        assert_eq!(json["messages"][0]["user_id"], 9);
    }
}

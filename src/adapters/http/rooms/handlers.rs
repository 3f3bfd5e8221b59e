//! HTTP handlers for room endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::dto::ErrorResponse;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{
    GetRoomHistoryHandler, GetRoomHistoryQuery, ResolveRoomHandler, ResolveRoomQuery,
};
use crate::domain::chat::ChatError;
use crate::domain::foundation::{RoomId, UserId};

use super::dto::{MessageListResponse, MessageResponse, RoomResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct RoomHandlers {
    resolve_handler: Arc<ResolveRoomHandler>,
    history_handler: Arc<GetRoomHistoryHandler>,
}

impl RoomHandlers {
    pub fn new(
        resolve_handler: Arc<ResolveRoomHandler>,
        history_handler: Arc<GetRoomHistoryHandler>,
    ) -> Self {
        Self {
            resolve_handler,
            history_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/rooms/with/:peer_id - Room shared with a peer, plus its history
pub async fn resolve_room(
    State(handlers): State<RoomHandlers>,
    RequireAuth(user): RequireAuth,
    Path(peer_id): Path<String>,
) -> Response {
    let peer_id: UserId = match peer_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid peer ID")),
            )
                .into_response();
        }
    };

    let query = ResolveRoomQuery {
        user_id: user.id,
        peer_id,
    };

    match handlers.resolve_handler.handle(query).await {
        Ok(result) => (
            StatusCode::OK,
            Json(RoomResponse::new(&result.room, &result.history)),
        )
            .into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// GET /api/rooms/:room_id/messages - Room history for a participant
pub async fn list_messages(
    State(handlers): State<RoomHandlers>,
    RequireAuth(user): RequireAuth,
    Path(room_id): Path<String>,
) -> Response {
    let room_id: RoomId = match room_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid room ID")),
            )
                .into_response();
        }
    };

    let query = GetRoomHistoryQuery {
        room_id,
        user_id: user.id,
    };

    match handlers.history_handler.handle(query).await {
        Ok(messages) => (
            StatusCode::OK,
            Json(MessageListResponse {
                room_id: room_id.as_i64(),
                messages: messages.iter().map(MessageResponse::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => handle_chat_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_chat_error(error: ChatError) -> Response {
    let status = match &error {
        ChatError::Validation(_) => StatusCode::BAD_REQUEST,
        ChatError::RoomNotFound(_) => StatusCode::NOT_FOUND,
        ChatError::NotParticipant { .. } => StatusCode::FORBIDDEN,
        ChatError::Persistence(msg) => {
            tracing::error!("Room request failed: {}", msg);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Failed to load room")),
            )
                .into_response();
        }
    };

    (status, Json(ErrorResponse::from(&error))).into_response()
}

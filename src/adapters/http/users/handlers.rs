//! HTTP handlers for the user directory.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::dto::ErrorResponse;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{ListPeersHandler, ListPeersQuery};

use super::dto::{UserListResponse, UserResponse};

#[derive(Clone)]
pub struct UserHandlers {
    list_peers_handler: Arc<ListPeersHandler>,
}

impl UserHandlers {
    pub fn new(list_peers_handler: Arc<ListPeersHandler>) -> Self {
        Self { list_peers_handler }
    }
}

/// GET /api/users - Everyone the caller can open a room with
pub async fn list_users(
    State(handlers): State<UserHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let query = ListPeersQuery { user_id: user.id };

    match handlers.list_peers_handler.handle(query).await {
        Ok(peers) => (
            StatusCode::OK,
            Json(UserListResponse {
                users: peers.iter().map(UserResponse::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(user_id = %user.id, "User directory request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Failed to list users")),
            )
                .into_response()
        }
    }
}

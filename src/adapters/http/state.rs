//! Shared application state wired once at startup.

use std::sync::Arc;

use crate::adapters::websocket::{ChatContext, RoomRegistry, ShutdownSignal};
use crate::application::handlers::{
    AuthorizeRoomAccessHandler, BroadcastCoordinator, GetRoomHistoryHandler, ListPeersHandler,
    ResolveRoomHandler,
};
use crate::config::ChatConfig;
use crate::ports::{ChatRepository, UserDirectory};

use super::middleware::AuthState;
use super::rooms::RoomHandlers;
use super::users::UserHandlers;

/// Everything the HTTP and WebSocket routes need.
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatContext,
    pub rooms: RoomHandlers,
    pub users: UserHandlers,
    pub auth: AuthState,
}

impl AppState {
    /// Builds the room registry, coordinator and handlers around one store.
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        validator: AuthState,
        directory: Arc<dyn UserDirectory>,
        chat_config: &ChatConfig,
        shutdown: ShutdownSignal,
    ) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let coordinator = BroadcastCoordinator::new(repository.clone(), registry.clone())
            .with_max_message_length(chat_config.max_message_length);

        let chat = ChatContext {
            registry,
            coordinator: Arc::new(coordinator),
            access: Arc::new(AuthorizeRoomAccessHandler::new(repository.clone())),
            shutdown,
            outbound_queue_capacity: chat_config.outbound_queue_capacity,
        };

        let rooms = RoomHandlers::new(
            Arc::new(ResolveRoomHandler::new(repository.clone())),
            Arc::new(GetRoomHistoryHandler::new(repository)),
        );

        let users = UserHandlers::new(Arc::new(ListPeersHandler::new(directory)));

        Self {
            chat,
            rooms,
            users,
            auth: validator,
        }
    }
}

//! HTTP adapters - REST and WebSocket endpoint exposure.
//!
//! Routes:
//! - `GET /api/rooms/with/:peer_id` - resolve the room shared with a peer
//! - `GET /api/rooms/:room_id/messages` - room history
//! - `GET /api/users` - peers the caller can chat with
//! - `GET /ws/chat/:room_id` - live chat connection
//! - `GET /health` - liveness plus registry counts

pub mod dto;
pub mod middleware;
pub mod rooms;
pub mod state;
pub mod users;

pub use rooms::room_routes;
pub use state::AppState;
pub use users::user_routes;

use axum::{extract::State, middleware as axum_middleware, routing::get, Json, Router};
use http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{websocket_router, ChatContext};
use crate::config::ServerConfig;

use middleware::auth_middleware;

/// Build the axum router with all routes and layers.
pub fn app_router(state: AppState, server: &ServerConfig) -> Router {
    let api = Router::new()
        .nest("/api/rooms", room_routes(state.rooms.clone()))
        .nest("/api/users", user_routes(state.users.clone()))
        .layer(TimeoutLayer::new(server.request_timeout()));

    let health = Router::new()
        .route("/health", get(health_handler))
        .with_state(state.chat.clone());

    Router::new()
        .merge(api)
        .merge(health)
        .nest("/ws", websocket_router(state.chat.clone()))
        .layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(server))
}

async fn health_handler(State(chat): State<ChatContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "connections": chat.registry.connection_count().await,
        "rooms": chat.registry.active_rooms().await.len(),
    }))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        return if server.is_production() {
            CorsLayer::new()
        } else {
            CorsLayer::permissive()
        };
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

//! HTTP routes for the user directory.

use axum::{routing::get, Router};

use super::handlers::{list_users, UserHandlers};

/// Creates the user directory router.
pub fn user_routes(handlers: UserHandlers) -> Router {
    Router::new()
        .route("/", get(list_users))
        .with_state(handlers)
}

//! User directory HTTP adapter - lists peers the caller can chat with.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::UserHandlers;
pub use routes::user_routes;

//! WebSocket adapters for live chat rooms.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    ConnectionHandler (one per socket)               │
//! │   Connecting → Active → Closed                                      │
//! └─────────────────────────────────────────────────────────────────────┘
//!            │ inbound {"message"}                ▲ outbound queue
//!            ▼                                    │
//! ┌──────────────────────────────┐    ┌──────────────────────────────────┐
//! │     BroadcastCoordinator     │───▶│           RoomRegistry           │
//! │  persist, then fan out       │    │  Room: 17        Room: 42        │
//! │  (one turn per room)         │    │  ├── conn-a      └── conn-d      │
//! └──────────────────────────────┘    │  └── conn-b                      │
//!                                     └──────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - Frame types for the chat protocol
//! - [`connection`] - Connection ids and registry handles
//! - [`registry`] - Live room membership and fan-out
//! - [`handler`] - Connection state machine and axum upgrade route
//! - [`shutdown`] - Server-wide close notification

pub mod connection;
pub mod handler;
pub mod messages;
pub mod registry;
pub mod shutdown;

pub use connection::{ConnectionHandle, ConnectionId};
pub use handler::{websocket_router, ws_chat_handler, ChatContext, ConnectionHandler};
pub use messages::{ErrorPayload, InboundFrame, ReadyPayload, ServerFrame};
pub use registry::RoomRegistry;
pub use shutdown::{ShutdownListener, ShutdownSignal};

//! WebSocket upgrade route and per-connection chat handler.
//!
//! Connection lifecycle:
//! 1. `Connecting`: authenticate the caller and check they belong to the room
//!    (done before the HTTP upgrade so refusals get a proper status code)
//! 2. Upgrade, join the room registry, send the readiness frame
//! 3. `Active`: forward inbound messages to the broadcast coordinator and
//!    write pushed messages to the socket
//! 4. `Closed`: leave the registry exactly once

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message as WsMessage, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;

use crate::adapters::http::dto::ErrorResponse;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{
    AuthorizeRoomAccessHandler, AuthorizeRoomAccessQuery, BroadcastCoordinator,
    PublishMessageCommand,
};
use crate::domain::chat::{ChatError, CloseReason, ConnectionState, Message};
use crate::domain::foundation::{ErrorCode, RoomId, StateMachine, UserId};

use super::connection::{ConnectionHandle, ConnectionId};
use super::messages::{InboundFrame, ServerFrame};
use super::registry::RoomRegistry;
use super::shutdown::{ShutdownListener, ShutdownSignal};

/// Shared services every chat connection needs.
#[derive(Clone)]
pub struct ChatContext {
    pub registry: Arc<RoomRegistry>,
    pub coordinator: Arc<BroadcastCoordinator>,
    pub access: Arc<AuthorizeRoomAccessHandler>,
    pub shutdown: ShutdownSignal,
    pub outbound_queue_capacity: usize,
}

/// One client's chat connection.
pub struct ConnectionHandler {
    context: ChatContext,
    connection_id: ConnectionId,
    room_id: RoomId,
    user_id: UserId,
    state: ConnectionState,
}

impl ConnectionHandler {
    /// Runs the `Connecting` checks for `user_id` on `room_id`.
    ///
    /// On error no handler exists, nothing was joined and the connection
    /// should be refused before the upgrade. A handler only reaches
    /// `Connecting -> Closed` when shutdown begins before it joins.
    pub async fn connect(
        context: ChatContext,
        room_id: RoomId,
        user_id: UserId,
    ) -> Result<Self, ChatError> {
        let room = context
            .access
            .handle(AuthorizeRoomAccessQuery { room_id, user_id })
            .await
            .map_err(|err| {
                tracing::debug!(
                    room_id = %room_id,
                    user_id = %user_id,
                    error = %err,
                    "Connection refused"
                );
                err
            })?;

        Ok(Self {
            context,
            connection_id: ConnectionId::new(),
            room_id: room.id(),
            user_id,
            state: ConnectionState::Connecting,
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Drives the connection until it closes and returns why it closed.
    pub async fn run<S, R, E>(mut self, mut sink: S, mut stream: R) -> CloseReason
    where
        S: Sink<WsMessage> + Unpin,
        S::Error: Display,
        R: Stream<Item = Result<WsMessage, E>> + Unpin,
        E: Display,
    {
        if self.context.shutdown.is_triggered() {
            self.close(&mut sink, CloseReason::ServerShutdown).await;
            return CloseReason::ServerShutdown;
        }

        let (handle, mut outbound) = ConnectionHandle::new(
            self.connection_id,
            self.user_id,
            self.context.outbound_queue_capacity,
        );
        self.context.registry.join(self.room_id, handle).await;
        self.transition(ConnectionState::Active);
        let mut shutdown = self.context.shutdown.subscribe();

        tracing::debug!(
            room_id = %self.room_id,
            connection_id = %self.connection_id,
            user_id = %self.user_id,
            "Connection active"
        );

        let ready = ServerFrame::ready(self.room_id, self.connection_id);
        let reason = match send_frame(&mut sink, &ready).await {
            Ok(()) => {
                self.pump(&mut sink, &mut stream, &mut outbound, &mut shutdown)
                    .await
            }
            Err(reason) => reason,
        };

        self.close(&mut sink, reason).await;
        reason
    }

    async fn pump<S, R, E>(
        &self,
        sink: &mut S,
        stream: &mut R,
        outbound: &mut mpsc::Receiver<Arc<Message>>,
        shutdown: &mut ShutdownListener,
    ) -> CloseReason
    where
        S: Sink<WsMessage> + Unpin,
        S::Error: Display,
        R: Stream<Item = Result<WsMessage, E>> + Unpin,
        E: Display,
    {
        // Pushed messages drain before the next inbound frame is read, so a
        // client's own echoes never pile up behind a burst of its sends.
        loop {
            tokio::select! {
                biased;

                pushed = outbound.recv() => match pushed {
                    Some(message) => {
                        if let Err(reason) = send_frame(sink, &ServerFrame::chat(&message)).await {
                            return reason;
                        }
                    }
                    // The registry dropped our handle
                    None => return CloseReason::Evicted,
                },
                _ = shutdown.wait() => return CloseReason::ServerShutdown,
                inbound = stream.next() => match inbound {
                    Some(Ok(WsMessage::Text(text))) => {
                        if let Err(reason) = self.on_text(sink, &text).await {
                            return reason;
                        }
                    }
                    Some(Ok(WsMessage::Binary(_))) => {
                        let frame = ServerFrame::error(
                            ErrorCode::MalformedFrame,
                            "Binary frames are not supported",
                        );
                        if let Err(reason) = send_frame(sink, &frame).await {
                            return reason;
                        }
                    }
                    // Protocol-level keepalive, answered by the transport
                    Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {}
                    Some(Ok(WsMessage::Close(_))) | None => return CloseReason::RemoteClosed,
                    Some(Err(e)) => {
                        tracing::debug!(
                            connection_id = %self.connection_id,
                            "Receive error: {}",
                            e
                        );
                        return CloseReason::TransportError;
                    }
                },
            }
        }
    }

    /// Handles one text frame. Only transport failures end the connection.
    async fn on_text<S>(&self, sink: &mut S, text: &str) -> Result<(), CloseReason>
    where
        S: Sink<WsMessage> + Unpin,
        S::Error: Display,
    {
        let frame = match InboundFrame::parse(text) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::debug!(
                    connection_id = %self.connection_id,
                    error = %err,
                    "Malformed inbound frame"
                );
                let reply = ServerFrame::error(
                    ErrorCode::MalformedFrame,
                    format!("Invalid message frame: {}", err),
                );
                return send_frame(sink, &reply).await;
            }
        };

        let result = self
            .context
            .coordinator
            .handle(PublishMessageCommand {
                room_id: self.room_id,
                sender_id: self.user_id,
                content: frame.message,
            })
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                if !err.is_malformed_input() {
                    tracing::warn!(
                        room_id = %self.room_id,
                        connection_id = %self.connection_id,
                        error = %err,
                        "Publish failed"
                    );
                }
                send_frame(sink, &ServerFrame::from(&err)).await
            }
        }
    }

    async fn close<S>(&mut self, sink: &mut S, reason: CloseReason)
    where
        S: Sink<WsMessage> + Unpin,
        S::Error: Display,
    {
        if !self.transition(ConnectionState::Closed) {
            return;
        }

        self.context
            .registry
            .leave(self.room_id, self.connection_id)
            .await;

        if reason.is_server_initiated() {
            let frame = match reason {
                CloseReason::Evicted => CloseFrame {
                    code: close_code::POLICY,
                    reason: "Too far behind; reconnect to resume".into(),
                },
                _ => CloseFrame {
                    code: close_code::AWAY,
                    reason: "Server shutting down".into(),
                },
            };
            if let Err(e) = sink.send(WsMessage::Close(Some(frame))).await {
                tracing::debug!(
                    connection_id = %self.connection_id,
                    "Failed to send close frame: {}",
                    e
                );
            }
        }

        tracing::debug!(
            room_id = %self.room_id,
            connection_id = %self.connection_id,
            reason = ?reason,
            "Connection closed"
        );
    }

    /// Moves to `target`; returns false if the move is not allowed.
    fn transition(&mut self, target: ConnectionState) -> bool {
        match self.state.transition_to(target) {
            Ok(next) => {
                self.state = next;
                true
            }
            Err(_) => false,
        }
    }
}

/// Serializes and writes one frame.
async fn send_frame<S>(sink: &mut S, frame: &ServerFrame) -> Result<(), CloseReason>
where
    S: Sink<WsMessage> + Unpin,
    S::Error: Display,
{
    let json = match frame.to_json() {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize server frame: {}", e);
            return Ok(());
        }
    };

    sink.send(WsMessage::Text(json)).await.map_err(|e| {
        tracing::debug!("Send error, closing connection: {}", e);
        CloseReason::TransportError
    })
}

// ============================================
// Axum route
// ============================================

/// Handle WebSocket upgrade requests for a chat room.
///
/// Route: `GET /ws/chat/:room_id`
///
/// Returns 401 without identity, 404 for an unknown room, 403 when the caller
/// is not one of the room's participants.
pub async fn ws_chat_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    State(context): State<ChatContext>,
    RequireAuth(user): RequireAuth,
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

    let handler = match ConnectionHandler::connect(context, room_id, user.id).await {
        Ok(handler) => handler,
        Err(err) => return refusal_response(&err),
    };

    ws.on_upgrade(move |socket: WebSocket| async move {
        let (sink, stream) = socket.split();
        handler.run(sink, stream).await;
    })
}

fn refusal_response(err: &ChatError) -> Response {
    let (status, body) = match err {
        ChatError::RoomNotFound(_) => (StatusCode::NOT_FOUND, ErrorResponse::from(err)),
        ChatError::NotParticipant { .. } => (StatusCode::FORBIDDEN, ErrorResponse::from(err)),
        ChatError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorResponse::from(err)),
        ChatError::Persistence(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::internal("Failed to open chat connection"),
        ),
    };
    (status, Json(body)).into_response()
}

/// Create axum router for the chat WebSocket endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .nest("/ws", websocket_router(context))
///     .layer(middleware::from_fn_with_state(validator, auth_middleware));
/// ```
pub fn websocket_router(context: ChatContext) -> axum::Router {
    use axum::routing::get;

    axum::Router::new()
        .route("/chat/:room_id", get(ws_chat_handler))
        .with_state(context)
}

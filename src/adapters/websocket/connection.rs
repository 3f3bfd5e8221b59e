//! Connection identity and the registry-side handle used to push messages.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use crate::domain::chat::Message;
use crate::domain::foundation::UserId;

/// Unique identifier for a live WebSocket connection.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the registry holds for each member: who it is and where to push.
///
/// The handle owns the only sender into the connection's outbound queue.
/// Once the registry (and any in-flight snapshot) drops it, the connection's
/// receiver ends.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    user_id: UserId,
    outbound: mpsc::Sender<Arc<Message>>,
}

impl ConnectionHandle {
    /// Creates a handle for `id` and the bounded queue it feeds.
    pub fn new(
        id: ConnectionId,
        user_id: UserId,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<Arc<Message>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = Self {
            id,
            user_id,
            outbound: tx,
        };
        (handle, rx)
    }

    /// Like [`ConnectionHandle::new`] with a fresh connection id.
    pub fn channel(user_id: UserId, capacity: usize) -> (Self, mpsc::Receiver<Arc<Message>>) {
        Self::new(ConnectionId::new(), user_id, capacity)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Queues a message without waiting.
    pub fn try_push(&self, message: Arc<Message>) -> Result<(), TrySendError<Arc<Message>>> {
        self.outbound.try_send(message)
    }
}

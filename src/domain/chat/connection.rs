//! Lifecycle of a live client connection.

use crate::domain::foundation::StateMachine;

/// States a connection moves through.
///
/// `Connecting` resolves identity and room; `Active` is joined to the room
/// registry; `Closed` is terminal and has left the registry.
///
/// `Connecting -> Closed` is taken when shutdown starts before the join.
/// A refused connection never gets this far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Active,
    Closed,
}

impl StateMachine for ConnectionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConnectionState::*;
        matches!(
            (self, target),
            (Connecting, Active) | (Connecting, Closed) | (Active, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConnectionState::*;
        match self {
            Connecting => vec![Active, Closed],
            Active => vec![Closed],
            Closed => vec![],
        }
    }
}

/// Why a connection left the `Active` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Peer sent a close frame or the stream ended.
    RemoteClosed,
    /// Reading from or writing to the socket failed.
    TransportError,
    /// The server is shutting down.
    ServerShutdown,
    /// The outbound queue overflowed and the registry dropped the connection.
    Evicted,
}

impl CloseReason {
    /// Whether the server should send its own close frame.
    pub fn is_server_initiated(&self) -> bool {
        matches!(self, CloseReason::ServerShutdown | CloseReason::Evicted)
    }
}

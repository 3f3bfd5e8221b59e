//! Room fan-out port - pushes a persisted message to a room's live members.
//!
//! The broadcast coordinator calls this only after the message is stored.
//! Implementations must attempt each member independently: a full or closed
//! member never delays or fails delivery to the others.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::chat::Message;

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutReport {
    /// Members in the snapshot taken for this message.
    pub recipients: usize,
    /// Members whose queue accepted the message.
    pub delivered: usize,
    /// Members that had already closed; silently skipped.
    pub dropped: usize,
    /// Members removed from the room because their queue was full.
    pub evicted: usize,
}

/// Port for delivering a message to every connection joined to its room.
#[async_trait]
pub trait RoomFanout: Send + Sync {
    /// Delivers `message` to a snapshot of the members of `message.room_id`.
    ///
    /// Never fails: per-member problems are reported in the returned
    /// [`FanoutReport`].
    async fn fan_out(&self, message: Arc<Message>) -> FanoutReport;
}

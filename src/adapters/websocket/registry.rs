//! Room registry: which live connections belong to which chat room.
//!
//! # Architecture
//!
//! ```text
//! Room: 17             Room: 42
//! ├── conn-a (user 1)  └── conn-d (user 3)
//! └── conn-b (user 2)
//! ```
//!
//! A message for room 17 is pushed to conn-a and conn-b only. Each connection
//! has its own bounded queue, so a slow reader never holds up its room.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::RwLock;

use super::connection::{ConnectionHandle, ConnectionId};
use crate::domain::chat::Message;
use crate::domain::foundation::RoomId;
use crate::ports::{FanoutReport, RoomFanout};

#[derive(Default)]
struct Membership {
    /// room_id → members of that room.
    rooms: HashMap<RoomId, HashMap<ConnectionId, ConnectionHandle>>,
    /// connection_id → room_id for O(1) moves and cleanup.
    connection_rooms: HashMap<ConnectionId, RoomId>,
}

impl Membership {
    fn remove(&mut self, room_id: RoomId, connection_id: ConnectionId) -> bool {
        if self.connection_rooms.get(&connection_id) != Some(&room_id) {
            return false;
        }
        self.connection_rooms.remove(&connection_id);

        if let Some(members) = self.rooms.get_mut(&room_id) {
            members.remove(&connection_id);
            if members.is_empty() {
                self.rooms.remove(&room_id);
            }
        }
        true
    }
}

/// Tracks live room membership.
///
/// Both maps sit behind one `RwLock`, so join, leave and snapshot always see
/// each other's effects whole. Fan-out holds the read lock only long enough to
/// copy the member list.
#[derive(Default)]
pub struct RoomRegistry {
    membership: RwLock<Membership>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to a room.
    ///
    /// Joining the same room again is a no-op. A connection that was in a
    /// different room is moved, so it never sits in two rooms.
    pub async fn join(&self, room_id: RoomId, handle: ConnectionHandle) {
        let mut membership = self.membership.write().await;
        let connection_id = handle.id();

        if let Some(previous) = membership.connection_rooms.get(&connection_id).copied() {
            if previous == room_id {
                return;
            }
            membership.remove(previous, connection_id);
        }

        membership.connection_rooms.insert(connection_id, room_id);
        membership
            .rooms
            .entry(room_id)
            .or_default()
            .insert(connection_id, handle);

        tracing::debug!(
            room_id = %room_id,
            connection_id = %connection_id,
            "Connection joined room"
        );
    }

    /// Removes a connection from a room. Returns whether it was a member.
    ///
    /// Leaving a room the connection is not in does nothing. A room with no
    /// members left is dropped.
    pub async fn leave(&self, room_id: RoomId, connection_id: ConnectionId) -> bool {
        let removed = self.membership.write().await.remove(room_id, connection_id);
        if removed {
            tracing::debug!(
                room_id = %room_id,
                connection_id = %connection_id,
                "Connection left room"
            );
        }
        removed
    }

    /// Point-in-time copy of a room's members.
    pub async fn members(&self, room_id: RoomId) -> Vec<ConnectionHandle> {
        self.membership
            .read()
            .await
            .rooms
            .get(&room_id)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of connections in a room (0 if the room has none).
    pub async fn member_count(&self, room_id: RoomId) -> usize {
        self.membership
            .read()
            .await
            .rooms
            .get(&room_id)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    /// Rooms with at least one member.
    pub async fn active_rooms(&self) -> Vec<RoomId> {
        self.membership.read().await.rooms.keys().copied().collect()
    }

    /// Total live connections across all rooms.
    pub async fn connection_count(&self) -> usize {
        self.membership.read().await.connection_rooms.len()
    }
}

#[async_trait]
impl RoomFanout for RoomRegistry {
    async fn fan_out(&self, message: Arc<Message>) -> FanoutReport {
        let room_id = message.room_id;
        let members = self.members(room_id).await;

        let mut report = FanoutReport {
            recipients: members.len(),
            ..FanoutReport::default()
        };

        for member in &members {
            match member.try_push(Arc::clone(&message)) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(
                        room_id = %room_id,
                        connection_id = %member.id(),
                        "Dropped message for closed connection"
                    );
                    report.dropped += 1;
                }
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        room_id = %room_id,
                        connection_id = %member.id(),
                        user_id = %member.user_id(),
                        "Outbound queue full, evicting connection"
                    );
                    self.leave(room_id, member.id()).await;
                    report.evicted += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::{MessageContent, DEFAULT_MAX_MESSAGE_LENGTH};
    use crate::domain::foundation::{MessageId, Timestamp, UserId};
    use tokio::sync::mpsc;

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    fn handle(user_id: i64) -> (ConnectionHandle, mpsc::Receiver<Arc<Message>>) {
        ConnectionHandle::channel(user(user_id), 8)
    }

    fn message(room_id: i64, text: &str) -> Arc<Message> {
        Arc::new(Message {
            id: MessageId::new(1),
            room_id: RoomId::new(room_id),
            sender_id: user(1),
            content: MessageContent::new(text, DEFAULT_MAX_MESSAGE_LENGTH).unwrap(),
            created_at: Timestamp::now(),
        })
    }

    #[tokio::test]
    async fn join_adds_member_to_room() {
        let registry = RoomRegistry::new();
        let (h, _rx) = handle(1);

        registry.join(RoomId::new(1), h).await;

        assert_eq!(registry.member_count(RoomId::new(1)).await, 1);
        assert_eq!(registry.active_rooms().await, vec![RoomId::new(1)]);
    }

    #[tokio::test]
    async fn join_is_idempotent_for_same_room() {
        let registry = RoomRegistry::new();
        let (h, _rx) = handle(1);

        registry.join(RoomId::new(1), h.clone()).await;
        registry.join(RoomId::new(1), h).await;

        assert_eq!(registry.member_count(RoomId::new(1)).await, 1);
        assert_eq!(registry.connection_count().await, 1);
    }

    #[tokio::test]
    async fn joining_another_room_moves_the_connection() {
        let registry = RoomRegistry::new();
        let (h, _rx) = handle(1);

        registry.join(RoomId::new(1), h.clone()).await;
        registry.join(RoomId::new(2), h).await;

        assert_eq!(registry.member_count(RoomId::new(1)).await, 0);
        assert_eq!(registry.member_count(RoomId::new(2)).await, 1);
        assert_eq!(registry.connection_count().await, 1);
    }

    #[tokio::test]
    async fn leave_twice_equals_leave_once() {
        let registry = RoomRegistry::new();
        let (h, _rx) = handle(1);
        let id = h.id();
        registry.join(RoomId::new(1), h).await;

        assert!(registry.leave(RoomId::new(1), id).await);
        assert!(!registry.leave(RoomId::new(1), id).await);

        assert_eq!(registry.connection_count().await, 0);
        assert!(registry.active_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn leave_without_join_is_noop() {
        let registry = RoomRegistry::new();
        assert!(!registry.leave(RoomId::new(5), ConnectionId::new()).await);
    }

    #[tokio::test]
    async fn leave_of_wrong_room_keeps_membership() {
        let registry = RoomRegistry::new();
        let (h, _rx) = handle(1);
        let id = h.id();
        registry.join(RoomId::new(1), h).await;

        assert!(!registry.leave(RoomId::new(2), id).await);
        assert_eq!(registry.member_count(RoomId::new(1)).await, 1);
    }

    #[tokio::test]
    async fn members_is_a_snapshot() {
        let registry = RoomRegistry::new();
        let (a, _rx_a) = handle(1);
        let (b, _rx_b) = handle(2);
        let b_id = b.id();
        registry.join(RoomId::new(1), a).await;
        registry.join(RoomId::new(1), b).await;

        let snapshot = registry.members(RoomId::new(1)).await;
        registry.leave(RoomId::new(1), b_id).await;

        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.member_count(RoomId::new(1)).await, 1);
    }

    #[tokio::test]
    async fn fan_out_reaches_every_member_of_the_room_only() {
        let registry = RoomRegistry::new();
        let (a, mut rx_a) = handle(1);
        let (b, mut rx_b) = handle(2);
        let (other, mut rx_other) = handle(3);
        registry.join(RoomId::new(1), a).await;
        registry.join(RoomId::new(1), b).await;
        registry.join(RoomId::new(2), other).await;

        let report = registry.fan_out(message(1, "hello")).await;

        assert_eq!(report.recipients, 2);
        assert_eq!(report.delivered, 2);
        assert_eq!(rx_a.recv().await.unwrap().text(), "hello");
        assert_eq!(rx_b.recv().await.unwrap().text(), "hello");
        assert!(rx_other.try_recv().is_err());
    }

    #[tokio::test]
    async fn fan_out_to_empty_room_is_noop() {
        let registry = RoomRegistry::new();
        let report = registry.fan_out(message(9, "anyone?")).await;
        assert_eq!(report, FanoutReport::default());
    }

    #[tokio::test]
    async fn closed_member_is_skipped_without_affecting_others() {
        let registry = RoomRegistry::new();
        let (a, rx_a) = handle(1);
        let (b, mut rx_b) = handle(2);
        registry.join(RoomId::new(1), a).await;
        registry.join(RoomId::new(1), b).await;
        drop(rx_a);

        let report = registry.fan_out(message(1, "hi")).await;

        assert_eq!(report.dropped, 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(rx_b.recv().await.unwrap().text(), "hi");
    }

    #[tokio::test]
    async fn full_member_is_evicted_and_its_queue_ends() {
        let registry = RoomRegistry::new();
        let (slow, mut rx_slow) = ConnectionHandle::channel(user(1), 1);
        let (fast, mut rx_fast) = handle(2);
        registry.join(RoomId::new(1), slow).await;
        registry.join(RoomId::new(1), fast).await;

        registry.fan_out(message(1, "first")).await;
        let report = registry.fan_out(message(1, "second")).await;

        assert_eq!(report.evicted, 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(registry.member_count(RoomId::new(1)).await, 1);

        assert_eq!(rx_fast.recv().await.unwrap().text(), "first");
        assert_eq!(rx_fast.recv().await.unwrap().text(), "second");

        // Buffered message is still readable, then the queue reports closed.
        assert_eq!(rx_slow.recv().await.unwrap().text(), "first");
        assert!(rx_slow.recv().await.is_none());
    }

    #[tokio::test]
    async fn concurrent_joins_and_leaves_stay_consistent() {
        let registry = Arc::new(RoomRegistry::new());
        let mut tasks = Vec::new();

        for i in 0..50 {
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                let (h, _rx) = ConnectionHandle::channel(UserId::new(i % 2 + 1).unwrap(), 4);
                let id = h.id();
                let room = RoomId::new(i % 5);
                registry.join(room, h).await;
                if i % 2 == 0 {
                    registry.leave(room, id).await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let mut total = 0;
        for room in registry.active_rooms().await {
            total += registry.member_count(room).await;
        }
        assert_eq!(total, 25);
        assert_eq!(registry.connection_count().await, 25);
    }
}

//! In-memory implementation of ChatRepository.
//!
//! Backs tests and local runs without PostgreSQL. Supports failure injection
//! and an artificial append latency so tests can exercise the coordinator's
//! persistence-failure and ordering paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::chat::{Message, MessageContent, ParticipantPair, Room};
use crate::domain::foundation::{DomainError, ErrorCode, MessageId, RoomId, Timestamp, UserId};
use crate::ports::ChatRepository;

#[derive(Default)]
struct Store {
    next_room_id: i64,
    next_message_id: i64,
    rooms: HashMap<RoomId, Room>,
    rooms_by_pair: HashMap<ParticipantPair, RoomId>,
    messages: HashMap<RoomId, Vec<Message>>,
}

/// In-memory chat store.
///
/// # Example
///
/// ```ignore
/// let repo = InMemoryChatRepository::new();
/// let room = repo.find_or_create_room(pair).await?;
/// repo.set_failing(true); // every append now fails with DatabaseError
/// ```
#[derive(Default)]
pub struct InMemoryChatRepository {
    store: RwLock<Store>,
    fail_writes: AtomicBool,
    append_delay: Option<Duration>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps for `delay` before every append.
    pub fn with_append_delay(mut self, delay: Duration) -> Self {
        self.append_delay = Some(delay);
        self
    }

    /// Makes every subsequent append fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    // === Test Helpers ===

    /// Number of stored messages across all rooms.
    pub async fn message_count(&self) -> usize {
        self.store.read().await.messages.values().map(Vec::len).sum()
    }

    /// Number of stored rooms.
    pub async fn room_count(&self) -> usize {
        self.store.read().await.rooms.len()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn find_or_create_room(&self, participants: ParticipantPair) -> Result<Room, DomainError> {
        let mut store = self.store.write().await;

        if let Some(id) = store.rooms_by_pair.get(&participants) {
            if let Some(room) = store.rooms.get(id) {
                return Ok(room.clone());
            }
        }

        store.next_room_id += 1;
        let room = Room::new(RoomId::new(store.next_room_id), participants, Timestamp::now());
        store.rooms_by_pair.insert(participants, room.id());
        store.rooms.insert(room.id(), room.clone());
        Ok(room)
    }

    async fn find_room(&self, id: RoomId) -> Result<Option<Room>, DomainError> {
        Ok(self.store.read().await.rooms.get(&id).cloned())
    }

    async fn append_message(
        &self,
        room_id: RoomId,
        sender_id: UserId,
        content: &MessageContent,
    ) -> Result<Message, DomainError> {
        if let Some(delay) = self.append_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("Simulated write failure")
                .with_detail("room_id", room_id.to_string()));
        }

        let mut store = self.store.write().await;

        let room = store.rooms.get(&room_id).ok_or_else(|| {
            DomainError::new(ErrorCode::RoomNotFound, format!("Room not found: {}", room_id))
                .with_detail("room_id", room_id.to_string())
        })?;
        if !room.is_participant(sender_id) {
            return Err(DomainError::new(
                ErrorCode::NotParticipant,
                format!("User {} is not in room {}", sender_id, room_id),
            )
            .with_detail("room_id", room_id.to_string())
            .with_detail("user_id", sender_id.to_string()));
        }

        store.next_message_id += 1;
        let id = MessageId::new(store.next_message_id);
        let history = store.messages.entry(room_id).or_default();

        // keep timestamps strictly increasing within a room
        let now = Timestamp::now();
        let created_at = match history.last() {
            Some(last) if !last.created_at.is_before(&now) => last.created_at.next_tick(),
            _ => now,
        };

        let message = Message {
            id,
            room_id,
            sender_id,
            content: content.clone(),
            created_at,
        };
        history.push(message.clone());
        Ok(message)
    }

    async fn list_messages(&self, room_id: RoomId) -> Result<Vec<Message>, DomainError> {
        Ok(self
            .store
            .read()
            .await
            .messages
            .get(&room_id)
            .cloned()
            .unwrap_or_default())
    }
}

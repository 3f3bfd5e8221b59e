//! Chat repository port - the persistence gateway for rooms and messages.
//!
//! The core awaits each call and treats it as atomic: it either succeeds or
//! fails without partial writes. Recovery from partial writes is the
//! implementation's job.
//!
//! # Contract
//!
//! - `find_or_create_room` is idempotent per participant pair; concurrent
//!   callers for the same pair must observe the same room.
//! - `append_message` assigns the id and timestamp, and must reject a sender
//!   who is not one of the room's participants.
//! - `list_messages` returns messages in ascending timestamp order, ties broken
//!   by id, i.e. the order `append_message` calls completed.

use async_trait::async_trait;

use crate::domain::chat::{Message, MessageContent, ParticipantPair, Room};
use crate::domain::foundation::{DomainError, RoomId, UserId};

/// Repository port for rooms and their message history.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Returns the room for this pair, creating it on first contact.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn find_or_create_room(&self, participants: ParticipantPair) -> Result<Room, DomainError>;

    /// Finds a room by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_room(&self, id: RoomId) -> Result<Option<Room>, DomainError>;

    /// Appends a message to a room's history.
    ///
    /// # Errors
    ///
    /// - `RoomNotFound` (with `room_id` detail) if the room doesn't exist
    /// - `NotParticipant` (with `room_id` and `user_id` details) if the sender
    ///   is not in the room
    /// - `DatabaseError` on persistence failure
    async fn append_message(
        &self,
        room_id: RoomId,
        sender_id: UserId,
        content: &MessageContent,
    ) -> Result<Message, DomainError>;

    /// Lists a room's full history, oldest first.
    async fn list_messages(&self, room_id: RoomId) -> Result<Vec<Message>, DomainError>;
}

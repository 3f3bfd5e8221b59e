//! PostgreSQL implementation of ChatRepository.
//!
//! Rooms are stored with their participants already canonicalized
//! (`participant_a < participant_b`), so a unique index on the pair enforces
//! one room per unordered pair.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::chat::{Message, MessageContent, ParticipantPair, Room};
use crate::domain::foundation::{DomainError, ErrorCode, MessageId, RoomId, Timestamp, UserId};
use crate::ports::ChatRepository;

/// PostgreSQL implementation of ChatRepository.
#[derive(Clone)]
pub struct PostgresChatRepository {
    pool: PgPool,
}

impl PostgresChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    async fn find_or_create_room(&self, participants: ParticipantPair) -> Result<Room, DomainError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query(
            r#"
            INSERT INTO rooms (participant_a, participant_b)
            VALUES ($1, $2)
            ON CONFLICT (participant_a, participant_b)
                DO UPDATE SET participant_a = rooms.participant_a
            RETURNING id, participant_a, participant_b, created_at
            "#,
        )
        .bind(participants.first().as_i64())
        .bind(participants.second().as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find or create room: {}", e),
            )
        })?;

        row_to_room(&row)
    }

    async fn find_room(&self, id: RoomId) -> Result<Option<Room>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, participant_a, participant_b, created_at
            FROM rooms
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch room: {}", e),
            )
        })?;

        row.as_ref().map(row_to_room).transpose()
    }

    async fn append_message(
        &self,
        room_id: RoomId,
        sender_id: UserId,
        content: &MessageContent,
    ) -> Result<Message, DomainError> {
        // Inserts only when the sender belongs to the room. The timestamp is
        // bumped past the room's latest message so history order matches
        // append order even if the clock steps backwards.
        let row = sqlx::query(
            r#"
            INSERT INTO messages (room_id, sender_id, content, created_at)
            SELECT r.id, $2, $3, GREATEST(
                clock_timestamp(),
                COALESCE(
                    (SELECT MAX(m.created_at) FROM messages m WHERE m.room_id = r.id)
                        + INTERVAL '1 microsecond',
                    clock_timestamp()
                )
            )
            FROM rooms r
            WHERE r.id = $1 AND $2 IN (r.participant_a, r.participant_b)
            RETURNING id, room_id, sender_id, content, created_at
            "#,
        )
        .bind(room_id.as_i64())
        .bind(sender_id.as_i64())
        .bind(content.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert message: {}", e),
            )
            .with_detail("room_id", room_id.to_string())
        })?;

        if let Some(row) = row {
            return row_to_message(&row);
        }

        // Nothing inserted: work out which precondition failed.
        match self.find_room(room_id).await? {
            None => Err(DomainError::new(
                ErrorCode::RoomNotFound,
                format!("Room not found: {}", room_id),
            )
            .with_detail("room_id", room_id.to_string())),
            Some(_) => Err(DomainError::new(
                ErrorCode::NotParticipant,
                format!("User {} is not in room {}", sender_id, room_id),
            )
            .with_detail("room_id", room_id.to_string())
            .with_detail("user_id", sender_id.to_string())),
        }
    }

    async fn list_messages(&self, room_id: RoomId) -> Result<Vec<Message>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, room_id, sender_id, content, created_at
            FROM messages
            WHERE room_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(room_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list messages: {}", e),
            )
        })?;

        rows.iter().map(row_to_message).collect()
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to read column {}: {}", name, e),
        )
    })
}

fn row_to_room(row: &PgRow) -> Result<Room, DomainError> {
    let id: i64 = column(row, "id")?;
    let a = UserId::new(column(row, "participant_a")?)?;
    let b = UserId::new(column(row, "participant_b")?)?;
    let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;

    Ok(Room::new(
        RoomId::new(id),
        ParticipantPair::new(a, b)?,
        Timestamp::from_datetime(created_at),
    ))
}

fn row_to_message(row: &PgRow) -> Result<Message, DomainError> {
    let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;

    Ok(Message {
        id: MessageId::new(column(row, "id")?),
        room_id: RoomId::new(column(row, "room_id")?),
        sender_id: UserId::new(column(row, "sender_id")?)?,
        content: MessageContent::from_persisted(column(row, "content")?),
        created_at: Timestamp::from_datetime(created_at),
    })
}

//! Per-room publish serialization.
//!
//! Each room gets its own `tokio::sync::Mutex`, which grants the lock in the
//! order callers queued for it. Holding a [`RoomTurn`] therefore gives the
//! holder exclusive, first-come-first-served access to one room while other
//! rooms proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::RoomId;

/// Hands out one turn at a time per room.
#[derive(Default)]
pub struct RoomSequencer {
    turns: Mutex<HashMap<RoomId, Slot>>,
}

/// A room's lock plus the number of callers holding or waiting for it.
#[derive(Default)]
struct Slot {
    lock: Arc<AsyncMutex<()>>,
    users: usize,
}

impl RoomSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until it is the caller's turn for `room_id`.
    ///
    /// Dropping the returned future before it resolves gives up the place in
    /// the queue and prunes the room if nobody else is holding or waiting.
    pub async fn acquire(&self, room_id: RoomId) -> RoomTurn<'_> {
        let lock = {
            let mut turns = self.turns.lock().unwrap_or_else(PoisonError::into_inner);
            let slot = turns.entry(room_id).or_default();
            slot.users += 1;
            Arc::clone(&slot.lock)
        };

        // Registered before the wait so cancellation still releases the slot
        let mut turn = RoomTurn {
            sequencer: self,
            room_id,
            guard: None,
        };
        turn.guard = Some(lock.lock_owned().await);
        turn
    }

    /// Number of rooms with a holder or waiters.
    pub fn active_rooms(&self) -> usize {
        self.turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn release(&self, room_id: RoomId) {
        let mut turns = self.turns.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = turns.get_mut(&room_id) {
            slot.users = slot.users.saturating_sub(1);
            if slot.users == 0 {
                turns.remove(&room_id);
            }
        }
    }
}

/// Exclusive access to one room; released on drop.
pub struct RoomTurn<'a> {
    sequencer: &'a RoomSequencer,
    room_id: RoomId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl RoomTurn<'_> {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }
}

impl Drop for RoomTurn<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.sequencer.release(self.room_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn turn_is_released_and_pruned_on_drop() {
        let sequencer = RoomSequencer::new();

        let turn = sequencer.acquire(RoomId::new(1)).await;
        assert_eq!(turn.room_id(), RoomId::new(1));
        assert_eq!(sequencer.active_rooms(), 1);

        drop(turn);
        assert_eq!(sequencer.active_rooms(), 0);
    }

    #[tokio::test]
    async fn different_rooms_do_not_block_each_other() {
        let sequencer = RoomSequencer::new();

        let _first = sequencer.acquire(RoomId::new(1)).await;
        let second = tokio::time::timeout(
            Duration::from_millis(100),
            sequencer.acquire(RoomId::new(2)),
        )
        .await;

        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn same_room_waits_for_current_holder() {
        let sequencer = RoomSequencer::new();

        let _held = sequencer.acquire(RoomId::new(1)).await;
        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            sequencer.acquire(RoomId::new(1)),
        )
        .await;

        assert!(blocked.is_err());
    }

    #[tokio::test]
    async fn waiters_are_served_in_arrival_order() {
        let sequencer = Arc::new(RoomSequencer::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        let held = sequencer.acquire(RoomId::new(7)).await;

        let mut tasks = Vec::new();
        for i in 0..5 {
            let sequencer = Arc::clone(&sequencer);
            let order = Arc::clone(&order);
            tasks.push(tokio::spawn(async move {
                let _turn = sequencer.acquire(RoomId::new(7)).await;
                order.lock().unwrap().push(i);
            }));
            // let each task reach the queue before spawning the next
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        drop(held);
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(sequencer.active_rooms(), 0);
    }

    #[tokio::test]
    async fn cancelled_waiter_does_not_leave_room_behind() {
        let sequencer = RoomSequencer::new();

        let held = sequencer.acquire(RoomId::new(3)).await;
        let mut waiter = Box::pin(sequencer.acquire(RoomId::new(3)));
        assert!(futures::poll!(&mut waiter).is_pending());

        // The holder leaves first while the waiter is still queued
        drop(held);
        assert_eq!(sequencer.active_rooms(), 1);

        drop(waiter);
        assert_eq!(sequencer.active_rooms(), 0);

        let again = tokio::time::timeout(
            Duration::from_millis(100),
            sequencer.acquire(RoomId::new(3)),
        )
        .await;
        assert!(again.is_ok());
    }
}

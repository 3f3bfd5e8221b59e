//! Two-party rooms and the canonical participant pair that identifies them.

use serde::Serialize;

use crate::domain::foundation::{RoomId, Timestamp, UserId, ValidationError};

/// Unordered pair of distinct participants, stored smaller id first.
///
/// Canonical order means `(a, b)` and `(b, a)` always name the same room,
/// whichever participant initiated contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ParticipantPair {
    first: UserId,
    second: UserId,
}

impl ParticipantPair {
    /// Builds the canonical pair, rejecting a user paired with themselves.
    pub fn new(a: UserId, b: UserId) -> Result<Self, ValidationError> {
        if a == b {
            return Err(ValidationError::invalid_format(
                "participants",
                "a room needs two distinct participants",
            ));
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { first, second })
    }

    /// The numerically smaller participant.
    pub fn first(&self) -> UserId {
        self.first
    }

    /// The numerically larger participant.
    pub fn second(&self) -> UserId {
        self.second
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.first == user || self.second == user
    }

    /// Returns the other participant, or `None` if `user` is not in the pair.
    pub fn peer_of(&self, user: UserId) -> Option<UserId> {
        if user == self.first {
            Some(self.second)
        } else if user == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

/// A persisted chat room between exactly two participants.
///
/// Rooms are created lazily on first contact and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    participants: ParticipantPair,
    created_at: Timestamp,
}

impl Room {
    /// Reconstitutes a room loaded from storage.
    pub fn new(id: RoomId, participants: ParticipantPair, created_at: Timestamp) -> Self {
        Self {
            id,
            participants,
            created_at,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn participants(&self) -> ParticipantPair {
        self.participants
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn is_participant(&self, user: UserId) -> bool {
        self.participants.contains(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn pair_puts_smaller_id_first() {
        let pair = ParticipantPair::new(user(9), user(4)).unwrap();
        assert_eq!(pair.first(), user(4));
        assert_eq!(pair.second(), user(9));
    }

    #[test]
    fn pair_rejects_same_participant_twice() {
        assert!(ParticipantPair::new(user(3), user(3)).is_err());
    }

    #[test]
    fn peer_of_returns_the_other_side() {
        let pair = ParticipantPair::new(user(1), user(2)).unwrap();
        assert_eq!(pair.peer_of(user(1)), Some(user(2)));
        assert_eq!(pair.peer_of(user(2)), Some(user(1)));
        assert_eq!(pair.peer_of(user(3)), None);
    }

    #[test]
    fn room_membership_follows_pair() {
        let pair = ParticipantPair::new(user(1), user(2)).unwrap();
        let room = Room::new(RoomId::new(10), pair, Timestamp::now());
        assert!(room.is_participant(user(1)));
        assert!(room.is_participant(user(2)));
        assert!(!room.is_participant(user(5)));
    }

    proptest! {
        #[test]
        fn pair_is_independent_of_argument_order(a in 1i64..10_000, b in 1i64..10_000) {
            prop_assume!(a != b);
            let forward = ParticipantPair::new(user(a), user(b)).unwrap();
            let backward = ParticipantPair::new(user(b), user(a)).unwrap();
            prop_assert_eq!(forward, backward);
            prop_assert!(forward.first() < forward.second());
        }
    }
}

//! Integration tests for the live chat flow.
//!
//! These tests drive `ConnectionHandler`s over in-process channels against the
//! in-memory store:
//! 1. Two participants see each other's messages, including their own echo
//! 2. Concurrent publishes reach every member in storage order, and a burst
//!    from one client is echoed back in full
//! 3. Failed or rejected publishes reach nobody
//! 4. Slow members are evicted without holding up the room

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{close_code, Message as WsMessage};
use futures::channel::mpsc as fmpsc;
use futures::future::join_all;
use futures::StreamExt;
use serde_json::{json, Value};

use pairchat::adapters::{
    ChatContext, ConnectionHandler, InMemoryChatRepository, RoomRegistry, ShutdownSignal,
};
use pairchat::application::{
    AuthorizeRoomAccessHandler, BroadcastCoordinator, GetRoomHistoryHandler, GetRoomHistoryQuery,
    PublishMessageCommand, ResolveRoomHandler, ResolveRoomQuery,
};
use pairchat::domain::chat::CloseReason;
use pairchat::domain::foundation::{RoomId, UserId};

// =============================================================================
// Test Infrastructure
// =============================================================================

const ALICE: i64 = 1;
const BOB: i64 = 2;

fn user(id: i64) -> UserId {
    UserId::new(id).unwrap()
}

struct Harness {
    repo: Arc<InMemoryChatRepository>,
    context: ChatContext,
    room_id: RoomId,
}

impl Harness {
    async fn new() -> Self {
        Self::with_repo(InMemoryChatRepository::new(), 16).await
    }

    async fn with_repo(repo: InMemoryChatRepository, queue_capacity: usize) -> Self {
        let repo = Arc::new(repo);
        let registry = Arc::new(RoomRegistry::new());
        let context = ChatContext {
            coordinator: Arc::new(BroadcastCoordinator::new(repo.clone(), registry.clone())),
            access: Arc::new(AuthorizeRoomAccessHandler::new(repo.clone())),
            registry,
            shutdown: ShutdownSignal::new(),
            outbound_queue_capacity: queue_capacity,
        };

        let resolved = ResolveRoomHandler::new(repo.clone())
            .handle(ResolveRoomQuery {
                user_id: user(ALICE),
                peer_id: user(BOB),
            })
            .await
            .unwrap();

        Self {
            repo,
            context,
            room_id: resolved.room.id(),
        }
    }

    async fn connect(&self, user_id: i64) -> Client {
        let handler = ConnectionHandler::connect(self.context.clone(), self.room_id, user(user_id))
            .await
            .unwrap();

        let (in_tx, in_rx) = fmpsc::unbounded();
        let (out_tx, out_rx) = fmpsc::unbounded();
        let task = tokio::spawn(handler.run(out_tx, in_rx));

        let mut client = Client {
            inbound: in_tx,
            outbound: out_rx,
            task,
        };
        let ready = client.next_json().await;
        assert_eq!(ready["ready"]["room_id"], self.room_id.as_i64());
        client
    }

    async fn publish(&self, sender: i64, text: &str) -> pairchat::application::PublishMessageResult {
        self.context
            .coordinator
            .handle(PublishMessageCommand {
                room_id: self.room_id,
                sender_id: user(sender),
                content: text.to_string(),
            })
            .await
            .unwrap()
    }

    async fn history(&self, reader: i64) -> Vec<(i64, String)> {
        GetRoomHistoryHandler::new(self.repo.clone())
            .handle(GetRoomHistoryQuery {
                room_id: self.room_id,
                user_id: user(reader),
            })
            .await
            .unwrap()
            .iter()
            .map(|m| (m.sender_id.as_i64(), m.text().to_string()))
            .collect()
    }
}

struct Client {
    inbound: fmpsc::UnboundedSender<Result<WsMessage, Infallible>>,
    outbound: fmpsc::UnboundedReceiver<WsMessage>,
    task: tokio::task::JoinHandle<CloseReason>,
}

impl Client {
    fn send(&self, value: Value) {
        self.inbound
            .unbounded_send(Ok(WsMessage::Text(value.to_string())))
            .unwrap();
    }

    async fn next_json(&mut self) -> Value {
        let frame = tokio::time::timeout(Duration::from_secs(2), self.outbound.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection closed");
        match frame {
            WsMessage::Text(text) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    async fn assert_silent(&mut self) {
        let next = tokio::time::timeout(Duration::from_millis(50), self.outbound.next()).await;
        assert!(next.is_err(), "expected no frame, got {:?}", next);
    }

    async fn close(self) -> CloseReason {
        drop(self.inbound);
        self.task.await.unwrap()
    }
}

// =============================================================================
// Conversation
// =============================================================================

#[tokio::test]
async fn two_participants_exchange_messages() {
    let harness = Harness::new().await;
    let mut alice = harness.connect(ALICE).await;
    let mut bob = harness.connect(BOB).await;

    alice.send(json!({"message": "hello"}));
    let expected = json!({"message": "hello", "user_id": ALICE});
    assert_eq!(alice.next_json().await, expected);
    assert_eq!(bob.next_json().await, expected);

    bob.send(json!({"message": "hi"}));
    let expected = json!({"message": "hi", "user_id": BOB});
    assert_eq!(alice.next_json().await, expected);
    assert_eq!(bob.next_json().await, expected);

    // A third connection opened afterwards gets nothing live and reads both from history
    let mut third = harness.connect(ALICE).await;
    third.assert_silent().await;
    assert_eq!(
        harness.history(ALICE).await,
        vec![(ALICE, "hello".to_string()), (BOB, "hi".to_string())]
    );
}

#[tokio::test]
async fn late_joiner_reads_history_then_receives_new_messages() {
    let harness = Harness::new().await;
    harness.publish(ALICE, "before").await;

    let mut second_tab = harness.connect(ALICE).await;
    assert_eq!(harness.history(ALICE).await, vec![(ALICE, "before".to_string())]);

    harness.publish(BOB, "after").await;
    assert_eq!(second_tab.next_json().await["message"], "after");
}

#[tokio::test]
async fn resolving_the_same_pair_returns_the_same_room() {
    let harness = Harness::new().await;
    harness.publish(ALICE, "hello").await;

    let resolved = ResolveRoomHandler::new(harness.repo.clone())
        .handle(ResolveRoomQuery {
            user_id: user(BOB),
            peer_id: user(ALICE),
        })
        .await
        .unwrap();

    assert_eq!(resolved.room.id(), harness.room_id);
    assert_eq!(resolved.history.len(), 1);
    assert_eq!(harness.repo.room_count().await, 1);
}

// =============================================================================
// Ordering
// =============================================================================

#[tokio::test]
async fn concurrent_publishes_arrive_in_storage_order_everywhere() {
    let harness = Harness::with_repo(
        InMemoryChatRepository::new().with_append_delay(Duration::from_millis(2)),
        64,
    )
    .await;
    let mut alice = harness.connect(ALICE).await;
    let mut bob = harness.connect(BOB).await;

    let publishes = (0..20).map(|i| {
        let sender = if i % 2 == 0 { ALICE } else { BOB };
        let text = format!("message {}", i);
        let coordinator = harness.context.coordinator.clone();
        let room_id = harness.room_id;
        async move {
            coordinator
                .handle(PublishMessageCommand {
                    room_id,
                    sender_id: user(sender),
                    content: text,
                })
                .await
                .unwrap()
        }
    });
    join_all(publishes).await;

    let stored: Vec<String> = harness
        .history(BOB)
        .await
        .into_iter()
        .map(|(_, text)| text)
        .collect();
    assert_eq!(stored.len(), 20);

    let mut seen_by_alice = Vec::new();
    let mut seen_by_bob = Vec::new();
    for _ in 0..20 {
        seen_by_alice.push(alice.next_json().await["message"].as_str().unwrap().to_string());
        seen_by_bob.push(bob.next_json().await["message"].as_str().unwrap().to_string());
    }

    assert_eq!(seen_by_alice, stored);
    assert_eq!(seen_by_bob, stored);
}

#[tokio::test]
async fn sender_burst_beyond_queue_capacity_is_fully_echoed() {
    let harness = Harness::with_repo(InMemoryChatRepository::new(), 8).await;
    let mut alice = harness.connect(ALICE).await;

    for i in 0..300 {
        alice.send(json!({"message": format!("m{}", i)}));
    }

    for i in 0..300 {
        let frame = alice.next_json().await;
        assert_eq!(frame, json!({"message": format!("m{}", i), "user_id": ALICE}));
    }
    assert!(!alice.task.is_finished());
    assert_eq!(harness.context.registry.member_count(harness.room_id).await, 1);
    assert_eq!(harness.repo.message_count().await, 300);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn empty_message_is_rejected_and_not_stored() {
    let harness = Harness::new().await;
    let mut alice = harness.connect(ALICE).await;
    let mut bob = harness.connect(BOB).await;

    alice.send(json!({"message": ""}));

    assert_eq!(alice.next_json().await["error"]["code"], "VALIDATION_FAILED");
    bob.assert_silent().await;
    assert_eq!(harness.repo.message_count().await, 0);
}

#[tokio::test]
async fn persistence_failure_reaches_only_the_sender() {
    let harness = Harness::new().await;
    let mut alice = harness.connect(ALICE).await;
    let mut bob = harness.connect(BOB).await;

    harness.repo.set_failing(true);
    alice.send(json!({"message": "lost"}));

    assert_eq!(alice.next_json().await["error"]["code"], "DATABASE_ERROR");
    bob.assert_silent().await;
    assert_eq!(harness.repo.message_count().await, 0);

    // The room keeps working once the store recovers
    harness.repo.set_failing(false);
    alice.send(json!({"message": "back"}));
    assert_eq!(alice.next_json().await["message"], "back");
    assert_eq!(bob.next_json().await["message"], "back");
}

#[tokio::test]
async fn member_leaving_mid_publish_is_skipped() {
    let harness = Harness::with_repo(
        InMemoryChatRepository::new().with_append_delay(Duration::from_millis(100)),
        16,
    )
    .await;
    let mut alice = harness.connect(ALICE).await;
    let bob = harness.connect(BOB).await;

    let coordinator = harness.context.coordinator.clone();
    let room_id = harness.room_id;
    let publish = tokio::spawn(async move {
        coordinator
            .handle(PublishMessageCommand {
                room_id,
                sender_id: user(ALICE),
                content: "still delivered".to_string(),
            })
            .await
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(bob.close().await, CloseReason::RemoteClosed);

    let result = publish.await.unwrap().unwrap();
    assert_eq!(result.report.recipients, 1);
    assert_eq!(result.report.delivered, 1);
    assert_eq!(alice.next_json().await["message"], "still delivered");
    assert_eq!(harness.repo.message_count().await, 1);
}

#[tokio::test]
async fn leaving_twice_is_harmless() {
    let harness = Harness::new().await;
    let alice = harness.connect(ALICE).await;
    let registry = harness.context.registry.clone();
    let room_id = harness.room_id;

    let connection_id = registry.members(room_id).await[0].id();
    assert!(registry.leave(room_id, connection_id).await);
    assert!(!registry.leave(room_id, connection_id).await);

    // Losing its registry slot ends the connection; its own leave is a no-op
    assert_eq!(alice.task.await.unwrap(), CloseReason::Evicted);
    assert_eq!(registry.connection_count().await, 0);
}

#[tokio::test]
async fn slow_member_is_evicted_with_policy_close() {
    let harness = Harness::with_repo(InMemoryChatRepository::new(), 1).await;
    let mut alice = harness.connect(ALICE).await;

    // Bob's socket accepts one frame and then stops reading
    let handler = ConnectionHandler::connect(harness.context.clone(), harness.room_id, user(BOB))
        .await
        .unwrap();
    let (_bob_in, in_rx) = fmpsc::unbounded::<Result<WsMessage, Infallible>>();
    let (out_tx, mut bob_out) = fmpsc::channel::<WsMessage>(0);
    let bob_task = tokio::spawn(handler.run(out_tx, in_rx));

    let ready = tokio::time::timeout(Duration::from_secs(2), bob_out.next())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(ready, WsMessage::Text(_)));

    let mut evicted = 0;
    for i in 0..5 {
        let result = harness.publish(ALICE, &format!("burst {}", i)).await;
        evicted += result.report.evicted;
        assert_eq!(alice.next_json().await["message"], format!("burst {}", i));
        tokio::task::yield_now().await;
    }
    assert_eq!(evicted, 1);

    let mut close = None;
    while let Ok(Some(frame)) = tokio::time::timeout(Duration::from_secs(2), bob_out.next()).await {
        if let WsMessage::Close(frame) = frame {
            close = frame;
            break;
        }
    }
    assert_eq!(close.map(|f| f.code), Some(close_code::POLICY));
    assert_eq!(bob_task.await.unwrap(), CloseReason::Evicted);

    // Alice was never held up and is still a member
    assert_eq!(harness.context.registry.member_count(harness.room_id).await, 1);
}

#[tokio::test]
async fn shutdown_closes_every_connection() {
    let harness = Harness::new().await;
    let alice = harness.connect(ALICE).await;
    let bob = harness.connect(BOB).await;

    harness.context.shutdown.trigger();

    assert_eq!(alice.task.await.unwrap(), CloseReason::ServerShutdown);
    assert_eq!(bob.task.await.unwrap(), CloseReason::ServerShutdown);
    assert_eq!(harness.context.registry.connection_count().await, 0);
}

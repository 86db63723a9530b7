//! Local Session Registry.
//!
//! Tracks the live WebSocket connections accepted by *this* node, grouped by
//! room. Nothing here is persisted or shared with other nodes; the registry is
//! not a presence directory. Messages from every node reach it through the
//! broadcast subscriber and are delivered with [`LocalSessionRegistry::broadcast_local`].

use std::collections::HashMap;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::{domain::ChatMessage, infrastructure::dto::websocket::ChatMessageEvent};

/// Handle to one live connection.
///
/// Delivery goes through an unbounded channel drained by the connection's
/// writer task; the handle is dead once that task has dropped the receiver.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: Uuid,
    participant: String,
    sender: mpsc::UnboundedSender<String>,
}

impl SessionHandle {
    pub fn new(participant: impl Into<String>, sender: mpsc::UnboundedSender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            participant: participant.into(),
            sender,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn participant(&self) -> &str {
        &self.participant
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn deliver(&self, payload: String) -> Result<(), mpsc::error::SendError<String>> {
        self.sender.send(payload)
    }
}

/// Per-node registry of live connections: room name → connection id → handle
pub struct LocalSessionRegistry {
    node_id: String,
    rooms: RwLock<HashMap<String, HashMap<Uuid, SessionHandle>>>,
}

impl LocalSessionRegistry {
    /// Create an empty registry for the given node
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            rooms: RwLock::new(HashMap::new()),
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Register a connection under a room, creating the room entry if needed
    pub async fn add_connection(&self, room: &str, handle: SessionHandle) {
        let mut rooms = self.rooms.write().await;
        let connections = rooms.entry(room.to_string()).or_default();
        let id = handle.id();
        let participant = handle.participant().to_string();
        connections.insert(id, handle);
        tracing::info!(
            "Session {} ({}) added to room '{}' on node {}. Local connections: {}",
            id,
            participant,
            room,
            self.node_id,
            connections.len()
        );
    }

    /// Unregister a connection. Empty room entries are dropped.
    ///
    /// Returns whether the connection was registered.
    pub async fn remove_connection(&self, room: &str, id: Uuid) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(connections) = rooms.get_mut(room) else {
            return false;
        };
        let removed = connections.remove(&id).is_some();
        let remaining = connections.len();
        if remaining == 0 {
            rooms.remove(room);
        }
        tracing::info!(
            "Session {} removed from room '{}' on node {}. Local connections: {}",
            id,
            room,
            self.node_id,
            remaining
        );
        removed
    }

    /// Deliver a message to every local connection of the room.
    ///
    /// The message is serialized once. Handles are snapshotted under the read
    /// lock and written to after it is released. Closed connections and
    /// connections whose delivery fails are pruned in the same pass; one
    /// failure does not affect delivery to the others.
    ///
    /// Returns the number of connections the message was handed to.
    pub async fn broadcast_local(&self, room: &str, message: &ChatMessage) -> usize {
        let handles: Vec<SessionHandle> = {
            let rooms = self.rooms.read().await;
            match rooms.get(room) {
                Some(connections) if !connections.is_empty() => {
                    connections.values().cloned().collect()
                }
                _ => {
                    tracing::debug!(
                        "No local sessions for room '{}' on node {}",
                        room,
                        self.node_id
                    );
                    return 0;
                }
            }
        };

        let payload = match serde_json::to_string(&ChatMessageEvent::from_domain(room, message)) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to serialize message for room '{}': {}", room, e);
                return 0;
            }
        };

        tracing::info!(
            "Broadcasting to {} local sessions in room '{}' on node {}",
            handles.len(),
            room,
            self.node_id
        );

        let mut delivered = 0;
        let mut dead = Vec::new();
        for handle in &handles {
            if handle.is_closed() {
                tracing::debug!("Pruning closed session {} from room '{}'", handle.id(), room);
                dead.push(handle.id());
                continue;
            }
            match handle.deliver(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!("Failed to send to session {}: {}", handle.id(), e);
                    dead.push(handle.id());
                }
            }
        }

        if !dead.is_empty() {
            self.prune(room, &dead).await;
        }
        delivered
    }

    /// Number of local connections registered for the room
    pub async fn connection_count(&self, room: &str) -> usize {
        let rooms = self.rooms.read().await;
        rooms.get(room).map_or(0, HashMap::len)
    }

    /// Number of rooms with at least one local connection
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    async fn prune(&self, room: &str, dead: &[Uuid]) {
        let mut rooms = self.rooms.write().await;
        if let Some(connections) = rooms.get_mut(room) {
            for id in dead {
                connections.remove(id);
            }
            if connections.is_empty() {
                rooms.remove(room);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageContent, ParticipantName, Timestamp};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 接続の登録・解除（空になったルームのエントリは残らない）
    // - ローカル配信が対象ルームの全接続に届き、他のルームには届かないこと
    // - 切断済みの接続が配信時に取り除かれること（自己修復）
    // ========================================

    fn message(content: &str) -> ChatMessage {
        ChatMessage::new(
            ParticipantName::new("alice".to_string()).unwrap(),
            MessageContent::new(content.to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    fn connection(participant: &str) -> (SessionHandle, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SessionHandle::new(participant, tx), rx)
    }

    #[tokio::test]
    async fn test_add_and_remove_connection() {
        // テスト項目: 接続を登録・解除でき、空になったルームのエントリは削除される
        // given (前提条件):
        let registry = LocalSessionRegistry::new("node-a");
        let (handle, _rx) = connection("alice");
        let id = handle.id();
        registry.add_connection("lobby", handle).await;
        assert_eq!(registry.connection_count("lobby").await, 1);

        // when (操作):
        let removed = registry.remove_connection("lobby", id).await;

        // then (期待する結果):
        assert!(removed);
        assert_eq!(registry.connection_count("lobby").await, 0);
        assert_eq!(registry.room_count().await, 0);
        assert!(!registry.remove_connection("lobby", id).await);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_only_the_room() {
        // テスト項目: ローカル配信は対象ルームの全接続に届き、他のルームの接続には届かない
        // given (前提条件):
        let registry = LocalSessionRegistry::new("node-a");
        let (alice, mut alice_rx) = connection("alice");
        let (bob, mut bob_rx) = connection("bob");
        let (carol, mut carol_rx) = connection("carol");
        registry.add_connection("lobby", alice).await;
        registry.add_connection("lobby", bob).await;
        registry.add_connection("random", carol).await;

        // when (操作):
        let delivered = registry.broadcast_local("lobby", &message("hi")).await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        for rx in [&mut alice_rx, &mut bob_rx] {
            let frame = rx.try_recv().unwrap();
            let event: ChatMessageEvent = serde_json::from_str(&frame).unwrap();
            assert_eq!(event.room, "lobby");
            assert_eq!(event.participant, "alice");
            assert_eq!(event.message, "hi");
            assert_eq!(event.timestamp, 1000);
        }
        assert!(carol_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_prunes_dead_connections() {
        // テスト項目: 配信に失敗した接続はその場で取り除かれ、他の接続への配信は継続される
        // given (前提条件):
        let registry = LocalSessionRegistry::new("node-a");
        let (alive, mut alive_rx) = connection("alice");
        let (dead, dead_rx) = connection("bob");
        let dead_id = dead.id();
        registry.add_connection("lobby", alive).await;
        registry.add_connection("lobby", dead).await;
        drop(dead_rx);

        // when (操作):
        let first = registry.broadcast_local("lobby", &message("one")).await;
        let second = registry.broadcast_local("lobby", &message("two")).await;

        // then (期待する結果):
        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(registry.connection_count("lobby").await, 1);
        assert!(!registry.remove_connection("lobby", dead_id).await);
        assert!(alive_rx.try_recv().unwrap().contains("one"));
        assert!(alive_rx.try_recv().unwrap().contains("two"));
    }

    #[tokio::test]
    async fn test_broadcast_drops_room_when_all_connections_dead() {
        // テスト項目: 全ての接続が切断済みの場合、ルームのエントリごと削除される
        // given (前提条件):
        let registry = LocalSessionRegistry::new("node-a");
        let (handle, rx) = connection("alice");
        registry.add_connection("lobby", handle).await;
        drop(rx);

        // when (操作):
        let delivered = registry.broadcast_local("lobby", &message("hi")).await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
        assert_eq!(registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_to_unknown_room_is_noop() {
        // テスト項目: 接続の無いルームへの配信は何もしない
        // given (前提条件):
        let registry = LocalSessionRegistry::new("node-a");

        // when (操作):
        let delivered = registry.broadcast_local("ghost", &message("hi")).await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_concurrent_add_and_broadcast() {
        // テスト項目: 登録と配信が並行して行われても整合性が保たれる
        // given (前提条件):
        let registry = std::sync::Arc::new(LocalSessionRegistry::new("node-a"));
        let mut receivers = Vec::new();
        let mut tasks = Vec::new();

        // when (操作):
        for i in 0..20 {
            let (handle, rx) = connection(&format!("user{i}"));
            receivers.push(rx);
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry.add_connection("lobby", handle).await;
                registry.broadcast_local("lobby", &message("ping")).await
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(registry.connection_count("lobby").await, 20);
        for rx in receivers.iter_mut() {
            // 自分の登録後の配信は少なくとも 1 回届いている
            assert!(rx.try_recv().is_ok());
        }
    }
}

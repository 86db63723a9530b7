//! In-process test servers.
//!
//! Each `TestServer` is a full node (router, session registry, broadcast
//! subscriber) on an ephemeral port. Several servers can share one in-memory
//! store to behave like a multi-node deployment.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use hiroba_server::{
    infrastructure::store::InMemorySharedStore,
    ui::{Node, state::AppState},
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

pub struct TestServer {
    addr: SocketAddr,
    pub store: Arc<InMemorySharedStore>,
    pub state: Arc<AppState>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a node with its own store
    pub async fn start() -> Self {
        Self::start_with_store(Arc::new(InMemorySharedStore::new()), "test-node").await
    }

    /// Start a node on top of an existing store
    pub async fn start_with_store(store: Arc<InMemorySharedStore>, node_id: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let node = Node::start(listener, store.clone(), node_id)
            .await
            .expect("Failed to start node");
        let addr = node.local_addr().expect("Failed to read local address");
        let state = node.state();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = node.serve(shutdown).await {
                eprintln!("test server error: {e}");
            }
        });

        Self {
            addr,
            store,
            state,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn rooms_url(&self) -> String {
        format!("{}/api/chatapp/chatrooms", self.base_url())
    }

    pub fn ws_url(&self, room: &str, participant: &str) -> String {
        self.ws_url_with_query(&format!("room={room}&participant={participant}"))
    }

    pub fn ws_url_with_query(&self, query: &str) -> String {
        format!("ws://{}/ws?{query}", self.addr)
    }

    /// Create a room and join the participants through the HTTP API
    pub async fn room_with(&self, room: &str, participants: &[&str]) {
        let client = reqwest::Client::new();
        let response = client
            .post(self.rooms_url())
            .json(&serde_json::json!({"roomName": room}))
            .send()
            .await
            .expect("Failed to create room");
        assert_eq!(response.status(), 200);

        for participant in participants {
            let response = client
                .post(format!("{}/{room}/join", self.rooms_url()))
                .json(&serde_json::json!({"participant": participant}))
                .send()
                .await
                .expect("Failed to join room");
            assert_eq!(response.status(), 200);
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.abort();
    }
}

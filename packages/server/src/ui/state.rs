//! Server state shared by the handlers.

use std::sync::Arc;

use serde::Deserialize;

use crate::{
    domain::{MessagePublisher, MessageRepository, RoomRepository},
    infrastructure::{
        broadcast::StoreMessagePublisher,
        repository::{StoreMessageRepository, StoreRoomRepository},
        session::LocalSessionRegistry,
        store::SharedStore,
    },
};

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    pub room: Option<String>,
    pub participant: Option<String>,
}

/// Shared application state
pub struct AppState {
    /// Room Registry
    pub rooms: Arc<dyn RoomRepository>,
    /// Message Log
    pub messages: Arc<dyn MessageRepository>,
    /// Broadcast Publisher
    pub publisher: Arc<dyn MessagePublisher>,
    /// Live connections of this node
    pub sessions: Arc<LocalSessionRegistry>,
}

impl AppState {
    /// Wire the store-backed repositories and an empty session registry
    pub fn new(store: Arc<dyn SharedStore>, node_id: impl Into<String>) -> Self {
        Self {
            rooms: Arc::new(StoreRoomRepository::new(store.clone())),
            messages: Arc::new(StoreMessageRepository::new(store.clone())),
            publisher: Arc::new(StoreMessagePublisher::new(store)),
            sessions: Arc::new(LocalSessionRegistry::new(node_id)),
        }
    }
}

//! Broadcast Publisher backed by the shared store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{ChatMessage, MessagePublisher, RepositoryError},
    infrastructure::store::{SharedStore, keys::channel_key},
};

/// Publishes messages on `chatroom:{room}:channel`
pub struct StoreMessagePublisher {
    store: Arc<dyn SharedStore>,
}

impl StoreMessagePublisher {
    pub fn new(store: Arc<dyn SharedStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MessagePublisher for StoreMessagePublisher {
    async fn publish(&self, room: &str, message: &ChatMessage) -> Result<u64, RepositoryError> {
        let payload = serde_json::to_string(message)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let channel = channel_key(room);
        let receivers = self.store.publish(&channel, payload).await?;
        tracing::info!(
            "Message published to channel {} ({} subscribers)",
            channel,
            receivers
        );
        Ok(receivers)
    }
}

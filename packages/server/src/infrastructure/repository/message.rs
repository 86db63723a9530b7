//! Message Log 実装
//!
//! ルームごとのメッセージ履歴を Shared Store のリストとして保持します。
//! 追加は末尾のみ（append-only）で、読み出しは常に追加順です。
//! デコードできないエントリは個別にスキップし、ログに記録します。

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{ChatMessage, MessageRepository, RepositoryError},
    infrastructure::store::{SharedStore, keys::messages_key},
};

/// Shared Store を使った Message Log
pub struct StoreMessageRepository {
    store: Arc<dyn SharedStore>,
}

impl StoreMessageRepository {
    /// 新しい StoreMessageRepository を作成
    pub fn new(store: Arc<dyn SharedStore>) -> Self {
        Self { store }
    }

    async fn read_range(
        &self,
        room: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let entries = self
            .store
            .list_range(&messages_key(room), start, stop)
            .await?;
        Ok(decode_entries(room, entries))
    }
}

/// Decode log entries, skipping the ones that fail to deserialize.
fn decode_entries(room: &str, entries: Vec<String>) -> Vec<ChatMessage> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_str::<ChatMessage>(&entry) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed message in room '{}': {} ({})",
                    room,
                    entry,
                    e
                );
                None
            }
        })
        .collect()
}

#[async_trait]
impl MessageRepository for StoreMessageRepository {
    async fn append(&self, room: &str, message: &ChatMessage) -> Result<(), RepositoryError> {
        let entry = serde_json::to_string(message)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let len = self.store.list_push(&messages_key(room), entry).await?;
        tracing::debug!("Appended message to room '{}' (log length: {})", room, len);
        Ok(())
    }

    async fn tail(&self, room: &str, limit: i64) -> Result<Vec<ChatMessage>, RepositoryError> {
        if limit < 1 {
            return Err(RepositoryError::InvalidArgument(
                "Limit must be greater than 0".to_string(),
            ));
        }
        self.read_range(room, -limit, -1).await
    }

    async fn all(&self, room: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.read_range(room, 0, -1).await
    }

    async fn page(
        &self,
        room: &str,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        if offset < 0 {
            return Err(RepositoryError::InvalidArgument(
                "Offset must be non-negative".to_string(),
            ));
        }
        match limit {
            Some(limit) if limit > 0 => {
                self.read_range(room, offset, offset.saturating_add(limit - 1))
                    .await
            }
            _ => self.all(room).await,
        }
    }

    async fn count(&self, room: &str) -> Result<u64, RepositoryError> {
        Ok(self.store.list_len(&messages_key(room)).await?)
    }
}

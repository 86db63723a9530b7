//! Redis Shared Store 実装
//!
//! 複数ノード構成で使用する `SharedStore` の実装。通常のコマンドは
//! ConnectionManager を共有し、接続が切れた場合は自動で再接続します。
//! パターン購読は購読ごとに専用の Pub/Sub 接続を張ってバックグラウンド
//! タスクで転送します。Pub/Sub 接続が切れると購読は閉じるので、
//! 再購読は呼び出し側（BroadcastSubscriber）が行います。

use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::StreamExt;
use redis::{AsyncCommands, Client, RedisError, aio::ConnectionManager};
use tokio::sync::mpsc;

use super::{SharedStore, StoreError, StoreMessage, Subscription};

impl From<RedisError> for StoreError {
    fn from(err: RedisError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Redis Shared Store 実装
pub struct RedisSharedStore {
    client: Client,
    connection: ConnectionManager,
}

impl RedisSharedStore {
    /// Connect to Redis.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis URL (e.g. `redis://127.0.0.1:6379`)
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client.clone()).await?;
        tracing::info!("Connected to Redis at {}", url);
        Ok(Self { client, connection })
    }

    fn conn(&self) -> ConnectionManager {
        self.connection.clone()
    }
}

#[async_trait]
impl SharedStore for RedisSharedStore {
    async fn hash_set_all(
        &self,
        key: &str,
        fields: Vec<(String, String)>,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let _: () = conn.hset_multiple(key, fields.as_slice()).await?;
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.conn();
        let hash: HashMap<String, String> = conn.hgetall(key).await?;
        Ok(hash)
    }

    async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> Result<i64, StoreError> {
        let mut conn = self.conn();
        let value: i64 = conn.hincr(key, field, delta).await?;
        Ok(value)
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn();
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn();
        let added: i64 = conn.sadd(key, member).await?;
        Ok(added > 0)
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn();
        let removed: i64 = conn.srem(key, member).await?;
        Ok(removed > 0)
    }

    async fn set_is_member(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn();
        let is_member: bool = conn.sismember(key, member).await?;
        Ok(is_member)
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn();
        let members: Vec<String> = conn.smembers(key).await?;
        Ok(members)
    }

    async fn list_push(&self, key: &str, value: String) -> Result<u64, StoreError> {
        let mut conn = self.conn();
        let len: u64 = conn.rpush(key, value).await?;
        Ok(len)
    }

    async fn list_range(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn();
        let values: Vec<String> = conn.lrange(key, start as isize, stop as isize).await?;
        Ok(values)
    }

    async fn list_len(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.conn();
        let len: u64 = conn.llen(key).await?;
        Ok(len)
    }

    async fn delete(&self, keys: Vec<String>) -> Result<u64, StoreError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn();
        let removed: u64 = conn.del(keys).await?;
        Ok(removed)
    }

    async fn publish(&self, channel: &str, payload: String) -> Result<u64, StoreError> {
        let mut conn = self.conn();
        let receivers: u64 = conn.publish(channel, payload).await?;
        Ok(receivers)
    }

    async fn subscribe_pattern(&self, pattern: &str) -> Result<Subscription, StoreError> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| StoreError::Subscription(e.to_string()))?;
        pubsub
            .psubscribe(pattern)
            .await
            .map_err(|e| StoreError::Subscription(e.to_string()))?;
        tracing::info!("Subscribed to Redis pattern '{}'", pattern);

        let (sender, receiver) = mpsc::unbounded_channel();
        let pattern = pattern.to_string();
        tokio::spawn(async move {
            let mut messages = Box::pin(pubsub.into_on_message());
            while let Some(msg) = messages.next().await {
                let channel = msg.get_channel_name().to_string();
                let payload: String = match msg.get_payload() {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!("Non-string payload on channel '{}': {}", channel, e);
                        continue;
                    }
                };
                if sender.send(StoreMessage { channel, payload }).is_err() {
                    // Subscription dropped by its owner
                    break;
                }
            }
            tracing::warn!("Redis subscription for pattern '{}' ended", pattern);
        });

        Ok(Subscription::new(receiver))
    }
}

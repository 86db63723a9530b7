//! Shared store port and implementations.
//!
//! Every node talks to the same store. It is the single source of truth for
//! room existence, membership and message history, and carries the
//! publish/subscribe traffic between nodes. Only the primitives the chat
//! core needs are exposed: hashes, sets, lists and pattern pub/sub.

pub mod inmemory;
pub mod keys;
pub mod redis_store;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

pub use inmemory::InMemorySharedStore;
pub use redis_store::RedisSharedStore;

/// Errors raised by shared store implementations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Connection or command failure
    #[error("store operation failed: {0}")]
    Unavailable(String),

    /// The key holds a value of another type
    #[error("wrong type for key '{0}'")]
    WrongType(String),

    /// Subscribing to a channel pattern failed
    #[error("subscription failed: {0}")]
    Subscription(String),
}

/// A message received from a channel subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreMessage {
    /// Concrete channel the message was published on
    pub channel: String,
    /// Raw payload
    pub payload: String,
}

/// Receiving end of a pattern subscription.
///
/// The stream ends when the underlying connection goes away.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<StoreMessage>,
}

impl Subscription {
    pub fn new(receiver: mpsc::UnboundedReceiver<StoreMessage>) -> Self {
        Self { receiver }
    }

    /// Wait for the next message. `None` once the subscription is closed.
    pub async fn recv(&mut self) -> Option<StoreMessage> {
        self.receiver.recv().await
    }
}

/// Key/set/list/pub-sub primitives of the shared store.
///
/// Semantics follow Redis: empty sets and lists do not exist, list ranges
/// are inclusive and accept negative indexes counted from the tail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SharedStore: Send + Sync {
    /// Set several fields of a hash.
    async fn hash_set_all(&self, key: &str, fields: Vec<(String, String)>)
    -> Result<(), StoreError>;

    /// All fields of a hash (empty when the key is absent).
    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Increment an integer hash field, returning the new value.
    async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> Result<i64, StoreError>;

    /// Whether the key holds any value.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Add a member. Returns `false` if it was already present.
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// Remove a member. Returns `false` if it was not present.
    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    async fn set_is_member(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Append to the tail of a list, returning the new length.
    async fn list_push(&self, key: &str, value: String) -> Result<u64, StoreError>;

    /// Inclusive range `[start, stop]`; negative indexes count from the tail.
    async fn list_range(&self, key: &str, start: i64, stop: i64)
    -> Result<Vec<String>, StoreError>;

    async fn list_len(&self, key: &str) -> Result<u64, StoreError>;

    /// Delete keys in one batch, returning how many existed.
    async fn delete(&self, keys: Vec<String>) -> Result<u64, StoreError>;

    /// Publish a payload, returning the number of receiving subscriptions.
    async fn publish(&self, channel: &str, payload: String) -> Result<u64, StoreError>;

    /// Subscribe to every channel matching a glob pattern (`*`, `?`).
    async fn subscribe_pattern(&self, pattern: &str) -> Result<Subscription, StoreError>;
}

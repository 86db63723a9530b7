//! Repository ports.
//!
//! The domain defines what it needs from persistence and delivery; the
//! infrastructure layer implements these traits on top of the shared store
//! (dependency inversion). UseCases depend on `Arc<dyn Trait>` only.

use async_trait::async_trait;

use super::{
    entity::{ChatMessage, RoomMetadata},
    error::RepositoryError,
    value_object::{ParticipantName, RoomName},
};

/// Room Registry: room lifecycle and participant membership.
///
/// None of the check-then-act operations are atomic across nodes. Two nodes
/// creating the same room at the same time may both pass the existence check;
/// the later metadata write wins.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Create a room. Fails with `RoomAlreadyExists` if its metadata record exists.
    async fn create_room(&self, name: &RoomName) -> Result<RoomMetadata, RepositoryError>;

    /// Whether the room metadata record exists.
    async fn room_exists(&self, name: &str) -> Result<bool, RepositoryError>;

    /// Read the room metadata record.
    async fn get_room(&self, name: &str) -> Result<RoomMetadata, RepositoryError>;

    /// Add a participant to the membership set and increment the counter.
    async fn join_room(
        &self,
        name: &RoomName,
        participant: &ParticipantName,
    ) -> Result<(), RepositoryError>;

    /// Remove a participant. Returns whether a removal actually happened.
    async fn remove_participant(
        &self,
        name: &RoomName,
        participant: &ParticipantName,
    ) -> Result<bool, RepositoryError>;

    /// Membership gate. Returns `false` for missing rooms and blank names.
    async fn is_participant_in_room(
        &self,
        name: &str,
        participant: &str,
    ) -> Result<bool, RepositoryError>;

    /// Participants of the room, sorted by name.
    async fn get_participants(&self, name: &str) -> Result<Vec<String>, RepositoryError>;

    /// Delete metadata, membership and message log of the room.
    async fn remove_room(&self, name: &str) -> Result<(), RepositoryError>;
}

/// Message Log: append-only, ordered per-room history.
///
/// Callers are expected to check room existence first. Entries that fail to
/// decode are skipped (and logged), never returned.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a message to the tail of the room log.
    async fn append(&self, room: &str, message: &ChatMessage) -> Result<(), RepositoryError>;

    /// Last `limit` entries in chronological order. `limit` must be >= 1.
    async fn tail(&self, room: &str, limit: i64) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// Every entry in chronological order.
    async fn all(&self, room: &str) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// `limit` entries starting at 0-based `offset` from the head.
    ///
    /// An absent or non-positive `limit` returns the whole log.
    async fn page(
        &self,
        room: &str,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// Number of entries in the log.
    async fn count(&self, room: &str) -> Result<u64, RepositoryError>;
}

/// Broadcast Publisher: best-effort real-time delivery to every node.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publish a message on the room channel. Returns the number of nodes
    /// that received it, as reported by the store.
    async fn publish(&self, room: &str, message: &ChatMessage) -> Result<u64, RepositoryError>;
}

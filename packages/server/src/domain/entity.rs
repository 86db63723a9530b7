//! Core domain models for the chat application.

use serde::{Deserialize, Serialize};

use super::value_object::{MessageContent, ParticipantName, RoomName, Timestamp};

/// Metadata record of a chat room.
///
/// The presence of this record in the shared store is what makes a room exist.
/// Membership and message history are stored separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMetadata {
    /// Room name (identity)
    pub name: RoomName,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
    /// Participant counter, maintained on join/leave
    pub participant_count: i64,
}

impl RoomMetadata {
    /// Create metadata for a brand new room
    pub fn new(name: RoomName, created_at: Timestamp) -> Self {
        Self {
            name,
            created_at,
            participant_count: 0,
        }
    }
}

/// A chat message as stored in the message log and carried over pub/sub.
///
/// The serialized form is `{"participant": ..., "message": ..., "timestamp": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender's participant name
    pub participant: ParticipantName,
    /// Message body
    #[serde(rename = "message")]
    pub content: MessageContent,
    /// Timestamp when the message was created
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(participant: ParticipantName, content: MessageContent, timestamp: Timestamp) -> Self {
        Self {
            participant,
            content,
            timestamp,
        }
    }

    /// Create a new chat message stamped with the given time, or now when absent
    pub fn stamped(
        participant: ParticipantName,
        content: MessageContent,
        timestamp: Option<Timestamp>,
    ) -> Self {
        Self::new(participant, content, timestamp.unwrap_or_else(Timestamp::now))
    }
}

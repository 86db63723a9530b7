//! WebSocket message DTOs for the chat application.

use serde::{Deserialize, Serialize};

use crate::domain::ChatMessage;

/// Message type enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    Chat,
    Error,
}

/// Chat message pushed to live connections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageEvent {
    pub r#type: MessageType,
    pub room: String,
    pub participant: String,
    pub message: String,
    /// Unix timestamp (milliseconds since epoch)
    pub timestamp: i64,
}

impl ChatMessageEvent {
    pub fn from_domain(room: &str, message: &ChatMessage) -> Self {
        Self {
            r#type: MessageType::Chat,
            room: room.to_string(),
            participant: message.participant.as_str().to_string(),
            message: message.content.as_str().to_string(),
            timestamp: message.timestamp.value(),
        }
    }
}

/// Error notification sent back to the connection that caused it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub r#type: MessageType,
    pub message: String,
}

impl ErrorEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::Error,
            message: message.into(),
        }
    }
}

/// Chat message sent by a client over its connection.
///
/// The sender is the participant the connection was admitted for.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundChatMessage {
    pub message: String,
}

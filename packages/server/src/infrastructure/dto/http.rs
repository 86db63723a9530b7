//! HTTP API request/response DTOs for the chat application.

use serde::{Deserialize, Serialize};

use hiroba_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{ChatMessage, RoomMetadata};

/// Create room request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_name: Option<String>,
}

/// Create room response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub message: String,
    pub room_id: String,
    pub status: String,
}

impl CreateRoomResponse {
    pub fn new(room_name: &str) -> Self {
        Self {
            message: format!("Chat room '{room_name}' created successfully."),
            room_id: room_name.to_string(),
            status: "success".to_string(),
        }
    }
}

/// Join room request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    pub participant: Option<String>,
}

/// Send message request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub participant: Option<String>,
    pub message: Option<String>,
    /// Unix timestamp in milliseconds; assigned by the server when absent
    pub timestamp: Option<i64>,
}

/// Query parameters of the message history endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Generic status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub message: String,
    pub status: String,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: "Success".to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: "Error".to_string(),
        }
    }
}

/// Leave room response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRoomResponse {
    pub removed: bool,
    pub status: String,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub status: u16,
    pub error: String,
    pub message: String,
}

/// Room detail for the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub room_name: String,
    pub created_at: Option<String>, // ISO 8601
    pub participant_count: i64,
    pub participants: Vec<String>,
    pub message_count: u64,
}

impl RoomDetailDto {
    pub fn new(metadata: &RoomMetadata, participants: Vec<String>, message_count: u64) -> Self {
        Self {
            room_name: metadata.name.as_str().to_string(),
            created_at: timestamp_to_jst_rfc3339(metadata.created_at.value()),
            participant_count: metadata.participant_count,
            participants,
            message_count,
        }
    }
}

/// Message entry of the history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub participant: String,
    pub message: String,
    /// Unix timestamp (milliseconds since epoch)
    pub timestamp: i64,
}

impl From<ChatMessage> for MessageDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            participant: message.participant.into_string(),
            message: message.content.into_string(),
            timestamp: message.timestamp.value(),
        }
    }
}

//! UseCase 層のエラー定義
//!
//! Repository / Value Object のエラーを UseCase の語彙に変換します。
//! UI 層は [`UseCaseError::kind`] だけを見て HTTP ステータスを決めます。

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// Error category used by the UI layer to pick a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    BadRequest,
    Forbidden,
    StoreUnavailable,
    Serialization,
}

/// Errors returned by the HTTP-facing use cases
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UseCaseError {
    #[error("Chat room '{0}' does not exist")]
    RoomNotFound(String),

    #[error("Chat room '{0}' already exists")]
    RoomAlreadyExists(String),

    #[error("Participant '{participant}' has already joined room '{room}'")]
    ParticipantAlreadyJoined { room: String, participant: String },

    #[error("Participant '{participant}' is not a member of room '{room}'")]
    ParticipantNotMember { room: String, participant: String },

    /// Input rejected by validation
    #[error("{0}")]
    InvalidInput(String),

    #[error("Shared store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl UseCaseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UseCaseError::RoomNotFound(_) => ErrorKind::NotFound,
            UseCaseError::RoomAlreadyExists(_) | UseCaseError::ParticipantAlreadyJoined { .. } => {
                ErrorKind::AlreadyExists
            }
            UseCaseError::ParticipantNotMember { .. } => ErrorKind::Forbidden,
            UseCaseError::InvalidInput(_) => ErrorKind::BadRequest,
            UseCaseError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            UseCaseError::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

impl From<RepositoryError> for UseCaseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::RoomNotFound(room) => UseCaseError::RoomNotFound(room),
            RepositoryError::RoomAlreadyExists(room) => UseCaseError::RoomAlreadyExists(room),
            RepositoryError::ParticipantAlreadyJoined { room, participant } => {
                UseCaseError::ParticipantAlreadyJoined { room, participant }
            }
            RepositoryError::InvalidArgument(message) => UseCaseError::InvalidInput(message),
            RepositoryError::StoreUnavailable(message) => UseCaseError::StoreUnavailable(message),
            RepositoryError::Serialization(message) => UseCaseError::Serialization(message),
        }
    }
}

impl From<ValueObjectError> for UseCaseError {
    fn from(err: ValueObjectError) -> Self {
        UseCaseError::InvalidInput(err.to_string())
    }
}

/// WebSocket 接続時の受付（Admission）エラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Room and participant parameters are required")]
    MissingParameters,

    #[error("Room '{0}' does not exist")]
    RoomNotFound(String),

    #[error("Participant '{participant}' is not a member of room '{room}'")]
    ParticipantNotMember { room: String, participant: String },

    #[error("Shared store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<RepositoryError> for ConnectError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::RoomNotFound(room) => ConnectError::RoomNotFound(room),
            other => ConnectError::StoreUnavailable(other.to_string()),
        }
    }
}

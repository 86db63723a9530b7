//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// RoomName validation error
    #[error("Room name cannot be empty")]
    RoomNameEmpty,

    /// RoomName length out of bounds
    #[error("Room name must be {min}-{max} characters (got {actual})")]
    RoomNameLength {
        min: usize,
        max: usize,
        actual: usize,
    },

    /// RoomName contains characters outside `[a-zA-Z0-9_-]`
    #[error(
        "Invalid room name '{0}': only alphanumeric characters, underscore and hyphen are allowed"
    )]
    RoomNameInvalidCharacters(String),

    /// ParticipantName validation error
    #[error("Participant name cannot be empty")]
    ParticipantNameEmpty,

    /// ParticipantName too long error
    #[error("Participant name cannot exceed {max} characters (got {actual})")]
    ParticipantNameTooLong { max: usize, actual: usize },

    /// MessageContent validation error
    #[error("Message content cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("Message content cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors returned by the Room Registry, Message Log and Broadcast Publisher ports.
///
/// Shared store failures never leak out of the infrastructure layer as-is;
/// they are converted into `StoreUnavailable`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Room metadata record is absent
    #[error("Chat room '{0}' does not exist")]
    RoomNotFound(String),

    /// Room metadata record already present
    #[error("Chat room '{0}' already exists")]
    RoomAlreadyExists(String),

    /// Participant is already in the membership set
    #[error("Participant '{participant}' has already joined room '{room}'")]
    ParticipantAlreadyJoined { room: String, participant: String },

    /// Argument rejected by the port (e.g. non-positive tail limit)
    #[error("{0}")]
    InvalidArgument(String),

    /// The shared store operation itself failed
    #[error("Shared store unavailable: {0}")]
    StoreUnavailable(String),

    /// A value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, RoomMetadata};
pub use error::{RepositoryError, ValueObjectError};
pub use repository::{MessagePublisher, MessageRepository, RoomRepository};
pub use value_object::{MessageContent, ParticipantName, RoomName, Timestamp};

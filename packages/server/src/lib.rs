//! Hiroba: multi-node real-time chat rooms.
//!
//! Rooms, membership and message history live in a shared store. Every node
//! subscribes to the store's room channels and pushes messages to its own
//! WebSocket connections, so a message sent through any node reaches every
//! connected participant of the room.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::run;

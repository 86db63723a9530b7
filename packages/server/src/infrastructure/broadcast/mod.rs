//! Cross-node fanout over the shared store's publish/subscribe primitive.
//!
//! The publisher puts every accepted message on its room channel; each node
//! runs one subscriber that listens to all room channels and hands messages
//! to its own [`LocalSessionRegistry`](crate::infrastructure::session::LocalSessionRegistry).

pub mod publisher;
pub mod subscriber;

pub use publisher::StoreMessagePublisher;
pub use subscriber::{BroadcastSubscriber, DeliveryOutcome, DropReason};

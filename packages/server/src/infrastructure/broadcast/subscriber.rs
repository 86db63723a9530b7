//! Broadcast Subscriber: one per node.
//!
//! Subscribes once to every room channel and forwards each message to the
//! node's local session registry. Delivery is at-most-once and best effort:
//! events that cannot be routed or decoded are logged and dropped. The
//! message itself is still intact in the room's message log.

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::{
    domain::ChatMessage,
    infrastructure::{
        session::LocalSessionRegistry,
        store::{
            SharedStore, StoreError, StoreMessage, Subscription,
            keys::{ROOM_CHANNEL_PATTERN, room_from_channel},
        },
    },
};

/// Why an event was dropped
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DropReason {
    /// The channel is not a room channel
    #[error("cannot extract room name from channel '{0}'")]
    InvalidChannel(String),

    /// The payload is not a valid chat message
    #[error("malformed payload on channel '{channel}': {error}")]
    MalformedPayload { channel: String, error: String },
}

/// Result of handling one pub/sub event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Handed to `recipients` local connections of `room`
    Delivered { room: String, recipients: usize },
    Dropped(DropReason),
}

/// Bridges room channels to the local session registry
pub struct BroadcastSubscriber {
    store: Arc<dyn SharedStore>,
    sessions: Arc<LocalSessionRegistry>,
}

impl BroadcastSubscriber {
    pub fn new(store: Arc<dyn SharedStore>, sessions: Arc<LocalSessionRegistry>) -> Self {
        Self { store, sessions }
    }

    /// Route one event to the local connections of its room
    pub async fn handle_event(&self, event: &StoreMessage) -> DeliveryOutcome {
        let Some(room) = room_from_channel(&event.channel) else {
            return DeliveryOutcome::Dropped(DropReason::InvalidChannel(event.channel.clone()));
        };

        let message = match serde_json::from_str::<ChatMessage>(&event.payload) {
            Ok(message) => message,
            Err(e) => {
                return DeliveryOutcome::Dropped(DropReason::MalformedPayload {
                    channel: event.channel.clone(),
                    error: e.to_string(),
                });
            }
        };

        tracing::debug!(
            "Received message from '{}' for room '{}' on node {}",
            message.participant,
            room,
            self.sessions.node_id()
        );
        let recipients = self.sessions.broadcast_local(room, &message).await;
        DeliveryOutcome::Delivered {
            room: room.to_string(),
            recipients,
        }
    }

    /// Subscribe to all room channels and spawn the listener loop.
    ///
    /// The subscription is established before this returns, so messages
    /// published afterwards are not missed. When the subscription closes
    /// (the store connection was lost) the loop re-subscribes with
    /// exponential backoff. It ends only when the returned task is aborted.
    pub async fn start(self) -> Result<JoinHandle<()>, StoreError> {
        let subscription = self.store.subscribe_pattern(ROOM_CHANNEL_PATTERN).await?;
        tracing::info!(
            "Broadcast subscriber listening on '{}' for node {}",
            ROOM_CHANNEL_PATTERN,
            self.sessions.node_id()
        );

        Ok(tokio::spawn(self.listen(subscription)))
    }

    async fn listen(self, mut subscription: Subscription) {
        let mut backoff = Backoff::new();
        loop {
            while let Some(event) = subscription.recv().await {
                backoff.reset();
                match self.handle_event(&event).await {
                    DeliveryOutcome::Delivered { room, recipients } => {
                        tracing::debug!(
                            "Delivered message for room '{}' to {} local sessions",
                            room,
                            recipients
                        );
                    }
                    DeliveryOutcome::Dropped(reason) => {
                        tracing::error!("Dropped broadcast event: {}", reason);
                    }
                }
            }

            tracing::warn!("Broadcast subscription closed, re-subscribing");
            subscription = self.resubscribe(&mut backoff).await;
        }
    }

    async fn resubscribe(&self, backoff: &mut Backoff) -> Subscription {
        loop {
            let delay = backoff.next_delay();
            tokio::time::sleep(delay).await;
            match self.store.subscribe_pattern(ROOM_CHANNEL_PATTERN).await {
                Ok(subscription) => {
                    tracing::info!(
                        "Broadcast subscriber re-subscribed to '{}' for node {}",
                        ROOM_CHANNEL_PATTERN,
                        self.sessions.node_id()
                    );
                    return subscription;
                }
                Err(e) => {
                    tracing::error!(
                        "Re-subscribing to '{}' failed after {:?}: {}",
                        ROOM_CHANNEL_PATTERN,
                        delay,
                        e
                    );
                }
            }
        }
    }
}

/// Exponential delay between re-subscription attempts
#[derive(Debug)]
struct Backoff {
    next: Duration,
}

impl Backoff {
    const INITIAL: Duration = Duration::from_millis(100);
    const MAX: Duration = Duration::from_secs(5);

    fn new() -> Self {
        Self {
            next: Self::INITIAL,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(Self::MAX);
        delay
    }

    fn reset(&mut self) {
        self.next = Self::INITIAL;
    }
}

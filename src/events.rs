//! Lifecycle event publishing over a broadcast channel.
//!
//! Observability seam for embedders: every creation, join, and termination
//! publishes a named event with a JSON context. Publishing with no
//! subscribers is acceptable and not an error.

use serde_json::Value;
use tokio::sync::broadcast;

/// High-throughput publisher for giveaway lifecycle events
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<LifecycleEvent>,
}

/// Event that has been published
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    pub name: String,
    pub context: Value,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

/// Well-known event names
pub mod names {
    pub const GIVEAWAY_CREATED: &str = "giveaway.created";
    pub const GIVEAWAY_JOINED: &str = "giveaway.joined";
    pub const GIVEAWAY_ENDED: &str = "giveaway.ended";
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event with the given name and context
    pub fn publish(&self, event_name: impl Into<String>, context: Value) {
        let event = LifecycleEvent {
            name: event_name.into(),
            context,
            published_at: chrono::Utc::now(),
        };

        // send() errors only when there are no subscribers, which is fine:
        // events are fire-and-forget observability, not control flow.
        let _ = self.sender.send(event);
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1000)
    }
}

//! Broadcast channel for list events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Controllers and
//! the notification center publish [`ListEvent`]s; render layers subscribe.

use tokio::sync::broadcast;

use super::ListEvent;

/// Broadcast bus for [`ListEvent`]s.
///
/// When the ring buffer is full, the oldest events are dropped for lagging
/// receivers; a receiver that lags should re-read controller snapshots
/// instead of replaying events.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ListEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event. With no
    /// receivers the event is dropped.
    pub fn publish(&self, event: ListEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a receiver for all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

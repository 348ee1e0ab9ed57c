#![forbid(unsafe_code)]

use tokio::sync::broadcast;

use crate::Event;

/// Fan-out channel carrying ABR session events to any number of listeners.
///
/// Cloning the bus hands out another publishing handle onto the same channel.
/// A listener only sees events published after it subscribed; with nobody
/// listening an event is discarded.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// `capacity` events are retained per listener; zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Send an event, or anything convertible into one, to every listener.
    ///
    /// Never blocks, so it is safe on the thread that calls `decide`.
    pub fn publish<E: Into<Event>>(&self, event: E) {
        // Err only means nobody is listening.
        let _ = self.tx.send(event.into());
    }

    /// New listener. One that falls more than `capacity` events behind gets
    /// `RecvError::Lagged` once, then resumes at the oldest retained event.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

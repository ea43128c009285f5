//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from multiple sources (runners, runner set,
//! subscriber workers).
//!
//! ## Architecture
//! ```text
//! Publishers (many):                    Subscriber (one):
//!   Runner 1 ──┐
//!   Runner 2 ──┼──────► Bus ──────► subscriber_listener ────► SubscriberSet
//!   Runner N ──┤  (broadcast chan)     (in RunnerSet)
//!   Set     ──┘
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active subscribers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// Thin wrapper over [`tokio::sync::broadcast`] that provides a
/// `publish`/`subscribe` API. Multiple publishers can publish concurrently;
/// subscribers receive clones of each event.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately.
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity.
    ///
    /// Capacity is shared across all receivers; the minimum is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// If there are no receivers, the event is dropped and this still
    /// returns immediately.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    ///
    /// - Each call creates an **independent** receiver.
    /// - A receiver only gets events **sent after** it subscribes.
    /// - Slow receivers get `RecvError::Lagged(n)` and skip over missed items.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_subscriber_receives_published_events() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(Event::now(EventKind::IterationStarting).with_action("t"));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::IterationStarting);
        assert_eq!(ev.action.as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_does_not_block() {
        let bus = Bus::new(1);
        bus.publish(Event::now(EventKind::ShutdownRequested));
    }
}

//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`](crate::events::Event) to
//! multiple subscribers **without awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and reported (isolation).
//! - Delivery problems are observable: a dropped event publishes
//!   [`EventKind::SubscriberOverflow`](crate::EventKind::SubscriberOverflow)
//!   and a caught panic publishes
//!   [`EventKind::SubscriberPanicked`](crate::EventKind::SubscriberPanicked)
//!   on the bus. Delivery-problem events are never themselves re-reported,
//!   so a stuck subscriber cannot feed the bus with its own drop reports.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow (events are dropped for
//!   that subscriber).
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_event()
//!        ├────────────────► [queue S2] ─► worker S2 ─► on_event()
//!        └────────────────► [queue SN] ─► worker SN ─► on_event()
//!             │
//!             └─ queue full/closed ─► Bus.publish(SubscriberOverflow)
//!                worker caught panic ─► Bus.publish(SubscriberPanicked)
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event, EventKind};

use super::Subscribe;

/// Per-subscriber channel with metadata
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// Delivery problems (overflow, panics) are published on `bus`.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let s = Arc::clone(&sub);
            let worker_bus = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = s.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        if is_reportable(ev.kind) {
                            worker_bus
                                .publish(Event::subscriber_panicked(s.name(), describe_panic(&panic_err)));
                        }
                    }
                }
            });

            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Fan-out one event to all subscribers (non-blocking).
    ///
    /// If a subscriber's queue is **full** or **closed**, the event is
    /// dropped for it and a [`EventKind::SubscriberOverflow`] is published
    /// with the subscriber's name.
    pub fn emit(&self, event: &Event) {
        let report = is_reportable(event.kind);
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    if report {
                        self.bus
                            .publish(Event::subscriber_overflow(channel.name, "queue full"));
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    if report {
                        self.bus
                            .publish(Event::subscriber_overflow(channel.name, "worker closed"));
                    }
                }
            }
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

/// Delivery-problem events must not generate further delivery-problem
/// events; everything else is fair game.
fn is_reportable(kind: EventKind) -> bool {
    !matches!(
        kind,
        EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
    )
}

fn describe_panic(panic_err: &(dyn std::any::Any + Send)) -> String {
    panic_err
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic_err.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "opaque panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Counter(Arc<AtomicUsize>);

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn name(&self) -> &'static str {
            "counter"
        }
    }

    #[tokio::test]
    async fn test_events_reach_every_subscriber() {
        let seen_a = Arc::new(AtomicUsize::new(0));
        let seen_b = Arc::new(AtomicUsize::new(0));
        let set = SubscriberSet::new(
            vec![
                Arc::new(Counter(seen_a.clone())) as Arc<dyn Subscribe>,
                Arc::new(Counter(seen_b.clone())) as Arc<dyn Subscribe>,
            ],
            Bus::new(8),
        );

        for _ in 0..3 {
            set.emit(&Event::now(EventKind::IterationStarting));
        }
        // queues drain asynchronously
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(seen_a.load(Ordering::SeqCst), 3);
        assert_eq!(seen_b.load(Ordering::SeqCst), 3);
        set.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_set_is_harmless() {
        let set = SubscriberSet::new(Vec::new(), Bus::new(8));
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        set.emit(&Event::now(EventKind::ShutdownRequested));
        set.shutdown().await;
    }

    /// Never drains its queue, so a capacity of one overflows on the second
    /// emit.
    struct Sluggish;

    #[async_trait]
    impl Subscribe for Sluggish {
        async fn on_event(&self, _event: &Event) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        fn name(&self) -> &'static str {
            "sluggish"
        }
        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn test_queue_overflow_is_published_on_bus() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Sluggish) as Arc<dyn Subscribe>], bus.clone());

        for _ in 0..4 {
            set.emit(&Event::now(EventKind::IterationStarting));
        }

        let mut overflows = 0;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::SubscriberOverflow {
                assert_eq!(ev.action.as_deref(), Some("sluggish"));
                assert_eq!(ev.reason.as_deref(), Some("queue full"));
                overflows += 1;
            }
        }
        assert!(overflows >= 1, "dropped events must be observable");
    }

    /// Panics on the first event, then behaves.
    struct Grumpy(Arc<AtomicUsize>);

    #[async_trait]
    impl Subscribe for Grumpy {
        async fn on_event(&self, _event: &Event) {
            if self.0.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("first event is unacceptable");
            }
        }
        fn name(&self) -> &'static str {
            "grumpy"
        }
    }

    #[tokio::test]
    async fn test_panicking_subscriber_is_isolated_and_reported() {
        let calls = Arc::new(AtomicUsize::new(0));
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(
            vec![Arc::new(Grumpy(calls.clone())) as Arc<dyn Subscribe>],
            bus.clone(),
        );

        set.emit(&Event::now(EventKind::IterationStarting));
        set.emit(&Event::now(EventKind::IterationSucceeded));
        tokio::time::sleep(Duration::from_millis(50)).await;

        // the worker survived the panic and processed the second event
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let mut panics = 0;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::SubscriberPanicked {
                assert_eq!(ev.action.as_deref(), Some("grumpy"));
                assert!(ev.reason.as_deref().unwrap().contains("unacceptable"));
                panics += 1;
            }
        }
        assert_eq!(panics, 1);
        set.shutdown().await;
    }
}

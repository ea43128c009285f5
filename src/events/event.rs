//! # Runtime events emitted by the runner set and action runners.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Iteration events**: one action's execution flow (next-run computed,
//!   starting, succeeded, failed, over budget)
//! - **Runner events**: loop terminal states (finished, crashed)
//! - **Runtime events**: shutdown and subscriber-delivery problems
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! action name, iteration numbers, reasons, and budget figures.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use chronovisor::{Event, EventKind};
//!
//! let ev = Event::now(EventKind::IterationFailed)
//!     .with_action("compact")
//!     .with_reason("disk full")
//!     .with_iteration(3);
//!
//! assert_eq!(ev.kind, EventKind::IterationFailed);
//! assert_eq!(ev.action.as_deref(), Some("compact"));
//! assert_eq!(ev.reason.as_deref(), Some("disk full"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
///
/// Exactly one event is published per observable occurrence; subscribers
/// can turn them into logs, metrics, or alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Iteration events ===
    /// The scheduler produced a next-execution time that differs from the
    /// previously observed one (or the first concrete answer).
    ///
    /// Sets:
    /// - `action`: action name
    /// - `next_at`: the newly computed time (absent when it became unknown)
    /// - `at`, `seq`
    NextRunComputed,

    /// An iteration is starting.
    ///
    /// Sets:
    /// - `action`: action name
    /// - `iteration`: iteration number (1-based, per runner)
    /// - `budget_ms`: granted budget (absent when unbounded)
    /// - `at`, `seq`
    IterationStarting,

    /// An iteration finished successfully.
    ///
    /// Not published for a gracefully cancelled iteration; cancellation is
    /// silent.
    ///
    /// Sets:
    /// - `action`: action name
    /// - `iteration`: iteration number
    /// - `elapsed_ms`: wall time the payload took
    /// - `at`, `seq`
    IterationSucceeded,

    /// An iteration failed with a payload error.
    ///
    /// Sets:
    /// - `action`: action name
    /// - `iteration`: iteration number
    /// - `reason`: failure message
    /// - `elapsed_ms`: wall time the payload took
    /// - `at`, `seq`
    IterationFailed,

    /// A scheduler call failed while computing the next execution time.
    ///
    /// Sets:
    /// - `action`: action name
    /// - `reason`: scheduler error message
    /// - `at`, `seq`
    SchedulerFailed,

    /// An iteration ran longer than its computed time budget (non-fatal).
    ///
    /// Sets:
    /// - `action`: action name
    /// - `iteration`: iteration number
    /// - `budget_ms`: granted budget
    /// - `elapsed_ms`: actual wall time
    /// - `at`, `seq`
    BudgetExceeded,

    // === Runner terminal states ===
    /// A runner's loop exited normally (cancellation or graceful payload exit).
    ///
    /// Sets:
    /// - `action`: action name
    /// - `iteration`: last iteration number
    /// - `at`, `seq`
    RunnerFinished,

    /// A runner terminated via its crash policy and will not continue.
    ///
    /// Sets:
    /// - `action`: action name
    /// - `iteration`: last iteration number
    /// - `reason`: crash reason
    /// - `at`, `seq`
    RunnerCrashed,

    // === Runtime events ===
    /// Shutdown requested (OS signal observed or host cancelled the token).
    ///
    /// Sets: `at`, `seq`
    ShutdownRequested,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `action`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    /// - `at`, `seq`
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `action`: subscriber name
    /// - `reason`: panic info/message
    /// - `at`, `seq`
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the action (or subscriber), if applicable.
    pub action: Option<Arc<str>>,
    /// Iteration count (starting from 1).
    pub iteration: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Newly computed next-execution time.
    pub next_at: Option<SystemTime>,
    /// Granted time budget in milliseconds (compact).
    pub budget_ms: Option<u64>,
    /// Measured wall time in milliseconds (compact).
    pub elapsed_ms: Option<u64>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            action: None,
            iteration: None,
            reason: None,
            next_at: None,
            budget_ms: None,
            elapsed_ms: None,
        }
    }

    /// Attaches an action (or subscriber) name.
    #[inline]
    pub fn with_action(mut self, action: impl Into<Arc<str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Attaches an iteration count.
    #[inline]
    pub fn with_iteration(mut self, n: u64) -> Self {
        self.iteration = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a next-execution time.
    #[inline]
    pub fn with_next_at(mut self, at: SystemTime) -> Self {
        self.next_at = Some(at);
        self
    }

    /// Attaches a granted time budget (stored as milliseconds).
    #[inline]
    pub fn with_budget(mut self, d: Duration) -> Self {
        self.budget_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Attaches a measured wall time (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::now(EventKind::SubscriberOverflow)
            .with_action(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::now(EventKind::SubscriberPanicked)
            .with_action(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_attaches_fields() {
        let when = SystemTime::now() + Duration::from_secs(10);
        let ev = Event::now(EventKind::NextRunComputed)
            .with_action("demo")
            .with_next_at(when)
            .with_iteration(7)
            .with_budget(Duration::from_millis(1500))
            .with_elapsed(Duration::from_millis(42));

        assert_eq!(ev.kind, EventKind::NextRunComputed);
        assert_eq!(ev.action.as_deref(), Some("demo"));
        assert_eq!(ev.next_at, Some(when));
        assert_eq!(ev.iteration, Some(7));
        assert_eq!(ev.budget_ms, Some(1500));
        assert_eq!(ev.elapsed_ms, Some(42));
        assert!(ev.reason.is_none());
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::now(EventKind::IterationStarting);
        let b = Event::now(EventKind::IterationSucceeded);
        assert!(b.seq > a.seq);
    }
}

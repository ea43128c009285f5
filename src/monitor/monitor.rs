//! # Per-action execution statistics.
//!
//! One [`Monitor`] exists per action. It is written **only** by the action's
//! runner and read concurrently by diagnostics at arbitrary times.
//!
//! ## Concurrency model
//! Every counter and timestamp is an independent atomic; there is no lock
//! around the whole record. A [`Stats`] snapshot may therefore observe a
//! torn-but-self-consistent-enough view (no invariant requires cross-field
//! atomicity). The only non-atomic field, the last error summary, sits
//! behind its own small `RwLock`.
//!
//! ## Sentinels
//! Timestamps are stored as milliseconds since the unix epoch with `0`
//! meaning "never"/"unknown".

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::ActionError;

fn to_epoch_ms(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| (d.as_millis().min(u128::from(u64::MAX)) as u64).max(1))
        .unwrap_or(1)
}

fn from_epoch_ms(ms: u64) -> Option<SystemTime> {
    if ms == 0 {
        None
    } else {
        Some(UNIX_EPOCH + Duration::from_millis(ms))
    }
}

/// Mutable per-action counters, single-writer / many-readers.
#[derive(Default)]
pub struct Monitor {
    started: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    in_flight: AtomicBool,
    last_success_ms: AtomicU64,
    last_failure_ms: AtomicU64,
    next_run_ms: AtomicU64,
    last_error: RwLock<Option<Arc<str>>>,
}

impl Monitor {
    /// Creates a fresh monitor with zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the currently known next-execution time (`None` = unknown).
    pub fn on_next_run(&self, next: Option<SystemTime>) {
        let ms = next.map(to_epoch_ms).unwrap_or(0);
        self.next_run_ms.store(ms, Ordering::Relaxed);
    }

    /// Records an iteration start; sets the in-flight flag.
    pub fn on_started(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
        self.in_flight.store(true, Ordering::Relaxed);
    }

    /// Records a successful iteration completion.
    pub fn on_succeeded(&self, at: SystemTime) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        self.last_success_ms.store(to_epoch_ms(at), Ordering::Relaxed);
    }

    /// Records a failed iteration with its error summary.
    pub fn on_failed(&self, at: SystemTime, error: &ActionError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.last_failure_ms.store(to_epoch_ms(at), Ordering::Relaxed);
        if let Ok(mut slot) = self.last_error.write() {
            *slot = Some(Arc::from(error.as_message()));
        }
    }

    /// Clears the in-flight flag.
    ///
    /// The runner calls this on every completion path, including
    /// cancellation, so diagnostics never observe a permanently stuck flag.
    pub fn on_finished(&self) {
        self.in_flight.store(false, Ordering::Relaxed);
    }

    /// Takes an immutable snapshot of the current statistics.
    pub fn snapshot(&self) -> Stats {
        Stats {
            iterations_started: self.started.load(Ordering::Relaxed),
            iterations_succeeded: self.succeeded.load(Ordering::Relaxed),
            iterations_failed: self.failed.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::Relaxed),
            last_success: from_epoch_ms(self.last_success_ms.load(Ordering::Relaxed)),
            last_failure: from_epoch_ms(self.last_failure_ms.load(Ordering::Relaxed)),
            next_run: from_epoch_ms(self.next_run_ms.load(Ordering::Relaxed)),
            last_error: self.last_error.read().ok().and_then(|g| g.clone()),
        }
    }
}

/// Immutable snapshot of one action's statistics.
#[derive(Clone, Debug)]
pub struct Stats {
    /// Iterations that entered the execute phase.
    pub iterations_started: u64,
    /// Iterations that completed successfully.
    pub iterations_succeeded: u64,
    /// Iterations that failed (cancellation excluded).
    pub iterations_failed: u64,
    /// True while a payload invocation is in flight.
    pub in_flight: bool,
    /// Timestamp of the last successful iteration.
    pub last_success: Option<SystemTime>,
    /// Timestamp of the last failed iteration.
    pub last_failure: Option<SystemTime>,
    /// Currently known next-execution time (`None` = unknown).
    pub next_run: Option<SystemTime>,
    /// Summary of the last failure.
    pub last_error: Option<Arc<str>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_monitor_is_zeroed() {
        let stats = Monitor::new().snapshot();
        assert_eq!(stats.iterations_started, 0);
        assert_eq!(stats.iterations_succeeded, 0);
        assert_eq!(stats.iterations_failed, 0);
        assert!(!stats.in_flight);
        assert!(stats.last_success.is_none());
        assert!(stats.last_failure.is_none());
        assert!(stats.next_run.is_none());
        assert!(stats.last_error.is_none());
    }

    #[test]
    fn test_iteration_lifecycle_updates_counters() {
        let mon = Monitor::new();
        let now = SystemTime::now();

        mon.on_started();
        assert!(mon.snapshot().in_flight);

        mon.on_succeeded(now);
        mon.on_finished();

        let stats = mon.snapshot();
        assert_eq!(stats.iterations_started, 1);
        assert_eq!(stats.iterations_succeeded, 1);
        assert!(!stats.in_flight);
        assert!(stats.last_success.is_some());
    }

    #[test]
    fn test_failure_records_error_summary() {
        let mon = Monitor::new();
        mon.on_started();
        mon.on_failed(SystemTime::now(), &ActionError::fail("disk full"));
        mon.on_finished();

        let stats = mon.snapshot();
        assert_eq!(stats.iterations_failed, 1);
        assert!(stats.last_failure.is_some());
        assert!(stats.last_error.unwrap().contains("disk full"));
    }

    #[test]
    fn test_next_run_roundtrip_and_unknown() {
        let mon = Monitor::new();
        let when = SystemTime::now() + Duration::from_secs(3);
        mon.on_next_run(Some(when));
        let seen = mon.snapshot().next_run.unwrap();
        // millisecond granularity storage
        let delta = when
            .duration_since(seen)
            .unwrap_or_else(|e| e.duration());
        assert!(delta < Duration::from_millis(2), "delta {delta:?}");

        mon.on_next_run(None);
        assert!(mon.snapshot().next_run.is_none());
    }
}

//! # On-demand diagnostic snapshot and health predicate.
//!
//! [`ActionInfo`] is what a diagnostics "info provider" reads: the action
//! name, the scheduler's self-description, the options it runs under, and a
//! [`Stats`] copy taken at read time. It is created on demand and never
//! cached.
//!
//! [`Health`] is the derived predicate a diagnostics "health check" registry
//! consumes: an action is unhealthy when its most recent outcome was a
//! failure, or when a known next-execution time is overdue by more than the
//! staleness tolerance.

use std::time::{Duration, SystemTime};

use crate::actions::ActionOptions;
use crate::monitor::Stats;

/// How far past a known next-execution time an idle action may be before it
/// is reported as stale.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60);

/// Health verdict derived from an action's statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Health {
    /// The action looks healthy: no failure after the last success and no
    /// overdue next-execution time.
    Ok,
    /// The most recent completed iteration failed.
    Failing {
        /// Summary of the last failure, when recorded.
        error: Option<String>,
    },
    /// A known next-execution time has been overdue beyond tolerance while
    /// no iteration is in flight.
    Stale {
        /// How far past the scheduled time the action is.
        overdue: Duration,
    },
}

impl Health {
    /// True for [`Health::Ok`].
    pub fn is_healthy(&self) -> bool {
        matches!(self, Health::Ok)
    }
}

/// Read-only snapshot of one action for diagnostics.
///
/// Assembled on demand by [`RunnerSet::infos`](crate::RunnerSet::infos).
#[derive(Clone, Debug)]
pub struct ActionInfo {
    /// Action name.
    pub name: String,
    /// Scheduler policy self-description.
    pub scheduler: String,
    /// Options the action runs under.
    pub options: ActionOptions,
    /// Statistics copy taken at read time.
    pub stats: Stats,
}

impl ActionInfo {
    /// Derives the health verdict at `now` using [`DEFAULT_STALE_AFTER`].
    pub fn health(&self, now: SystemTime) -> Health {
        self.health_with_tolerance(now, DEFAULT_STALE_AFTER)
    }

    /// Derives the health verdict at `now` with an explicit staleness
    /// tolerance.
    pub fn health_with_tolerance(&self, now: SystemTime, stale_after: Duration) -> Health {
        let s = &self.stats;

        let failing = match (s.last_failure, s.last_success) {
            (Some(failure), Some(success)) => failure > success,
            (Some(_), None) => true,
            _ => false,
        };
        if failing {
            return Health::Failing {
                error: s.last_error.as_deref().map(str::to_string),
            };
        }

        // A run that is merely in flight is not stale, however long overdue
        // its successor slot looks.
        if !s.in_flight {
            if let Some(next) = s.next_run {
                if let Ok(overdue) = now.duration_since(next) {
                    if overdue > stale_after {
                        return Health::Stale { overdue };
                    }
                }
            }
        }

        Health::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionOptions;
    use std::sync::Arc;

    fn info(stats: Stats) -> ActionInfo {
        ActionInfo {
            name: "demo".into(),
            scheduler: "test".into(),
            options: ActionOptions::default(),
            stats,
        }
    }

    fn blank_stats() -> Stats {
        Stats {
            iterations_started: 0,
            iterations_succeeded: 0,
            iterations_failed: 0,
            in_flight: false,
            last_success: None,
            last_failure: None,
            next_run: None,
            last_error: None,
        }
    }

    #[test]
    fn test_never_run_action_is_healthy() {
        let now = SystemTime::now();
        assert!(info(blank_stats()).health(now).is_healthy());
    }

    #[test]
    fn test_failure_after_success_is_failing() {
        let now = SystemTime::now();
        let stats = Stats {
            last_success: Some(now - Duration::from_secs(60)),
            last_failure: Some(now - Duration::from_secs(5)),
            last_error: Some(Arc::from("boom")),
            ..blank_stats()
        };
        match info(stats).health(now) {
            Health::Failing { error } => assert_eq!(error.as_deref(), Some("boom")),
            other => panic!("expected Failing, got {other:?}"),
        }
    }

    #[test]
    fn test_success_after_failure_recovers() {
        let now = SystemTime::now();
        let stats = Stats {
            last_failure: Some(now - Duration::from_secs(60)),
            last_success: Some(now - Duration::from_secs(5)),
            ..blank_stats()
        };
        assert!(info(stats).health(now).is_healthy());
    }

    #[test]
    fn test_overdue_next_run_is_stale() {
        let now = SystemTime::now();
        let stats = Stats {
            next_run: Some(now - Duration::from_secs(120)),
            ..blank_stats()
        };
        match info(stats).health_with_tolerance(now, Duration::from_secs(30)) {
            Health::Stale { overdue } => assert!(overdue >= Duration::from_secs(90)),
            other => panic!("expected Stale, got {other:?}"),
        }
    }

    #[test]
    fn test_in_flight_run_is_not_stale() {
        let now = SystemTime::now();
        let stats = Stats {
            next_run: Some(now - Duration::from_secs(120)),
            in_flight: true,
            ..blank_stats()
        };
        assert!(info(stats)
            .health_with_tolerance(now, Duration::from_secs(30))
            .is_healthy());
    }
}

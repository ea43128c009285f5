//! # Time budget for a single action execution.
//!
//! [`TimeBudget`] tells a payload how long it has until its action's next
//! scheduled slot. The runner computes it once at execution start (from the
//! scheduler's answer for "when after this run?") and hands it to the payload
//! through the [`ActionContext`](crate::ActionContext).
//!
//! ## Rules
//! - A budget is an **immutable snapshot**: consumers read elapsed/remaining,
//!   never extend it.
//! - [`TimeBudget::Unbounded`] means the scheduler could not name a next slot;
//!   the payload may run as long as it likes.
//! - Exhausting a budget is **not** enforced by the runtime. The runner only
//!   observes it after the fact and publishes
//!   [`EventKind::BudgetExceeded`](crate::EventKind::BudgetExceeded).

use std::time::{Duration, Instant};

/// Remaining-time budget handed to a payload at execution start.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use chronovisor::TimeBudget;
///
/// let budget = TimeBudget::bounded(Duration::from_secs(30));
/// assert!(budget.remaining().unwrap() <= Duration::from_secs(30));
/// assert!(!TimeBudget::Unbounded.is_exhausted());
/// ```
#[derive(Clone, Copy, Debug)]
pub enum TimeBudget {
    /// Finite budget: `allowed` counted from `started`.
    Bounded {
        /// Total duration granted at execution start.
        allowed: Duration,
        /// Monotonic instant the budget started ticking.
        started: Instant,
    },
    /// No known next slot; the execution is not time-bounded.
    Unbounded,
}

impl TimeBudget {
    /// Creates a bounded budget starting now.
    pub fn bounded(allowed: Duration) -> Self {
        TimeBudget::Bounded {
            allowed,
            started: Instant::now(),
        }
    }

    /// Total duration granted, or `None` for an unbounded budget.
    pub fn allowed(&self) -> Option<Duration> {
        match self {
            TimeBudget::Bounded { allowed, .. } => Some(*allowed),
            TimeBudget::Unbounded => None,
        }
    }

    /// Wall time elapsed since the budget started ticking.
    ///
    /// Returns `Duration::ZERO` for an unbounded budget.
    pub fn elapsed(&self) -> Duration {
        match self {
            TimeBudget::Bounded { started, .. } => started.elapsed(),
            TimeBudget::Unbounded => Duration::ZERO,
        }
    }

    /// Time left before the budget runs out, or `None` if unbounded.
    ///
    /// Saturates at zero; an exhausted budget reports `Some(ZERO)`.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            TimeBudget::Bounded { allowed, started } => {
                Some(allowed.saturating_sub(started.elapsed()))
            }
            TimeBudget::Unbounded => None,
        }
    }

    /// True once elapsed time has reached the allowed duration.
    ///
    /// Always false for an unbounded budget.
    pub fn is_exhausted(&self) -> bool {
        match self {
            TimeBudget::Bounded { allowed, started } => started.elapsed() >= *allowed,
            TimeBudget::Unbounded => false,
        }
    }

    /// True if this budget is the unbounded marker.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, TimeBudget::Unbounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_reports_allowed_and_remaining() {
        let budget = TimeBudget::bounded(Duration::from_secs(60));
        assert_eq!(budget.allowed(), Some(Duration::from_secs(60)));
        let remaining = budget.remaining().unwrap();
        assert!(remaining <= Duration::from_secs(60));
        assert!(remaining > Duration::from_secs(59));
        assert!(!budget.is_exhausted());
    }

    #[test]
    fn test_zero_budget_is_immediately_exhausted() {
        let budget = TimeBudget::bounded(Duration::ZERO);
        assert!(budget.is_exhausted());
        assert_eq!(budget.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_unbounded_never_exhausts() {
        let budget = TimeBudget::Unbounded;
        assert!(budget.is_unbounded());
        assert!(!budget.is_exhausted());
        assert_eq!(budget.remaining(), None);
        assert_eq!(budget.allowed(), None);
        assert_eq!(budget.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_remaining_saturates_at_zero() {
        let budget = TimeBudget::Bounded {
            allowed: Duration::from_nanos(1),
            started: Instant::now() - Duration::from_secs(1),
        };
        assert_eq!(budget.remaining(), Some(Duration::ZERO));
        assert!(budget.is_exhausted());
    }
}

//! # Per-execution context handed to a payload.
//!
//! [`ActionContext`] is a plain immutable value built by the runner for each
//! iteration and discarded after the payload returns. There is no ambient or
//! global access; everything an iteration may need travels through this
//! value.

use std::time::SystemTime;

use tokio_util::sync::CancellationToken;

use crate::actions::budget::TimeBudget;
use crate::schedule::SchedulerRef;

/// Immutable context for one payload invocation.
///
/// Carries:
/// - `fired_at`: the wall-clock timestamp the iteration fired
/// - `budget`: time until this action's next scheduled slot (or unbounded)
/// - `scheduler`: the scheduler instance that produced this execution
/// - `token`: cancellation signal for cooperative shutdown
#[derive(Clone)]
pub struct ActionContext {
    /// Wall-clock timestamp of this execution.
    pub fired_at: SystemTime,
    /// Time budget until the next scheduled slot.
    pub budget: TimeBudget,
    /// Scheduler that produced this execution (for policy-aware payloads).
    pub scheduler: SchedulerRef,
    /// Cancellation signal; payloads should check it and exit promptly.
    pub token: CancellationToken,
}

impl ActionContext {
    /// Builds a context for one iteration.
    pub fn new(
        fired_at: SystemTime,
        budget: TimeBudget,
        scheduler: SchedulerRef,
        token: CancellationToken,
    ) -> Self {
        Self {
            fired_at,
            budget,
            scheduler,
            token,
        }
    }
}

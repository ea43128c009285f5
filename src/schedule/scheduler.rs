//! # Scheduler contract: the pluggable scheduling policy.
//!
//! A [`Scheduler`] decides when its action runs next and receives feedback
//! after every completed iteration, enabling adaptive policies (backoff
//! after repeated failures, jitter, config-driven cron) without changes to
//! the runner.
//!
//! ## Contract
//! - [`Scheduler::next_run`] may be stateful internally and may return a
//!   **different** answer on repeated calls with the same `after` value
//!   (e.g. an underlying config changed). Callers must tolerate this and
//!   re-poll rather than cache indefinitely; that is exactly why the runner
//!   re-actualizes every [`ActionOptions::actualization`](crate::ActionOptions::actualization)
//!   instead of computing the next time once.
//! - `Ok(None)` means "cannot currently be determined" (e.g. waiting on
//!   external input); the runner keeps re-polling.
//! - The feedback hooks are infallible by signature. Policies that can fail
//!   internally should record the problem and surface it from the next
//!   `next_run` call.
//!
//! ## Quick wiring
//! ```text
//! ActionRunner wait phase:    scheduler.next_run(last_run)  → when to fire
//! ActionRunner execute phase: scheduler.next_run(fired_at)  → time budget
//! after each iteration:       on_iteration_succeeded() / on_iteration_failed(&err)
//! ```

use std::sync::Arc;
use std::time::SystemTime;

use crate::error::{ActionError, ScheduleError};

/// Shared handle to a scheduling policy.
///
/// Each scheduler instance is owned by exactly one action and never shared
/// across actions; the `Arc` exists so the runner can hand a reference to
/// the payload through the [`ActionContext`](crate::ActionContext).
pub type SchedulerRef = Arc<dyn Scheduler>;

/// Pluggable policy deciding when an action runs next.
///
/// # Example
/// ```
/// use std::time::{Duration, SystemTime};
/// use chronovisor::{ScheduleError, Scheduler};
///
/// /// Fires a fixed interval after the previous execution.
/// struct Every(Duration);
///
/// impl Scheduler for Every {
///     fn next_run(&self, after: SystemTime) -> Result<Option<SystemTime>, ScheduleError> {
///         Ok(Some(after + self.0))
///     }
///
///     fn describe(&self) -> String {
///         format!("every {:?}", self.0)
///     }
/// }
/// ```
pub trait Scheduler: Send + Sync + 'static {
    /// Computes the next execution time strictly based on `after`, the last
    /// execution time.
    ///
    /// Returns `Ok(None)` when the next time cannot currently be determined;
    /// the runner re-polls after the action's actualization period.
    fn next_run(&self, after: SystemTime) -> Result<Option<SystemTime>, ScheduleError>;

    /// Feedback hook: the last iteration completed successfully.
    fn on_iteration_succeeded(&self) {}

    /// Feedback hook: the last iteration failed with `error`.
    ///
    /// Cancellation never reaches this hook.
    fn on_iteration_failed(&self, error: &ActionError) {
        let _ = error;
    }

    /// Human-readable policy description for diagnostics.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

//! # Per-action execution options.
//!
//! [`ActionOptions`] bundles the knobs that shape one action's runner loop:
//! how often an unknown or distant schedule is re-polled, which failure
//! domains crash the runner, where the payload executes, and whether
//! iterations may overlap.
//!
//! Options are fixed at registration time; a running action cannot be
//! reconfigured.
//!
//! ## Field semantics
//! - `actualization`: re-poll period for schedules that are unknown or further
//!   away than one period (guards against stale long-range estimates)
//! - `crash_on_scheduler_error`: a throwing scheduler terminates this runner
//!   instead of falling back to the unknown-schedule path
//! - `crash_on_payload_error`: a failing payload terminates this runner
//!   instead of being reported and swallowed
//! - `dedicated_thread`: run the payload on its own OS thread instead of the
//!   shared pool (long-blocking payloads)
//! - `allow_overlap`: do not wait for a payload to finish before starting the
//!   next wait cycle; concurrent executions of the same action become possible

use std::time::Duration;

/// Options controlling how one scheduled action is run.
///
/// All booleans default to `false`; `actualization` defaults to 5 seconds.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use chronovisor::ActionOptions;
///
/// let opts = ActionOptions {
///     actualization: Duration::from_secs(1),
///     crash_on_payload_error: true,
///     ..ActionOptions::default()
/// };
/// assert!(!opts.allow_overlap);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ActionOptions {
    /// How often to re-poll the scheduler while the next execution time is
    /// unknown or more than one period away.
    pub actualization: Duration,

    /// Terminate this action's runner when the scheduler call fails.
    ///
    /// When `false` (default), the failure is reported and the next time is
    /// treated as unknown for this poll.
    pub crash_on_scheduler_error: bool,

    /// Terminate this action's runner when the payload fails.
    ///
    /// When `false` (default), the failure is reported and the loop proceeds
    /// to the next scheduled execution.
    pub crash_on_payload_error: bool,

    /// Run the payload on a dedicated OS thread, not the shared pool.
    ///
    /// Intended for long-blocking payloads that must not starve shared
    /// concurrency resources.
    pub dedicated_thread: bool,

    /// Allow a new iteration to start while the previous payload is still
    /// running. The payload is responsible for any internal synchronization.
    pub allow_overlap: bool,
}

impl ActionOptions {
    /// Default re-poll period for unknown/distant schedules.
    pub const DEFAULT_ACTUALIZATION: Duration = Duration::from_secs(5);

    /// Returns the actualization period, clamped to a small positive floor.
    ///
    /// A zero period would turn the unknown-schedule path into a busy loop.
    pub fn actualization_clamped(&self) -> Duration {
        self.actualization.max(Duration::from_millis(1))
    }
}

impl Default for ActionOptions {
    /// Default options: serialize iterations on the shared pool, swallow and
    /// report all failures, re-actualize every 5 seconds.
    fn default() -> Self {
        Self {
            actualization: Self::DEFAULT_ACTUALIZATION,
            crash_on_scheduler_error: false,
            crash_on_payload_error: false,
            dedicated_thread: false,
            allow_overlap: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ActionOptions::default();
        assert_eq!(opts.actualization, Duration::from_secs(5));
        assert!(!opts.crash_on_scheduler_error);
        assert!(!opts.crash_on_payload_error);
        assert!(!opts.dedicated_thread);
        assert!(!opts.allow_overlap);
    }

    #[test]
    fn test_zero_actualization_is_clamped() {
        let opts = ActionOptions {
            actualization: Duration::ZERO,
            ..ActionOptions::default()
        };
        assert!(opts.actualization_clamped() > Duration::ZERO);
    }
}

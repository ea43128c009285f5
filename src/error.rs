//! Error types used by the chronovisor runtime, schedulers, and action payloads.
//!
//! This module defines three error enums, one per failure domain:
//!
//! - [`ActionError`]: errors raised by individual payload executions.
//! - [`ScheduleError`]: errors raised by a [`Scheduler`](crate::Scheduler)
//!   while computing the next execution time.
//! - [`RuntimeError`]: errors raised by the runner set itself.
//!
//! The domains are independent on purpose: each action chooses separately
//! (via [`ActionOptions`](crate::ActionOptions)) whether a scheduler failure
//! or a payload failure crashes its runner or is reported and swallowed.
//! Cancellation is never an error, and an over-budget run is an observability
//! event, never an error.
//!
//! All types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics.

use thiserror::Error;

/// # Errors produced by action payload execution.
///
/// These represent failures of individual async payloads driven by the
/// runtime. [`ActionError::Canceled`] is special: the runner treats it as a
/// graceful exit, not a failure.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ActionError {
    /// Payload execution failed for this iteration.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Payload was cancelled due to runtime shutdown.
    #[error("context cancelled")]
    Canceled,
}

impl ActionError {
    /// Wraps an arbitrary error message into [`ActionError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        ActionError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use chronovisor::ActionError;
    ///
    /// let err = ActionError::fail("boom");
    /// assert_eq!(err.as_label(), "action_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ActionError::Fail { .. } => "action_failed",
            ActionError::Canceled => "action_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ActionError::Fail { error } => format!("error: {error}"),
            ActionError::Canceled => "context cancelled".to_string(),
        }
    }

    /// True if this error represents graceful cancellation rather than a failure.
    ///
    /// The runner never counts cancellation as a failed iteration and never
    /// applies the crash policy to it.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ActionError::Canceled)
    }
}

/// # Errors produced by scheduler policy calls.
///
/// Raised when [`Scheduler::next_run`](crate::Scheduler::next_run) cannot
/// evaluate its policy (broken cron expression, unreachable config source,
/// etc.). Whether this crashes the runner or falls back to the "unknown
/// schedule" re-poll path is decided per action by
/// [`ActionOptions::crash_on_scheduler_error`](crate::ActionOptions::crash_on_scheduler_error).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// The policy call failed.
    #[error("schedule computation failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },
}

impl ScheduleError {
    /// Wraps an arbitrary error message into [`ScheduleError::Failed`].
    pub fn failed(error: impl Into<String>) -> Self {
        ScheduleError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ScheduleError::Failed { .. } => "scheduler_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ScheduleError::Failed { error } => format!("scheduler error: {error}"),
        }
    }
}

/// A single crashed runner, as reported by [`RuntimeError::RunnersCrashed`].
#[derive(Debug, Clone)]
pub struct CrashReport {
    /// Name of the action whose runner crashed.
    pub action: String,
    /// Human-readable crash reason (scheduler or payload error message).
    pub reason: String,
}

/// # Errors produced by the chronovisor runtime.
///
/// A runner crashes only when its action opted in via
/// `crash_on_payload_error` / `crash_on_scheduler_error`; sibling runners
/// keep going, and the crash surfaces here once the whole set has exited.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// One or more action runners terminated via their crash policy.
    #[error("{} runner(s) crashed: {}", crashed.len(), summarize(crashed))]
    RunnersCrashed {
        /// Every crashed runner with its reason, in exit order.
        crashed: Vec<CrashReport>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::RunnersCrashed { .. } => "runtime_runners_crashed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::RunnersCrashed { crashed } => {
                format!("crashed runners: {}", summarize(crashed))
            }
        }
    }
}

fn summarize(crashed: &[CrashReport]) -> String {
    crashed
        .iter()
        .map(|c| format!("{}: {}", c.action, c.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_labels() {
        assert_eq!(ActionError::fail("x").as_label(), "action_failed");
        assert_eq!(ActionError::Canceled.as_label(), "action_canceled");
    }

    #[test]
    fn test_cancellation_is_not_failure() {
        assert!(ActionError::Canceled.is_cancellation());
        assert!(!ActionError::fail("x").is_cancellation());
    }

    #[test]
    fn test_runtime_error_summary_lists_every_crash() {
        let err = RuntimeError::RunnersCrashed {
            crashed: vec![
                CrashReport {
                    action: "a".into(),
                    reason: "boom".into(),
                },
                CrashReport {
                    action: "b".into(),
                    reason: "bust".into(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("a: boom"), "{msg}");
        assert!(msg.contains("b: bust"), "{msg}");
    }
}

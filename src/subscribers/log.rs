//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [next-run] action=reindex at=SystemTime { .. }
//! [starting] action=reindex iteration=1 budget_ms=Some(950)
//! [succeeded] action=reindex iteration=1 elapsed_ms=Some(12)
//! [failed] action=reindex iteration=2 err="index locked"
//! [over-budget] action=reindex iteration=3 budget_ms=Some(950) elapsed_ms=Some(1330)
//! [scheduler-failed] action=reindex err="bad cron expression"
//! [runner-finished] action=reindex
//! [shutdown-requested]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
#[derive(Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::NextRunComputed => {
                println!("[next-run] action={:?} at={:?}", e.action, e.next_at);
            }
            EventKind::IterationStarting => {
                println!(
                    "[starting] action={:?} iteration={:?} budget_ms={:?}",
                    e.action, e.iteration, e.budget_ms
                );
            }
            EventKind::IterationSucceeded => {
                println!(
                    "[succeeded] action={:?} iteration={:?} elapsed_ms={:?}",
                    e.action, e.iteration, e.elapsed_ms
                );
            }
            EventKind::IterationFailed => {
                println!(
                    "[failed] action={:?} iteration={:?} err={:?}",
                    e.action, e.iteration, e.reason
                );
            }
            EventKind::SchedulerFailed => {
                println!("[scheduler-failed] action={:?} err={:?}", e.action, e.reason);
            }
            EventKind::BudgetExceeded => {
                println!(
                    "[over-budget] action={:?} iteration={:?} budget_ms={:?} elapsed_ms={:?}",
                    e.action, e.iteration, e.budget_ms, e.elapsed_ms
                );
            }
            EventKind::RunnerFinished => {
                println!("[runner-finished] action={:?}", e.action);
            }
            EventKind::RunnerCrashed => {
                println!("[runner-crashed] action={:?} err={:?}", e.action, e.reason);
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] sub={:?} err={:?}", e.action, e.reason);
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panicked] sub={:?} err={:?}", e.action, e.reason);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}

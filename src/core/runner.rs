//! # ActionRunner: the per-action execution loop.
//!
//! One runner owns one [`ActionSpec`] for the process lifetime and drives its
//! wait-then-execute cycle until cancellation or a crash-policy exit:
//!
//! ```text
//! loop {
//!   ├─► WAIT PHASE
//!   │     ├─► next = scheduler.next_run(last_run)      (failure policy applies)
//!   │     ├─► changed? ─► monitor.on_next_run + publish NextRunComputed
//!   │     ├─► unknown          ─► sleep(actualization), re-poll
//!   │     ├─► next <= last_run ─► due now (single catch-up, no backfill)
//!   │     ├─► far future       ─► sleep(actualization), re-poll
//!   │     └─► near future      ─► sleep remainder, fine-grain poll to the slot
//!   │
//!   ├─► EXECUTE PHASE
//!   │     ├─► budget = scheduler.next_run(fired_at)    (finite or unbounded)
//!   │     ├─► monitor.on_started + publish IterationStarting
//!   │     ├─► payload runs on shared pool or dedicated thread
//!   │     ├─► bookkeeping always runs (success/failure/cancel)
//!   │     ├─► over budget? ─► publish BudgetExceeded (never fatal)
//!   │     └─► feedback: on_iteration_succeeded / on_iteration_failed
//!   │
//!   └─► exit conditions:
//!        - token cancelled (normal shutdown, silent)
//!        - payload Canceled (normal shutdown, silent)
//!        - scheduler error + crash_on_scheduler_error
//!        - payload error + crash_on_payload_error
//! }
//! ```
//!
//! ## Rules
//! - With `allow_overlap = false` (default) iterations are **strictly
//!   serialized**: the loop awaits the payload before the next wait cycle.
//! - With `allow_overlap = true` the execution is detached and the loop
//!   immediately re-enters the wait phase; a crashing detached execution
//!   stops the loop at the next iteration boundary.
//! - Exactly **one** terminal event per runner: `RunnerFinished` or
//!   `RunnerCrashed`.
//! - Cancellation is checked at every sleep and never counts as a failure.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use tokio::{select, sync::oneshot, time};
use tokio_util::sync::CancellationToken;

use crate::actions::{ActionContext, ActionOptions, ActionRef, ActionSpec, TimeBudget};
use crate::error::ActionError;
use crate::events::{Bus, Event, EventKind};
use crate::monitor::Monitor;
use crate::schedule::SchedulerRef;

/// Granularity of the drift-correcting poll right before a scheduled slot.
const FINE_POLL: Duration = Duration::from_millis(20);

/// Terminal state of one runner's loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunnerExit {
    /// The loop ended normally (cancellation or graceful payload exit).
    Finished,
    /// The loop terminated via a crash policy.
    Crashed {
        /// Human-readable crash reason.
        reason: String,
    },
}

/// Outcome of the wait phase.
enum Wait {
    /// A scheduled slot is due; proceed to the execute phase.
    Due,
    /// Cancellation fired during a sleep.
    Cancelled,
    /// The scheduler failed and the crash policy applies.
    Crashed(String),
}

/// Outcome of one settled iteration.
enum Settled {
    /// Continue with the next wait cycle.
    Continue,
    /// The payload observed cancellation; exit silently.
    Cancelled,
    /// The payload failed and the crash policy applies.
    Crashed(String),
}

/// Drives one scheduled action until cancellation or crash.
pub(crate) struct ActionRunner {
    spec: ActionSpec,
    monitor: Arc<Monitor>,
    bus: Bus,
}

impl ActionRunner {
    /// Creates a runner for one action. Exactly one runner exists per spec.
    pub(crate) fn new(spec: ActionSpec, monitor: Arc<Monitor>, bus: Bus) -> Self {
        Self { spec, monitor, bus }
    }

    /// Runs the loop until cancellation or a crash-policy exit.
    ///
    /// Publishes exactly one terminal event before returning.
    pub(crate) async fn run(self, token: CancellationToken) -> RunnerExit {
        // Detached (overlapping) executions report crashes here and cancel
        // `stop` so the loop notices at its next boundary.
        let stop = token.child_token();
        let overlap_crash: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

        let options = self.spec.options();
        let mut last_run = SystemTime::now();
        let mut last_seen: Option<Option<SystemTime>> = None;
        let mut iteration: u64 = 0;

        let exit = loop {
            match self.wait_for_slot(last_run, &mut last_seen, &stop).await {
                Wait::Cancelled => {
                    break match take_crash(&overlap_crash) {
                        Some(reason) => RunnerExit::Crashed { reason },
                        None => RunnerExit::Finished,
                    };
                }
                Wait::Crashed(reason) => break RunnerExit::Crashed { reason },
                Wait::Due => {}
            }

            iteration += 1;
            let fired_at = SystemTime::now();

            // Size the budget from an independent re-query: "how long until
            // this action's next slot after the one firing now".
            let budget = match self.poll_next(fired_at) {
                Ok(Some(next)) => {
                    TimeBudget::bounded(next.duration_since(fired_at).unwrap_or(Duration::ZERO))
                }
                Ok(None) => TimeBudget::Unbounded,
                Err(reason) => break RunnerExit::Crashed { reason },
            };

            self.monitor.on_started();
            let mut starting = Event::now(EventKind::IterationStarting)
                .with_action(self.spec.name())
                .with_iteration(iteration);
            if let Some(allowed) = budget.allowed() {
                starting = starting.with_budget(allowed);
            }
            self.bus.publish(starting);

            let execution = Execution {
                action: self.spec.action().clone(),
                scheduler: self.spec.scheduler().clone(),
                monitor: self.monitor.clone(),
                bus: self.bus.clone(),
                options,
            };

            if options.allow_overlap {
                let crash_slot = overlap_crash.clone();
                let stop_tx = stop.clone();
                let child = stop.child_token();
                tokio::spawn(async move {
                    if let Settled::Crashed(reason) =
                        execution.settle(iteration, fired_at, budget, child).await
                    {
                        if let Ok(mut slot) = crash_slot.lock() {
                            *slot = Some(reason);
                        }
                        stop_tx.cancel();
                    }
                });
                last_run = fired_at;
            } else {
                match execution
                    .settle(iteration, fired_at, budget, stop.child_token())
                    .await
                {
                    Settled::Continue => last_run = fired_at,
                    Settled::Cancelled => break RunnerExit::Finished,
                    Settled::Crashed(reason) => break RunnerExit::Crashed { reason },
                }
            }
        };

        match &exit {
            RunnerExit::Finished => self.bus.publish(
                Event::now(EventKind::RunnerFinished)
                    .with_action(self.spec.name())
                    .with_iteration(iteration),
            ),
            RunnerExit::Crashed { reason } => self.bus.publish(
                Event::now(EventKind::RunnerCrashed)
                    .with_action(self.spec.name())
                    .with_iteration(iteration)
                    .with_reason(reason.clone()),
            ),
        }
        exit
    }

    /// Wait phase: blocks until the next slot is due or cancellation fires.
    ///
    /// Re-polls the scheduler every actualization period while the next time
    /// is unknown or more than one period away, so long-range estimates get
    /// re-validated instead of slept through in one shot.
    async fn wait_for_slot(
        &self,
        last_run: SystemTime,
        last_seen: &mut Option<Option<SystemTime>>,
        token: &CancellationToken,
    ) -> Wait {
        let actualization = self.spec.options().actualization_clamped();

        loop {
            if token.is_cancelled() {
                return Wait::Cancelled;
            }

            let next = match self.poll_next(last_run) {
                Ok(next) => next,
                Err(reason) => return Wait::Crashed(reason),
            };

            if last_seen.map_or(true, |prev| prev != next) {
                *last_seen = Some(next);
                self.monitor.on_next_run(next);
                let mut ev = Event::now(EventKind::NextRunComputed).with_action(self.spec.name());
                if let Some(at) = next {
                    ev = ev.with_next_at(at);
                }
                self.bus.publish(ev);
            }

            let Some(next_at) = next else {
                if !sleep_cancellable(actualization, token).await {
                    return Wait::Cancelled;
                }
                continue;
            };

            // Due now or overdue: execute immediately. A single catch-up
            // iteration per detection, never a backfill queue.
            if next_at <= last_run {
                return Wait::Due;
            }

            let time_to_wait = next_at
                .duration_since(SystemTime::now())
                .unwrap_or(Duration::ZERO);

            if time_to_wait > actualization {
                if !sleep_cancellable(actualization, token).await {
                    return Wait::Cancelled;
                }
                continue;
            }

            if !sleep_cancellable(time_to_wait, token).await {
                return Wait::Cancelled;
            }
            // Coarse sleep timers drift; poll the last stretch.
            while SystemTime::now() < next_at {
                if !sleep_cancellable(FINE_POLL, token).await {
                    return Wait::Cancelled;
                }
            }
            return Wait::Due;
        }
    }

    /// Queries the scheduler through the scheduler failure policy.
    ///
    /// On error: publishes `SchedulerFailed`, then either crashes the runner
    /// (`crash_on_scheduler_error`) or degrades the answer to "unknown".
    fn poll_next(&self, after: SystemTime) -> Result<Option<SystemTime>, String> {
        match self.spec.scheduler().next_run(after) {
            Ok(next) => Ok(next),
            Err(e) => {
                let reason = e.as_message();
                self.bus.publish(
                    Event::now(EventKind::SchedulerFailed)
                        .with_action(self.spec.name())
                        .with_reason(reason.clone()),
                );
                if self.spec.options().crash_on_scheduler_error {
                    Err(reason)
                } else {
                    Ok(None)
                }
            }
        }
    }
}

/// Everything one iteration needs, detachable from the loop for overlap.
struct Execution {
    action: ActionRef,
    scheduler: SchedulerRef,
    monitor: Arc<Monitor>,
    bus: Bus,
    options: ActionOptions,
}

impl Execution {
    /// Runs the payload and settles all bookkeeping for one iteration.
    ///
    /// Completion bookkeeping (monitor, feedback hooks, iteration outcome
    /// events) runs on every path. A gracefully cancelled iteration still
    /// clears the in-flight flag but publishes no outcome event.
    async fn settle(
        self,
        iteration: u64,
        fired_at: SystemTime,
        budget: TimeBudget,
        token: CancellationToken,
    ) -> Settled {
        let ctx = ActionContext::new(fired_at, budget, self.scheduler.clone(), token);
        let started = Instant::now();
        let result = invoke(self.action.clone(), self.options.dedicated_thread, ctx).await;
        let elapsed = started.elapsed();

        self.monitor.on_finished();

        if let Some(allowed) = budget.allowed() {
            if elapsed > allowed {
                self.bus.publish(
                    Event::now(EventKind::BudgetExceeded)
                        .with_action(self.action.name())
                        .with_iteration(iteration)
                        .with_budget(allowed)
                        .with_elapsed(elapsed),
                );
            }
        }

        match result {
            Ok(()) => {
                self.monitor.on_succeeded(SystemTime::now());
                self.scheduler.on_iteration_succeeded();
                self.bus.publish(
                    Event::now(EventKind::IterationSucceeded)
                        .with_action(self.action.name())
                        .with_iteration(iteration)
                        .with_elapsed(elapsed),
                );
                Settled::Continue
            }
            Err(ActionError::Canceled) => {
                // Graceful exit, not a failure: no counters, no feedback,
                // no iteration outcome event.
                Settled::Cancelled
            }
            Err(e) => {
                self.monitor.on_failed(SystemTime::now(), &e);
                self.scheduler.on_iteration_failed(&e);
                self.bus.publish(
                    Event::now(EventKind::IterationFailed)
                        .with_action(self.action.name())
                        .with_iteration(iteration)
                        .with_reason(e.as_message())
                        .with_elapsed(elapsed),
                );
                if self.options.crash_on_payload_error {
                    Settled::Crashed(e.as_message())
                } else {
                    Settled::Continue
                }
            }
        }
    }
}

/// Invokes the payload on the configured worker.
///
/// Dedicated placement drives the payload on its own OS thread with a
/// current-thread runtime so long-blocking work cannot starve the shared
/// pool; the result comes back over a oneshot channel.
async fn invoke(
    action: ActionRef,
    dedicated: bool,
    ctx: ActionContext,
) -> Result<(), ActionError> {
    if !dedicated {
        return action.run(ctx).await;
    }

    let (tx, rx) = oneshot::channel();
    let thread = std::thread::Builder::new()
        .name(format!("chronovisor-{}", action.name()))
        .spawn(move || {
            let result = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt.block_on(action.run(ctx)),
                Err(e) => Err(ActionError::fail(format!(
                    "dedicated worker runtime: {e}"
                ))),
            };
            let _ = tx.send(result);
        });

    match thread {
        Ok(_handle) => match rx.await {
            Ok(result) => result,
            Err(_) => Err(ActionError::fail("dedicated worker dropped its result")),
        },
        Err(e) => Err(ActionError::fail(format!("dedicated worker spawn: {e}"))),
    }
}

/// Sleeps unless cancellation fires first; false means cancelled.
async fn sleep_cancellable(dur: Duration, token: &CancellationToken) -> bool {
    select! {
        _ = time::sleep(dur) => true,
        _ = token.cancelled() => false,
    }
}

fn take_crash(slot: &Mutex<Option<String>>) -> Option<String> {
    slot.lock().ok().and_then(|mut g| g.take())
}

//! # chronovisor
//!
//! **Chronovisor** is a lightweight recurring-action runtime for Rust.
//!
//! It provides primitives to define scheduled async actions, decide when
//! they run via pluggable [`Scheduler`] policies, and supervise their
//! execution loops with per-action failure policies, time budgets, and
//! diagnostics. The crate is designed as a building block for services
//! that need periodic maintenance work (compaction, refresh, cleanup)
//! without a full job-queue system.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  ActionSpec  │   │  ActionSpec  │   │  ActionSpec  │
//!     │ (payload #1) │   │ (payload #2) │   │ (payload #3) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  RunnerSet (runtime orchestrator)                                 │
//! │  - Bus (broadcast events)                                         │
//! │  - SubscriberSet (fans out to user subscribers)                   │
//! │  - one Monitor per action (stats for diagnostics)                 │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │ ActionRunner │   │ ActionRunner │   │ ActionRunner │   │
//!     │ (wait + run) │   │ (wait + run) │   │ (wait + run) │   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │                  │                  │                 │
//!      │ Publishes        │ Publishes        │ Publishes       │
//!      │ Events:          │ Events:          │ Events:         │
//!      │ - NextRunComp.   │ - IterStarting   │ - SchedFailed   │
//!      │ - IterSucceeded  │ - IterFailed     │ - BudgetExc.    │
//!      │                  │                  │                 │
//!      ▼                  ▼                  ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                   (capacity: Config::bus_capacity)                │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       │    (in RunnerSet)      │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                           (per-sub queues)
//!                        ┌─────────┼─────────┐
//!                        ▼         ▼         ▼
//!                        worker1  worker2  workerN
//!                        ▼         ▼         ▼
//!                   sub1.on   sub2.on   subN.on
//!                    _event()  _event()  _event()
//! ```
//!
//! ### Lifecycle
//! ```text
//! ActionSpec ──► RunnerSet ──► ActionRunner::run(token)
//!
//! loop {
//!   ├─► WAIT: next = scheduler.next_run(last_run)
//!   │     ├─ Err + crash_on_scheduler_error ─► RunnerCrashed, exit
//!   │     ├─ Err                            ─► SchedulerFailed, treat unknown
//!   │     ├─ unknown     ─► sleep(actualization), re-poll
//!   │     ├─ overdue     ─► due immediately (one catch-up, no backfill)
//!   │     ├─ far future  ─► sleep(actualization), re-validate
//!   │     └─ near future ─► sleep remainder, fine-grain poll to the slot
//!   │
//!   ├─► EXECUTE: budget = scheduler.next_run(fired_at)
//!   │     ├─► publish IterationStarting{ action, iteration, budget }
//!   │     ├─► payload runs (shared pool or dedicated thread)
//!   │     ├─► over budget ─► publish BudgetExceeded (never fatal)
//!   │     ├─ Ok  ──► IterationSucceeded + scheduler.on_iteration_succeeded()
//!   │     └─ Err ──► IterationFailed + scheduler.on_iteration_failed(&e)
//!   │                └─ crash_on_payload_error ─► RunnerCrashed, exit
//!   │
//!   └─ exit conditions:
//!        - token cancelled (shutdown) ─► RunnerFinished
//!        - payload returned Canceled  ─► RunnerFinished
//!        - crash policy applied       ─► RunnerCrashed
//! }
//!
//! RunnerSet::run returns once every runner exited; crashed runners are
//! aggregated into RuntimeError::RunnersCrashed.
//! ```
//!
//! ## Features
//! | Area              | Description                                                              | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------------------|---------------------------------------------|
//! | **Scheduling**    | Decide when an action runs; answers may be unknown and may change.       | [`Scheduler`], [`SchedulerRef`]             |
//! | **Actions**       | Define payloads as functions or specs, easy to compose and run.          | [`ActionRef`], [`ActionFn`], [`ActionSpec`] |
//! | **Supervision**   | Run a fixed roster of actions under one shared token.                    | [`RunnerSet`], [`RunnerSetBuilder`]         |
//! | **Budgets**       | Bound each iteration by the time until its next slot.                    | [`TimeBudget`]                              |
//! | **Diagnostics**   | Per-action stats and a health predicate for info/health endpoints.       | [`ActionInfo`], [`Health`], [`Stats`]       |
//! | **Subscriber API**| Hook into runtime events (logging, metrics, custom subscribers).         | [`Subscribe`]                               |
//! | **Errors**        | Typed errors per failure domain with per-action crash policies.          | [`ActionError`], [`ScheduleError`], [`RuntimeError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::{Duration, SystemTime};
//! use tokio_util::sync::CancellationToken;
//! use chronovisor::{
//!     ActionContext, ActionError, ActionFn, Config, RunnerSetBuilder, ScheduleError, Scheduler,
//! };
//!
//! /// Fires a fixed interval after the previous execution.
//! struct Every(Duration);
//!
//! impl Scheduler for Every {
//!     fn next_run(&self, after: SystemTime) -> Result<Option<SystemTime>, ScheduleError> {
//!         Ok(Some(after + self.0))
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn chronovisor::Subscribe>> = {
//!         use chronovisor::LogWriter;
//!         vec![Arc::new(LogWriter::default())]
//!     };
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn chronovisor::Subscribe>> = Vec::new();
//!
//!     let tick = ActionFn::arc("tick", |_ctx: ActionContext| async move {
//!         println!("tick");
//!         Ok::<(), ActionError>(())
//!     });
//!
//!     let set = RunnerSetBuilder::new(Config::default())
//!         .with_subscribers(subs)
//!         .action(tick, Arc::new(Every(Duration::from_millis(50))))
//!         .build();
//!
//!     // Host-owned lifecycle; production services can use
//!     // `set.run_until_signal()` to react to SIGINT/SIGTERM instead.
//!     let token = CancellationToken::new();
//!     let stop = token.clone();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_millis(120)).await;
//!         stop.cancel();
//!     });
//!
//!     set.run(token).await?;
//!     Ok(())
//! }
//! ```

mod actions;
mod core;
mod error;
mod events;
mod monitor;
mod schedule;
mod subscribers;

// ---- Public re-exports ----

pub use actions::{Action, ActionContext, ActionFn, ActionOptions, ActionRef, ActionSpec, TimeBudget};
pub use core::{Config, RunnerSet, RunnerSetBuilder};
pub use error::{ActionError, CrashReport, RuntimeError, ScheduleError};
pub use events::{Bus, Event, EventKind};
pub use monitor::{ActionInfo, Health, Monitor, Stats, DEFAULT_STALE_AFTER};
pub use schedule::{Scheduler, SchedulerRef};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

//! # RunnerSet: orchestrates action runners and event fan-out.
//!
//! The [`RunnerSet`] owns the event bus, a [`SubscriberSet`], and the
//! registered [`ActionSpec`]s with their monitors. It spawns one
//! [`ActionRunner`] per spec under a shared [`CancellationToken`] and waits
//! for all of them to exit.
//!
//! ## Key responsibilities
//! - subscribe to the [`Bus`] and **fan-out** events via [`SubscriberSet`]
//! - spawn one runner per action, all sharing the host's token
//! - aggregate crash-policy exits into [`RuntimeError::RunnersCrashed`]
//! - expose on-demand [`ActionInfo`] snapshots for diagnostics
//!
//! ## High-level architecture
//! ```text
//! Construction:
//!   RunnerSetBuilder ──► RunnerSet { cfg, bus, subs, entries }
//!                          entries[i] = (ActionSpec, Arc<Monitor>)
//!
//! run(token):
//!   - subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!   - for each entry: tokio::spawn(ActionRunner::run(token.clone()))
//!   - await every runner handle, collect CrashReports
//!   - all Finished         → Ok(())
//!   - any Crashed/panicked → Err(RunnersCrashed { crashed })
//!
//! Event flow:
//!   ActionRunner ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit
//!                                                      ┌─────────┬─────────┐
//!                                                      ▼         ▼         ▼
//!                                               [queue S1] [queue S2] ... [queue SN]
//!
//! Shutdown path (run_until_signal):
//!   wait_for_shutdown_signal()
//!            └─► Bus.publish(ShutdownRequested)
//!            └─► token.cancel()  → every runner exits at its next checkpoint
//!            └─► await run()     → aggregate result
//! ```
//!
//! ## Rules
//! - A crashed runner never takes its siblings down: the set keeps running
//!   and the crash surfaces in the aggregate error once everything exited.
//! - `run` completes only when **all** runners have exited.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::actions::ActionSpec;
use crate::core::{
    config::Config,
    runner::{ActionRunner, RunnerExit},
    shutdown,
};
use crate::error::{CrashReport, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::monitor::{ActionInfo, Monitor};
use crate::subscribers::{Subscribe, SubscriberSet};

/// One registered action with its runner-owned statistics.
struct RunnerEntry {
    spec: ActionSpec,
    monitor: Arc<Monitor>,
}

/// Coordinates action runners, event delivery, and shutdown.
///
/// Build one with [`RunnerSetBuilder`](crate::RunnerSetBuilder), then drive
/// it with [`run`](RunnerSet::run) (host-owned token) or
/// [`run_until_signal`](RunnerSet::run_until_signal) (OS signals).
pub struct RunnerSet {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    entries: Vec<RunnerEntry>,
}

impl RunnerSet {
    /// Creates a set from explicit parts.
    ///
    /// Most hosts go through [`RunnerSetBuilder`](crate::RunnerSetBuilder)
    /// instead.
    pub fn new(
        cfg: Config,
        subscribers: Vec<Arc<dyn Subscribe>>,
        specs: Vec<ActionSpec>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(subscribers, bus.clone()));
        let entries = specs
            .into_iter()
            .map(|spec| RunnerEntry {
                spec,
                monitor: Arc::new(Monitor::new()),
            })
            .collect();
        Self {
            cfg,
            bus,
            subs,
            entries,
        }
    }

    /// The shared event bus; hosts may subscribe for their own observation.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The configuration this set was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Assembles a fresh diagnostics snapshot per registered action.
    ///
    /// Safe to call at any time, including while [`run`](RunnerSet::run) is
    /// in flight.
    pub fn infos(&self) -> Vec<ActionInfo> {
        self.entries
            .iter()
            .map(|e| ActionInfo {
                name: e.spec.name().to_string(),
                scheduler: e.spec.scheduler().describe(),
                options: e.spec.options(),
                stats: e.monitor.snapshot(),
            })
            .collect()
    }

    /// Runs every registered action until the shared token is cancelled and
    /// all runners have exited.
    ///
    /// Returns `Ok(())` when every runner finished normally, or
    /// [`RuntimeError::RunnersCrashed`] listing each runner that terminated
    /// via its crash policy (or panicked), in exit order.
    pub async fn run(&self, token: CancellationToken) -> Result<(), RuntimeError> {
        self.subscriber_listener();

        let mut handles = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let runner = ActionRunner::new(
                entry.spec.clone(),
                Arc::clone(&entry.monitor),
                self.bus.clone(),
            );
            let name = entry.spec.name().to_string();
            handles.push((name, tokio::spawn(runner.run(token.clone()))));
        }

        let mut crashed = Vec::new();
        for (action, handle) in handles {
            match handle.await {
                Ok(RunnerExit::Finished) => {}
                Ok(RunnerExit::Crashed { reason }) => {
                    crashed.push(CrashReport { action, reason });
                }
                Err(e) => crashed.push(CrashReport {
                    action,
                    reason: format!("runner task panicked: {e}"),
                }),
            }
        }

        if crashed.is_empty() {
            Ok(())
        } else {
            Err(RuntimeError::RunnersCrashed { crashed })
        }
    }

    /// Runs until an OS termination signal arrives, then cancels every
    /// runner and waits for the set to drain.
    ///
    /// Publishes [`EventKind::ShutdownRequested`] before cancelling. Hosts
    /// that manage their own lifecycle should call [`run`](RunnerSet::run)
    /// with their own token instead.
    pub async fn run_until_signal(&self) -> Result<(), RuntimeError> {
        let token = CancellationToken::new();
        let run = self.run(token.clone());
        tokio::pin!(run);

        tokio::select! {
            result = &mut run => result,
            _ = shutdown::wait_for_shutdown_signal() => {
                self.bus.publish(Event::now(EventKind::ShutdownRequested));
                token.cancel();
                run.await
            }
        }
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget).
    ///
    /// The forwarding task ends when the bus closes (set dropped). A lagged
    /// receiver skips the overwritten events and keeps going.
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let subs = Arc::clone(&self.subs);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => subs.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionContext, ActionFn, ActionOptions};
    use crate::error::{ActionError, ScheduleError};
    use crate::schedule::Scheduler;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, SystemTime};

    struct Every(Duration);

    impl Scheduler for Every {
        fn next_run(&self, after: SystemTime) -> Result<Option<SystemTime>, ScheduleError> {
            Ok(Some(after + self.0))
        }
        fn describe(&self) -> String {
            format!("every {:?}", self.0)
        }
    }

    fn counting(name: &'static str, count: Arc<AtomicUsize>) -> ActionSpec {
        let action = ActionFn::arc(name, move |_ctx: ActionContext| {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        ActionSpec::new(
            action,
            Arc::new(Every(Duration::from_millis(30))),
            ActionOptions::default(),
        )
    }

    fn crashing(name: &'static str) -> ActionSpec {
        let action = ActionFn::arc(name, |_ctx: ActionContext| async move {
            Err(ActionError::fail("broken payload"))
        });
        ActionSpec::new(
            action,
            Arc::new(Every(Duration::from_millis(20))),
            ActionOptions {
                crash_on_payload_error: true,
                ..ActionOptions::default()
            },
        )
    }

    #[tokio::test]
    async fn test_all_runners_finish_cleanly() {
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let set = RunnerSet::new(
            Config::default(),
            Vec::new(),
            vec![counting("a", a.clone()), counting("b", b.clone())],
        );

        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            cancel.cancel();
        });

        set.run(token).await.expect("clean shutdown");
        assert!(a.load(Ordering::SeqCst) >= 1);
        assert!(b.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_crashes_are_aggregated_per_runner() {
        let healthy = Arc::new(AtomicUsize::new(0));
        let set = RunnerSet::new(
            Config::default(),
            Vec::new(),
            vec![
                crashing("bad-one"),
                crashing("bad-two"),
                counting("good", healthy.clone()),
            ],
        );

        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            cancel.cancel();
        });

        let err = set.run(token).await.expect_err("two runners crash");
        let RuntimeError::RunnersCrashed { crashed } = err;
        let mut names: Vec<_> = crashed.iter().map(|c| c.action.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, ["bad-one", "bad-two"]);
        assert!(crashed.iter().all(|c| c.reason.contains("broken payload")));
        assert!(
            healthy.load(Ordering::SeqCst) >= 1,
            "sibling crashes must not stop a healthy runner"
        );
    }

    #[tokio::test]
    async fn test_infos_reflect_live_statistics() {
        let count = Arc::new(AtomicUsize::new(0));
        let set = RunnerSet::new(Config::default(), Vec::new(), vec![counting("probe", count)]);
        assert_eq!(set.len(), 1);

        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            cancel.cancel();
        });
        set.run(token).await.unwrap();

        let infos = set.infos();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].name, "probe");
        assert!(infos[0].scheduler.starts_with("every"));
        let stats = &infos[0].stats;
        assert!(stats.iterations_succeeded >= 1);
        assert!(!stats.in_flight);
        assert!(infos[0].health(SystemTime::now()).is_healthy());
    }

    struct Counter(Arc<AtomicUsize>);

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn name(&self) -> &'static str {
            "counter"
        }
    }

    #[tokio::test]
    async fn test_runner_events_reach_subscribers() {
        let seen = Arc::new(AtomicUsize::new(0));
        let count = Arc::new(AtomicUsize::new(0));
        let set = RunnerSet::new(
            Config::default(),
            vec![Arc::new(Counter(seen.clone())) as Arc<dyn Subscribe>],
            vec![counting("probe", count)],
        );

        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            cancel.cancel();
        });
        set.run(token).await.unwrap();

        // subscriber queues drain asynchronously
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(
            seen.load(Ordering::SeqCst) >= 2,
            "at least next-run and iteration events expected"
        );
    }
}

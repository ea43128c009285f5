//! # Fluent assembly of a [`RunnerSet`].
//!
//! [`RunnerSetBuilder`] collects subscribers and action registrations, then
//! produces a ready-to-run [`RunnerSet`]. Registration is one-shot: the set
//! of actions is fixed at [`build`](RunnerSetBuilder::build) and runners are
//! never added or removed afterwards.
//!
//! ## Example
//! ```rust
//! use chronovisor::{
//!     ActionContext, ActionError, ActionFn, Config, RunnerSetBuilder, ScheduleError, Scheduler,
//! };
//! use std::sync::Arc;
//! use std::time::{Duration, SystemTime};
//!
//! struct Every(Duration);
//!
//! impl Scheduler for Every {
//!     fn next_run(&self, after: SystemTime) -> Result<Option<SystemTime>, ScheduleError> {
//!         Ok(Some(after + self.0))
//!     }
//! }
//!
//! let tick = ActionFn::arc("tick", |_ctx: ActionContext| async move {
//!     Ok::<(), ActionError>(())
//! });
//!
//! let set = RunnerSetBuilder::new(Config::default())
//!     .action(tick, Arc::new(Every(Duration::from_secs(30))))
//!     .build();
//! assert_eq!(set.len(), 1);
//! ```

use std::sync::Arc;

use crate::actions::{ActionOptions, ActionRef, ActionSpec};
use crate::core::{Config, RunnerSet};
use crate::schedule::SchedulerRef;
use crate::subscribers::Subscribe;

/// Collects configuration, subscribers, and actions for a [`RunnerSet`].
pub struct RunnerSetBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    specs: Vec<ActionSpec>,
}

impl RunnerSetBuilder {
    /// Starts a builder with the given global configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            specs: Vec::new(),
        }
    }

    /// Adds one event subscriber.
    pub fn subscriber(mut self, sub: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(sub);
        self
    }

    /// Adds a batch of event subscribers.
    pub fn with_subscribers(mut self, subs: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers.extend(subs);
        self
    }

    /// Registers an action with options inherited from the configuration.
    pub fn action(mut self, action: ActionRef, scheduler: SchedulerRef) -> Self {
        self.specs
            .push(ActionSpec::with_defaults(action, scheduler, &self.cfg));
        self
    }

    /// Registers an action with explicit options.
    pub fn action_with(
        mut self,
        action: ActionRef,
        scheduler: SchedulerRef,
        options: ActionOptions,
    ) -> Self {
        self.specs.push(ActionSpec::new(action, scheduler, options));
        self
    }

    /// Registers a fully formed specification.
    pub fn spec(mut self, spec: ActionSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Assembles the set; this fixes the action roster for its lifetime.
    pub fn build(self) -> RunnerSet {
        RunnerSet::new(self.cfg, self.subscribers, self.specs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionContext;
    use crate::error::{ActionError, ScheduleError};
    use crate::schedule::Scheduler;
    use crate::actions::ActionFn;
    use std::time::{Duration, SystemTime};

    struct Never;

    impl Scheduler for Never {
        fn next_run(&self, _after: SystemTime) -> Result<Option<SystemTime>, ScheduleError> {
            Ok(None)
        }
    }

    fn noop(name: &'static str) -> ActionRef {
        ActionFn::arc(name, |_ctx: ActionContext| async move {
            Ok::<(), ActionError>(())
        })
    }

    #[test]
    fn test_actions_inherit_config_defaults() {
        let cfg = Config {
            options: ActionOptions {
                actualization: Duration::from_millis(250),
                ..ActionOptions::default()
            },
            ..Config::default()
        };
        let set = RunnerSetBuilder::new(cfg)
            .action(noop("inherits"), Arc::new(Never))
            .build();

        let infos = set.infos();
        assert_eq!(infos[0].options.actualization, Duration::from_millis(250));
    }

    #[test]
    fn test_explicit_options_override_defaults() {
        let options = ActionOptions {
            allow_overlap: true,
            ..ActionOptions::default()
        };
        let set = RunnerSetBuilder::new(Config::default())
            .action_with(noop("explicit"), Arc::new(Never), options)
            .build();

        assert!(set.infos()[0].options.allow_overlap);
    }

    #[test]
    fn test_roster_accumulates_in_registration_order() {
        let set = RunnerSetBuilder::new(Config::default())
            .action(noop("first"), Arc::new(Never))
            .action(noop("second"), Arc::new(Never))
            .build();

        let names: Vec<_> = set.infos().into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn test_empty_builder_yields_empty_set() {
        let set = RunnerSetBuilder::new(Config::default()).build();
        assert!(set.is_empty());
    }
}

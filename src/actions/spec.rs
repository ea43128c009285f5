//! # Action specification for scheduled execution.
//!
//! Defines [`ActionSpec`], the immutable descriptor that bundles a payload
//! with the scheduler deciding when it runs and the [`ActionOptions`]
//! shaping its runner loop.
//!
//! A spec can be created:
//! - **Explicitly** with [`ActionSpec::new`] (full control)
//! - **From config** with [`ActionSpec::with_defaults`] (inherit option defaults)
//!
//! ## Rules
//! - Specs are created once at registration and never mutated; exactly one
//!   runner owns each spec for the process lifetime.

use crate::actions::action::ActionRef;
use crate::actions::options::ActionOptions;
use crate::core::Config;
use crate::schedule::SchedulerRef;

/// Specification for running an action under the chronovisor runtime.
///
/// Bundles together:
/// - The payload itself ([`ActionRef`])
/// - The scheduling policy ([`SchedulerRef`](crate::SchedulerRef))
/// - Execution options ([`ActionOptions`])
///
/// ## Example
/// ```rust
/// use chronovisor::{ActionContext, ActionError, ActionFn, ActionOptions, ActionSpec};
/// # use std::sync::Arc;
/// # use std::time::SystemTime;
/// # use chronovisor::{ScheduleError, Scheduler};
/// # struct Never;
/// # impl Scheduler for Never {
/// #     fn next_run(&self, _: SystemTime) -> Result<Option<SystemTime>, ScheduleError> { Ok(None) }
/// # }
///
/// let ping = ActionFn::arc("ping", |_ctx: ActionContext| async move {
///     Ok::<(), ActionError>(())
/// });
/// let spec = ActionSpec::new(ping, Arc::new(Never), ActionOptions::default());
/// assert_eq!(spec.name(), "ping");
/// ```
#[derive(Clone)]
pub struct ActionSpec {
    action: ActionRef,
    scheduler: SchedulerRef,
    options: ActionOptions,
}

impl ActionSpec {
    /// Creates a new action specification with explicit options.
    pub fn new(action: ActionRef, scheduler: SchedulerRef, options: ActionOptions) -> Self {
        Self {
            action,
            scheduler,
            options,
        }
    }

    /// Creates a specification inheriting option defaults from global config.
    pub fn with_defaults(action: ActionRef, scheduler: SchedulerRef, cfg: &Config) -> Self {
        Self {
            action,
            scheduler,
            options: cfg.options,
        }
    }

    /// Returns a reference to the payload.
    pub fn action(&self) -> &ActionRef {
        &self.action
    }

    /// Returns a reference to the scheduler.
    pub fn scheduler(&self) -> &SchedulerRef {
        &self.scheduler
    }

    /// Convenience: returns the action name.
    pub fn name(&self) -> &str {
        self.action.name()
    }

    /// Returns the execution options.
    pub fn options(&self) -> ActionOptions {
        self.options
    }

    /// Returns a new spec with updated options.
    pub fn with_options(mut self, options: ActionOptions) -> Self {
        self.options = options;
        self
    }
}

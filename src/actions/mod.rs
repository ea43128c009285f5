//! # Action abstractions and specifications.
//!
//! This module provides the action-related types:
//! - [`Action`] - trait for implementing async cancelable payloads
//! - [`ActionFn`] - function-based payload implementation
//! - [`ActionRef`] - shared reference to a payload (`Arc<dyn Action>`)
//! - [`ActionSpec`] - descriptor bundling payload, scheduler, and options
//! - [`ActionOptions`] - per-action loop/failure/placement knobs
//! - [`ActionContext`] - per-iteration value handed to the payload
//! - [`TimeBudget`] - remaining time until the next scheduled slot

mod action;
mod action_fn;
mod budget;
mod context;
mod options;
mod spec;

pub use action::{Action, ActionRef};
pub use action_fn::ActionFn;
pub use budget::TimeBudget;
pub use context::ActionContext;
pub use options::ActionOptions;
pub use spec::ActionSpec;

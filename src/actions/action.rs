//! # Action abstraction.
//!
//! This module defines the [`Action`] trait, the payload contract for a
//! scheduled action. The common handle type is [`ActionRef`], an
//! `Arc<dyn Action>` suitable for sharing across the runtime.
//!
//! A payload receives an [`ActionContext`] carrying the execution timestamp,
//! the time budget until the next scheduled slot, a reference to the
//! scheduler that produced this execution, and a [`CancellationToken`]. It
//! should periodically check cancellation and exit promptly during shutdown.

use std::sync::Arc;

use async_trait::async_trait;

use crate::actions::context::ActionContext;
use crate::error::ActionError;

/// Shared handle to an action payload.
pub type ActionRef = Arc<dyn Action>;

/// # Asynchronous, cancelable unit of recurring work.
///
/// An `Action` has a stable [`name`](Action::name) and an async
/// [`run`](Action::run) method invoked once per scheduled iteration.
/// Implementors should regularly check `ctx.token` and exit promptly during
/// shutdown, and may consult `ctx.budget` to self-limit long-running work.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use chronovisor::{Action, ActionContext, ActionError};
///
/// struct Compact;
///
/// #[async_trait]
/// impl Action for Compact {
///     fn name(&self) -> &str { "compact" }
///
///     async fn run(&self, ctx: ActionContext) -> Result<(), ActionError> {
///         if ctx.token.is_cancelled() {
///             return Err(ActionError::Canceled);
///         }
///         // do one round of work, keeping an eye on ctx.budget...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Action: Send + Sync + 'static {
    /// Returns a stable, human-readable action name.
    fn name(&self) -> &str;

    /// Executes one iteration of the action.
    ///
    /// Return `Err(ActionError::Canceled)` when cancellation was observed;
    /// the runner treats it as graceful termination, never as a failure.
    async fn run(&self, ctx: ActionContext) -> Result<(), ActionError>;
}

//! # Function-backed action (`ActionFn`)
//!
//! [`ActionFn`] wraps a closure `F: Fn(ActionContext) -> Fut`, producing a
//! fresh future per iteration. This avoids shared mutable state between
//! iterations; if shared state is needed, move an `Arc<...>` into the
//! closure explicitly.
//!
//! ## Example
//! ```rust
//! use chronovisor::{ActionContext, ActionError, ActionFn, ActionRef};
//!
//! let a: ActionRef = ActionFn::arc("refresh-cache", |ctx: ActionContext| async move {
//!     if ctx.token.is_cancelled() {
//!         return Err(ActionError::Canceled);
//!     }
//!     // refresh...
//!     Ok(())
//! });
//!
//! assert_eq!(a.name(), "refresh-cache");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::actions::action::Action;
use crate::actions::context::ActionContext;
use crate::error::ActionError;

/// Function-backed action implementation.
///
/// Wraps a closure that *creates* a new future per iteration.
pub struct ActionFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ActionFn<F> {
    /// Creates a new function-backed action.
    ///
    /// Prefer [`ActionFn::arc`] when you immediately need an [`ActionRef`](crate::ActionRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the action and returns it as a shared handle (`Arc<Self>`).
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Action for ActionFn<F>
where
    F: Fn(ActionContext) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: ActionContext) -> Result<(), ActionError> {
        (self.f)(ctx).await
    }
}

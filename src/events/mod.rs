//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the runner set, action
//! runners, and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `RunnerSet`, `ActionRunner`, `SubscriberSet` workers
//!   (overflow/panic).
//! - **Consumers**: `RunnerSet`'s subscriber listener, which fans events out
//!   to the user-provided [`Subscribe`](crate::Subscribe) implementations.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

//! # Event subscribers for the chronovisor runtime.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out used to deliver runtime events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   ActionRunner ── publish(Event) ──► Bus ──► RunnerSet listener
//!                                                  │
//!                                             SubscriberSet::emit(&Event)
//!                                        ┌─────────┼─────────┐
//!                                        ▼         ▼         ▼
//!                                    LogWriter  Metrics   Custom...
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use async_trait::async_trait;
//! use chronovisor::{Event, EventKind, Subscribe};
//!
//! struct MetricsSubscriber;
//!
//! #[async_trait]
//! impl Subscribe for MetricsSubscriber {
//!     async fn on_event(&self, event: &Event) {
//!         if let EventKind::IterationFailed = event.kind {
//!             // increment failure counter
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;

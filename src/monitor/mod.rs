//! Per-action statistics and diagnostics snapshots.
//!
//! ## Contents
//! - [`Monitor`], [`Stats`]: single-writer atomic counters with on-demand
//!   snapshots (written by the runner, read by diagnostics)
//! - [`ActionInfo`], [`Health`]: the read-only view and health predicate
//!   exposed to the host's diagnostics system

mod info;
#[allow(clippy::module_inception)]
mod monitor;

pub use info::{ActionInfo, Health, DEFAULT_STALE_AFTER};
pub use monitor::{Monitor, Stats};

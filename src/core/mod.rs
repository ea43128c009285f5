//! Runtime core: orchestration and lifecycle.
//!
//! This module contains the embedded implementation of the chronovisor
//! runtime. The public API from this module is [`RunnerSet`] (orchestrates
//! execution, event fan-out, and shutdown), its [`RunnerSetBuilder`], and
//! the global [`Config`].
//!
//! Internal modules:
//! - [`runner`]: the per-action wait/execute loop with failure policies;
//! - [`set`]: spawns runners under a shared token and aggregates exits;
//! - [`builder`]: fluent assembly of a runner set;
//! - [`config`]: global runtime configuration;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod config;
mod runner;
mod set;
mod shutdown;

pub use builder::RunnerSetBuilder;
pub use config::Config;
pub use set::RunnerSet;

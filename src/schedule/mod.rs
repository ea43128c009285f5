//! Scheduling policy contract.
//!
//! This module defines what a scheduling policy must provide (the
//! [`Scheduler`] trait with its feedback hooks) and nothing else. Concrete
//! policies (fixed interval, cron, adaptive backoff) are written by the
//! embedding application; the runtime only ever talks to the trait.

mod scheduler;

pub use scheduler::{Scheduler, SchedulerRef};

//! # Global runtime configuration.
//!
//! Provides [`Config`], centralized settings for the chronovisor runtime.
//!
//! Config is used in two ways:
//! 1. **Runner set creation**: `RunnerSetBuilder::new(config)`
//! 2. **Spec defaults**: `ActionSpec::with_defaults(action, scheduler, &config)`

use crate::actions::ActionOptions;

/// Global configuration for the chronovisor runtime.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `options`: Default per-action options, inherited by
///   [`ActionSpec::with_defaults`](crate::ActionSpec::with_defaults) and
///   overridable per action
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages
    /// will receive `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Default options for actions registered without explicit options.
    pub options: ActionOptions,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024` (good baseline)
    /// - `options = ActionOptions::default()` (serialize iterations, swallow
    ///   failures, 5s actualization)
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            options: ActionOptions::default(),
        }
    }
}

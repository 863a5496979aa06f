//! Per-system cadence configuration.

use serde::{Deserialize, Serialize};

/// How often, and at which phase, a system runs.
///
/// An `interval_ms` of zero means the system runs on every
/// [`Scheduler::run_systems`](crate::Scheduler::run_systems) call and
/// `stagger_ms` is ignored. Otherwise the system fires on timestamps `t`
/// with `t ≡ (interval_ms - stagger_ms) (mod interval_ms)`, which lets
/// systems sharing an interval be spread over different frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Cadence in milliseconds. `0` = every run.
    pub interval_ms: u64,
    /// Phase offset within the interval, in milliseconds.
    pub stagger_ms: u64,
}

impl ScheduleConfig {
    /// Run on every pass, regardless of reference time.
    #[must_use]
    pub const fn every_run() -> Self {
        Self {
            interval_ms: 0,
            stagger_ms: 0,
        }
    }

    /// Run once every `interval_ms` milliseconds.
    #[must_use]
    pub const fn every(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            stagger_ms: 0,
        }
    }

    /// Shift the firing phase by `stagger_ms`.
    #[must_use]
    pub const fn with_stagger(mut self, stagger_ms: u64) -> Self {
        self.stagger_ms = stagger_ms;
        self
    }

    /// `true` when the system is not gated by time at all.
    #[must_use]
    pub const fn is_every_run(&self) -> bool {
        self.interval_ms == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_every_run() {
        assert_eq!(ScheduleConfig::default(), ScheduleConfig::every_run());
        assert!(ScheduleConfig::default().is_every_run());
    }

    #[test]
    fn test_builder() {
        let config = ScheduleConfig::every(250).with_stagger(50);
        assert_eq!(config.interval_ms, 250);
        assert_eq!(config.stagger_ms, 50);
        assert!(!config.is_every_run());
    }
}

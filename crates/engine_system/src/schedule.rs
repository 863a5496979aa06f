//! Schedule entries and the due-time arithmetic.

use std::fmt;

use engine_component::ComponentStore;

use crate::config::ScheduleConfig;
use crate::system::SharedSystem;

/// Smallest timestamp `t >= reference_time` on which a system with this
/// cadence fires.
///
/// For `interval == 0` this is `reference_time` itself. Otherwise the firing
/// phase is `offset = (interval - stagger) mod interval` and the result is the
/// smallest `t >= reference_time` with `t mod interval == offset`. The phase
/// is anchored at time zero, so it does not depend on when the system was
/// activated.
#[must_use]
pub fn first_due_time(config: ScheduleConfig, reference_time: u64) -> u64 {
    let interval = config.interval_ms;
    if interval == 0 {
        return reference_time;
    }
    // `stagger` may exceed `interval`; reduce it first so nothing underflows.
    let offset = (interval - config.stagger_ms % interval) % interval;
    let phase = reference_time % interval;
    let delta = if offset >= phase {
        offset - phase
    } else {
        interval - (phase - offset)
    };
    reference_time.saturating_add(delta)
}

/// One active (or pending) system together with its cadence.
pub struct ScheduleEntry<S: ComponentStore> {
    name: String,
    system: SharedSystem<S>,
    config: ScheduleConfig,
    next_execution_time: u64,
}

impl<S: ComponentStore> ScheduleEntry<S> {
    /// Bind `system` to `name` and compute its first due time relative to
    /// `reference_time`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        system: SharedSystem<S>,
        config: ScheduleConfig,
        reference_time: u64,
    ) -> Self {
        Self {
            name: name.into(),
            system,
            config,
            next_execution_time: first_due_time(config, reference_time),
        }
    }

    /// Returns the name the system was activated under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a reference to the shared system instance.
    #[must_use]
    pub fn system(&self) -> &SharedSystem<S> {
        &self.system
    }

    /// Returns the interval and stagger the entry was scheduled with.
    #[must_use]
    pub fn config(&self) -> ScheduleConfig {
        self.config
    }

    /// Next timestamp at which the entry is due. Meaningless for every-run
    /// entries.
    #[must_use]
    pub fn next_execution_time(&self) -> u64 {
        self.next_execution_time
    }

    /// Whether the entry should run at `reference_time`.
    #[must_use]
    pub fn is_due(&self, reference_time: u64) -> bool {
        self.config.is_every_run() || reference_time >= self.next_execution_time
    }

    /// Move the due time forward by one interval. Every-run entries stay
    /// perpetually due.
    pub fn advance(&mut self) {
        if !self.config.is_every_run() {
            self.next_execution_time = self
                .next_execution_time
                .saturating_add(self.config.interval_ms);
        }
    }
}

impl<S: ComponentStore> fmt::Debug for ScheduleEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleEntry")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("next_execution_time", &self.next_execution_time)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use engine_component::{Entity, Signature, World};

    use super::*;
    use crate::context::SystemContext;
    use crate::system::{SharedSystem, System, share};

    struct Idle;

    fn idle() -> SharedSystem<World> {
        share(Idle)
    }

    impl System<World> for Idle {
        fn signature(&self) -> Signature {
            Signature::new()
        }

        fn execute(&mut self, _: &mut SystemContext<'_, World>, _: &mut World, _: Entity) {}
    }

    fn due_times(config: ScheduleConfig, reference_time: u64, count: usize) -> Vec<u64> {
        let mut entry = ScheduleEntry::new("idle", idle(), config, reference_time);
        let mut times = Vec::with_capacity(count);
        for _ in 0..count {
            times.push(entry.next_execution_time());
            entry.advance();
        }
        times
    }

    #[test]
    fn test_interval_four_stagger_one() {
        assert_eq!(
            due_times(ScheduleConfig::every(4).with_stagger(1), 10, 3),
            vec![11, 15, 19]
        );
    }

    #[test]
    fn test_interval_five_stagger_one() {
        assert_eq!(
            due_times(ScheduleConfig::every(5).with_stagger(1), 10, 3),
            vec![14, 19, 24]
        );
    }

    #[test]
    fn test_no_stagger_aligns_to_multiples() {
        assert_eq!(first_due_time(ScheduleConfig::every(4), 5), 8);
        assert_eq!(first_due_time(ScheduleConfig::every(3), 0), 0);
        assert_eq!(first_due_time(ScheduleConfig::every(4), 8), 8);
    }

    #[test]
    fn test_stagger_larger_than_interval_wraps() {
        // stagger 5 on interval 4 behaves like stagger 1.
        assert_eq!(
            first_due_time(ScheduleConfig::every(4).with_stagger(5), 10),
            first_due_time(ScheduleConfig::every(4).with_stagger(1), 10)
        );
        // stagger equal to the interval is the same as no stagger.
        assert_eq!(
            first_due_time(ScheduleConfig::every(4).with_stagger(4), 5),
            8
        );
    }

    #[test]
    fn test_first_due_time_is_congruent_and_minimal() {
        for interval in 1..=7u64 {
            for stagger in 0..=8u64 {
                for reference_time in 0..=30u64 {
                    let config = ScheduleConfig::every(interval).with_stagger(stagger);
                    let t = first_due_time(config, reference_time);
                    let offset = (interval - stagger % interval) % interval;
                    assert!(t >= reference_time);
                    assert!(t - reference_time < interval);
                    assert_eq!(t % interval, offset);
                }
            }
        }
    }

    #[test]
    fn test_every_run_always_due_and_never_advances() {
        let mut entry =
            ScheduleEntry::new("idle", idle(), ScheduleConfig::every_run(), 42);
        assert!(entry.is_due(0));
        assert!(entry.is_due(42));
        entry.advance();
        assert_eq!(entry.next_execution_time(), 42);
        assert!(entry.is_due(1));
    }

    #[test]
    fn test_interval_entry_due_only_at_or_after_next_time() {
        let config = ScheduleConfig::every(4).with_stagger(1);
        let mut entry = ScheduleEntry::new("idle", idle(), config, 10);
        assert!(!entry.is_due(10));
        assert!(entry.is_due(11));
        entry.advance();
        assert!(!entry.is_due(11));
        assert!(entry.is_due(15));
    }

    #[test]
    fn test_saturates_near_end_of_time() {
        let mut entry =
            ScheduleEntry::new("idle", idle(), ScheduleConfig::every(10), u64::MAX - 3);
        assert_eq!(entry.next_execution_time(), u64::MAX);
        entry.advance();
        assert_eq!(entry.next_execution_time(), u64::MAX);
    }
}

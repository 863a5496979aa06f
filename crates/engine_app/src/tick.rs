//! Host frame loop.
//!
//! Each tick:
//!
//! 1. Renormalize the scheduler so queued activations and deactivations
//!    take effect.
//! 2. Run every due system at the tick's reference time
//!    (`tick_id * tick_ms`).
//! 3. Advance the tick counter.

use std::time::Instant;

use anyhow::Result;
use engine_component::World;
use engine_system::{Scheduler, SchedulerError};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::TickConfig;

/// The host's tick loop state.
#[derive(Debug)]
pub struct TickLoop {
    /// Current tick counter.
    tick_id: u64,
    config: TickConfig,
    world: World,
    scheduler: Scheduler<World>,
}

impl TickLoop {
    /// Create a new tick loop with an empty world and scheduler.
    #[must_use]
    pub fn new(config: TickConfig) -> Self {
        Self {
            tick_id: 0,
            config,
            world: World::new(),
            scheduler: Scheduler::new(),
        }
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns a reference to the tick configuration.
    #[must_use]
    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// Simulated time of the next tick, in milliseconds.
    #[must_use]
    pub fn reference_time(&self) -> u64 {
        self.tick_id.saturating_mul(self.config.tick_ms())
    }

    /// Returns a reference to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns a mutable reference to the world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Returns a reference to the scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler<World> {
        &self.scheduler
    }

    /// Returns a mutable reference to the scheduler.
    pub fn scheduler_mut(&mut self) -> &mut Scheduler<World> {
        &mut self.scheduler
    }

    /// Run one tick. Returns how many systems executed.
    ///
    /// The counter advances even if a system could not be run.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Scheduler::run_systems`].
    pub fn tick(&mut self) -> Result<usize, SchedulerError> {
        let reference_time = self.reference_time();
        self.scheduler.renormalize();
        let result = self.scheduler.run_systems(&mut self.world, reference_time);
        self.tick_id += 1;

        debug!(
            tick_id = self.tick_id,
            reference_time,
            executed = result.as_ref().ok(),
            "tick complete"
        );
        result
    }

    fn tick_logged(&mut self) {
        if let Err(err) = self.tick() {
            warn!(tick_id = self.tick_id, %err, "tick finished with errors");
        }
    }

    fn limit_reached(&self, tick_count: u64) -> bool {
        self.config.max_ticks > 0 && tick_count >= self.config.max_ticks
    }

    /// Run the tick loop for the configured number of ticks, or
    /// indefinitely, sleeping the thread between ticks.
    pub fn run(&mut self) {
        let tick_duration = self.config.tick_duration();
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );

        loop {
            let start = Instant::now();
            self.tick_logged();

            tick_count += 1;
            if self.limit_reached(tick_count) {
                info!(ticks = tick_count, "tick loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }

    /// Async variant of [`TickLoop::run`]. Also stops on Ctrl-C.
    ///
    /// # Errors
    ///
    /// Fails if the Ctrl-C handler cannot be installed.
    pub async fn run_async(&mut self) -> Result<()> {
        let mut interval = tokio::time::interval(self.config.tick_duration());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );

        loop {
            tokio::select! {
                signal = &mut shutdown => {
                    signal?;
                    info!(ticks = tick_count, "shutdown requested");
                    break;
                }
                _ = interval.tick() => {
                    self.tick_logged();
                    tick_count += 1;
                    if self.limit_reached(tick_count) {
                        info!(ticks = tick_count, "tick loop complete");
                        break;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use engine_system::ScheduleConfig;

    use super::*;
    use crate::components::{Position, populate};
    use crate::systems::{Integrate, activate_defaults, register_all};

    fn fast(max_ticks: u64) -> TickConfig {
        TickConfig {
            tick_rate: 1000.0,
            max_ticks,
            snapshot_path: None,
        }
    }

    fn demo(max_ticks: u64) -> TickLoop {
        let mut tick_loop = TickLoop::new(fast(max_ticks));
        populate(tick_loop.world_mut(), 3).unwrap();
        register_all(tick_loop.scheduler_mut()).unwrap();
        tick_loop
    }

    #[test]
    fn test_tick_advances_counter() {
        let mut tick_loop = TickLoop::new(TickConfig::default());
        assert_eq!(tick_loop.tick_id(), 0);
        assert_eq!(tick_loop.tick().unwrap(), 0);
        assert_eq!(tick_loop.tick_id(), 1);
        assert_eq!(tick_loop.reference_time(), 17);
    }

    #[test]
    fn test_activation_takes_effect_on_next_tick() {
        let mut tick_loop = demo(0);
        tick_loop
            .scheduler_mut()
            .activate_system_via_type::<Integrate>(ScheduleConfig::every_run(), 0)
            .unwrap();
        assert_eq!(tick_loop.tick().unwrap(), 1);
        assert!(tick_loop.scheduler().is_system_active("integrate"));
    }

    #[test]
    fn test_run_limited_ticks() {
        let mut tick_loop = demo(5);
        activate_defaults(tick_loop.scheduler_mut(), 0).unwrap();
        tick_loop.run();
        assert_eq!(tick_loop.tick_id(), 5);
    }

    #[test]
    fn test_bodies_move_over_time() {
        let mut tick_loop = TickLoop::new(fast(0));
        let bodies = populate(tick_loop.world_mut(), 3).unwrap();
        register_all(tick_loop.scheduler_mut()).unwrap();
        activate_defaults(tick_loop.scheduler_mut(), 0).unwrap();
        for _ in 0..10 {
            tick_loop.tick().unwrap();
        }
        let moving = tick_loop.world().get::<Position>(bodies[0]).unwrap();
        assert!(moving.0.y > 0.0);
        let fixed = tick_loop.world().get::<Position>(bodies[2]).unwrap();
        assert_eq!(fixed.0.y, 0.0);
    }

    #[tokio::test]
    async fn test_run_async_limited_ticks() {
        let mut tick_loop = demo(3);
        activate_defaults(tick_loop.scheduler_mut(), 0).unwrap();
        tick_loop.run_async().await.unwrap();
        assert_eq!(tick_loop.tick_id(), 3);
    }
}

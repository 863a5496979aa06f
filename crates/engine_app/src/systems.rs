//! Demo systems driven by the host loop.
//!
//! | Name         | Cadence                 | Effect                                   |
//! |--------------|-------------------------|------------------------------------------|
//! | `accelerate` | every frame             | Adds a fixed impulse to every velocity.  |
//! | `brake`      | every 250 ms            | Stops `accelerate` and itself after 5 s. |
//! | `integrate`  | every frame             | Moves positions by velocity × elapsed.   |
//! | `report`     | every 500 ms, stagger 50 | Logs a summary of moving bodies.        |

use engine_component::{Entity, Signature, World};
use engine_system::{NamedSystem, ScheduleConfig, Scheduler, SchedulerError, System, SystemContext};
use glam::Vec3;
use tracing::info;

use crate::components::{Position, Velocity};

/// Velocity added per `accelerate` pass.
pub const IMPULSE: Vec3 = Vec3::new(0.0, 0.0, 0.05);

/// Reference time after which `brake` shuts acceleration off.
pub const BRAKE_AFTER_MS: u64 = 5_000;

/// Pushes every moving body along +Z.
#[derive(Debug, Default)]
pub struct Accelerate;

impl System<World> for Accelerate {
    fn signature(&self) -> Signature {
        Signature::new().with::<Velocity>()
    }

    fn execute(&mut self, _ctx: &mut SystemContext<'_, World>, world: &mut World, entity: Entity) {
        if let Some(velocity) = world.get_mut::<Velocity>(entity) {
            velocity.0 += IMPULSE;
        }
    }
}

impl NamedSystem<World> for Accelerate {
    fn system_name() -> &'static str {
        "accelerate"
    }
}

/// Explicit Euler step over the time elapsed since the previous pass.
///
/// The first pass only records the reference time.
#[derive(Debug, Default)]
pub struct Integrate {
    last_time: Option<u64>,
    dt: f32,
}

impl System<World> for Integrate {
    fn signature(&self) -> Signature {
        Signature::new().with::<Position>().with::<Velocity>()
    }

    fn before_walk(&mut self, ctx: &mut SystemContext<'_, World>, _world: &mut World) {
        let now = ctx.reference_time();
        let elapsed_ms = self.last_time.map_or(0, |last| now.saturating_sub(last));
        self.dt = elapsed_ms as f32 / 1000.0;
        self.last_time = Some(now);
    }

    fn execute(&mut self, _ctx: &mut SystemContext<'_, World>, world: &mut World, entity: Entity) {
        let Some(velocity) = world.get::<Velocity>(entity).copied() else {
            return;
        };
        if let Some(position) = world.get_mut::<Position>(entity) {
            position.0 += velocity.0 * self.dt;
        }
    }
}

impl NamedSystem<World> for Integrate {
    fn system_name() -> &'static str {
        "integrate"
    }
}

/// Logs how many bodies moved and where their centroid is.
#[derive(Debug, Default)]
pub struct Report {
    count: usize,
    sum: Vec3,
}

impl System<World> for Report {
    fn signature(&self) -> Signature {
        Signature::new().with::<Position>().with::<Velocity>()
    }

    fn before_walk(&mut self, _ctx: &mut SystemContext<'_, World>, _world: &mut World) {
        self.count = 0;
        self.sum = Vec3::ZERO;
    }

    fn execute(&mut self, _ctx: &mut SystemContext<'_, World>, world: &mut World, entity: Entity) {
        if let Some(position) = world.get::<Position>(entity) {
            self.count += 1;
            self.sum += position.0;
        }
    }

    fn after_walk(&mut self, ctx: &mut SystemContext<'_, World>, _world: &mut World) {
        let centroid = if self.count == 0 {
            Vec3::ZERO
        } else {
            self.sum / self.count as f32
        };
        info!(
            reference_time = ctx.reference_time(),
            bodies = self.count,
            centroid = %centroid,
            "moving bodies"
        );
    }
}

impl NamedSystem<World> for Report {
    fn system_name() -> &'static str {
        "report"
    }
}

/// Deactivates `accelerate`, then itself, once [`BRAKE_AFTER_MS`] is reached.
#[derive(Debug, Default)]
pub struct Brake;

impl System<World> for Brake {
    fn signature(&self) -> Signature {
        Signature::new()
    }

    fn execute(&mut self, _: &mut SystemContext<'_, World>, _: &mut World, _: Entity) {}

    // Works on the schedule, not on entities.
    fn walk(&mut self, ctx: &mut SystemContext<'_, World>, _world: &mut World) {
        if ctx.reference_time() < BRAKE_AFTER_MS {
            return;
        }
        info!(reference_time = ctx.reference_time(), "braking");
        ctx.deactivate(Accelerate::system_name());
        ctx.deactivate(Self::system_name());
    }
}

impl NamedSystem<World> for Brake {
    fn system_name() -> &'static str {
        "brake"
    }
}

/// Register every demo system.
///
/// # Errors
///
/// Returns [`SchedulerError::DuplicateSystem`] if any of them is already
/// registered.
pub fn register_all(scheduler: &mut Scheduler<World>) -> Result<(), SchedulerError> {
    scheduler.register_system::<Accelerate>()?;
    scheduler.register_system::<Brake>()?;
    scheduler.register_system::<Integrate>()?;
    scheduler.register_system::<Report>()?;
    Ok(())
}

/// Queue the default active set, scheduled relative to `reference_time`.
///
/// # Errors
///
/// Returns [`SchedulerError::UnknownSystem`] if [`register_all`] was not
/// called first.
pub fn activate_defaults(
    scheduler: &mut Scheduler<World>,
    reference_time: u64,
) -> Result<(), SchedulerError> {
    scheduler.activate_system_via_type::<Accelerate>(ScheduleConfig::every_run(), reference_time)?;
    scheduler.activate_system_via_type::<Brake>(ScheduleConfig::every(250), reference_time)?;
    scheduler.activate_system_via_type::<Integrate>(ScheduleConfig::every_run(), reference_time)?;
    scheduler.activate_system_via_type::<Report>(
        ScheduleConfig::every(500).with_stagger(50),
        reference_time,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::populate;

    fn scheduler() -> Scheduler<World> {
        let mut scheduler = Scheduler::new();
        register_all(&mut scheduler).unwrap();
        scheduler
    }

    #[test]
    fn test_register_all_names() {
        let scheduler = scheduler();
        assert_eq!(
            scheduler.registry().names(),
            vec!["accelerate", "brake", "integrate", "report"]
        );
    }

    #[test]
    fn test_register_all_twice_fails() {
        let mut scheduler = scheduler();
        assert!(matches!(
            register_all(&mut scheduler),
            Err(SchedulerError::DuplicateSystem(_))
        ));
    }

    #[test]
    fn test_activate_defaults_after_renormalize() {
        let mut scheduler = scheduler();
        activate_defaults(&mut scheduler, 0).unwrap();
        assert!(scheduler.active_system_names().is_empty());
        scheduler.renormalize();
        assert_eq!(
            scheduler.active_system_names(),
            vec!["accelerate", "brake", "integrate", "report"]
        );
        assert_eq!(scheduler.next_execution_time("report"), Some(450));
    }

    #[test]
    fn test_integrate_uses_elapsed_time() {
        let mut world = World::new();
        let entity = world.spawn();
        world.insert(entity, Position(Vec3::ZERO)).unwrap();
        world.insert(entity, Velocity(Vec3::new(0.0, 2.0, 0.0))).unwrap();

        let mut scheduler = scheduler();
        scheduler
            .activate_system_via_type::<Integrate>(ScheduleConfig::every_run(), 0)
            .unwrap();
        scheduler.renormalize();

        scheduler.run_systems(&mut world, 1_000).unwrap();
        assert_eq!(world.get::<Position>(entity), Some(&Position(Vec3::ZERO)));

        scheduler.run_systems(&mut world, 1_500).unwrap();
        assert_eq!(
            world.get::<Position>(entity),
            Some(&Position(Vec3::new(0.0, 1.0, 0.0)))
        );
    }

    #[test]
    fn test_accelerate_skips_static_bodies() {
        let mut world = World::new();
        let entities = populate(&mut world, 3).unwrap();

        let mut scheduler = scheduler();
        scheduler
            .activate_system_via_type::<Accelerate>(ScheduleConfig::every_run(), 0)
            .unwrap();
        scheduler.renormalize();
        scheduler.run_systems(&mut world, 0).unwrap();

        let moving = world.get::<Velocity>(entities[0]).unwrap();
        assert_eq!(moving.0, Vec3::new(0.0, 1.0, 0.0) + IMPULSE);
        assert!(world.get::<Velocity>(entities[2]).is_none());
    }

    #[test]
    fn test_brake_stops_acceleration() {
        let mut world = World::new();
        populate(&mut world, 2).unwrap();

        let mut scheduler = scheduler();
        activate_defaults(&mut scheduler, 0).unwrap();
        scheduler.renormalize();

        scheduler.run_systems(&mut world, 4_750).unwrap();
        scheduler.renormalize();
        assert!(scheduler.is_system_active("accelerate"));
        assert!(scheduler.is_system_active("brake"));

        scheduler.run_systems(&mut world, 5_000).unwrap();
        assert!(scheduler.is_system_active("accelerate"));
        scheduler.renormalize();
        assert_eq!(scheduler.active_system_names(), vec!["integrate", "report"]);
    }
}

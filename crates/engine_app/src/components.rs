//! Demo components.

use engine_component::{Component, Entity, StoreError, World};
use glam::Vec3;

/// World-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec3);

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}

/// Linear velocity in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec3);

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// Spawn `count` entities on a line. Every third one is a static marker
/// with a position but no velocity.
///
/// # Errors
///
/// Propagates [`StoreError`] from the world; cannot happen for freshly
/// spawned entities.
pub fn populate(world: &mut World, count: usize) -> Result<Vec<Entity>, StoreError> {
    let mut spawned = Vec::with_capacity(count);
    for i in 0..count {
        let entity = world.spawn();
        world.insert(entity, Position(Vec3::new(i as f32, 0.0, 0.0)))?;
        if i % 3 != 2 {
            world.insert(entity, Velocity(Vec3::new(0.0, 1.0, 0.0)))?;
        }
        spawned.push(entity);
    }
    Ok(spawned)
}

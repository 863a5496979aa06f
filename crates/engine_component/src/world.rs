//! A small in-memory [`ComponentStore`].
//!
//! [`World`] keeps one type-erased box per (entity, component) pair. It makes
//! no attempt at cache-friendly layout; it exists so the scheduler can be
//! driven end to end by tests and by the demo host.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use crate::component::{Component, ComponentTypeId};
use crate::entity::{Entity, EntityAllocator};
use crate::error::StoreError;
use crate::signature::Signature;
use crate::store::ComponentStore;

type ComponentBox = Box<dyn Any + Send + Sync>;

/// Entity and component storage.
#[derive(Debug, Default)]
pub struct World {
    allocator: EntityAllocator,
    /// Live entities and their components. `BTreeMap` keeps iteration in
    /// ascending entity order.
    entities: BTreeMap<Entity, HashMap<ComponentTypeId, ComponentBox>>,
}

impl World {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity with no components.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.entities.insert(entity, HashMap::new());
        trace!(%entity, "spawned entity");
        entity
    }

    /// Destroy an entity and every component attached to it.
    ///
    /// Returns `true` if the entity was alive.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let alive = self.entities.remove(&entity).is_some();
        if alive {
            trace!(%entity, "despawned entity");
        }
        alive
    }

    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(&entity)
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Attach `component` to `entity`, replacing any previous value of the
    /// same type.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoSuchEntity`] if `entity` is not alive.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), StoreError> {
        let components = self
            .entities
            .get_mut(&entity)
            .ok_or(StoreError::NoSuchEntity(entity))?;
        components.insert(T::component_type_id(), Box::new(component));
        Ok(())
    }

    /// Detach and return component `T` from `entity`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let boxed = self
            .entities
            .get_mut(&entity)?
            .remove(&T::component_type_id())?;
        boxed.downcast::<T>().ok().map(|b| *b)
    }

    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.entities
            .get(&entity)?
            .get(&T::component_type_id())?
            .downcast_ref::<T>()
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.entities
            .get_mut(&entity)?
            .get_mut(&T::component_type_id())?
            .downcast_mut::<T>()
    }

    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.entities
            .get(&entity)
            .is_some_and(|components| components.contains_key(&T::component_type_id()))
    }
}

impl ComponentStore for World {
    fn matching_entities(&self, signature: &Signature) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|(_, components)| {
                let held: Vec<ComponentTypeId> = components.keys().copied().collect();
                signature.matches(&held)
            })
            .map(|(entity, _)| *entity)
            .collect()
    }
}

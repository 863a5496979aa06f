//! Entity identifiers.
//!
//! The scheduler never creates or inspects entities itself; it only receives
//! them from a [`ComponentStore`](crate::ComponentStore) when a system walks
//! its matching set. These types exist so stores and systems agree on what an
//! entity handle looks like.

use serde::{Deserialize, Serialize};

/// Opaque handle for an entity living in a component store.
///
/// Handles are ordered by their raw id. Stores hand matching entities to
/// systems in ascending order, so ordering is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(u64);

impl Entity {
    /// Reserved handle that never refers to a live entity.
    pub const INVALID: Entity = Entity(0);

    /// Wrap a raw id.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The raw id behind this handle.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// `false` only for [`Entity::INVALID`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh entity handles for a single store.
///
/// Ids are never reused, so a despawned handle stays dead forever.
#[derive(Debug)]
pub struct EntityAllocator {
    next: u64,
}

impl EntityAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next unused handle.
    pub fn allocate(&mut self) -> Entity {
        let entity = Entity(self.next);
        self.next += 1;
        entity
    }

    /// How many handles have been handed out.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.next - 1
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

//! Component signatures.
//!
//! A [`Signature`] is what a system declares about the entities it wants to
//! visit. The store, not the scheduler, evaluates it: the scheduler only
//! decides *whether* a system runs, the store decides *on which entities*.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentTypeId};

/// Declared component requirements of a system.
///
/// An entity matches when it holds every required component and none of the
/// excluded ones. The empty signature matches every entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Components an entity must hold.
    pub required: BTreeSet<ComponentTypeId>,
    /// Components an entity must not hold.
    pub excluded: BTreeSet<ComponentTypeId>,
}

impl Signature {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require component `T`.
    #[must_use]
    pub fn with<T: Component>(self) -> Self {
        self.require(T::component_type_id())
    }

    /// Exclude entities holding component `T`.
    #[must_use]
    pub fn without<T: Component>(self) -> Self {
        self.exclude(T::component_type_id())
    }

    /// Require a component by id.
    #[must_use]
    pub fn require(mut self, type_id: ComponentTypeId) -> Self {
        self.required.insert(type_id);
        self
    }

    /// Exclude a component by id.
    #[must_use]
    pub fn exclude(mut self, type_id: ComponentTypeId) -> Self {
        self.excluded.insert(type_id);
        self
    }

    /// Whether an entity holding exactly `held` matches this signature.
    #[must_use]
    pub fn matches(&self, held: &[ComponentTypeId]) -> bool {
        self.required.iter().all(|ty| held.contains(ty))
            && !self.excluded.iter().any(|ty| held.contains(ty))
    }

    /// `true` when nothing is required or excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.excluded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITION: ComponentTypeId = ComponentTypeId(1);
    const VELOCITY: ComponentTypeId = ComponentTypeId(2);
    const FROZEN: ComponentTypeId = ComponentTypeId(3);

    #[test]
    fn test_empty_signature_matches_everything() {
        let sig = Signature::new();
        assert!(sig.is_empty());
        assert!(sig.matches(&[]));
        assert!(sig.matches(&[POSITION, FROZEN]));
    }

    #[test]
    fn test_required_components() {
        let sig = Signature::new().require(POSITION).require(VELOCITY);
        assert!(sig.matches(&[POSITION, VELOCITY]));
        assert!(sig.matches(&[VELOCITY, FROZEN, POSITION]));
        assert!(!sig.matches(&[POSITION]));
    }

    #[test]
    fn test_excluded_components() {
        let sig = Signature::new().require(POSITION).exclude(FROZEN);
        assert!(sig.matches(&[POSITION]));
        assert!(!sig.matches(&[POSITION, FROZEN]));
    }
}

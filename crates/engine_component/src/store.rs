//! The boundary between the scheduler and whatever owns entity data.

use crate::entity::Entity;
use crate::signature::Signature;

/// A store of entities and their components.
///
/// The scheduler hands a store to each due system; the system asks the store
/// for the entities matching its [`Signature`] and visits them one by one.
/// Implementations must return matches in ascending [`Entity`] order so that
/// per-entity dispatch is reproducible.
pub trait ComponentStore: 'static {
    /// All live entities matching `signature`, in ascending order.
    fn matching_entities(&self, signature: &Signature) -> Vec<Entity>;
}

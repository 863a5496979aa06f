//! Store error types.

use crate::entity::Entity;

/// Errors raised by [`World`](crate::World) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The entity was never spawned or has been despawned.
    #[error("no such entity: {0}")]
    NoSuchEntity(Entity),
}

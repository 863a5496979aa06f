//! The [`System`] contract.
//!
//! A system is a unit of per-entity behaviour. It declares a component
//! [`Signature`]; when the scheduler decides the system is due, the system
//! asks the store for the matching entities and is invoked once per entity.

use std::cell::RefCell;
use std::rc::Rc;

use engine_component::{ComponentStore, Entity, Signature};

use crate::context::SystemContext;

/// Shared handle to a system instance.
///
/// The scheduler is one of possibly several holders, but it is the only one
/// that invokes the system.
pub type SharedSystem<S> = Rc<RefCell<dyn System<S>>>;

/// Per-entity behaviour over a store of type `S`.
///
/// # Examples
///
/// ```rust
/// use engine_component::{Entity, Signature, World};
/// use engine_system::{System, SystemContext};
///
/// #[derive(Default)]
/// struct CountEverything {
///     seen: usize,
/// }
///
/// impl System<World> for CountEverything {
///     fn signature(&self) -> Signature {
///         Signature::new()
///     }
///
///     fn execute(&mut self, _ctx: &mut SystemContext<'_, World>, _world: &mut World, _entity: Entity) {
///         self.seen += 1;
///     }
/// }
/// ```
pub trait System<S: ComponentStore>: 'static {
    /// Components an entity must (and must not) hold to be visited.
    fn signature(&self) -> Signature;

    /// Called once for each matching entity.
    fn execute(&mut self, ctx: &mut SystemContext<'_, S>, store: &mut S, entity: Entity);

    /// Called once per due pass, before any entity is visited.
    fn before_walk(&mut self, _ctx: &mut SystemContext<'_, S>, _store: &mut S) {}

    /// Called once per due pass, after every entity has been visited.
    fn after_walk(&mut self, _ctx: &mut SystemContext<'_, S>, _store: &mut S) {}

    /// Visit every entity matching [`System::signature`] in store order.
    ///
    /// Matching is resolved once, up front; entities spawned by the system
    /// during the walk are not visited until the next pass.
    fn walk(&mut self, ctx: &mut SystemContext<'_, S>, store: &mut S) {
        let signature = self.signature();
        for entity in store.matching_entities(&signature) {
            self.execute(ctx, store, entity);
        }
    }
}

/// A system type with a statically known, unique name.
///
/// Everything that addresses a system "by type" is bounded on this trait, so
/// a type without a name accessor cannot be registered or activated that way.
pub trait NamedSystem<S: ComponentStore>: System<S> {
    fn system_name() -> &'static str;
}

/// Wrap a concrete system into a [`SharedSystem`].
pub fn share<S: ComponentStore, T: System<S>>(system: T) -> SharedSystem<S> {
    Rc::new(RefCell::new(system))
}

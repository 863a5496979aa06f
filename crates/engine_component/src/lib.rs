//! # engine_component
//!
//! The store side of the scheduler boundary.
//!
//! The scheduler in `engine_system` decides which systems run and in what
//! order; it never touches component data. This crate defines what it needs
//! from a store and ships a simple reference store:
//!
//! - [`Entity`] / [`EntityAllocator`]: opaque, ordered entity handles.
//! - [`Component`] / [`ComponentTypeId`]: name-derived component identity.
//! - [`Signature`]: the component requirements a system declares.
//! - [`ComponentStore`]: the boundary trait: signature in, matching entities out.
//! - [`World`]: an in-memory [`ComponentStore`].

pub mod component;
pub mod entity;
pub mod error;
pub mod signature;
pub mod store;
pub mod world;

pub use component::{Component, ComponentTypeId};
pub use entity::{Entity, EntityAllocator};
pub use error::StoreError;
pub use signature::Signature;
pub use store::ComponentStore;
pub use world::World;

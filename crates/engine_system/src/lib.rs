//! # engine_system
//!
//! Deterministic, time-driven scheduling of ECS systems.
//!
//! Each frame the caller:
//!
//! 1. Calls [`Scheduler::renormalize`] to apply queued activations and
//!    deactivations.
//! 2. Calls [`Scheduler::run_systems`] with the store and the current
//!    reference time (milliseconds, non-decreasing).
//!
//! Systems run strictly one after another, in byte-wise name order. A system
//! with a non-zero interval only runs on timestamps matching its phase; see
//! [`ScheduleConfig`].
//!
//! ## Usage
//!
//! ```rust
//! use engine_component::{Entity, Signature, World};
//! use engine_system::{NamedSystem, ScheduleConfig, Scheduler, System, SystemContext};
//!
//! #[derive(Default)]
//! struct Heartbeat;
//!
//! impl System<World> for Heartbeat {
//!     fn signature(&self) -> Signature {
//!         Signature::new()
//!     }
//!
//!     fn execute(&mut self, _: &mut SystemContext<'_, World>, _: &mut World, _: Entity) {}
//! }
//!
//! impl NamedSystem<World> for Heartbeat {
//!     fn system_name() -> &'static str {
//!         "heartbeat"
//!     }
//! }
//!
//! let mut world = World::new();
//! world.spawn();
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.register_system::<Heartbeat>().unwrap();
//! scheduler
//!     .activate_system_via_type::<Heartbeat>(ScheduleConfig::every(4).with_stagger(1), 10)
//!     .unwrap();
//! scheduler.renormalize();
//!
//! assert_eq!(scheduler.run_systems(&mut world, 10).unwrap(), 0);
//! assert_eq!(scheduler.run_systems(&mut world, 11).unwrap(), 1);
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod registry;
pub mod schedule;
pub mod scheduler;
pub mod snapshot;
pub mod system;

pub use config::ScheduleConfig;
pub use context::SystemContext;
pub use error::SchedulerError;
pub use registry::SystemRegistry;
pub use schedule::{ScheduleEntry, first_due_time};
pub use scheduler::Scheduler;
pub use snapshot::{ScheduleRecord, Snapshot};
pub use system::{NamedSystem, SharedSystem, System, share};

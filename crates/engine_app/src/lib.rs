//! # engine_app
//!
//! Demo host for the system scheduler: a handful of movement systems over a
//! [`World`](engine_component::World), driven by a fixed-rate [`TickLoop`].

pub mod components;
pub mod config;
pub mod systems;
pub mod tick;

pub use config::TickConfig;
pub use tick::TickLoop;

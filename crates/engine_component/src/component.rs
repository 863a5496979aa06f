//! The [`Component`] trait and name-derived component type ids.
//!
//! ## Type identity
//!
//! [`ComponentTypeId`] is the FNV-1a 64-bit hash of the component's string
//! name. Two processes (or two builds) that agree on a component name agree
//! on its id, which keeps signatures stable across save and restore.

use serde::{Deserialize, Serialize};

/// Stable identifier of a component type, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Hash a component name into its id.
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325
    /// for byte in name:
    ///     hash = (hash ^ byte) * 0x100000001b3
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Id of the Rust component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self::from_name(T::type_name())
    }
}

/// Data that can be attached to an entity.
///
/// # Examples
///
/// ```rust
/// use engine_component::Component;
///
/// struct Health {
///     current: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// Unique, human-readable name of the component type.
    fn type_name() -> &'static str;

    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId::from_name(Self::type_name())
    }
}

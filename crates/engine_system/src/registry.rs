//! System registry. Maps unique system names to constructors.
//!
//! Registration is what lets a system be instantiated from nothing but its
//! name, which in turn is how an active set is rebuilt from a snapshot.

use std::collections::HashMap;
use std::fmt;

use engine_component::ComponentStore;
use tracing::{debug, error};

use crate::error::SchedulerError;
use crate::system::{SharedSystem, System, share};

type Factory<S> = Box<dyn Fn() -> SharedSystem<S>>;

/// Name-keyed factory of system instances.
pub struct SystemRegistry<S: ComponentStore> {
    factories: HashMap<String, Factory<S>>,
}

impl<S: ComponentStore> SystemRegistry<S> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register `T` under `name`, constructing instances with
    /// [`Default::default`].
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::DuplicateSystem`] if `name` is already
    /// registered. The existing registration is left in place.
    pub fn register<T>(&mut self, name: &str) -> Result<(), SchedulerError>
    where
        T: System<S> + Default,
    {
        self.register_with(name, T::default)
    }

    /// Register a constructor closure under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::DuplicateSystem`] if `name` is already
    /// registered.
    pub fn register_with<T, F>(&mut self, name: &str, factory: F) -> Result<(), SchedulerError>
    where
        T: System<S>,
        F: Fn() -> T + 'static,
    {
        if self.factories.contains_key(name) {
            error!(system = name, "system registered twice under the same name");
            return Err(SchedulerError::DuplicateSystem(name.to_string()));
        }
        self.factories
            .insert(name.to_string(), Box::new(move || share(factory())));
        debug!(system = name, "registered system");
        Ok(())
    }

    /// Whether a factory is registered under `name`.
    #[must_use]
    pub fn has_system(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build a fresh, independently owned instance of the system named
    /// `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnknownSystem`] if nothing is registered
    /// under `name`.
    pub fn create(&self, name: &str) -> Result<SharedSystem<S>, SchedulerError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| SchedulerError::UnknownSystem(name.to_string()))?;
        Ok(factory())
    }

    /// Drop every registration. Only meant for tests and resets.
    pub fn clear(&mut self) {
        self.factories.clear();
    }

    /// Registered names in ascending order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<S: ComponentStore> Default for SystemRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ComponentStore> fmt::Debug for SystemRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemRegistry")
            .field("systems", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use engine_component::{Entity, Signature, World};

    use super::*;
    use crate::context::SystemContext;

    #[derive(Default)]
    struct Physics {
        steps: u32,
    }

    impl System<World> for Physics {
        fn signature(&self) -> Signature {
            Signature::new()
        }

        fn execute(&mut self, _: &mut SystemContext<'_, World>, _: &mut World, _: Entity) {
            self.steps += 1;
        }
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = SystemRegistry::<World>::new();
        registry.register::<Physics>("physics").unwrap();
        assert!(registry.has_system("physics"));
        assert_eq!(registry.len(), 1);
        assert!(registry.create("physics").is_ok());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = SystemRegistry::<World>::new();
        registry.register::<Physics>("physics").unwrap();
        let err = registry.register::<Physics>("physics").unwrap_err();
        assert!(matches!(err, SchedulerError::DuplicateSystem(name) if name == "physics"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let registry = SystemRegistry::<World>::new();
        assert!(!registry.has_system("ghost"));
        let err = registry.create("ghost").err().unwrap();
        assert!(matches!(err, SchedulerError::UnknownSystem(name) if name == "ghost"));
    }

    #[test]
    fn test_create_returns_independent_instances() {
        let mut registry = SystemRegistry::<World>::new();
        registry.register::<Physics>("physics").unwrap();
        let a = registry.create("physics").unwrap();
        let b = registry.create("physics").unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_register_with_closure() {
        let mut registry = SystemRegistry::<World>::new();
        registry
            .register_with("warm_physics", || Physics { steps: 10 })
            .unwrap();
        assert!(registry.has_system("warm_physics"));
    }

    #[test]
    fn test_clear_and_names() {
        let mut registry = SystemRegistry::<World>::new();
        registry.register::<Physics>("b").unwrap();
        registry.register::<Physics>("a").unwrap();
        assert_eq!(registry.names(), vec!["a", "b"]);
        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.has_system("a"));
    }
}

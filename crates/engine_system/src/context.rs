//! Per-pass execution context provided to systems.

use engine_component::ComponentStore;
use tracing::debug;

use crate::config::ScheduleConfig;
use crate::error::SchedulerError;
use crate::registry::SystemRegistry;
use crate::schedule::ScheduleEntry;
use crate::system::NamedSystem;

/// A change to the active set requested from inside a run pass.
pub(crate) enum SystemCommand<S: ComponentStore> {
    Activate(ScheduleEntry<S>),
    Deactivate(String),
    DeactivateAll,
}

/// Context handed to a system while it runs.
///
/// Systems often want to start or stop their peers. The active list is
/// being walked while they run, so requests made here are only recorded;
/// the scheduler moves them onto its pending queues once the pass is over
/// and they take effect at the next
/// [`renormalize`](crate::Scheduler::renormalize).
pub struct SystemContext<'a, S: ComponentStore> {
    reference_time: u64,
    system_name: String,
    registry: &'a SystemRegistry<S>,
    commands: Vec<SystemCommand<S>>,
}

impl<'a, S: ComponentStore> SystemContext<'a, S> {
    pub(crate) fn new(reference_time: u64, registry: &'a SystemRegistry<S>) -> Self {
        Self {
            reference_time,
            system_name: String::new(),
            registry,
            commands: Vec::new(),
        }
    }

    pub(crate) fn enter(&mut self, system_name: &str) {
        self.system_name.clear();
        self.system_name.push_str(system_name);
    }

    pub(crate) fn into_commands(self) -> Vec<SystemCommand<S>> {
        self.commands
    }

    /// The reference time of the current pass, in milliseconds.
    #[must_use]
    pub fn reference_time(&self) -> u64 {
        self.reference_time
    }

    /// Name of the system currently running.
    #[must_use]
    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    /// Whether `name` could be activated from this pass.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.has_system(name)
    }

    /// Request activation of the system registered as `name`.
    ///
    /// The instance is built and its first due time computed immediately,
    /// relative to this pass's reference time.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnknownSystem`] if `name` is not registered.
    pub fn activate(&mut self, name: &str, config: ScheduleConfig) -> Result<(), SchedulerError> {
        let system = self.registry.create(name)?;
        debug!(
            requested_by = %self.system_name,
            system = name,
            interval_ms = config.interval_ms,
            "activation requested during run"
        );
        self.commands.push(SystemCommand::Activate(ScheduleEntry::new(
            name,
            system,
            config,
            self.reference_time,
        )));
        Ok(())
    }

    /// Request activation of `T` by its static name.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnknownSystem`] if `T` was never registered.
    pub fn activate_via_type<T: NamedSystem<S>>(
        &mut self,
        config: ScheduleConfig,
    ) -> Result<(), SchedulerError> {
        self.activate(T::system_name(), config)
    }

    /// Request deactivation of `name`.
    pub fn deactivate(&mut self, name: &str) {
        debug!(requested_by = %self.system_name, system = name, "deactivation requested during run");
        self.commands.push(SystemCommand::Deactivate(name.to_string()));
    }

    /// Request deactivation of every active system.
    pub fn deactivate_all(&mut self) {
        debug!(requested_by = %self.system_name, "deactivation of all systems requested during run");
        self.commands.push(SystemCommand::DeactivateAll);
    }
}

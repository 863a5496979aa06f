//! The system scheduler.
//!
//! Frame lifecycle, driven entirely by the caller:
//!
//! 1. [`Scheduler::renormalize`] applies queued activations and
//!    deactivations and re-sorts the active list by name.
//! 2. [`Scheduler::run_systems`] walks the active list in name order and runs
//!    every system that is due at the supplied reference time.
//!
//! Activations and deactivations, whether requested by the caller or by a
//! system mid-pass, only ever touch the pending queues. The active list is
//! therefore stable for the whole of a run pass.

use std::collections::HashSet;
use std::mem;

use engine_component::ComponentStore;
use serde_json::Value;
use tracing::{debug, error, info, trace, warn};

use crate::config::ScheduleConfig;
use crate::context::{SystemCommand, SystemContext};
use crate::error::SchedulerError;
use crate::registry::SystemRegistry;
use crate::schedule::ScheduleEntry;
use crate::snapshot::Snapshot;
use crate::system::{NamedSystem, SharedSystem};

/// Decides which systems run, when, and in which order.
#[derive(Debug)]
pub struct Scheduler<S: ComponentStore> {
    registry: SystemRegistry<S>,
    /// Sorted by name. Execution order.
    active: Vec<ScheduleEntry<S>>,
    pending_add: Vec<ScheduleEntry<S>>,
    pending_remove: Vec<String>,
}

impl<S: ComponentStore> Scheduler<S> {
    /// Create a scheduler with an empty registry and no active systems.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: SystemRegistry::new(),
            active: Vec::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
        }
    }

    // -- Registration --

    /// Returns a reference to the system registry.
    #[must_use]
    pub fn registry(&self) -> &SystemRegistry<S> {
        &self.registry
    }

    /// Returns a mutable reference to the system registry.
    pub fn registry_mut(&mut self) -> &mut SystemRegistry<S> {
        &mut self.registry
    }

    /// Register `T` under its static name so it can be created by name.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::DuplicateSystem`] if the name is taken.
    pub fn register_system<T>(&mut self) -> Result<(), SchedulerError>
    where
        T: NamedSystem<S> + Default,
    {
        self.registry.register::<T>(T::system_name())
    }

    /// Forget every registration. Active and pending systems are untouched.
    pub fn clear_registered_systems(&mut self) {
        self.registry.clear();
    }

    /// Whether a system is registered under `name`.
    #[must_use]
    pub fn has_system(&self, name: &str) -> bool {
        self.registry.has_system(name)
    }

    /// Build a new instance of the system registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnknownSystem`] if `name` is not registered.
    pub fn create_system(&self, name: &str) -> Result<SharedSystem<S>, SchedulerError> {
        self.registry.create(name)
    }

    // -- Activation --

    /// Queue the system registered as `name` for activation.
    ///
    /// A fresh instance is created immediately and its first due time is
    /// computed relative to `reference_time`; it joins the active list at
    /// the next [`renormalize`](Self::renormalize).
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnknownSystem`] if `name` is not registered.
    pub fn activate_system(
        &mut self,
        name: &str,
        config: ScheduleConfig,
        reference_time: u64,
    ) -> Result<(), SchedulerError> {
        let system = self.registry.create(name)?;
        self.enqueue(ScheduleEntry::new(name, system, config, reference_time));
        Ok(())
    }

    /// Queue `T` for activation under its static name.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnknownSystem`] if `T` was never registered.
    pub fn activate_system_via_type<T: NamedSystem<S>>(
        &mut self,
        config: ScheduleConfig,
        reference_time: u64,
    ) -> Result<(), SchedulerError> {
        self.activate_system(T::system_name(), config, reference_time)
    }

    /// Queue a caller-constructed instance for activation under `name`.
    ///
    /// The caller may keep its own clone of `system` to inspect it between
    /// passes; it must not hold a borrow across
    /// [`run_systems`](Self::run_systems).
    pub fn activate_instance(
        &mut self,
        name: &str,
        system: SharedSystem<S>,
        config: ScheduleConfig,
        reference_time: u64,
    ) {
        self.enqueue(ScheduleEntry::new(name, system, config, reference_time));
    }

    fn is_activation_pending(&self, name: &str) -> bool {
        self.pending_add.iter().any(|entry| entry.name() == name)
    }

    fn enqueue(&mut self, entry: ScheduleEntry<S>) {
        let name = entry.name();
        if self.is_system_active(name) || self.is_activation_pending(name) {
            warn!(system = name, "system activated while already active or pending");
        }
        debug!(
            system = name,
            interval_ms = entry.config().interval_ms,
            stagger_ms = entry.config().stagger_ms,
            next_execution_time = entry.next_execution_time(),
            "queued system activation"
        );
        self.pending_add.push(entry);
    }

    // -- Deactivation --

    /// Queue `name` for removal at the next renormalize.
    pub fn deactivate_system(&mut self, name: &str) {
        debug!(system = name, "queued system deactivation");
        self.pending_remove.push(name.to_string());
    }

    /// Queue `T` for removal at the next renormalize.
    pub fn deactivate_system_via_type<T: NamedSystem<S>>(&mut self) {
        self.deactivate_system(T::system_name());
    }

    /// Queue every active system for removal.
    ///
    /// Pending activations of currently active names are dropped as well;
    /// pending activations of other names survive.
    pub fn deactivate_all_systems(&mut self) {
        let active: HashSet<&str> = self.active.iter().map(ScheduleEntry::name).collect();
        self.pending_add.retain(|entry| !active.contains(entry.name()));
        self.pending_remove
            .extend(active.into_iter().map(str::to_string));
        debug!(count = self.active.len(), "queued deactivation of all systems");
    }

    // -- Frame lifecycle --

    /// Apply queued removals, then queued additions, then re-sort by name.
    ///
    /// Removals only match entries that were already active, so a system
    /// activated and deactivated in the same frame ends up active.
    pub fn renormalize(&mut self) {
        if self.pending_add.is_empty() && self.pending_remove.is_empty() {
            return;
        }

        let removals: HashSet<String> = mem::take(&mut self.pending_remove).into_iter().collect();
        let before = self.active.len();
        self.active.retain(|entry| !removals.contains(entry.name()));
        let removed = before - self.active.len();

        let added = self.pending_add.len();
        self.active.append(&mut self.pending_add);
        self.active.sort_by(|a, b| a.name().cmp(b.name()));

        debug!(
            added,
            removed,
            active = self.active.len(),
            "renormalized active systems"
        );
    }

    /// Run every due system against `store`, in name order.
    ///
    /// Returns how many systems executed. Requests the systems make through
    /// their [`SystemContext`] are moved to the pending queues after the
    /// pass.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::SystemBorrowed`] if a system's shared handle
    /// was borrowed elsewhere. The pass still completes for every other
    /// system and that system's schedule is not advanced.
    pub fn run_systems(&mut self, store: &mut S, reference_time: u64) -> Result<usize, SchedulerError> {
        let mut ctx = SystemContext::new(reference_time, &self.registry);
        let mut executed = 0;
        let mut first_error = None;

        for entry in &mut self.active {
            if !entry.is_due(reference_time) {
                continue;
            }

            match entry.system().try_borrow_mut() {
                Ok(mut system) => {
                    trace!(system = entry.name(), reference_time, "executing system");
                    ctx.enter(entry.name());
                    system.before_walk(&mut ctx, store);
                    system.walk(&mut ctx, store);
                    system.after_walk(&mut ctx, store);
                }
                Err(_) => {
                    error!(system = entry.name(), "system is borrowed elsewhere, skipping");
                    first_error
                        .get_or_insert_with(|| SchedulerError::SystemBorrowed(entry.name().to_string()));
                    continue;
                }
            }

            entry.advance();
            executed += 1;
        }

        let commands = ctx.into_commands();
        self.apply(commands);

        match first_error {
            Some(err) => Err(err),
            None => Ok(executed),
        }
    }

    fn apply(&mut self, commands: Vec<SystemCommand<S>>) {
        for command in commands {
            match command {
                SystemCommand::Activate(entry) => self.enqueue(entry),
                SystemCommand::Deactivate(name) => self.deactivate_system(&name),
                SystemCommand::DeactivateAll => self.deactivate_all_systems(),
            }
        }
    }

    // -- Queries --

    /// Whether `name` is on the active list. Pending changes do not count
    /// until renormalized.
    #[must_use]
    pub fn is_system_active(&self, name: &str) -> bool {
        self.active.iter().any(|entry| entry.name() == name)
    }

    /// Active names in execution order.
    #[must_use]
    pub fn active_system_names(&self) -> Vec<&str> {
        self.active.iter().map(ScheduleEntry::name).collect()
    }

    /// Returns the active entries in execution order.
    #[must_use]
    pub fn active_entries(&self) -> &[ScheduleEntry<S>] {
        &self.active
    }

    /// `true` if a renormalize would change anything.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        !self.pending_add.is_empty() || !self.pending_remove.is_empty()
    }

    /// Due time of the active system `name`, if any.
    #[must_use]
    pub fn next_execution_time(&self, name: &str) -> Option<u64> {
        self.active
            .iter()
            .find(|entry| entry.name() == name)
            .map(ScheduleEntry::next_execution_time)
    }

    // -- Snapshots --

    /// Record the active set.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_entries(&self.active)
    }

    /// Record the active set as a self-describing document.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Document`] if conversion fails.
    pub fn serialize_active_systems(&self) -> Result<Value, SchedulerError> {
        self.snapshot().to_document()
    }

    /// Rebuild active systems from a document produced by
    /// [`serialize_active_systems`](Self::serialize_active_systems).
    ///
    /// See [`restore`](Self::restore) for the rules. Returns how many systems
    /// were queued.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Document`] for a malformed document and
    /// [`SchedulerError::UnknownSystem`] for an unregistered name.
    pub fn deserialize_active_systems(
        &mut self,
        document: &Value,
        reference_time: u64,
    ) -> Result<usize, SchedulerError> {
        let snapshot = Snapshot::from_document(document)?;
        self.restore(&snapshot, reference_time)
    }

    /// Queue every recorded system that is not already active or pending.
    ///
    /// A name recorded more than once is queued only once.
    ///
    /// Instances are created through the registry and scheduled relative to
    /// `reference_time`, exactly as a fresh activation would be. Every name
    /// is checked before anything is queued, so an unknown name leaves the
    /// scheduler untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnknownSystem`] if any recorded name is not
    /// registered.
    pub fn restore(&mut self, snapshot: &Snapshot, reference_time: u64) -> Result<usize, SchedulerError> {
        if let Some(missing) = snapshot
            .records()
            .iter()
            .find(|record| !self.registry.has_system(&record.name))
        {
            error!(system = %missing.name, "snapshot references an unregistered system");
            return Err(SchedulerError::UnknownSystem(missing.name.clone()));
        }

        let mut restored = 0;
        for record in snapshot.records() {
            if self.is_system_active(&record.name) {
                debug!(system = %record.name, "already active, leaving as is");
                continue;
            }
            if self.is_activation_pending(&record.name) {
                debug!(system = %record.name, "activation already queued, skipping");
                continue;
            }
            let system = self.registry.create(&record.name)?;
            self.enqueue(ScheduleEntry::new(
                record.name.clone(),
                system,
                record.config(),
                reference_time,
            ));
            restored += 1;
        }

        info!(
            restored,
            recorded = snapshot.len(),
            reference_time,
            "restored active systems from snapshot"
        );
        Ok(restored)
    }
}

impl<S: ComponentStore> Default for Scheduler<S> {
    fn default() -> Self {
        Self::new()
    }
}

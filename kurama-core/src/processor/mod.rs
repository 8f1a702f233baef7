//! Processors and the registry that dispatches to them.
//!
//! A [`Processor`] is a named, typed unit bound to one [`Capability`]. The
//! [`ProcessorRegistry`] holds a bounded list of them in registration order
//! and dispatches each request to the first active processor of the
//! requested kind.

pub mod capability;
pub mod registry;

pub use capability::Capability;
pub use registry::{DEFAULT_PROCESSORS, ProcessorRegistry, RegistryStats};

use std::fmt;

use crate::types::ProcessorKind;

/// Lifecycle callbacks a processor may carry alongside its capability.
///
/// Hooks are owned by the registry and opaque to it: only the callbacks are
/// invoked, never inspected.
pub trait ProcessorHooks: Send {
    /// Called before the processor is marked active. An `Err` keeps it
    /// inactive and is reported as the failure reason.
    ///
    /// # Errors
    /// Returns a human-readable reason when the processor cannot start.
    fn on_activate(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Called before an active processor is marked inactive, including at
    /// registry shutdown.
    fn on_deactivate(&mut self) {}
}

/// A registered processing unit.
pub struct Processor {
    name: String,
    description: String,
    kind: ProcessorKind,
    is_active: bool,
    priority: usize,
    capability: Capability,
    hooks: Option<Box<dyn ProcessorHooks>>,
}

impl Processor {
    pub(crate) fn new(
        name: String,
        description: String,
        kind: ProcessorKind,
        priority: usize,
        hooks: Option<Box<dyn ProcessorHooks>>,
    ) -> Self {
        Self {
            name,
            description,
            kind,
            is_active: false,
            priority,
            capability: Capability::for_kind(kind),
            hooks,
        }
    }

    /// Lookup name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Kind this processor is dispatched under.
    #[must_use]
    pub fn kind(&self) -> ProcessorKind {
        self.kind
    }

    /// Whether dispatch may select this processor.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Registration index. Informational only.
    #[must_use]
    pub fn priority(&self) -> usize {
        self.priority
    }

    /// The capability bound at registration.
    #[must_use]
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Run the activation hook (if any) and mark active.
    pub(crate) fn start(&mut self) -> Result<(), String> {
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_activate()?;
        }
        self.is_active = true;
        Ok(())
    }

    /// Run the teardown hook (if any) and mark inactive.
    pub(crate) fn stop(&mut self) {
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_deactivate();
        }
        self.is_active = false;
    }
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("is_active", &self.is_active)
            .field("priority", &self.priority)
            .field("capability", &self.capability)
            .field("has_hooks", &self.hooks.is_some())
            .finish()
    }
}

impl fmt::Display for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}) - {}",
            self.name,
            self.kind,
            if self.is_active { "ACTIVE" } else { "inactive" }
        )?;
        writeln!(f, "    Description: {}", self.description)?;
        write!(f, "    Priority: {}", self.priority)
    }
}

//! The processor registry: bounded, ordered, dispatch-by-kind.
//!
//! ```text
//!  dispatch(input, Emotion)
//!        │
//!        ▼
//!  [0] PersonalityCore  Personality  active   ── kind mismatch
//!  [1] EmotionEngine    Emotion      active   ── first match → invoked
//!  [2] BackupEmotion    Emotion      active   ── never reached
//! ```
//!
//! Exactly one processor runs per dispatch. Name lookups are first-match
//! too, so a later processor registered under an existing name is shadowed.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::error::{KuramaError, Result};
use crate::types::{Clock, ProcessorKind, SystemClock, truncate_to};

use super::{Processor, ProcessorHooks};

/// The stock processors loaded at startup: `(name, description, kind)`.
pub const DEFAULT_PROCESSORS: [(&str, &str, ProcessorKind); 4] = [
    (
        "PersonalityCore",
        "Core personality processing engine",
        ProcessorKind::Personality,
    ),
    (
        "EmotionEngine",
        "Emotional understanding and response",
        ProcessorKind::Emotion,
    ),
    (
        "CreativeThinking",
        "Creative and artistic processing",
        ProcessorKind::Creativity,
    ),
    (
        "LearningCore",
        "Knowledge acquisition and processing",
        ProcessorKind::Learning,
    ),
];

/// Bounded collection of processors, dispatched by kind.
pub struct ProcessorRegistry {
    processors: Vec<Processor>,
    total_loaded: u64,
    active_count: usize,
    config: RegistryConfig,
    clock: Arc<dyn Clock>,
}

impl ProcessorRegistry {
    /// Create an empty registry with the default limits and the system clock.
    ///
    /// Unlike [`with_config`](Self::with_config), no stock processors are
    /// loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
            total_loaded: 0,
            active_count: 0,
            config: RegistryConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Create a registry with explicit limits and time source, loading the
    /// stock processors when `config.load_defaults` is set.
    ///
    /// # Errors
    /// Returns [`KuramaError::Config`] if `max_processors` is zero, or
    /// [`KuramaError::CapacityExceeded`] if the stock set does not fit.
    pub fn with_config(config: &RegistryConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        if config.max_processors == 0 {
            return Err(KuramaError::Config(
                "registry.max_processors must be at least 1".to_string(),
            ));
        }
        let mut registry = Self {
            processors: Vec::with_capacity(config.max_processors),
            total_loaded: 0,
            active_count: 0,
            config: config.clone(),
            clock,
        };
        info!(max_processors = config.max_processors, "Processor registry initialized");

        if config.load_defaults {
            registry.load_defaults()?;
        }
        Ok(registry)
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register an inactive processor bound to the capability for `kind`.
    ///
    /// Returns the processor's priority (its registration index).
    ///
    /// # Errors
    /// Returns [`KuramaError::InvalidArgument`] for an empty name, or
    /// [`KuramaError::CapacityExceeded`] when the registry is full.
    pub fn register(
        &mut self,
        name: &str,
        description: &str,
        kind: ProcessorKind,
    ) -> Result<usize> {
        self.insert(name, description, kind, None)
    }

    /// Like [`register`](Self::register), attaching lifecycle hooks.
    ///
    /// # Errors
    /// Same as [`register`](Self::register).
    pub fn register_with_hooks(
        &mut self,
        name: &str,
        description: &str,
        kind: ProcessorKind,
        hooks: Box<dyn ProcessorHooks>,
    ) -> Result<usize> {
        self.insert(name, description, kind, Some(hooks))
    }

    fn insert(
        &mut self,
        name: &str,
        description: &str,
        kind: ProcessorKind,
        hooks: Option<Box<dyn ProcessorHooks>>,
    ) -> Result<usize> {
        if name.is_empty() {
            return Err(KuramaError::InvalidArgument("processor name must not be empty"));
        }
        if self.processors.len() >= self.config.max_processors {
            warn!(name, limit = self.config.max_processors, "Processor registry full");
            return Err(KuramaError::CapacityExceeded {
                limit: self.config.max_processors,
            });
        }

        let priority = self.processors.len();
        self.processors.push(Processor::new(
            truncate_to(name, self.config.max_name_len),
            truncate_to(description, self.config.max_description_len),
            kind,
            priority,
            hooks,
        ));
        self.total_loaded += 1;

        debug!(name, kind = %kind, priority, "Processor registered");
        Ok(priority)
    }

    /// Register and activate the [`DEFAULT_PROCESSORS`].
    ///
    /// # Errors
    /// Returns [`KuramaError::CapacityExceeded`] if the whole stock set does
    /// not fit. Nothing is registered in that case.
    pub fn load_defaults(&mut self) -> Result<()> {
        if self.processors.len() + DEFAULT_PROCESSORS.len() > self.config.max_processors {
            warn!(
                count = self.processors.len(),
                limit = self.config.max_processors,
                "No room for the default processors"
            );
            return Err(KuramaError::CapacityExceeded {
                limit: self.config.max_processors,
            });
        }
        let mut loaded = Vec::with_capacity(DEFAULT_PROCESSORS.len());
        for (name, description, kind) in DEFAULT_PROCESSORS {
            loaded.push(self.register(name, description, kind)?);
        }
        // By index: an earlier processor may already hold a stock name.
        for index in loaded {
            self.activate_at(index)?;
        }
        info!(count = DEFAULT_PROCESSORS.len(), "Default processors loaded and activated");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Activation
    // ------------------------------------------------------------------

    /// Mark the first processor named `name` active, running its activation
    /// hook. Activating an active processor succeeds without side effects.
    ///
    /// # Errors
    /// Returns [`KuramaError::NotFound`] for an unknown name, or
    /// [`KuramaError::ActivationFailed`] if the hook refuses.
    pub fn activate(&mut self, name: &str) -> Result<()> {
        let index = self.index_of(name)?;
        self.activate_at(index)
    }

    fn activate_at(&mut self, index: usize) -> Result<()> {
        let processor = &mut self.processors[index];
        let name = processor.name().to_string();
        if processor.is_active() {
            debug!(%name, "Processor already active");
            return Ok(());
        }
        if let Err(reason) = processor.start() {
            warn!(%name, %reason, "Processor failed to activate");
            return Err(KuramaError::ActivationFailed { name, reason });
        }
        self.active_count += 1;
        debug!(%name, active = self.active_count, "Processor activated");
        Ok(())
    }

    /// Mark the first processor named `name` inactive, running its teardown
    /// hook first. Deactivating an inactive processor succeeds without side
    /// effects.
    ///
    /// # Errors
    /// Returns [`KuramaError::NotFound`] for an unknown name.
    pub fn deactivate(&mut self, name: &str) -> Result<()> {
        let index = self.index_of(name)?;
        let processor = &mut self.processors[index];
        if !processor.is_active() {
            debug!(name, "Processor already inactive");
            return Ok(());
        }
        processor.stop();
        self.active_count -= 1;
        debug!(name, active = self.active_count, "Processor deactivated");
        Ok(())
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.processors
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| {
                debug!(name, "Processor not found");
                KuramaError::NotFound(format!("processor '{name}'"))
            })
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// The processor a dispatch for `kind` would invoke right now.
    #[must_use]
    pub fn resolve(&self, kind: ProcessorKind) -> Option<&Processor> {
        self.processors
            .iter()
            .find(|p| p.kind() == kind && p.is_active())
    }

    /// Run `input` through the first active processor of `kind`.
    ///
    /// Returns `None` when no active processor of that kind exists, or when
    /// the chosen processor's capability produces nothing for this input.
    #[must_use]
    pub fn dispatch(&self, input: &str, kind: ProcessorKind) -> Option<String> {
        let processor = self.resolve(kind)?;
        let output = processor.capability().process(input, self.clock.now());
        debug!(
            processor = processor.name(),
            kind = %kind,
            produced = output.is_some(),
            "Input dispatched"
        );
        output
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Tear down every active processor and empty the registry.
    ///
    /// `total_loaded` is kept; `count` and `active_count` drop to zero.
    pub fn shutdown(&mut self) {
        info!(count = self.processors.len(), "Shutting down processors");
        for processor in self.processors.iter_mut().filter(|p| p.is_active()) {
            processor.stop();
        }
        self.processors.clear();
        self.active_count = 0;
    }

    // ------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------

    /// The first processor registered under `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Processor> {
        self.processors.iter().find(|p| p.name() == name)
    }

    /// All processors in registration order.
    #[must_use]
    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    /// Processors currently registered.
    #[must_use]
    pub fn count(&self) -> usize {
        self.processors.len()
    }

    /// Processors currently active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Processors ever registered.
    #[must_use]
    pub fn total_loaded(&self) -> u64 {
        self.total_loaded
    }

    /// Snapshot of the registry's counters.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            count: self.processors.len(),
            active_count: self.active_count,
            total_loaded: self.total_loaded,
            max_processors: self.config.max_processors,
        }
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("processors", &self.processors)
            .field("total_loaded", &self.total_loaded)
            .field("active_count", &self.active_count)
            .finish_non_exhaustive()
    }
}

/// Snapshot of a [`ProcessorRegistry`]'s counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Processors currently registered.
    pub count: usize,
    /// Processors currently active.
    pub active_count: usize,
    /// Processors ever registered.
    pub total_loaded: u64,
    /// Registration limit.
    pub max_processors: usize,
}

impl fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processors: {}/{} | Active: {} | Total loaded: {}",
            self.count, self.max_processors, self.active_count, self.total_loaded
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

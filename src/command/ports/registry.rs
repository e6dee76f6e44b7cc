//! Registry port exposed to commands declaring `uses_registry`.

use async_trait::async_trait;
use std::sync::{Arc, Weak};
use thiserror::Error;

use super::DiscoveryError;
use crate::command::domain::CommandValidationError;

/// Result type for registry reloads.
pub type ReloadResult<T> = Result<T, ReloadError>;

/// Outcome of a successful reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadSummary {
    /// Number of successful reloads including this one.
    pub generation: u64,
    /// Number of live commands.
    pub commands: usize,
    /// Number of live aliases.
    pub aliases: usize,
}

/// Errors that abort a reload. The previous command set stays live.
#[derive(Debug, Clone, Error)]
pub enum ReloadError {
    /// The command source failed.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// A definition failed metadata validation.
    #[error("invalid definition for command '{command}': {source}")]
    Validation {
        /// First declared alias of the offending definition.
        command: String,
        /// Validation failure.
        #[source]
        source: CommandValidationError,
    },

    /// Two commands claim the same alias.
    #[error("'{alias}' is not a unique alias")]
    AliasCollision {
        /// The colliding alias.
        alias: String,
    },

    /// The registry behind a handle has been dropped.
    #[error("command registry is no longer running")]
    RegistryDropped,
}

/// Operations a registry offers to the commands it hosts.
#[async_trait]
pub trait RegistryControl: Send + Sync {
    /// Re-discovers and atomically replaces the command set.
    ///
    /// # Errors
    ///
    /// Returns [`ReloadError`] when discovery, validation, or alias
    /// uniqueness fails; the previous command set is kept.
    async fn reload(&self) -> ReloadResult<ReloadSummary>;

    /// Returns the live aliases, sorted.
    fn aliases(&self) -> Vec<String>;
}

/// Non-owning handle to a registry.
///
/// Commands live inside the registry, so they hold it weakly.
#[derive(Clone)]
pub struct RegistryHandle(Weak<dyn RegistryControl>);

impl RegistryHandle {
    /// Wraps a weak registry reference.
    #[must_use]
    pub const fn new(registry: Weak<dyn RegistryControl>) -> Self {
        Self(registry)
    }

    /// Reloads the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ReloadError::RegistryDropped`] when the registry is gone,
    /// or the reload's own error.
    pub async fn reload(&self) -> ReloadResult<ReloadSummary> {
        let registry = self.upgrade()?;
        registry.reload().await
    }

    /// Returns the live aliases, or none once the registry is gone.
    #[must_use]
    pub fn aliases(&self) -> Vec<String> {
        self.0
            .upgrade()
            .map_or_else(Vec::new, |registry| registry.aliases())
    }

    /// Returns whether the registry is still alive.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }

    fn upgrade(&self) -> ReloadResult<Arc<dyn RegistryControl>> {
        self.0.upgrade().ok_or(ReloadError::RegistryDropped)
    }
}

impl std::fmt::Debug for RegistryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryHandle")
            .field("live", &self.is_live())
            .finish()
    }
}

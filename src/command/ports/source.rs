//! Command source port.
//!
//! A source supplies the full, ordered list of command definitions on every
//! discovery call. Definitions must be fresh per call; the registry never
//! caches them between reloads.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::{CommandHandler, FailureHook};
use crate::command::domain::{CommandFailure, CommandMetadata, HookKind};

/// Result type for command discovery.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Recovery hooks keyed by failure kind.
#[derive(Clone, Default)]
pub struct CommandHooks(BTreeMap<HookKind, Arc<dyn FailureHook>>);

impl CommandHooks {
    /// Creates an empty hook map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `hook` for `kind`, replacing any previous hook.
    #[must_use]
    pub fn with(mut self, kind: HookKind, hook: Arc<dyn FailureHook>) -> Self {
        self.0.insert(kind, hook);
        self
    }

    /// Returns the hook registered for `kind`.
    #[must_use]
    pub fn get(&self, kind: HookKind) -> Option<&Arc<dyn FailureHook>> {
        self.0.get(&kind)
    }

    /// Finds the hook that handles `failure`, trying the specific kind
    /// before the generic one.
    #[must_use]
    pub fn lookup(&self, failure: &CommandFailure) -> Option<(HookKind, &Arc<dyn FailureHook>)> {
        failure
            .hook_chain()
            .iter()
            .find_map(|kind| self.get(*kind).map(|hook| (*kind, hook)))
    }

    /// Returns the registered hook kinds.
    pub fn kinds(&self) -> impl Iterator<Item = HookKind> + '_ {
        self.0.keys().copied()
    }
}

impl std::fmt::Debug for CommandHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

/// An unvalidated command as supplied by a source.
#[derive(Clone)]
pub struct CommandDefinition {
    /// Declarative metadata.
    pub metadata: CommandMetadata,
    /// Handler run on a permitted invocation.
    pub handler: Arc<dyn CommandHandler>,
    /// Recovery hooks.
    pub hooks: CommandHooks,
}

impl CommandDefinition {
    /// Creates a definition without hooks.
    #[must_use]
    pub fn new(metadata: CommandMetadata, handler: Arc<dyn CommandHandler>) -> Self {
        Self {
            metadata,
            handler,
            hooks: CommandHooks::new(),
        }
    }

    /// Registers a recovery hook.
    #[must_use]
    pub fn with_hook(mut self, kind: HookKind, hook: Arc<dyn FailureHook>) -> Self {
        self.hooks = self.hooks.with(kind, hook);
        self
    }
}

impl std::fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("metadata", &self.metadata)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// Supplies command definitions on demand.
#[async_trait]
pub trait CommandSource: Send + Sync {
    /// Discovers the current command set.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the backing store is unavailable or
    /// holds malformed definitions.
    async fn discover(&self) -> DiscoveryResult<Vec<CommandDefinition>>;
}

/// Errors returned by command sources.
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    /// The backing store could not be read.
    #[error("command source unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The backing store holds data that is not a valid command manifest.
    #[error("malformed command manifest: {0}")]
    Malformed(String),

    /// A definition names a handler the source cannot bind.
    #[error("command '{command}' references unknown handler '{handler}'")]
    UnknownHandler {
        /// First alias of the command.
        command: String,
        /// Unbound handler name.
        handler: String,
    },

    /// A definition names a hook the source cannot bind.
    #[error("command '{command}' references unknown hook '{hook}' for {kind}")]
    UnknownHook {
        /// First alias of the command.
        command: String,
        /// Hook slot.
        kind: HookKind,
        /// Unbound hook name.
        hook: String,
    },
}

impl DiscoveryError {
    /// Wraps an I/O or backend error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}

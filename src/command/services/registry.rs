//! Command registry service.
//!
//! Provides [`CommandRegistry`], the owner of the live alias→command map.
//! A reload builds a complete replacement snapshot off to the side and
//! swaps it in with a single pointer store; any failure before the swap
//! leaves the previous snapshot serving lookups.

use async_trait::async_trait;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::command::domain::{CommandOptions, SharedClock};
use crate::command::ports::{
    BotLogger, Collaborators, CommandDefinition, CommandSource, RegistryControl, RegistryHandle,
    ReloadError, ReloadResult, ReloadSummary, Transport,
};
use crate::command::services::Command;

#[derive(Debug, Default)]
struct RegistrySnapshot {
    generation: u64,
    commands: Vec<Arc<Command>>,
    by_alias: HashMap<String, Arc<Command>>,
}

struct RegistryInner<S> {
    source: Arc<S>,
    bot: Arc<dyn Transport>,
    logger: Arc<dyn BotLogger>,
    options: CommandOptions,
    clock: SharedClock,
    snapshot: RwLock<Arc<RegistrySnapshot>>,
    reload_lock: tokio::sync::Mutex<()>,
    this: Weak<Self>,
}

/// Registry resolving aliases to commands, with atomic hot reload.
///
/// Cloning is cheap; clones share the same live command set.
pub struct CommandRegistry<S>
where
    S: CommandSource + 'static,
{
    inner: Arc<RegistryInner<S>>,
}

impl<S> Clone for CommandRegistry<S>
where
    S: CommandSource + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> CommandRegistry<S>
where
    S: CommandSource + 'static,
{
    /// Creates an empty registry. Call [`Self::reload`] to load commands.
    #[must_use]
    pub fn new<C>(
        source: Arc<S>,
        bot: Arc<dyn Transport>,
        logger: Arc<dyn BotLogger>,
        options: CommandOptions,
        clock: Arc<C>,
    ) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        let shared_clock: SharedClock = clock;
        let inner = Arc::new_cyclic(|this| RegistryInner {
            source,
            bot,
            logger,
            options,
            clock: shared_clock,
            snapshot: RwLock::new(Arc::new(RegistrySnapshot::default())),
            reload_lock: tokio::sync::Mutex::new(()),
            this: this.clone(),
        });
        Self { inner }
    }

    /// Re-discovers commands and atomically replaces the live set.
    ///
    /// On failure two warnings are logged and the previous command set keeps
    /// serving; the error is still returned so callers can report it.
    ///
    /// # Errors
    ///
    /// Returns [`ReloadError`] when discovery fails, a definition is
    /// invalid, or two commands share an alias.
    pub async fn reload(&self) -> ReloadResult<ReloadSummary> {
        self.inner.reload().await
    }

    /// Resolves an alias by exact match.
    #[must_use]
    pub fn resolve(&self, alias: &str) -> Option<Arc<Command>> {
        self.inner.current().by_alias.get(alias).cloned()
    }

    /// Returns the live commands in discovery order.
    #[must_use]
    pub fn commands(&self) -> Vec<Arc<Command>> {
        self.inner.current().commands.clone()
    }

    /// Returns the live aliases, sorted.
    #[must_use]
    pub fn aliases(&self) -> Vec<String> {
        self.inner.aliases()
    }

    /// Returns the number of successful reloads.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.current().generation
    }

    /// Returns the policy options applied to commands.
    #[must_use]
    pub fn options(&self) -> &CommandOptions {
        &self.inner.options
    }

    /// Returns a weak handle for commands declaring `uses_registry`.
    #[must_use]
    pub fn handle(&self) -> RegistryHandle {
        self.inner.handle()
    }
}

impl<S> RegistryInner<S>
where
    S: CommandSource + 'static,
{
    fn current(&self) -> Arc<RegistrySnapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn handle(&self) -> RegistryHandle {
        let this: Weak<dyn RegistryControl> = self.this.clone();
        RegistryHandle::new(this)
    }

    fn collaborators(&self) -> Collaborators {
        Collaborators::new()
            .with_bot(Arc::clone(&self.bot))
            .with_logger(Arc::clone(&self.logger))
            .with_registry(self.handle())
    }

    async fn try_reload(&self) -> ReloadResult<ReloadSummary> {
        let definitions = self.source.discover().await?;
        let commands = self.build_commands(definitions)?;
        let by_alias = index_aliases(&commands)?;

        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let generation = guard.generation.saturating_add(1);
        let summary = ReloadSummary {
            generation,
            commands: commands.len(),
            aliases: by_alias.len(),
        };
        *guard = Arc::new(RegistrySnapshot {
            generation,
            commands,
            by_alias,
        });
        Ok(summary)
    }

    fn build_commands(&self, definitions: Vec<CommandDefinition>) -> ReloadResult<Vec<Arc<Command>>> {
        let collaborators = self.collaborators();
        definitions
            .into_iter()
            .map(|definition| {
                let command = definition
                    .metadata
                    .aliases
                    .first()
                    .cloned()
                    .unwrap_or_default();
                Command::new(definition, &self.options, &collaborators, &self.clock)
                    .map(Arc::new)
                    .map_err(|source| ReloadError::Validation { command, source })
            })
            .collect()
    }
}

fn index_aliases(commands: &[Arc<Command>]) -> ReloadResult<HashMap<String, Arc<Command>>> {
    let mut by_alias = HashMap::new();
    for command in commands {
        for alias in command.aliases().iter() {
            if by_alias
                .insert(alias.to_owned(), Arc::clone(command))
                .is_some()
            {
                return Err(ReloadError::AliasCollision {
                    alias: alias.to_owned(),
                });
            }
        }
    }
    Ok(by_alias)
}

#[async_trait]
impl<S> RegistryControl for RegistryInner<S>
where
    S: CommandSource + 'static,
{
    async fn reload(&self) -> ReloadResult<ReloadSummary> {
        let _serialised = self.reload_lock.lock().await;
        match self.try_reload().await {
            Ok(summary) => {
                self.logger
                    .info("Command registry has reloaded commands successfully.");
                tracing::debug!(
                    generation = summary.generation,
                    commands = summary.commands,
                    aliases = summary.aliases,
                    "command snapshot swapped"
                );
                Ok(summary)
            }
            Err(error) => {
                self.logger
                    .warn("Command registry failed to reload commands. Reverting to old commands.");
                self.logger.warn(&error.to_string());
                Err(error)
            }
        }
    }

    fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.current().by_alias.keys().cloned().collect();
        aliases.sort();
        aliases
    }
}

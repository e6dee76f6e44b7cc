//! JSON manifest command source.
//!
//! The manifest is re-read on every discovery, so editing it and issuing a
//! reload picks up new metadata without restarting. Handler and hook names
//! in the manifest are bound through a [`HandlerCatalogue`].

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::command::domain::{CommandMetadata, CooldownSettings, HookKind};
use crate::command::ports::{
    CommandDefinition, CommandHandler, CommandHooks, CommandSource, DiscoveryError,
    DiscoveryResult, FailureHook,
};

/// Named handler and hook implementations manifests can refer to.
#[derive(Clone, Default)]
pub struct HandlerCatalogue {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    hooks: HashMap<String, Arc<dyn FailureHook>>,
}

impl HandlerCatalogue {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under `name`.
    #[must_use]
    pub fn with_handler(mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Registers a hook under `name`.
    #[must_use]
    pub fn with_hook(mut self, name: impl Into<String>, hook: Arc<dyn FailureHook>) -> Self {
        self.hooks.insert(name.into(), hook);
        self
    }

    /// Returns the handler registered under `name`.
    #[must_use]
    pub fn handler(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Returns the hook registered under `name`.
    #[must_use]
    pub fn hook(&self, name: &str) -> Option<Arc<dyn FailureHook>> {
        self.hooks.get(name).cloned()
    }

    /// Binds manifest JSON to command definitions.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Malformed`] when the JSON does not match the
    /// manifest shape, or [`DiscoveryError::UnknownHandler`] /
    /// [`DiscoveryError::UnknownHook`] for unbound names.
    pub fn bind_manifest(&self, json: &str) -> DiscoveryResult<Vec<CommandDefinition>> {
        let manifest: Manifest = serde_json::from_str(json)
            .map_err(|error| DiscoveryError::Malformed(error.to_string()))?;
        manifest
            .commands
            .into_iter()
            .map(|entry| self.bind_entry(entry))
            .collect()
    }

    fn bind_entry(&self, entry: ManifestEntry) -> DiscoveryResult<CommandDefinition> {
        let (metadata, handler_name, hook_names) = entry.into_parts();
        let command = metadata.aliases.first().cloned().unwrap_or_default();
        let handler = self
            .handler(&handler_name)
            .ok_or_else(|| DiscoveryError::UnknownHandler {
                command: command.clone(),
                handler: handler_name.clone(),
            })?;

        let mut hooks = CommandHooks::new();
        for (kind, name) in hook_names {
            let hook = self.hook(&name).ok_or_else(|| DiscoveryError::UnknownHook {
                command: command.clone(),
                kind,
                hook: name.clone(),
            })?;
            hooks = hooks.with(kind, hook);
        }

        Ok(CommandDefinition {
            metadata,
            handler,
            hooks,
        })
    }
}

impl std::fmt::Debug for HandlerCatalogue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut handlers: Vec<_> = self.handlers.keys().collect();
        handlers.sort();
        let mut hooks: Vec<_> = self.hooks.keys().collect();
        hooks.sort();
        f.debug_struct("HandlerCatalogue")
            .field("handlers", &handlers)
            .field("hooks", &hooks)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    commands: Vec<ManifestEntry>,
}

// Metadata fields are inlined so unknown keys can be rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestEntry {
    aliases: Vec<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    admin_only: bool,
    #[serde(default)]
    uses_bot: bool,
    #[serde(default)]
    uses_logger: bool,
    #[serde(default)]
    uses_registry: bool,
    #[serde(default)]
    cooldowns: CooldownSettings,
    handler: String,
    #[serde(default)]
    hooks: BTreeMap<HookKind, String>,
}

impl ManifestEntry {
    fn into_parts(self) -> (CommandMetadata, String, BTreeMap<HookKind, String>) {
        let metadata = CommandMetadata {
            aliases: self.aliases,
            description: self.description,
            admin_only: self.admin_only,
            uses_bot: self.uses_bot,
            uses_logger: self.uses_logger,
            uses_registry: self.uses_registry,
            cooldowns: self.cooldowns,
        };
        (metadata, self.handler, self.hooks)
    }
}

/// Command source reading a JSON manifest from a capability-scoped directory.
#[derive(Debug)]
pub struct ManifestCommandSource {
    dir: Dir,
    file: String,
    catalogue: HandlerCatalogue,
}

impl ManifestCommandSource {
    /// Creates a source reading `file` inside `dir`.
    #[must_use]
    pub fn new(dir: Dir, file: impl Into<String>, catalogue: HandlerCatalogue) -> Self {
        Self {
            dir,
            file: file.into(),
            catalogue,
        }
    }

    /// Opens `directory` with ambient authority and reads `file` from it.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Unavailable`] when the directory cannot be
    /// opened.
    pub fn open(
        directory: &str,
        file: impl Into<String>,
        catalogue: HandlerCatalogue,
    ) -> DiscoveryResult<Self> {
        let dir = Dir::open_ambient_dir(directory, ambient_authority())
            .map_err(DiscoveryError::unavailable)?;
        Ok(Self::new(dir, file, catalogue))
    }

    /// Returns the manifest file name.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }
}

#[async_trait]
impl CommandSource for ManifestCommandSource {
    async fn discover(&self) -> DiscoveryResult<Vec<CommandDefinition>> {
        let json = self
            .dir
            .read_to_string(&self.file)
            .map_err(DiscoveryError::unavailable)?;
        self.catalogue.bind_manifest(&json)
    }
}

//! Bot configuration loaded from JSON.
//!
//! [`BotOptions`] is read once at start-up. The policy subset is handed to
//! the registry as [`CommandOptions`]; nothing reads configuration through
//! globals.

use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::command::domain::CommandOptions;

/// Default manifest file name.
pub const DEFAULT_COMMAND_MANIFEST: &str = "commands.json";

/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file '{file}': {source}")]
    Read {
        /// File that failed to load.
        file: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The JSON does not match the configuration shape.
    #[error("malformed configuration: {0}")]
    Malformed(String),

    /// An administrator identifier is blank.
    #[error("admin_ids must not contain blank identifiers")]
    BlankAdminId,

    /// The manifest file name is blank.
    #[error("command_manifest must not be empty")]
    EmptyManifest,

    /// The log file name is present but blank.
    #[error("log_file must not be empty when set")]
    EmptyLogFile,
}

/// Top-level bot options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotOptions {
    /// Users allowed to run admin-only commands.
    #[serde(default)]
    pub admin_ids: Vec<String>,
    /// Lets administrators bypass cooldowns.
    #[serde(default)]
    pub exempt_admins_from_cooldowns: bool,
    /// Prefix a message must start with to be treated as a command.
    #[serde(default)]
    pub command_prefix: String,
    /// Manifest file name, relative to the configuration directory.
    #[serde(default = "default_command_manifest")]
    pub command_manifest: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// File, relative to the configuration directory, that also receives
    /// log output.
    #[serde(default)]
    pub log_file: Option<String>,
}

fn default_command_manifest() -> String {
    DEFAULT_COMMAND_MANIFEST.to_owned()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

impl Default for BotOptions {
    fn default() -> Self {
        Self {
            admin_ids: Vec::new(),
            exempt_admins_from_cooldowns: false,
            command_prefix: String::new(),
            command_manifest: default_command_manifest(),
            log_filter: default_log_filter(),
            log_file: None,
        }
    }
}

impl BotOptions {
    /// Parses and validates options from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] for invalid JSON and a validation
    /// variant for blank values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self =
            serde_json::from_str(json).map_err(|error| ConfigError::Malformed(error.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Reads `file` from `dir` and parses it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// as [`Self::from_json`].
    pub fn load(dir: &Dir, file: &str) -> Result<Self, ConfigError> {
        let json = dir.read_to_string(file).map_err(|source| ConfigError::Read {
            file: file.to_owned(),
            source: Arc::new(source),
        })?;
        Self::from_json(&json)
    }

    /// Checks field values serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BlankAdminId`], [`ConfigError::EmptyManifest`]
    /// or [`ConfigError::EmptyLogFile`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(ConfigError::BlankAdminId);
        }
        if self.command_manifest.trim().is_empty() {
            return Err(ConfigError::EmptyManifest);
        }
        if self
            .log_file
            .as_deref()
            .is_some_and(|file| file.trim().is_empty())
        {
            return Err(ConfigError::EmptyLogFile);
        }
        Ok(())
    }

    /// Returns the policy options passed to the registry.
    #[must_use]
    pub fn command_options(&self) -> CommandOptions {
        CommandOptions::new(self.admin_ids.iter().map(|id| id.trim().to_owned()))
            .exempting_admins_from_cooldowns(self.exempt_admins_from_cooldowns)
    }
}

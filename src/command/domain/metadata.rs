//! Declarative command metadata.

use serde::{Deserialize, Serialize};

use super::{AliasSet, CapabilitySet, CommandValidationError, CooldownPolicy};

/// Cooldown durations in seconds per scope, as declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CooldownSettings {
    /// Seconds between invocations by the same user.
    #[serde(default)]
    pub user: f64,
    /// Seconds between invocations in the same channel.
    #[serde(default)]
    pub channel: f64,
    /// Seconds between invocations in the same guild.
    #[serde(default)]
    pub guild: f64,
}

/// Raw command metadata as supplied by a command source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandMetadata {
    /// Names the command is invoked by.
    pub aliases: Vec<String>,
    /// Display-only description.
    #[serde(default)]
    pub description: String,
    /// Restricts the command to configured administrators.
    #[serde(default)]
    pub admin_only: bool,
    /// Requests the transport handle.
    #[serde(default)]
    pub uses_bot: bool,
    /// Requests the bot logger.
    #[serde(default)]
    pub uses_logger: bool,
    /// Requests a handle to the command registry.
    #[serde(default)]
    pub uses_registry: bool,
    /// Per-scope cooldowns.
    #[serde(default)]
    pub cooldowns: CooldownSettings,
}

impl CommandMetadata {
    /// Creates metadata with the given aliases and defaults elsewhere.
    #[must_use]
    pub fn new(aliases: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the command as admin-only.
    #[must_use]
    pub const fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    /// Declares the collaborators the handler needs.
    #[must_use]
    pub const fn with_capabilities(mut self, bot: bool, logger: bool, registry: bool) -> Self {
        self.uses_bot = bot;
        self.uses_logger = logger;
        self.uses_registry = registry;
        self
    }

    /// Sets the cooldowns in seconds.
    #[must_use]
    pub const fn with_cooldowns(mut self, cooldowns: CooldownSettings) -> Self {
        self.cooldowns = cooldowns;
        self
    }

    /// Sets the user cooldown in seconds.
    #[must_use]
    pub const fn with_user_cooldown(mut self, seconds: f64) -> Self {
        self.cooldowns.user = seconds;
        self
    }

    /// Sets the channel cooldown in seconds.
    #[must_use]
    pub const fn with_channel_cooldown(mut self, seconds: f64) -> Self {
        self.cooldowns.channel = seconds;
        self
    }

    /// Sets the guild cooldown in seconds.
    #[must_use]
    pub const fn with_guild_cooldown(mut self, seconds: f64) -> Self {
        self.cooldowns.guild = seconds;
        self
    }

    /// Validates every field, failing on the first offending one.
    ///
    /// # Errors
    ///
    /// Returns [`CommandValidationError`] naming the invalid alias or
    /// cooldown.
    pub fn validate(&self) -> Result<CommandSpec, CommandValidationError> {
        Ok(CommandSpec {
            aliases: AliasSet::new(&self.aliases)?,
            description: self.description.clone(),
            admin_only: self.admin_only,
            capabilities: CapabilitySet::new(self.uses_bot, self.uses_logger, self.uses_registry),
            cooldowns: CooldownPolicy::from_settings(&self.cooldowns)?,
        })
    }
}

/// Validated command metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    aliases: AliasSet,
    description: String,
    admin_only: bool,
    capabilities: CapabilitySet,
    cooldowns: CooldownPolicy,
}

impl CommandSpec {
    /// Returns the command aliases.
    #[must_use]
    pub const fn aliases(&self) -> &AliasSet {
        &self.aliases
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether only administrators may invoke the command.
    #[must_use]
    pub const fn is_admin_only(&self) -> bool {
        self.admin_only
    }

    /// Returns the declared capabilities.
    #[must_use]
    pub const fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    /// Returns the validated cooldowns.
    #[must_use]
    pub const fn cooldowns(&self) -> CooldownPolicy {
        self.cooldowns
    }
}

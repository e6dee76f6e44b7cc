//! Context handed to command handlers and hooks.

use std::sync::Arc;
use thiserror::Error;

use super::{BotLogger, RegistryHandle, Transport};
use crate::command::domain::{Capability, CapabilitySet, InboundMessage, Invocation};

/// Collaborators a registry can inject into commands.
#[derive(Clone, Default)]
pub struct Collaborators {
    bot: Option<Arc<dyn Transport>>,
    logger: Option<Arc<dyn BotLogger>>,
    registry: Option<RegistryHandle>,
}

impl Collaborators {
    /// Creates an empty collaborator set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provides the transport.
    #[must_use]
    pub fn with_bot(mut self, bot: Arc<dyn Transport>) -> Self {
        self.bot = Some(bot);
        self
    }

    /// Provides the logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn BotLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Provides the registry handle.
    #[must_use]
    pub fn with_registry(mut self, registry: RegistryHandle) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Returns whether a collaborator for `capability` is available.
    #[must_use]
    pub const fn provides(&self, capability: Capability) -> bool {
        match capability {
            Capability::Bot => self.bot.is_some(),
            Capability::Logger => self.logger.is_some(),
            Capability::Registry => self.registry.is_some(),
        }
    }

    /// Keeps only the collaborators named in `declared`.
    #[must_use]
    pub fn restricted_to(&self, declared: CapabilitySet) -> Self {
        Self {
            bot: self.bot.clone().filter(|_| declared.contains(Capability::Bot)),
            logger: self
                .logger
                .clone()
                .filter(|_| declared.contains(Capability::Logger)),
            registry: self
                .registry
                .clone()
                .filter(|_| declared.contains(Capability::Registry)),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("bot", &self.bot.is_some())
            .field("logger", &self.logger.is_some())
            .field("registry", &self.registry.is_some())
            .finish()
    }
}

/// Error returned when a handler reaches for a collaborator it did not
/// declare.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("capability {0} was not declared by this command")]
pub struct CapabilityError(pub Capability);

/// Everything a handler can see about the current invocation.
#[derive(Clone, Debug)]
pub struct CommandContext {
    invocation: Invocation,
    collaborators: Collaborators,
}

impl CommandContext {
    /// Creates a context from an invocation and the command's collaborators.
    #[must_use]
    pub const fn new(invocation: Invocation, collaborators: Collaborators) -> Self {
        Self {
            invocation,
            collaborators,
        }
    }

    /// Returns the invocation.
    #[must_use]
    pub const fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Returns the triggering message.
    #[must_use]
    pub fn message(&self) -> &InboundMessage {
        self.invocation.message()
    }

    /// Returns the alias the command was invoked by.
    #[must_use]
    pub fn alias(&self) -> &str {
        self.invocation.alias()
    }

    /// Returns the arguments following the alias.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        self.invocation.arguments()
    }

    /// Returns the transport.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] unless the command declared `uses_bot`.
    pub fn bot(&self) -> Result<&Arc<dyn Transport>, CapabilityError> {
        self.collaborators
            .bot
            .as_ref()
            .ok_or(CapabilityError(Capability::Bot))
    }

    /// Returns the logger.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] unless the command declared `uses_logger`.
    pub fn logger(&self) -> Result<&Arc<dyn BotLogger>, CapabilityError> {
        self.collaborators
            .logger
            .as_ref()
            .ok_or(CapabilityError(Capability::Logger))
    }

    /// Returns the registry handle.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] unless the command declared
    /// `uses_registry`.
    pub fn registry(&self) -> Result<&RegistryHandle, CapabilityError> {
        self.collaborators
            .registry
            .as_ref()
            .ok_or(CapabilityError(Capability::Registry))
    }
}

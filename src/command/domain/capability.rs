//! Collaborator capabilities a command may declare.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An external collaborator a handler can ask to have injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// The transport used to send replies.
    Bot,
    /// The bot logger.
    Logger,
    /// A handle back to the command registry.
    Registry,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = match self {
            Self::Bot => "uses_bot",
            Self::Logger => "uses_logger",
            Self::Registry => "uses_registry",
        };
        f.write_str(flag)
    }
}

/// The set of capabilities a command declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    bot: bool,
    logger: bool,
    registry: bool,
}

impl CapabilitySet {
    /// Creates a capability set from the three declaration flags.
    #[must_use]
    pub const fn new(bot: bool, logger: bool, registry: bool) -> Self {
        Self {
            bot,
            logger,
            registry,
        }
    }

    /// Returns whether the capability was declared.
    #[must_use]
    pub const fn contains(self, capability: Capability) -> bool {
        match capability {
            Capability::Bot => self.bot,
            Capability::Logger => self.logger,
            Capability::Registry => self.registry,
        }
    }

    /// Iterates over the declared capabilities.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        [Capability::Bot, Capability::Logger, Capability::Registry]
            .into_iter()
            .filter(move |capability| self.contains(*capability))
    }
}

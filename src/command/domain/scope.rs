//! Cooldown scope kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::InboundMessage;

/// Granularity at which a cooldown is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// One cooldown entry per invoking user.
    User,
    /// One cooldown entry per channel.
    Channel,
    /// One cooldown entry per guild.
    Guild,
}

impl ScopeKind {
    /// All scope kinds in the order an invocation is checked against them.
    pub const ALL: [Self; 3] = [Self::User, Self::Channel, Self::Guild];

    /// Returns the identity this scope keys on for the given message.
    ///
    /// Direct messages carry no guild, so the guild scope yields `None`.
    #[must_use]
    pub fn identity(self, message: &InboundMessage) -> Option<&str> {
        match self {
            Self::User => Some(message.author_id()),
            Self::Channel => Some(message.channel_id()),
            Self::Guild => message.guild_id(),
        }
    }

    /// Returns the lowercase scope name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Channel => "channel",
            Self::Guild => "guild",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Policy failures and the hook kinds that recover from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use super::ScopeKind;

/// A cooldown violation for one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownFailure {
    scope: ScopeKind,
    total_cooldown: Duration,
    time_left: Duration,
}

impl CooldownFailure {
    /// Creates a cooldown failure.
    #[must_use]
    pub const fn new(scope: ScopeKind, total_cooldown: Duration, time_left: Duration) -> Self {
        Self {
            scope,
            total_cooldown,
            time_left,
        }
    }

    /// Returns the scope that denied the invocation.
    #[must_use]
    pub const fn scope(&self) -> ScopeKind {
        self.scope
    }

    /// Returns the configured cooldown.
    #[must_use]
    pub const fn total_cooldown(&self) -> Duration {
        self.total_cooldown
    }

    /// Returns the configured cooldown in seconds, rounded up.
    #[must_use]
    pub const fn total_cooldown_secs(&self) -> u64 {
        ceil_secs(self.total_cooldown)
    }

    /// Returns the time until the scope admits another invocation.
    #[must_use]
    pub const fn time_left(&self) -> Duration {
        self.time_left
    }

    /// Returns the remaining time in seconds, rounded up.
    #[must_use]
    pub const fn time_left_secs(&self) -> u64 {
        ceil_secs(self.time_left)
    }

    /// Returns the remaining time in milliseconds, saturating at `u64::MAX`.
    #[must_use]
    pub fn time_left_ms(&self) -> u64 {
        u64::try_from(self.time_left.as_millis()).unwrap_or(u64::MAX)
    }
}

const fn ceil_secs(duration: Duration) -> u64 {
    if duration.subsec_nanos() > 0 {
        duration.as_secs().saturating_add(1)
    } else {
        duration.as_secs()
    }
}

/// A recognised, recoverable policy failure.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CommandFailure {
    /// The invoker is not an administrator.
    #[error("user is not an admin")]
    Permission,

    /// A cooldown scope denied the invocation.
    #[error(
        "{} cooldown active: {}ms left of {}s",
        .0.scope(),
        .0.time_left_ms(),
        .0.total_cooldown_secs()
    )]
    Cooldown(CooldownFailure),
}

impl CommandFailure {
    /// Returns the hook kinds to try for this failure, most specific first.
    #[must_use]
    pub const fn hook_chain(&self) -> &'static [HookKind] {
        match self {
            Self::Permission => &[HookKind::PermissionError],
            Self::Cooldown(failure) => match failure.scope() {
                ScopeKind::User => &[HookKind::UserCooldownError, HookKind::AnyCooldownError],
                ScopeKind::Channel => {
                    &[HookKind::ChannelCooldownError, HookKind::AnyCooldownError]
                }
                ScopeKind::Guild => &[HookKind::GuildCooldownError, HookKind::AnyCooldownError],
            },
        }
    }
}

/// Names a recovery hook slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HookKind {
    /// Runs when an admin-only command is invoked by a non-admin.
    #[serde(rename = "on_permission_error")]
    PermissionError,
    /// Runs on a user-scope cooldown violation.
    #[serde(rename = "on_user_cooldown_error")]
    UserCooldownError,
    /// Runs on a channel-scope cooldown violation.
    #[serde(rename = "on_channel_cooldown_error")]
    ChannelCooldownError,
    /// Runs on a guild-scope cooldown violation.
    #[serde(rename = "on_guild_cooldown_error")]
    GuildCooldownError,
    /// Fallback for any cooldown violation without a scope-specific hook.
    #[serde(rename = "on_any_cooldown_error")]
    AnyCooldownError,
}

impl HookKind {
    /// Returns the hook's slot name as used in command manifests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PermissionError => "on_permission_error",
            Self::UserCooldownError => "on_user_cooldown_error",
            Self::ChannelCooldownError => "on_channel_cooldown_error",
            Self::GuildCooldownError => "on_guild_cooldown_error",
            Self::AnyCooldownError => "on_any_cooldown_error",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

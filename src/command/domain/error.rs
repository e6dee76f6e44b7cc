//! Error types for command metadata validation.

use thiserror::Error;

use super::{Capability, ScopeKind};

/// Errors returned while constructing a command from its definition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandValidationError {
    /// The alias list is empty.
    #[error("command aliases must contain at least one entry")]
    NoAliases,

    /// An alias is empty after trimming.
    #[error("command aliases must not be empty")]
    EmptyAlias,

    /// An alias contains whitespace and could never be typed as one token.
    #[error("command alias '{0}' must not contain whitespace")]
    InvalidAlias(String),

    /// The same alias appears twice in one command.
    #[error("command alias '{0}' is listed more than once")]
    DuplicateAlias(String),

    /// A cooldown duration is negative, NaN, infinite, or too large.
    #[error("cooldown for scope '{scope}' must be a non-negative number of seconds, got {seconds}")]
    InvalidCooldown {
        /// Scope whose cooldown is invalid.
        scope: ScopeKind,
        /// Rejected value.
        seconds: f64,
    },

    /// A capability was declared but no collaborator is available to inject.
    #[error("command '{alias}' declares {capability} but no collaborator was provided")]
    MissingCollaborator {
        /// First alias of the offending command.
        alias: String,
        /// Capability without a collaborator.
        capability: Capability,
    },
}

//! Validated command alias set.

use std::collections::HashSet;

use super::CommandValidationError;

/// Non-empty, duplicate-free list of aliases naming one command.
///
/// Declaration order is preserved; the first alias is the command's primary
/// name in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSet(Vec<String>);

impl AliasSet {
    /// Validates raw aliases.
    ///
    /// Each alias is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`CommandValidationError::NoAliases`] for an empty list,
    /// [`CommandValidationError::EmptyAlias`] for a blank alias,
    /// [`CommandValidationError::InvalidAlias`] when an alias contains
    /// whitespace, or [`CommandValidationError::DuplicateAlias`] when an alias
    /// is repeated.
    pub fn new(raw: &[String]) -> Result<Self, CommandValidationError> {
        if raw.is_empty() {
            return Err(CommandValidationError::NoAliases);
        }

        let mut seen = HashSet::with_capacity(raw.len());
        let mut aliases = Vec::with_capacity(raw.len());
        for alias in raw {
            let trimmed = alias.trim();
            if trimmed.is_empty() {
                return Err(CommandValidationError::EmptyAlias);
            }
            if trimmed.chars().any(char::is_whitespace) {
                return Err(CommandValidationError::InvalidAlias(alias.clone()));
            }
            if !seen.insert(trimmed) {
                return Err(CommandValidationError::DuplicateAlias(trimmed.to_owned()));
            }
            aliases.push(trimmed.to_owned());
        }

        Ok(Self(aliases))
    }

    /// Returns the first declared alias.
    #[must_use]
    pub fn primary(&self) -> &str {
        self.0.first().map_or("", String::as_str)
    }

    /// Returns whether `alias` names this command.
    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.0.iter().any(|candidate| candidate == alias)
    }

    /// Iterates over aliases in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty. A validated set never is.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

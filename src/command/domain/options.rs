//! Access-policy options shared by the registry and its commands.

use std::collections::BTreeSet;
use std::sync::Arc;

/// Policy values passed explicitly into the registry and each command.
///
/// The admin set is captured when a command is constructed and only
/// re-read on the next registry reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    admin_ids: Arc<BTreeSet<String>>,
    exempt_admins_from_cooldowns: bool,
}

impl CommandOptions {
    /// Creates options with the given administrator identifiers.
    #[must_use]
    pub fn new(admin_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            admin_ids: Arc::new(admin_ids.into_iter().map(Into::into).collect()),
            exempt_admins_from_cooldowns: false,
        }
    }

    /// Lets administrators bypass every cooldown scope.
    #[must_use]
    pub const fn exempting_admins_from_cooldowns(mut self, exempt: bool) -> Self {
        self.exempt_admins_from_cooldowns = exempt;
        self
    }

    /// Returns whether `user_id` is an administrator.
    #[must_use]
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_ids.contains(user_id)
    }

    /// Returns the administrator identifiers.
    #[must_use]
    pub fn admin_ids(&self) -> &BTreeSet<String> {
        &self.admin_ids
    }

    /// Returns whether administrators bypass cooldowns.
    #[must_use]
    pub const fn exempts_admins_from_cooldowns(&self) -> bool {
        self.exempt_admins_from_cooldowns
    }

    /// Returns the identities cooldown trackers should exempt.
    #[must_use]
    pub fn cooldown_exemptions(&self) -> Arc<BTreeSet<String>> {
        if self.exempt_admins_from_cooldowns {
            Arc::clone(&self.admin_ids)
        } else {
            Arc::new(BTreeSet::new())
        }
    }
}

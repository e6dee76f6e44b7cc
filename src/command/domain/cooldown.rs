//! Per-scope cooldown policy and tracking.
//!
//! A [`CooldownTracker`] remembers when each scope identity (a user, channel,
//! or guild id) last ran a command. An entry's presence within its duration
//! means the identity is still cooling down. Every stamp schedules its own
//! removal so idle identities do not accumulate; lookups also compare
//! timestamps, so a late or missing timer never extends a cooldown.

use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;

use super::{CommandValidationError, CooldownSettings, ScopeKind};

/// Clock shared between a command and its trackers.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// Validated cooldown durations for the three scopes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooldownPolicy {
    user: Duration,
    channel: Duration,
    guild: Duration,
}

impl CooldownPolicy {
    /// Validates raw cooldown settings expressed in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`CommandValidationError::InvalidCooldown`] naming the first
    /// scope whose value is negative, not finite, or out of range.
    pub fn from_settings(settings: &CooldownSettings) -> Result<Self, CommandValidationError> {
        Ok(Self {
            user: seconds_to_duration(ScopeKind::User, settings.user)?,
            channel: seconds_to_duration(ScopeKind::Channel, settings.channel)?,
            guild: seconds_to_duration(ScopeKind::Guild, settings.guild)?,
        })
    }

    /// Returns the cooldown for a scope; zero means none.
    #[must_use]
    pub const fn for_scope(&self, scope: ScopeKind) -> Duration {
        match scope {
            ScopeKind::User => self.user,
            ScopeKind::Channel => self.channel,
            ScopeKind::Guild => self.guild,
        }
    }

    /// Returns whether any scope has a positive cooldown.
    #[must_use]
    pub const fn is_limited(&self) -> bool {
        !(self.user.is_zero() && self.channel.is_zero() && self.guild.is_zero())
    }
}

fn seconds_to_duration(scope: ScopeKind, seconds: f64) -> Result<Duration, CommandValidationError> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| CommandValidationError::InvalidCooldown { scope, seconds })
}

/// Result of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    /// The invocation may proceed.
    Allowed,
    /// The identity is still cooling down.
    Limited {
        /// Time until the identity may invoke again.
        time_left: Duration,
    },
}

impl CooldownDecision {
    /// Returns whether the invocation may proceed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[derive(Debug)]
struct CooldownEntry {
    stamped_at: DateTime<Utc>,
    generation: u64,
    expiry: Option<AbortHandle>,
}

impl CooldownEntry {
    fn cancel_expiry(&self) {
        if let Some(handle) = &self.expiry {
            handle.abort();
        }
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    entries: HashMap<String, CooldownEntry>,
    generation: u64,
}

/// Tracks last-invocation stamps for one scope kind.
pub struct CooldownTracker {
    scope: ScopeKind,
    clock: SharedClock,
    exempt: Arc<BTreeSet<String>>,
    state: Arc<Mutex<TrackerState>>,
}

impl CooldownTracker {
    /// Creates a tracker with no exempt identities.
    #[must_use]
    pub fn new(scope: ScopeKind, clock: SharedClock) -> Self {
        Self {
            scope,
            clock,
            exempt: Arc::new(BTreeSet::new()),
            state: Arc::new(Mutex::new(TrackerState::default())),
        }
    }

    /// Lets the given invokers bypass this tracker entirely.
    #[must_use]
    pub fn with_exemptions(mut self, exempt: Arc<BTreeSet<String>>) -> Self {
        self.exempt = exempt;
        self
    }

    /// Returns the scope this tracker keys on.
    #[must_use]
    pub const fn scope(&self) -> ScopeKind {
        self.scope
    }

    /// Returns whether the invoker bypasses cooldowns.
    #[must_use]
    pub fn is_exempt(&self, invoker_id: &str) -> bool {
        self.exempt.contains(invoker_id)
    }

    /// Checks `identity` against `duration` and stamps it when allowed.
    ///
    /// A zero duration or an exempt invoker is always allowed and leaves no
    /// entry behind. An expired entry is replaced by a fresh stamp.
    pub fn check_and_stamp(
        &self,
        identity: &str,
        invoker_id: &str,
        duration: Duration,
    ) -> CooldownDecision {
        if duration.is_zero() || self.is_exempt(invoker_id) {
            return CooldownDecision::Allowed;
        }

        let now = self.clock.utc();
        let mut state = self.lock_state();
        if let Some(entry) = state.entries.get(identity) {
            let elapsed = (now - entry.stamped_at).to_std().unwrap_or_default();
            if elapsed < duration {
                return CooldownDecision::Limited {
                    time_left: duration.saturating_sub(elapsed),
                };
            }
        }

        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;
        let entry = CooldownEntry {
            stamped_at: now,
            generation,
            expiry: self.schedule_expiry(identity, generation, duration),
        };
        if let Some(previous) = state.entries.insert(identity.to_owned(), entry) {
            previous.cancel_expiry();
        }
        CooldownDecision::Allowed
    }

    /// Returns the number of identities currently holding an entry.
    #[must_use]
    pub fn active_entries(&self) -> usize {
        self.lock_state().entries.len()
    }

    fn lock_state(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn schedule_expiry(
        &self,
        identity: &str,
        generation: u64,
        duration: Duration,
    ) -> Option<AbortHandle> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let state = Arc::downgrade(&self.state);
        let key = identity.to_owned();
        let task = runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            remove_if_current(&state, &key, generation);
        });
        Some(task.abort_handle())
    }
}

fn remove_if_current(state: &Weak<Mutex<TrackerState>>, key: &str, generation: u64) {
    let Some(shared) = state.upgrade() else {
        return;
    };
    let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
    if guard
        .entries
        .get(key)
        .is_some_and(|entry| entry.generation == generation)
    {
        guard.entries.remove(key);
    }
}

impl Drop for CooldownTracker {
    fn drop(&mut self) {
        for entry in self.lock_state().entries.values() {
            entry.cancel_expiry();
        }
    }
}

impl std::fmt::Debug for CooldownTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CooldownTracker")
            .field("scope", &self.scope)
            .field("exempt", &self.exempt)
            .field("active_entries", &self.active_entries())
            .finish_non_exhaustive()
    }
}

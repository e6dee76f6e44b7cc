//! Executable command: policy enforcement around a user handler.
//!
//! [`Command::execute`] checks the admin gate, then each configured cooldown
//! scope in the order user, channel, guild, and only then awaits the
//! handler. Cooldown stamps are taken before the handler is awaited, so a
//! second message from the same identity always observes the first stamp.
//! Policy failures, including ones a handler returns itself, are offered to
//! the command's hooks before they escape to the caller.

use std::sync::Arc;
use thiserror::Error;

use crate::command::domain::{
    AliasSet, CapabilitySet, CommandFailure, CommandOptions, CommandSpec, CommandValidationError,
    CooldownDecision, CooldownFailure, CooldownPolicy, CooldownTracker, HookKind, InboundMessage,
    Invocation, ScopeKind, SharedClock,
};
use crate::command::ports::{
    Collaborators, CommandContext, CommandDefinition, CommandHandler, CommandHooks, HandlerError,
};

/// How an execution finished when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// The handler ran to completion.
    Completed,
    /// A policy failure was consumed by a hook.
    Recovered {
        /// Hook slot that handled the failure.
        kind: HookKind,
        /// The failure that was recovered.
        failure: CommandFailure,
    },
}

/// Errors escaping [`Command::execute`].
#[derive(Debug, Clone, Error)]
pub enum ExecuteError {
    /// A policy failure for which no hook is registered.
    #[error("unhandled command failure: {0}")]
    Unhandled(CommandFailure),

    /// The handler failed with an unrecognised error.
    #[error("command handler failed: {0}")]
    Handler(#[source] HandlerError),

    /// A recovery hook itself failed.
    #[error("{kind} hook failed: {source}")]
    Hook {
        /// Hook slot that failed.
        kind: HookKind,
        /// Hook error.
        #[source]
        source: HandlerError,
    },
}

impl ExecuteError {
    /// Returns the policy failure behind this error, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&CommandFailure> {
        match self {
            Self::Unhandled(failure) => Some(failure),
            Self::Handler(_) | Self::Hook { .. } => None,
        }
    }
}

/// A validated, fully wired command.
pub struct Command {
    spec: CommandSpec,
    handler: Arc<dyn CommandHandler>,
    hooks: CommandHooks,
    options: CommandOptions,
    collaborators: Collaborators,
    trackers: [CooldownTracker; 3],
}

impl Command {
    /// Validates `definition` and injects the collaborators it declares.
    ///
    /// Each command owns three fresh cooldown trackers; state is never
    /// shared between commands.
    ///
    /// # Errors
    ///
    /// Returns [`CommandValidationError`] when metadata is invalid or a
    /// declared capability has no collaborator in `collaborators`.
    pub fn new(
        definition: CommandDefinition,
        options: &CommandOptions,
        collaborators: &Collaborators,
        clock: &SharedClock,
    ) -> Result<Self, CommandValidationError> {
        let CommandDefinition {
            metadata,
            handler,
            hooks,
        } = definition;
        let spec = metadata.validate()?;

        if let Some(capability) = spec
            .capabilities()
            .iter()
            .find(|capability| !collaborators.provides(*capability))
        {
            return Err(CommandValidationError::MissingCollaborator {
                alias: spec.aliases().primary().to_owned(),
                capability,
            });
        }

        let exemptions = options.cooldown_exemptions();
        let trackers = ScopeKind::ALL.map(|scope| {
            CooldownTracker::new(scope, Arc::clone(clock)).with_exemptions(Arc::clone(&exemptions))
        });

        Ok(Self {
            collaborators: collaborators.restricted_to(spec.capabilities()),
            spec,
            handler,
            hooks,
            options: options.clone(),
            trackers,
        })
    }

    /// Runs the command for `invocation`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::Unhandled`] for a policy failure with no
    /// matching hook, [`ExecuteError::Handler`] for any other handler error,
    /// and [`ExecuteError::Hook`] when a recovery hook fails.
    pub async fn execute(&self, invocation: Invocation) -> Result<ExecuteOutcome, ExecuteError> {
        let ctx = CommandContext::new(invocation, self.collaborators.clone());
        let result = match self.check_policy(ctx.message()) {
            Ok(()) => self.handler.run(&ctx).await,
            Err(failure) => Err(HandlerError::Failure(failure)),
        };

        match result {
            Ok(()) => Ok(ExecuteOutcome::Completed),
            Err(HandlerError::Failure(failure)) => self.recover(&ctx, failure).await,
            Err(error) => Err(ExecuteError::Handler(error)),
        }
    }

    fn check_policy(&self, message: &InboundMessage) -> Result<(), CommandFailure> {
        let invoker = message.author_id();
        if self.spec.is_admin_only() && !self.options.is_admin(invoker) {
            tracing::debug!(command = self.name(), invoker, "permission denied");
            return Err(CommandFailure::Permission);
        }

        let cooldowns = self.spec.cooldowns();
        for tracker in &self.trackers {
            let scope = tracker.scope();
            let duration = cooldowns.for_scope(scope);
            if duration.is_zero() {
                continue;
            }
            let Some(identity) = scope.identity(message) else {
                continue;
            };
            if let CooldownDecision::Limited { time_left } =
                tracker.check_and_stamp(identity, invoker, duration)
            {
                tracing::debug!(
                    command = self.name(),
                    %scope,
                    identity,
                    time_left_ms = u64::try_from(time_left.as_millis()).unwrap_or(u64::MAX),
                    "cooldown active"
                );
                return Err(CommandFailure::Cooldown(CooldownFailure::new(
                    scope, duration, time_left,
                )));
            }
        }
        Ok(())
    }

    async fn recover(
        &self,
        ctx: &CommandContext,
        failure: CommandFailure,
    ) -> Result<ExecuteOutcome, ExecuteError> {
        let Some((kind, hook)) = self.hooks.lookup(&failure) else {
            return Err(ExecuteError::Unhandled(failure));
        };
        tracing::debug!(command = self.name(), %kind, "routing failure to hook");
        hook.on_failure(ctx, &failure)
            .await
            .map_err(|source| ExecuteError::Hook { kind, source })?;
        Ok(ExecuteOutcome::Recovered { kind, failure })
    }

    /// Returns the primary alias.
    #[must_use]
    pub fn name(&self) -> &str {
        self.spec.aliases().primary()
    }

    /// Returns all aliases.
    #[must_use]
    pub const fn aliases(&self) -> &AliasSet {
        self.spec.aliases()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.spec.description()
    }

    /// Returns whether only administrators may run the command.
    #[must_use]
    pub const fn is_admin_only(&self) -> bool {
        self.spec.is_admin_only()
    }

    /// Returns the declared capabilities.
    #[must_use]
    pub const fn capabilities(&self) -> CapabilitySet {
        self.spec.capabilities()
    }

    /// Returns the cooldown policy.
    #[must_use]
    pub const fn cooldowns(&self) -> CooldownPolicy {
        self.spec.cooldowns()
    }

    /// Returns the tracker for `scope`.
    #[must_use]
    pub fn cooldown_tracker(&self, scope: ScopeKind) -> Option<&CooldownTracker> {
        self.trackers.iter().find(|tracker| tracker.scope() == scope)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("spec", &self.spec)
            .field("hooks", &self.hooks)
            .field("collaborators", &self.collaborators)
            .finish_non_exhaustive()
    }
}

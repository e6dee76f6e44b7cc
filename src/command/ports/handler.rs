//! Handler and hook ports implemented by command authors.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use super::{CapabilityError, CommandContext, TransportError};
use crate::command::domain::CommandFailure;

/// Errors a handler or hook can return.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// A recognised policy failure; routed to the command's hooks.
    #[error(transparent)]
    Failure(#[from] CommandFailure),

    /// The handler reached for an undeclared collaborator.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// Sending a reply failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Any other handler failure.
    #[error("{0}")]
    Other(Arc<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    /// Wraps an arbitrary error.
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Arc::new(err))
    }

    /// Creates an error from a plain message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::other(std::io::Error::other(message.into()))
    }

    /// Returns the policy failure this error carries, if any.
    #[must_use]
    pub const fn as_failure(&self) -> Option<&CommandFailure> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Result type for handlers and hooks.
pub type HandlerResult = Result<(), HandlerError>;

/// User logic run when a command passes its policy checks.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Runs the command.
    ///
    /// # Errors
    ///
    /// Returning [`HandlerError::Failure`] routes the failure to the
    /// command's hooks; any other error propagates to the dispatcher.
    async fn run(&self, ctx: &CommandContext) -> HandlerResult;
}

/// Recovery callback run for a policy failure.
#[async_trait]
pub trait FailureHook: Send + Sync {
    /// Reacts to `failure`, typically by replying to the invoker.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when the recovery itself fails.
    async fn on_failure(&self, ctx: &CommandContext, failure: &CommandFailure) -> HandlerResult;
}

/// Adapts an async closure into a [`CommandHandler`].
pub struct FnHandler<F>(F);

/// Wraps `f` as a command handler. The closure receives an owned context.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn CommandHandler>
where
    F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

#[async_trait]
impl<F, Fut> CommandHandler for FnHandler<F>
where
    F: Fn(CommandContext) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn run(&self, ctx: &CommandContext) -> HandlerResult {
        (self.0)(ctx.clone()).await
    }
}

/// Adapts an async closure into a [`FailureHook`].
pub struct FnHook<F>(F);

/// Wraps `f` as a failure hook. The closure receives an owned context.
pub fn hook_fn<F, Fut>(f: F) -> Arc<dyn FailureHook>
where
    F: Fn(CommandContext, CommandFailure) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(FnHook(f))
}

#[async_trait]
impl<F, Fut> FailureHook for FnHook<F>
where
    F: Fn(CommandContext, CommandFailure) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn on_failure(&self, ctx: &CommandContext, failure: &CommandFailure) -> HandlerResult {
        (self.0)(ctx.clone(), *failure).await
    }
}

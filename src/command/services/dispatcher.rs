//! Message dispatcher: the boundary between the gateway and the registry.

use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::command::domain::{InboundMessage, Invocation};
use crate::command::ports::{BotLogger, CommandSource};
use crate::command::services::{CommandRegistry, ExecuteOutcome};

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The message did not address the bot.
    Ignored,
    /// The alias matched no command.
    UnknownCommand(String),
    /// The command ran or a hook recovered its failure.
    Executed(ExecuteOutcome),
    /// An error escaped the command and was logged.
    Failed,
}

/// Routes inbound messages to commands.
///
/// Errors escaping a command are logged and never stop dispatch of later
/// messages. Each command runs on its own task so a panicking handler is
/// contained.
pub struct MessageDispatcher<S>
where
    S: CommandSource + 'static,
{
    registry: CommandRegistry<S>,
    logger: Arc<dyn BotLogger>,
    prefix: String,
}

impl<S> MessageDispatcher<S>
where
    S: CommandSource + 'static,
{
    /// Creates a dispatcher with no command prefix.
    #[must_use]
    pub fn new(registry: CommandRegistry<S>, logger: Arc<dyn BotLogger>) -> Self {
        Self {
            registry,
            logger,
            prefix: String::new(),
        }
    }

    /// Requires messages to start with `prefix` to be treated as commands.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Returns the registry commands are resolved against.
    #[must_use]
    pub const fn registry(&self) -> &CommandRegistry<S> {
        &self.registry
    }

    /// Dispatches one message.
    pub async fn on_message(&self, message: InboundMessage) -> DispatchOutcome {
        let Some(stripped) = message.content().trim_start().strip_prefix(self.prefix.as_str())
        else {
            return DispatchOutcome::Ignored;
        };
        let command_text = stripped.to_owned();
        let Some(invocation) = Invocation::parse(message, &command_text) else {
            return DispatchOutcome::Ignored;
        };
        let Some(command) = self.registry.resolve(invocation.alias()) else {
            tracing::debug!(alias = invocation.alias(), "no command for alias");
            return DispatchOutcome::UnknownCommand(invocation.alias().to_owned());
        };

        let dispatch_id = Uuid::new_v4();
        let alias = invocation.alias().to_owned();
        tracing::debug!(%dispatch_id, alias = %alias, author = invocation.message().author_id(), "dispatching");

        let task = tokio::spawn(async move { command.execute(invocation).await });
        match task.await {
            Ok(Ok(outcome)) => DispatchOutcome::Executed(outcome),
            Ok(Err(error)) => {
                self.logger
                    .error(&format!("Command '{alias}' failed: {error}"));
                tracing::debug!(%dispatch_id, ?error, "command error escaped");
                DispatchOutcome::Failed
            }
            Err(join_error) => {
                self.logger
                    .error(&format!("Command '{alias}' aborted: {join_error}"));
                DispatchOutcome::Failed
            }
        }
    }

    /// Dispatches messages one at a time until the gateway closes `events`.
    pub async fn run(&self, mut events: mpsc::Receiver<InboundMessage>) {
        while let Some(message) = events.recv().await {
            self.on_message(message).await;
        }
        self.logger.info("Gateway event stream closed; dispatcher stopping.");
    }
}

//! Shared fixtures for command dispatch tests.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::command::adapters::memory::{
    InMemoryCommandSource, ManualClock, RecordingLogger, RecordingTransport,
};
use crate::command::domain::{
    CommandMetadata, CommandOptions, InboundMessage, Invocation, SharedClock,
};
use crate::command::ports::{
    Collaborators, CommandContext, CommandDefinition, CommandHandler, FailureHook, HandlerResult,
    Transport, handler_fn, hook_fn,
};
use crate::command::services::{CommandRegistry, MessageDispatcher};

/// A message from `author` in `channel`, sent at the clock's epoch.
pub fn message(author: &str, channel: &str, content: &str) -> InboundMessage {
    InboundMessage::new(
        format!("{author}:{channel}:{content}"),
        author,
        channel,
        content,
        DateTime::<Utc>::UNIX_EPOCH,
    )
}

/// An invocation of `alias` with no arguments.
pub fn invoke(alias: &str, author: &str, channel: &str) -> Invocation {
    Invocation::new(message(author, channel, alias), alias, Vec::new())
}

/// Handler that succeeds without side effects.
pub fn noop() -> Arc<dyn CommandHandler> {
    handler_fn(|_ctx| async { Ok(()) })
}

/// Handler that counts how often it ran.
pub fn counting(hits: &Arc<AtomicUsize>) -> Arc<dyn CommandHandler> {
    let counter = Arc::clone(hits);
    handler_fn(move |_ctx| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    })
}

/// Hook that counts how often it ran.
pub fn counting_hook(hits: &Arc<AtomicUsize>) -> Arc<dyn FailureHook> {
    let counter = Arc::clone(hits);
    hook_fn(move |_ctx, _failure| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    })
}

/// Handler replying with its arguments joined by spaces.
pub fn echo() -> Arc<dyn CommandHandler> {
    handler_fn(|ctx| async move {
        let reply = ctx.arguments().join(" ");
        ctx.bot()?.send_reply(ctx.message(), &reply).await?;
        Ok(())
    })
}

/// Handler that panics.
pub struct PanickingHandler;

#[async_trait::async_trait]
impl CommandHandler for PanickingHandler {
    async fn run(&self, _ctx: &CommandContext) -> HandlerResult {
        panic!("handler exploded");
    }
}

/// Definition for `aliases` with a no-op handler.
pub fn definition(aliases: &[&str]) -> CommandDefinition {
    CommandDefinition::new(CommandMetadata::new(aliases.iter().copied()), noop())
}

/// Registry wired to in-memory adapters.
pub struct Harness {
    pub clock: ManualClock,
    pub transport: RecordingTransport,
    pub logger: RecordingLogger,
    pub source: InMemoryCommandSource,
    pub registry: CommandRegistry<InMemoryCommandSource>,
}

impl Harness {
    /// Creates a harness whose source serves `definitions`. Call
    /// [`CommandRegistry::reload`] to load them.
    pub fn new(options: CommandOptions, definitions: Vec<CommandDefinition>) -> Self {
        let clock = ManualClock::default();
        let transport = RecordingTransport::new();
        let logger = RecordingLogger::new();
        let source = InMemoryCommandSource::new(definitions);
        let registry = CommandRegistry::new(
            Arc::new(source.clone()),
            Arc::new(transport.clone()),
            Arc::new(logger.clone()),
            options,
            Arc::new(clock.clone()),
        );
        Self {
            clock,
            transport,
            logger,
            source,
            registry,
        }
    }

    /// Returns a dispatcher over the harness registry.
    pub fn dispatcher(&self) -> MessageDispatcher<InMemoryCommandSource> {
        MessageDispatcher::new(self.registry.clone(), Arc::new(self.logger.clone()))
    }

    /// Returns the harness clock as a shared clock.
    pub fn shared_clock(&self) -> SharedClock {
        Arc::new(self.clock.clone())
    }

    /// Returns the harness transport as a port object.
    pub fn bot(&self) -> Arc<dyn Transport> {
        Arc::new(self.transport.clone())
    }

    /// Returns bot and logger collaborators.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new()
            .with_bot(self.bot())
            .with_logger(Arc::new(self.logger.clone()))
    }
}

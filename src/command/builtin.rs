//! Built-in commands: `ping`, `reload` and `shutdown`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::command::adapters::{HandlerCatalogue, TemplateError, TemplateReplyHook};
use crate::command::domain::SharedClock;
use crate::command::ports::{
    CommandContext, CommandDefinition, CommandHandler, DiscoveryResult, HandlerResult, Transport,
};

/// Reply sent by the `permission_denied` hook.
pub const PERMISSION_DENIED_REPLY: &str =
    "You do not have sufficient permissions to run this command.";

/// Template rendered by the `cooldown_notice` hook.
pub const COOLDOWN_NOTICE_TEMPLATE: &str =
    "Please wait {{ time_left_secs }}s before using {{ alias }} again.";

/// Manifest declaring the built-in commands.
pub const DEFAULT_MANIFEST: &str = r#"{
  "commands": [
    {
      "aliases": ["ping", "pong"],
      "description": "Check response time from the gateway to the bot.",
      "uses_bot": true,
      "cooldowns": { "user": 5 },
      "handler": "ping",
      "hooks": { "on_any_cooldown_error": "cooldown_notice" }
    },
    {
      "aliases": ["reload"],
      "description": "Reload the command set.",
      "uses_bot": true,
      "uses_registry": true,
      "handler": "reload"
    },
    {
      "aliases": ["shutdown"],
      "description": "Disconnect the bot from the gateway.",
      "admin_only": true,
      "uses_bot": true,
      "uses_logger": true,
      "handler": "shutdown",
      "hooks": { "on_permission_error": "permission_denied" }
    }
  ]
}"#;

/// Replies with the gateway-to-bot latency.
pub struct PingHandler {
    clock: SharedClock,
}

impl PingHandler {
    /// Creates the handler.
    #[must_use]
    pub const fn new(clock: SharedClock) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl CommandHandler for PingHandler {
    async fn run(&self, ctx: &CommandContext) -> HandlerResult {
        let latency = (self.clock.utc() - ctx.message().sent_at())
            .num_milliseconds()
            .max(0);
        ctx.bot()?
            .send_reply(ctx.message(), &format!("Pong! Latency: {latency}ms."))
            .await?;
        Ok(())
    }
}

/// Reloads the registry and reports the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReloadHandler;

#[async_trait]
impl CommandHandler for ReloadHandler {
    async fn run(&self, ctx: &CommandContext) -> HandlerResult {
        let bot = ctx.bot()?;
        let reply = match ctx.registry()?.reload().await {
            Ok(_) => "Reload successful.",
            Err(_) => "Failed to reload commands.",
        };
        bot.send_reply(ctx.message(), reply).await?;
        Ok(())
    }
}

/// Logs and closes the gateway connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShutdownHandler;

#[async_trait]
impl CommandHandler for ShutdownHandler {
    async fn run(&self, ctx: &CommandContext) -> HandlerResult {
        let bot = ctx.bot()?;
        let logger = ctx.logger()?;
        logger.info("Shutting down bot...");
        if let Err(error) = bot.disconnect().await {
            if let Err(reply_error) = bot
                .send_reply(ctx.message(), "Failed to shutdown bot.")
                .await
            {
                logger.error(&format!("Could not report failed shutdown: {reply_error}"));
            }
            return Err(error.into());
        }
        Ok(())
    }
}

/// Builds a catalogue with the built-in handlers and reply hooks.
///
/// # Errors
///
/// Returns [`TemplateError`] if a built-in reply template fails to parse.
pub fn catalogue(
    transport: &Arc<dyn Transport>,
    clock: &SharedClock,
) -> Result<HandlerCatalogue, TemplateError> {
    let permission_denied = TemplateReplyHook::new(Arc::clone(transport), PERMISSION_DENIED_REPLY)?;
    let cooldown_notice = TemplateReplyHook::new(Arc::clone(transport), COOLDOWN_NOTICE_TEMPLATE)?;
    Ok(HandlerCatalogue::new()
        .with_handler("ping", Arc::new(PingHandler::new(Arc::clone(clock))))
        .with_handler("reload", Arc::new(ReloadHandler))
        .with_handler("shutdown", Arc::new(ShutdownHandler))
        .with_hook("permission_denied", Arc::new(permission_denied))
        .with_hook("cooldown_notice", Arc::new(cooldown_notice)))
}

/// Binds [`DEFAULT_MANIFEST`] against `catalogue`.
///
/// # Errors
///
/// Returns a discovery error when `catalogue` lacks a built-in name.
pub fn definitions(catalogue: &HandlerCatalogue) -> DiscoveryResult<Vec<CommandDefinition>> {
    catalogue.bind_manifest(DEFAULT_MANIFEST)
}

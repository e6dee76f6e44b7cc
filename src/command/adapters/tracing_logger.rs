//! Logger adapter forwarding to `tracing`.

use crate::command::ports::BotLogger;

/// Emits bot log lines as `tracing` events under the `herald` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl BotLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "herald", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "herald", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "herald", "{message}");
    }
}

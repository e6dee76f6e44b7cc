//! Logger port.
//!
//! The registry reports reload diagnostics here and commands declaring
//! `uses_logger` receive the same handle.

/// Leveled text sink.
pub trait BotLogger: Send + Sync {
    /// Records an informational line.
    fn info(&self, message: &str);

    /// Records a recoverable problem.
    fn warn(&self, message: &str);

    /// Records a failure.
    fn error(&self, message: &str);
}

//! Transport port for replying on the gateway.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::command::domain::InboundMessage;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Connection to the chat platform used to send replies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `content` as a reply in the channel `origin` was posted in.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the reply cannot be delivered.
    async fn send_reply(&self, origin: &InboundMessage, content: &str) -> TransportResult<()>;

    /// Closes the gateway connection.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the connection cannot be closed
    /// cleanly.
    async fn disconnect(&self) -> TransportResult<()>;
}

/// Errors returned by transport implementations.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The connection has already been closed.
    #[error("transport is disconnected")]
    Disconnected,

    /// Delivery failed.
    #[error("failed to deliver reply: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}

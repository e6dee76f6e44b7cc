//! Recording transport for tests and local runs.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::command::domain::InboundMessage;
use crate::command::ports::{Transport, TransportError, TransportResult};

/// A reply captured by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReply {
    /// Channel the reply was sent to.
    pub channel_id: String,
    /// Identifier of the message being replied to.
    pub in_reply_to: String,
    /// Reply text.
    pub content: String,
}

#[derive(Debug, Default)]
struct TransportState {
    replies: Vec<SentReply>,
    disconnected: bool,
}

/// Transport that records replies instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<TransportState>>,
}

impl RecordingTransport {
    /// Creates a connected transport with no recorded replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every reply sent so far.
    #[must_use]
    pub fn replies(&self) -> Vec<SentReply> {
        self.lock().replies.clone()
    }

    /// Returns the reply texts sent so far.
    #[must_use]
    pub fn reply_texts(&self) -> Vec<String> {
        self.lock()
            .replies
            .iter()
            .map(|reply| reply.content.clone())
            .collect()
    }

    /// Returns whether [`Transport::disconnect`] has been called.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.lock().disconnected
    }

    fn lock(&self) -> MutexGuard<'_, TransportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_reply(&self, origin: &InboundMessage, content: &str) -> TransportResult<()> {
        let mut state = self.lock();
        if state.disconnected {
            return Err(TransportError::Disconnected);
        }
        state.replies.push(SentReply {
            channel_id: origin.channel_id().to_owned(),
            in_reply_to: origin.id().to_owned(),
            content: content.to_owned(),
        });
        Ok(())
    }

    async fn disconnect(&self) -> TransportResult<()> {
        let mut state = self.lock();
        if state.disconnected {
            return Err(TransportError::Disconnected);
        }
        state.disconnected = true;
        Ok(())
    }
}

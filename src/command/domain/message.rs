//! Inbound chat message and invocation types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A text message delivered by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    id: String,
    author_id: String,
    channel_id: String,
    guild_id: Option<String>,
    content: String,
    sent_at: DateTime<Utc>,
}

impl InboundMessage {
    /// Creates a direct (guild-less) message.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        author_id: impl Into<String>,
        channel_id: impl Into<String>,
        content: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            channel_id: channel_id.into(),
            guild_id: None,
            content: content.into(),
            sent_at,
        }
    }

    /// Marks the message as posted inside a guild.
    #[must_use]
    pub fn in_guild(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }

    /// Returns the gateway message identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the identifier of the invoking user.
    #[must_use]
    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    /// Returns the channel the message was posted in.
    #[must_use]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Returns the guild the message was posted in, if any.
    #[must_use]
    pub fn guild_id(&self) -> Option<&str> {
        self.guild_id.as_deref()
    }

    /// Returns the raw text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the time the gateway stamped on the message.
    #[must_use]
    pub const fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }
}

/// A message matched to a command alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    message: Arc<InboundMessage>,
    alias: String,
    arguments: Vec<String>,
}

impl Invocation {
    /// Creates an invocation for an already resolved alias.
    #[must_use]
    pub fn new(
        message: impl Into<Arc<InboundMessage>>,
        alias: impl Into<String>,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            message: message.into(),
            alias: alias.into(),
            arguments,
        }
    }

    /// Splits message text (prefix already removed) into alias and arguments.
    ///
    /// Returns `None` when the text holds no alias token.
    #[must_use]
    pub fn parse(message: impl Into<Arc<InboundMessage>>, text: &str) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let alias = tokens.next()?.to_owned();
        let arguments = tokens.map(str::to_owned).collect();
        Some(Self::new(message, alias, arguments))
    }

    /// Returns the triggering message.
    #[must_use]
    pub fn message(&self) -> &InboundMessage {
        &self.message
    }

    /// Returns the alias the command was invoked by.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the whitespace-separated arguments after the alias.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

//! Failure hook that replies with a rendered `minijinja` template.
//!
//! Templates see `alias`, `author_id`, `channel_id` and `failure`
//! (`"permission"` or `"cooldown"`). Cooldown failures add `scope`,
//! `total_cooldown` and `time_left_secs` (both whole seconds, rounded up)
//! plus `time_left_ms`.

use async_trait::async_trait;
use minijinja::Environment;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::command::domain::CommandFailure;
use crate::command::ports::{CommandContext, FailureHook, HandlerError, HandlerResult, Transport};

/// Errors for reply templates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The template does not parse.
    #[error("invalid reply template: {0}")]
    Syntax(String),

    /// Rendering failed.
    #[error("reply template rendering failed: {0}")]
    Render(String),
}

/// Hook that renders a reply template and sends it through the transport.
pub struct TemplateReplyHook {
    transport: Arc<dyn Transport>,
    template: String,
}

impl TemplateReplyHook {
    /// Creates a hook after checking that `template` parses.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Syntax`] when the template is malformed.
    pub fn new(
        transport: Arc<dyn Transport>,
        template: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let source = template.into();
        check_syntax(&source)?;
        Ok(Self {
            transport,
            template: source,
        })
    }

    /// Renders the reply for `failure`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Render`] when rendering fails.
    pub fn render(
        &self,
        ctx: &CommandContext,
        failure: &CommandFailure,
    ) -> Result<String, TemplateError> {
        Environment::new()
            .render_str(&self.template, build_template_context(ctx, failure))
            .map_err(|error| TemplateError::Render(error.to_string()))
    }
}

fn check_syntax(source: &str) -> Result<(), TemplateError> {
    let environment = Environment::new();
    environment
        .template_from_str(source)
        .map_err(|error| TemplateError::Syntax(error.to_string()))?;
    Ok(())
}

fn build_template_context(ctx: &CommandContext, failure: &CommandFailure) -> Map<String, Value> {
    let mut context = Map::new();
    context.insert("alias".to_owned(), Value::String(ctx.alias().to_owned()));
    context.insert(
        "author_id".to_owned(),
        Value::String(ctx.message().author_id().to_owned()),
    );
    context.insert(
        "channel_id".to_owned(),
        Value::String(ctx.message().channel_id().to_owned()),
    );
    match failure {
        CommandFailure::Permission => {
            context.insert("failure".to_owned(), Value::String("permission".to_owned()));
        }
        CommandFailure::Cooldown(cooldown) => {
            context.insert("failure".to_owned(), Value::String("cooldown".to_owned()));
            context.insert(
                "scope".to_owned(),
                Value::String(cooldown.scope().as_str().to_owned()),
            );
            context.insert(
                "total_cooldown".to_owned(),
                Value::from(cooldown.total_cooldown_secs()),
            );
            context.insert("time_left_ms".to_owned(), Value::from(cooldown.time_left_ms()));
            context.insert("time_left_secs".to_owned(), Value::from(cooldown.time_left_secs()));
        }
    }
    context
}

#[async_trait]
impl FailureHook for TemplateReplyHook {
    async fn on_failure(&self, ctx: &CommandContext, failure: &CommandFailure) -> HandlerResult {
        let reply = self.render(ctx, failure).map_err(HandlerError::other)?;
        self.transport.send_reply(ctx.message(), &reply).await?;
        Ok(())
    }
}

impl std::fmt::Debug for TemplateReplyHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateReplyHook")
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

//! Unit tests for template reply hooks.

use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;

use super::support::invoke;
use crate::command::adapters::memory::RecordingTransport;
use crate::command::adapters::{TemplateError, TemplateReplyHook};
use crate::command::domain::{CommandFailure, CooldownFailure, ScopeKind};
use crate::command::ports::{
    Collaborators, CommandContext, FailureHook, MockTransport, TransportError,
};

fn context(alias: &str) -> CommandContext {
    CommandContext::new(invoke(alias, "U1", "C1"), Collaborators::new())
}

fn user_cooldown(time_left: Duration) -> CommandFailure {
    CommandFailure::Cooldown(CooldownFailure::new(
        ScopeKind::User,
        Duration::from_secs(10),
        time_left,
    ))
}

#[rstest]
fn malformed_template_is_rejected() {
    let result = TemplateReplyHook::new(Arc::new(RecordingTransport::new()), "{{ unclosed");

    assert!(matches!(result, Err(TemplateError::Syntax(_))));
}

#[rstest]
fn cooldown_fields_are_rendered() {
    let hook = TemplateReplyHook::new(
        Arc::new(RecordingTransport::new()),
        "{{ alias }}|{{ failure }}|{{ scope }}|{{ total_cooldown }}|{{ time_left_ms }}|{{ time_left_secs }}",
    )
    .expect("template should parse");

    let rendered = hook
        .render(&context("ping"), &user_cooldown(Duration::from_secs(8)))
        .expect("template should render");

    assert_eq!(rendered, "ping|cooldown|user|10|8000|8");
}

#[rstest]
#[case(Duration::from_millis(7500), "8")]
#[case(Duration::from_millis(1), "1")]
#[case(Duration::from_secs(3), "3")]
fn time_left_seconds_round_up(#[case] time_left: Duration, #[case] expected: &str) {
    let hook = TemplateReplyHook::new(Arc::new(RecordingTransport::new()), "{{ time_left_secs }}")
        .expect("template should parse");

    let rendered = hook
        .render(&context("ping"), &user_cooldown(time_left))
        .expect("template should render");

    assert_eq!(rendered, expected);
}

#[rstest]
fn permission_failure_has_no_scope() {
    let hook = TemplateReplyHook::new(
        Arc::new(RecordingTransport::new()),
        "{{ failure }} for {{ author_id }} in {{ channel_id }}{% if scope %} ({{ scope }}){% endif %}",
    )
    .expect("template should parse");

    let rendered = hook
        .render(&context("reload"), &CommandFailure::Permission)
        .expect("template should render");

    assert_eq!(rendered, "permission for U1 in C1");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hook_sends_rendered_reply() {
    let mut transport = MockTransport::new();
    transport
        .expect_send_reply()
        .withf(|origin, content| {
            origin.channel_id() == "C1" && content.contains("Slow down, ping is cooling for 2s.")
        })
        .times(1)
        .returning(|_, _| Ok(()));
    let hook = TemplateReplyHook::new(
        Arc::new(transport),
        "Slow down, {{ alias }} is cooling for {{ time_left_secs }}s.",
    )
    .expect("template should parse");

    hook.on_failure(&context("ping"), &user_cooldown(Duration::from_millis(1200)))
        .await
        .expect("hook should reply");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hook_reports_transport_failure() {
    let mut transport = MockTransport::new();
    transport
        .expect_send_reply()
        .returning(|_, _| Err(TransportError::Disconnected));
    let hook = TemplateReplyHook::new(Arc::new(transport), "Denied.").expect("template should parse");

    let result = hook
        .on_failure(&context("reload"), &CommandFailure::Permission)
        .await;

    assert!(result.is_err());
}

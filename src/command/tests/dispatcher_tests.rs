//! Unit tests for message dispatch.

use rstest::{fixture, rstest};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

use super::support::{Harness, PanickingHandler, counting, echo, message};
use crate::command::adapters::memory::LogLevel;
use crate::command::domain::{CommandFailure, CommandMetadata, CommandOptions};
use crate::command::ports::CommandDefinition;
use crate::command::services::{DispatchOutcome, ExecuteOutcome};

struct Fixture {
    harness: Harness,
    hits: Arc<AtomicUsize>,
}

#[fixture]
async fn loaded() -> Fixture {
    let hits = Arc::new(AtomicUsize::new(0));
    let harness = Harness::new(
        CommandOptions::new(["A1"]),
        vec![
            CommandDefinition::new(
                CommandMetadata::new(["count"]).with_user_cooldown(10.0),
                counting(&hits),
            ),
            CommandDefinition::new(
                CommandMetadata::new(["echo"]).with_capabilities(true, false, false),
                echo(),
            ),
            CommandDefinition::new(
                CommandMetadata::new(["explode"]),
                Arc::new(PanickingHandler),
            ),
            CommandDefinition::new(
                CommandMetadata::new(["secret"]).admin_only(),
                counting(&hits),
            ),
        ],
    );
    harness.registry.reload().await.expect("reload should succeed");
    Fixture { harness, hits }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn routes_message_to_handler(#[future] loaded: Fixture) {
    let fixture = loaded.await;
    let dispatcher = fixture.harness.dispatcher();

    let outcome = dispatcher.on_message(message("U1", "C1", "count")).await;

    assert_eq!(outcome, DispatchOutcome::Executed(ExecuteOutcome::Completed));
    assert_eq!(fixture.hits.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn passes_arguments_after_alias(#[future] loaded: Fixture) {
    let fixture = loaded.await;
    let dispatcher = fixture.harness.dispatcher().with_prefix("!");

    dispatcher
        .on_message(message("U1", "C1", "  !echo  one two  "))
        .await;

    let replies = fixture.harness.transport.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(
        replies.first().map(|reply| reply.content.as_str()),
        Some("one two")
    );
    assert_eq!(
        replies.first().map(|reply| reply.channel_id.as_str()),
        Some("C1")
    );
}

#[rstest]
#[case("count", "!")]
#[case("!", "!")]
#[case("   ", "")]
#[tokio::test(flavor = "multi_thread")]
async fn ignores_messages_without_command(
    #[future] loaded: Fixture,
    #[case] content: &str,
    #[case] prefix: &str,
) {
    let fixture = loaded.await;
    let dispatcher = fixture.harness.dispatcher().with_prefix(prefix);

    let outcome = dispatcher.on_message(message("U1", "C1", content)).await;

    assert_eq!(outcome, DispatchOutcome::Ignored);
    assert_eq!(fixture.hits.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reports_unknown_alias(#[future] loaded: Fixture) {
    let fixture = loaded.await;
    let dispatcher = fixture.harness.dispatcher();

    let outcome = dispatcher.on_message(message("U1", "C1", "Count")).await;

    assert_eq!(outcome, DispatchOutcome::UnknownCommand("Count".to_owned()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unhandled_failure_is_silent_and_logged(#[future] loaded: Fixture) {
    let fixture = loaded.await;
    let dispatcher = fixture.harness.dispatcher();

    let outcome = dispatcher.on_message(message("U1", "C1", "secret")).await;

    assert_eq!(outcome, DispatchOutcome::Failed);
    assert!(fixture.harness.transport.replies().is_empty());
    assert_eq!(fixture.hits.load(Ordering::SeqCst), 0);
    assert!(fixture.harness.logger.contains(
        LogLevel::Error,
        &format!("Command 'secret' failed: unhandled command failure: {}", CommandFailure::Permission)
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cooldown_denial_does_not_stop_other_users(#[future] loaded: Fixture) {
    let fixture = loaded.await;
    let dispatcher = fixture.harness.dispatcher();

    dispatcher.on_message(message("U1", "C1", "count")).await;
    let limited = dispatcher.on_message(message("U1", "C1", "count")).await;
    let other = dispatcher.on_message(message("U2", "C1", "count")).await;

    assert_eq!(limited, DispatchOutcome::Failed);
    assert_eq!(other, DispatchOutcome::Executed(ExecuteOutcome::Completed));
    assert_eq!(fixture.hits.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn survives_panicking_handler(#[future] loaded: Fixture) {
    let fixture = loaded.await;
    let dispatcher = fixture.harness.dispatcher();

    let exploded = dispatcher.on_message(message("U1", "C1", "explode")).await;
    let next = dispatcher.on_message(message("U1", "C1", "count")).await;

    assert_eq!(exploded, DispatchOutcome::Failed);
    assert!(
        fixture
            .harness
            .logger
            .contains(LogLevel::Error, "Command 'explode' aborted")
    );
    assert_eq!(next, DispatchOutcome::Executed(ExecuteOutcome::Completed));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_drains_events_until_closed(#[future] loaded: Fixture) {
    let fixture = loaded.await;
    let dispatcher = fixture.harness.dispatcher();
    let (events, receiver) = mpsc::channel(4);

    events
        .send(message("U1", "C1", "count"))
        .await
        .expect("send first event");
    events
        .send(message("U2", "C1", "count"))
        .await
        .expect("send second event");
    drop(events);
    dispatcher.run(receiver).await;

    assert_eq!(fixture.hits.load(Ordering::SeqCst), 2);
    assert!(fixture.harness.logger.contains(
        LogLevel::Info,
        "Gateway event stream closed; dispatcher stopping."
    ));
}

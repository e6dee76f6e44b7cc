//! When steps for command dispatch BDD scenarios.

use std::time::Duration;

use super::world::{DispatchWorld, run_async};
use chrono::{DateTime, Utc};
use herald::command::{
    domain::{CommandMetadata, InboundMessage, Invocation},
    ports::{CommandDefinition, handler_fn},
    services::MessageDispatcher,
};
use rstest_bdd_macros::when;
use std::sync::Arc;

fn message(user: &str, channel: &str, content: &str) -> InboundMessage {
    InboundMessage::new(
        format!("{user}:{channel}:{content}"),
        user,
        channel,
        content,
        DateTime::<Utc>::UNIX_EPOCH,
    )
}

fn definition(alias: &str) -> CommandDefinition {
    CommandDefinition::new(
        CommandMetadata::new([alias]),
        handler_fn(|_ctx| async { Ok(()) }),
    )
}

#[when(r#"user "{user}" invokes "{alias}" in channel "{channel}""#)]
fn user_invokes(
    world: &mut DispatchWorld,
    user: String,
    alias: String,
    channel: String,
) -> Result<(), eyre::Report> {
    let command = world
        .registry()?
        .resolve(&alias)
        .ok_or_else(|| eyre::eyre!("no command registered for '{alias}'"))?;
    if world.original.is_none() {
        world.original = Some(Arc::clone(&command));
    }
    let invocation = Invocation::new(message(&user, &channel, &alias), alias, Vec::new());
    world.last_execution = Some(run_async(command.execute(invocation)));
    Ok(())
}

#[when(r#"user "{user}" sends "{content}" in channel "{channel}""#)]
fn user_sends(
    world: &mut DispatchWorld,
    user: String,
    content: String,
    channel: String,
) -> Result<(), eyre::Report> {
    let dispatcher = MessageDispatcher::new(
        world.registry()?.clone(),
        Arc::new(world.logger.clone()),
    );
    let outcome = run_async(dispatcher.on_message(message(&user, &channel, &content)));
    world.last_dispatch = Some(outcome);
    Ok(())
}

#[when("{seconds:u64} seconds pass")]
fn seconds_pass(world: &mut DispatchWorld, seconds: u64) {
    world.clock.advance(Duration::from_secs(seconds));
}

#[when("{millis:u64} milliseconds pass")]
fn milliseconds_pass(world: &mut DispatchWorld, millis: u64) {
    world.clock.advance(Duration::from_millis(millis));
}

#[when(r#"the source declares "{alias}" twice"#)]
fn source_declares_twice(world: &mut DispatchWorld, alias: String) -> Result<(), eyre::Report> {
    world.original = world.registry()?.resolve(&alias);
    world
        .source
        .replace([definition(&alias), definition(&alias)]);
    Ok(())
}

#[when(r#"the source declares only "{alias}""#)]
fn source_declares_only(world: &mut DispatchWorld, alias: String) {
    world.source.replace([definition(&alias)]);
}

#[when("the registry reloads")]
fn registry_reloads(world: &mut DispatchWorld) -> Result<(), eyre::Report> {
    let registry = world.registry()?.clone();
    world.last_reload = Some(run_async(registry.reload()));
    Ok(())
}

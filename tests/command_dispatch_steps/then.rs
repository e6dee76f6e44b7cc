//! Then steps for command dispatch BDD scenarios.

use std::sync::Arc;

use super::world::DispatchWorld;
use herald::command::{
    adapters::memory::LogLevel,
    domain::{CommandFailure, ScopeKind},
    ports::ReloadError,
    services::{DispatchOutcome, ExecuteError, ExecuteOutcome},
};
use rstest_bdd_macros::then;

fn last_execution(
    world: &DispatchWorld,
) -> Result<&Result<ExecuteOutcome, ExecuteError>, eyre::Report> {
    world
        .last_execution
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no command has been invoked"))
}

#[then(
    "the invocation is limited by the user cooldown of {total:u64} seconds with {left:u64} ms left"
)]
fn limited_by_user_cooldown(
    world: &DispatchWorld,
    total: u64,
    left: u64,
) -> Result<(), eyre::Report> {
    match last_execution(world)? {
        Err(ExecuteError::Unhandled(CommandFailure::Cooldown(failure)))
            if failure.scope() == ScopeKind::User
                && failure.total_cooldown_secs() == total
                && failure.time_left_ms() == left =>
        {
            Ok(())
        }
        other => Err(eyre::eyre!(
            "expected user cooldown of {total}s with {left}ms left, got {other:?}"
        )),
    }
}

#[then("the invocation completes")]
fn invocation_completes(world: &DispatchWorld) -> Result<(), eyre::Report> {
    match last_execution(world)? {
        Ok(ExecuteOutcome::Completed) => Ok(()),
        other => Err(eyre::eyre!("expected completion, got {other:?}")),
    }
}

#[then("the invocation is denied for lack of permission")]
fn denied_for_permission(world: &DispatchWorld) -> Result<(), eyre::Report> {
    match last_execution(world)? {
        Err(ExecuteError::Unhandled(CommandFailure::Permission)) => Ok(()),
        other => Err(eyre::eyre!("expected permission failure, got {other:?}")),
    }
}

#[then(r#"the reload fails because "{alias}" is not a unique alias"#)]
fn reload_collides(world: &DispatchWorld, alias: String) -> Result<(), eyre::Report> {
    let result = world
        .last_reload
        .as_ref()
        .ok_or_else(|| eyre::eyre!("registry has not been reloaded"))?;
    match result {
        Err(ReloadError::AliasCollision { alias: colliding }) if *colliding == alias => Ok(()),
        other => Err(eyre::eyre!("expected collision on '{alias}', got {other:?}")),
    }
}

#[then(r#"the alias "{alias}" still resolves to the original command"#)]
fn still_resolves_to_original(world: &DispatchWorld, alias: String) -> Result<(), eyre::Report> {
    let original = world
        .original
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no original command captured"))?;
    let current = world
        .registry()?
        .resolve(&alias)
        .ok_or_else(|| eyre::eyre!("'{alias}' no longer resolves"))?;
    if !Arc::ptr_eq(original, &current) {
        return Err(eyre::eyre!("'{alias}' resolves to a replacement command"));
    }
    Ok(())
}

#[then(r#"the alias "{alias}" resolves"#)]
fn alias_resolves(world: &DispatchWorld, alias: String) -> Result<(), eyre::Report> {
    if world.registry()?.resolve(&alias).is_none() {
        return Err(eyre::eyre!("'{alias}' does not resolve"));
    }
    Ok(())
}

#[then(r#"the alias "{alias}" no longer resolves"#)]
fn alias_gone(world: &DispatchWorld, alias: String) -> Result<(), eyre::Report> {
    if world.registry()?.resolve(&alias).is_some() {
        return Err(eyre::eyre!("'{alias}' still resolves"));
    }
    Ok(())
}

#[then("a reload warning is logged")]
fn reload_warning_logged(world: &DispatchWorld) -> Result<(), eyre::Report> {
    if !world
        .logger
        .contains(LogLevel::Warn, "Reverting to old commands.")
    {
        return Err(eyre::eyre!("expected a reload warning, got {:?}", world.logger.entries()));
    }
    Ok(())
}

#[then("no reply is sent")]
fn no_reply(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let replies = world.transport.replies();
    if !replies.is_empty() {
        return Err(eyre::eyre!("expected no replies, got {replies:?}"));
    }
    Ok(())
}

#[then(r#"an error mentioning "{needle}" is logged"#)]
fn error_logged(world: &DispatchWorld, needle: String) -> Result<(), eyre::Report> {
    if !world.logger.contains(LogLevel::Error, &needle) {
        return Err(eyre::eyre!(
            "expected an error mentioning '{needle}', got {:?}",
            world.logger.entries()
        ));
    }
    Ok(())
}

#[then(r#"the reply is "{text}""#)]
fn reply_is(world: &DispatchWorld, text: String) -> Result<(), eyre::Report> {
    let replies = world.transport.reply_texts();
    if replies != [text.clone()] {
        return Err(eyre::eyre!("expected reply '{text}', got {replies:?}"));
    }
    Ok(())
}

#[then("the dispatch fails")]
fn dispatch_fails(world: &DispatchWorld) -> Result<(), eyre::Report> {
    match &world.last_dispatch {
        Some(DispatchOutcome::Failed) => Ok(()),
        other => Err(eyre::eyre!("expected a failed dispatch, got {other:?}")),
    }
}

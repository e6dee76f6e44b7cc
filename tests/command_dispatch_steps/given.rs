//! Given steps for command dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async};
use eyre::WrapErr;
use herald::command::{
    builtin,
    domain::CommandMetadata,
    ports::{CommandDefinition, handler_fn},
};
use rstest_bdd_macros::given;

fn quiet_definition(metadata: CommandMetadata) -> CommandDefinition {
    CommandDefinition::new(metadata, handler_fn(|_ctx| async { Ok(()) }))
}

#[given(r#"an administrator "{admin}""#)]
fn an_administrator(world: &mut DispatchWorld, admin: String) {
    world.admins.push(admin);
}

#[given("administrators are exempt from cooldowns")]
fn admins_exempt(world: &mut DispatchWorld) {
    world.exempt_admins = true;
}

#[given(r#"a "{alias}" command with a user cooldown of {seconds:u32} seconds"#)]
fn command_with_user_cooldown(world: &mut DispatchWorld, alias: String, seconds: u32) {
    world.definitions.push(quiet_definition(
        CommandMetadata::new([alias]).with_user_cooldown(f64::from(seconds)),
    ));
}

#[given(r#"an admin-only "{alias}" command"#)]
fn admin_only_command(world: &mut DispatchWorld, alias: String) {
    world
        .definitions
        .push(quiet_definition(CommandMetadata::new([alias]).admin_only()));
}

#[given("the built-in commands")]
fn built_in_commands(world: &mut DispatchWorld) -> Result<(), eyre::Report> {
    let catalogue = builtin::catalogue(&world.bot(), &world.shared_clock())
        .wrap_err("build built-in catalogue")?;
    let definitions = builtin::definitions(&catalogue).wrap_err("bind built-in manifest")?;
    world.definitions.extend(definitions);
    Ok(())
}

#[given("the registry has loaded its commands")]
fn registry_loaded(world: &mut DispatchWorld) -> Result<(), eyre::Report> {
    world.source.replace(world.definitions.clone());
    let registry = world.build_registry();
    run_async(registry.reload()).wrap_err("initial registry reload")?;
    Ok(())
}

//! Shared world state for command dispatch BDD scenarios.

use std::sync::Arc;

use herald::command::{
    adapters::memory::{InMemoryCommandSource, ManualClock, RecordingLogger, RecordingTransport},
    domain::{CommandOptions, SharedClock},
    ports::{CommandDefinition, ReloadResult, ReloadSummary, Transport},
    services::{Command, CommandRegistry, DispatchOutcome, ExecuteError, ExecuteOutcome},
};
use rstest::fixture;

/// Registry type used by the BDD world.
pub type TestRegistry = CommandRegistry<InMemoryCommandSource>;

/// Scenario world for command dispatch behaviour tests.
pub struct DispatchWorld {
    pub clock: ManualClock,
    pub transport: RecordingTransport,
    pub logger: RecordingLogger,
    pub source: InMemoryCommandSource,
    pub admins: Vec<String>,
    pub exempt_admins: bool,
    pub definitions: Vec<CommandDefinition>,
    pub registry: Option<TestRegistry>,
    pub original: Option<Arc<Command>>,
    pub last_execution: Option<Result<ExecuteOutcome, ExecuteError>>,
    pub last_reload: Option<ReloadResult<ReloadSummary>>,
    pub last_dispatch: Option<DispatchOutcome>,
}

impl DispatchWorld {
    /// Creates a world with no commands and no administrators.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: ManualClock::default(),
            transport: RecordingTransport::new(),
            logger: RecordingLogger::new(),
            source: InMemoryCommandSource::default(),
            admins: Vec::new(),
            exempt_admins: false,
            definitions: Vec::new(),
            registry: None,
            original: None,
            last_execution: None,
            last_reload: None,
            last_dispatch: None,
        }
    }

    /// Returns the world clock as a shared clock.
    pub fn shared_clock(&self) -> SharedClock {
        Arc::new(self.clock.clone())
    }

    /// Returns the world transport as a port object.
    pub fn bot(&self) -> Arc<dyn Transport> {
        Arc::new(self.transport.clone())
    }

    /// Builds the registry from the administrators declared so far.
    pub fn build_registry(&mut self) -> TestRegistry {
        let options = CommandOptions::new(self.admins.iter().cloned())
            .exempting_admins_from_cooldowns(self.exempt_admins);
        let registry = CommandRegistry::new(
            Arc::new(self.source.clone()),
            self.bot(),
            Arc::new(self.logger.clone()),
            options,
            Arc::new(self.clock.clone()),
        );
        self.registry = Some(registry.clone());
        registry
    }

    /// Returns the registry or an error when no step has built it.
    pub fn registry(&self) -> eyre::Result<&TestRegistry> {
        self.registry
            .as_ref()
            .ok_or_else(|| eyre::eyre!("registry has not been loaded in this scenario"))
    }
}

impl Default for DispatchWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DispatchWorld {
    DispatchWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

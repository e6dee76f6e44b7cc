//! In-memory command source.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

use crate::command::ports::{CommandDefinition, CommandSource, DiscoveryError, DiscoveryResult};

#[derive(Debug, Default)]
struct SourceState {
    definitions: Vec<CommandDefinition>,
    failure: Option<DiscoveryError>,
    discoveries: usize,
}

/// Command source backed by a replaceable in-memory list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommandSource {
    state: Arc<RwLock<SourceState>>,
}

impl InMemoryCommandSource {
    /// Creates a source serving `definitions`.
    #[must_use]
    pub fn new(definitions: impl IntoIterator<Item = CommandDefinition>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SourceState {
                definitions: definitions.into_iter().collect(),
                failure: None,
                discoveries: 0,
            })),
        }
    }

    /// Replaces the definitions served by later discoveries.
    pub fn replace(&self, definitions: impl IntoIterator<Item = CommandDefinition>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.definitions = definitions.into_iter().collect();
    }

    /// Makes every later discovery fail with `error` until cleared.
    pub fn fail_with(&self, error: DiscoveryError) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.failure = Some(error);
    }

    /// Clears an injected failure.
    pub fn recover(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.failure = None;
    }

    /// Returns how many times the source has been asked to discover.
    #[must_use]
    pub fn discoveries(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .discoveries
    }
}

#[async_trait]
impl CommandSource for InMemoryCommandSource {
    async fn discover(&self) -> DiscoveryResult<Vec<CommandDefinition>> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.discoveries = state.discoveries.saturating_add(1);
        match &state.failure {
            Some(error) => Err(error.clone()),
            None => Ok(state.definitions.clone()),
        }
    }
}

//! In-memory StateRepository for tests and throwaway sessions.

use std::collections::BTreeMap;
use std::sync::RwLock;

use game_core::GameState;

use super::{RepositoryError, StateRepository};

#[derive(Default)]
pub struct InMemoryStateRepo {
    states: RwLock<BTreeMap<String, GameState>>,
}

impl InMemoryStateRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateRepository for InMemoryStateRepo {
    fn save(&self, slot: &str, state: &GameState) -> Result<(), RepositoryError> {
        let mut states = self.states.write().unwrap_or_else(|e| e.into_inner());
        states.insert(slot.to_owned(), state.clone());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<GameState>, RepositoryError> {
        let states = self.states.read().unwrap_or_else(|e| e.into_inner());
        Ok(states.get(slot).cloned())
    }

    fn exists(&self, slot: &str) -> bool {
        let states = self.states.read().unwrap_or_else(|e| e.into_inner());
        states.contains_key(slot)
    }

    fn delete(&self, slot: &str) -> Result<(), RepositoryError> {
        let mut states = self.states.write().unwrap_or_else(|e| e.into_inner());
        states.remove(slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>, RepositoryError> {
        let states = self.states.read().unwrap_or_else(|e| e.into_inner());
        Ok(states.keys().cloned().collect())
    }
}

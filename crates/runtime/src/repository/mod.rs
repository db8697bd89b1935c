//! Save slots for whole-session snapshots.
//!
//! A snapshot is the complete [`game_core::GameState`]; handing it back to
//! the builder resumes the session, including a pending combat timer.

mod error;
mod file;
mod memory;

pub use error::RepositoryError;
pub use file::FileStateRepository;
pub use memory::InMemoryStateRepo;

use game_core::GameState;

/// Repository for named game state snapshots.
pub trait StateRepository: Send + Sync {
    fn save(&self, slot: &str, state: &GameState) -> Result<(), RepositoryError>;

    fn load(&self, slot: &str) -> Result<Option<GameState>, RepositoryError>;

    fn exists(&self, slot: &str) -> bool;

    fn delete(&self, slot: &str) -> Result<(), RepositoryError>;

    /// Slot names in ascending order.
    fn list_slots(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(vec![])
    }
}

//! File-based StateRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use game_core::GameState;

use super::{RepositoryError, StateRepository};

/// Stores each slot as `{slot}.json` under a base directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-save leaves the previous snapshot intact.
pub struct FileStateRepository {
    base_dir: PathBuf,
}

impl FileStateRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf, RepositoryError> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RepositoryError::InvalidSlot(slot.to_owned()));
        }
        Ok(self.base_dir.join(format!("{slot}.json")))
    }
}

impl StateRepository for FileStateRepository {
    fn save(&self, slot: &str, state: &GameState) -> Result<(), RepositoryError> {
        let path = self.slot_path(slot)?;
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec(state)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(slot, path = %path.display(), "saved snapshot");
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<GameState>, RepositoryError> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let state = serde_json::from_slice(&bytes)?;
        tracing::debug!(slot, path = %path.display(), "loaded snapshot");
        Ok(Some(state))
    }

    fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).is_ok_and(|path| path.exists())
    }

    fn delete(&self, slot: &str) -> Result<(), RepositoryError> {
        let path = self.slot_path(slot)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(slot, "deleted snapshot");
        }
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>, RepositoryError> {
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                slots.push(stem.to_owned());
            }
        }
        slots.sort_unstable();
        Ok(slots)
    }
}

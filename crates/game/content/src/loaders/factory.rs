//! Content factory for building the world from a data directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::catalog::MapRegistry;
use crate::loaders::{ConfigLoader, LoadResult, MapLoader};
use crate::world;

/// Content factory that loads game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── maps/
///     ├── outpost.ron
///     └── capital_wasteland.ron   (replaces the built-in blueprint)
/// ```
///
/// Both parts are optional.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or defaults when absent.
    pub fn load_config(&self) -> LoadResult<game_core::GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(game_core::GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load a blueprint from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<crate::builder::MapBuilder> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    /// Built-in world with every `maps/*.ron` blueprint layered on top.
    ///
    /// Blueprints without an explicit seed get one derived from `world_seed`.
    pub fn load_registry(&self, world_seed: u64) -> LoadResult<MapRegistry> {
        let mut registry = world::registry(world_seed);
        let maps_dir = self.data_dir.join("maps");
        if !maps_dir.is_dir() {
            return Ok(registry);
        }

        let mut paths = std::fs::read_dir(&maps_dir)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", maps_dir.display(), e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
            .collect::<Vec<_>>();
        paths.sort();

        for path in paths {
            let mut blueprint = MapLoader::load(&path)?;
            if blueprint.seed_value() == 0 {
                let seed = world::map_seed(world_seed, blueprint.id().as_str());
                blueprint = blueprint.seed(seed);
            }
            let id = blueprint.id().clone();
            let replaced = registry.register(blueprint).is_some();
            debug!(map = %id, replaced, "blueprint loaded");
        }

        info!(maps = registry.len(), dir = %self.data_dir.display(), "map registry ready");
        Ok(registry)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use game_core::{MapCatalog, MapId};

    use super::*;

    #[test]
    fn empty_directory_yields_defaults_and_the_built_in_world() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap(), game_core::GameConfig::default());
        let registry = factory.load_registry(3).unwrap();
        assert!(registry.contains(&MapId::from(world::START_MAP)));
    }

    #[test]
    fn data_files_override_config_and_add_maps() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "vision_radius = 6\n").unwrap();
        std::fs::create_dir(dir.path().join("maps")).unwrap();
        std::fs::write(
            dir.path().join("maps").join("bunker.ron"),
            "(id: \"bunker\", name: \"Bunker\", width: 10, height: 8, interior: true)",
        )
        .unwrap();
        std::fs::write(dir.path().join("maps").join("notes.txt"), "ignored").unwrap();

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap().vision_radius, 6);

        let registry = factory.load_registry(3).unwrap();
        let seed = registry.blueprint(&MapId::from("bunker")).unwrap().seed_value();
        assert_eq!(seed, world::map_seed(3, "bunker"));
        assert!(registry.build(&MapId::from("bunker")).unwrap().is_interior);
    }

    #[test]
    fn broken_map_file_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("maps")).unwrap();
        std::fs::write(dir.path().join("maps").join("bad.ron"), "(width: ").unwrap();

        assert!(ContentFactory::new(dir.path()).load_registry(1).is_err());
    }
}

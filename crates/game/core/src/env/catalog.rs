use std::collections::BTreeMap;

use super::CatalogError;
use crate::state::{GameMap, MapId};

/// Registry of map factories addressed by id.
///
/// Every call to [`MapCatalog::build`] returns a fresh map; caching of
/// constructed maps belongs to [`crate::world::MapCache`].
pub trait MapCatalog: Send + Sync {
    fn contains(&self, id: &MapId) -> bool;

    fn build(&self, id: &MapId) -> Result<GameMap, CatalogError>;

    fn map_ids(&self) -> Vec<MapId> {
        Vec::new()
    }
}

/// Catalog backed by pre-built maps, cloned on every build.
#[derive(Clone, Debug, Default)]
pub struct FixedCatalog {
    maps: BTreeMap<MapId, GameMap>,
}

impl FixedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(mut self, map: GameMap) -> Self {
        self.insert(map);
        self
    }

    pub fn insert(&mut self, map: GameMap) {
        self.maps.insert(map.id.clone(), map);
    }
}

impl MapCatalog for FixedCatalog {
    fn contains(&self, id: &MapId) -> bool {
        self.maps.contains_key(id)
    }

    fn build(&self, id: &MapId) -> Result<GameMap, CatalogError> {
        self.maps
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownMap(id.clone()))
    }

    fn map_ids(&self) -> Vec<MapId> {
        self.maps.keys().cloned().collect()
    }
}

//! Map catalog backed by blueprints.

use std::collections::BTreeMap;

use game_core::{CatalogError, GameMap, MapCatalog, MapId};

use crate::builder::MapBuilder;

/// Registry of map blueprints. Every build runs the blueprint again, so a
/// map evicted from the cache comes back in its generated state.
#[derive(Clone, Debug, Default)]
pub struct MapRegistry {
    blueprints: BTreeMap<MapId, MapBuilder>,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the blueprint under its own id.
    pub fn register(&mut self, blueprint: MapBuilder) -> Option<MapBuilder> {
        self.blueprints.insert(blueprint.id().clone(), blueprint)
    }

    pub fn with(mut self, blueprint: MapBuilder) -> Self {
        self.register(blueprint);
        self
    }

    pub fn blueprint(&self, id: &MapId) -> Option<&MapBuilder> {
        self.blueprints.get(id)
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }
}

impl MapCatalog for MapRegistry {
    fn contains(&self, id: &MapId) -> bool {
        self.blueprints.contains_key(id)
    }

    fn build(&self, id: &MapId) -> Result<GameMap, CatalogError> {
        let blueprint = self
            .blueprints
            .get(id)
            .ok_or_else(|| CatalogError::UnknownMap(id.clone()))?;
        blueprint.build().map_err(|err| CatalogError::BuildFailed {
            id: id.clone(),
            reason: err.to_string(),
        })
    }

    fn map_ids(&self) -> Vec<MapId> {
        self.blueprints.keys().cloned().collect()
    }
}

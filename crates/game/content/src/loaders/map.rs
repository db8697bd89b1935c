//! Map blueprint loader.
//!
//! A map file is a RON [`MapBuilder`]; every field except `id`, `name`,
//! `width` and `height` may be omitted.
//!
//! ```ron
//! (
//!     id: "outpost",
//!     name: "Ranger Outpost",
//!     width: 24,
//!     height: 18,
//!     base: sand,
//!     terrain: [(stone, 0.1)],
//!     enemies: [(template: "raider", tile: (x: 5, y: 5))],
//! )
//! ```

use std::path::Path;

use crate::builder::MapBuilder;
use crate::loaders::{LoadResult, read_file};

/// Loader for map blueprints from RON files.
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<MapBuilder> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<MapBuilder> {
        let blueprint: MapBuilder = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;
        if blueprint.id().as_str().is_empty() {
            anyhow::bail!("Map RON is missing an id");
        }
        Ok(blueprint)
    }
}

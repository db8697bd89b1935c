//! Wasteland content: skill, item and enemy tables, seeded map blueprints,
//! the built-in world and loaders for RON/TOML data files.
//!
//! Content only feeds the engine through [`game_core::MapCatalog`] and the
//! values it builds; none of it is referenced from game state.

pub mod builder;
pub mod catalog;
pub mod tables;
pub mod world;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use builder::{BuildError, EnemySpawn, MapBuilder, NpcSpawn, Structure};
pub use catalog::MapRegistry;
pub use tables::{Background, CharacterClass, CharacterSheet, CharacterTrait};
pub use world::{START_MAP, map_seed, new_game, registry, start_game};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, MapLoader};

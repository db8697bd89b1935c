//! Seeded procedural map construction.
//!
//! A [`MapBuilder`] is a blueprint: dimensions, terrain weights, structure
//! placements, connections, loot density, enemy and NPC spawns and a seed.
//! [`MapBuilder::build`] turns it into a fresh [`GameMap`]; the same
//! blueprint always produces the same map.
//!
//! ```text
//! terrain roll ─▶ structures ─▶ carve (spawn, connections, NPCs, enemies) ─▶ loot
//! ```

use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::debug;

use game_core::{
    Direction, GameConfig, GameMap, Lootable, MapConnection, MapId, Npc, TerrainKind, Tile,
    TilePos,
};

use crate::tables;

/// A rectangular building stamped onto the terrain.
///
/// Buildings are solid except for the entrance tile at the centre of their
/// bottom row. When `interior` is set that tile leads into the named map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Structure {
    pub id: String,
    pub name: String,
    pub origin: TilePos,
    pub width: u32,
    pub height: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub interior: Option<MapId>,
}

impl Structure {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        origin: TilePos,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            origin,
            width,
            height,
            interior: None,
        }
    }

    pub fn with_interior(mut self, interior: impl Into<MapId>) -> Self {
        self.interior = Some(interior.into());
        self
    }

    pub fn entrance(&self) -> TilePos {
        self.origin
            .offset(self.width as i32 / 2, self.height as i32 - 1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySpawn {
    /// Enemy template id from [`tables::ENEMY_TEMPLATES`].
    pub template: String,
    pub tile: TilePos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcSpawn {
    pub tile: TilePos,
    pub npc: Npc,
}

/// Failures that make a blueprint unbuildable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("map '{0}' has zero width or height")]
    EmptyMap(MapId),

    #[error("map '{map}' spawns unknown enemy template '{template}'")]
    UnknownEnemy { map: MapId, template: String },

    #[error("map '{map}' places {what} outside the grid at {tile}")]
    OutOfBounds {
        map: MapId,
        what: &'static str,
        tile: TilePos,
    },

    #[error("map '{map}' loot table references unknown item '{item}'")]
    UnknownItem { map: MapId, item: String },
}

/// Blueprint of one map.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapBuilder {
    id: MapId,
    name: String,
    width: u32,
    height: u32,
    base: TerrainKind,
    /// `(terrain, chance)` pairs rolled in order; the remainder is `base`.
    terrain: Vec<(TerrainKind, f32)>,
    structures: Vec<Structure>,
    connections: Vec<MapConnection>,
    /// Lootables per tile.
    loot_density: f32,
    loot_table: Vec<String>,
    enemies: Vec<EnemySpawn>,
    npcs: Vec<NpcSpawn>,
    spawn: Option<TilePos>,
    interior: bool,
    seed: u64,
    tile_size: f32,
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self {
            id: MapId::new(""),
            name: String::new(),
            width: 0,
            height: 0,
            base: TerrainKind::Grass,
            terrain: Vec::new(),
            structures: Vec::new(),
            connections: Vec::new(),
            loot_density: 0.0,
            loot_table: tables::LOOT_ITEMS.iter().map(|s| (*s).to_owned()).collect(),
            enemies: Vec::new(),
            npcs: Vec::new(),
            spawn: None,
            interior: false,
            seed: 0,
            tile_size: GameConfig::DEFAULT_TILE_SIZE,
        }
    }
}

impl MapBuilder {
    pub fn new(id: impl Into<MapId>, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width,
            height,
            ..Self::default()
        }
    }

    /// Indoor map: floor surrounded by walls, fully revealed on entry.
    pub fn interior(id: impl Into<MapId>, name: impl Into<String>, width: u32, height: u32) -> Self {
        let mut builder = Self::new(id, name, width, height).base(TerrainKind::Floor);
        builder.interior = true;
        builder.spawn = Some(TilePos::new(width as i32 / 2, height as i32 - 2));
        builder
    }

    pub fn id(&self) -> &MapId {
        &self.id
    }

    pub fn seed_value(&self) -> u64 {
        self.seed
    }

    pub fn base(mut self, terrain: TerrainKind) -> Self {
        self.base = terrain;
        self
    }

    pub fn terrain(mut self, terrain: TerrainKind, chance: f32) -> Self {
        self.terrain.push((terrain, chance));
        self
    }

    pub fn structure(mut self, structure: Structure) -> Self {
        self.structures.push(structure);
        self
    }

    pub fn connection(
        mut self,
        direction: Direction,
        target: impl Into<MapId>,
        from: TilePos,
        to: TilePos,
    ) -> Self {
        self.connections
            .push(MapConnection::new(direction, target, from, to));
        self
    }

    pub fn loot_density(mut self, density: f32) -> Self {
        self.loot_density = density;
        self
    }

    pub fn loot_table(mut self, items: &[&str]) -> Self {
        self.loot_table = items.iter().map(|s| (*s).to_owned()).collect();
        self
    }

    pub fn enemy(mut self, template: impl Into<String>, tile: TilePos) -> Self {
        self.enemies.push(EnemySpawn {
            template: template.into(),
            tile,
        });
        self
    }

    pub fn npc(mut self, tile: TilePos, npc: Npc) -> Self {
        self.npcs.push(NpcSpawn { tile, npc });
        self
    }

    pub fn spawn(mut self, tile: TilePos) -> Self {
        self.spawn = Some(tile);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn tile_size(mut self, tile_size: f32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Builds a fresh map from the blueprint.
    pub fn build(&self) -> Result<GameMap, BuildError> {
        if self.width == 0 || self.height == 0 {
            return Err(BuildError::EmptyMap(self.id.clone()));
        }
        self.validate()?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut map = GameMap::from_fn(
            self.id.clone(),
            self.name.clone(),
            self.width,
            self.height,
            |x, y| {
                if self.interior {
                    let edge = x == 0
                        || y == 0
                        || x == self.width as i32 - 1
                        || y == self.height as i32 - 1;
                    let terrain = if edge { TerrainKind::Wall } else { self.base };
                    return Tile::new(x, y, terrain);
                }
                Tile::new(x, y, self.roll_terrain(&mut rng))
            },
        );
        map.is_interior = self.interior;

        for structure in &self.structures {
            stamp(&mut map, structure);
        }

        let spawn = self.spawn.unwrap_or(map.spawn);
        carve(&mut map, spawn);
        map.spawn = spawn;

        for connection in &self.connections {
            carve(&mut map, connection.from_position);
            map.connections.push(connection.clone());
        }

        for spawn in &self.npcs {
            carve(&mut map, spawn.tile);
            let mut npc = spawn.npc.clone();
            npc.position = spawn.tile.center(self.tile_size);
            map.npcs.push(npc);
        }

        for (index, spawn) in self.enemies.iter().enumerate() {
            carve(&mut map, spawn.tile);
            let id = format!("{}_{}_{index}", self.id, spawn.template);
            let enemy = tables::enemy(&spawn.template, id)
                .ok_or_else(|| BuildError::UnknownEnemy {
                    map: self.id.clone(),
                    template: spawn.template.clone(),
                })?
                .at(spawn.tile.center(self.tile_size));
            map.enemies.push(enemy);
        }

        self.scatter_loot(&mut map, &mut rng);

        debug!(
            map = %self.id,
            width = self.width,
            height = self.height,
            structures = self.structures.len(),
            enemies = map.enemies.len(),
            lootables = map.lootables.len(),
            "map built"
        );
        Ok(map)
    }

    fn validate(&self) -> Result<(), BuildError> {
        let inside = |tile: TilePos| {
            tile.x >= 0
                && tile.y >= 0
                && tile.x < self.width as i32
                && tile.y < self.height as i32
        };
        let out_of_bounds = |what: &'static str, tile: TilePos| BuildError::OutOfBounds {
            map: self.id.clone(),
            what,
            tile,
        };

        if let Some(spawn) = self.spawn
            && !inside(spawn)
        {
            return Err(out_of_bounds("the spawn", spawn));
        }
        if let Some(c) = self.connections.iter().find(|c| !inside(c.from_position)) {
            return Err(out_of_bounds("a connection", c.from_position));
        }
        if let Some(n) = self.npcs.iter().find(|n| !inside(n.tile)) {
            return Err(out_of_bounds("an npc", n.tile));
        }
        if let Some(e) = self.enemies.iter().find(|e| !inside(e.tile)) {
            return Err(out_of_bounds("an enemy", e.tile));
        }
        if let Some(item) = self
            .loot_table
            .iter()
            .find(|id| tables::item(id).is_none())
        {
            return Err(BuildError::UnknownItem {
                map: self.id.clone(),
                item: item.clone(),
            });
        }
        Ok(())
    }

    fn roll_terrain(&self, rng: &mut StdRng) -> TerrainKind {
        let roll: f32 = rng.r#gen();
        let mut threshold = 0.0;
        for (terrain, chance) in &self.terrain {
            threshold += chance;
            if roll < threshold {
                return *terrain;
            }
        }
        self.base
    }

    /// Drops `floor(width * height * density)` lootables on walkable tiles,
    /// each holding one to three items.
    fn scatter_loot(&self, map: &mut GameMap, rng: &mut StdRng) {
        if self.loot_table.is_empty() {
            return;
        }
        let count = (self.width as f32 * self.height as f32 * self.loot_density) as usize;

        for index in 0..count {
            // A few retries so solid terrain does not swallow the drop.
            let tile = (0..8).find_map(|_| {
                let tile = TilePos::new(
                    rng.gen_range(0..self.width as i32),
                    rng.gen_range(0..self.height as i32),
                );
                let open = map.is_walkable(tile)
                    && map.tile(tile).is_some_and(|t| !t.is_entrance);
                open.then_some(tile)
            });
            let Some(tile) = tile else {
                continue;
            };

            let items = (0..rng.gen_range(1..=3))
                .filter_map(|_| {
                    let id = self.loot_table.choose(rng)?;
                    let item = tables::item(id)?;
                    let quantity = if item.stackable { rng.gen_range(1..=3) } else { 1 };
                    Some(item.with_quantity(quantity))
                })
                .collect();

            map.lootables.push(Lootable::new(
                format!("{}_loot_{index}", self.id),
                tile.center(self.tile_size),
                items,
            ));
        }
    }
}

/// Stamps a building; the entrance stays walkable.
fn stamp(map: &mut GameMap, structure: &Structure) {
    let entrance = structure.entrance();
    let building_id = structure
        .interior
        .as_ref()
        .map(|id| id.as_str().to_owned())
        .unwrap_or_else(|| structure.id.clone());

    for dy in 0..structure.height as i32 {
        for dx in 0..structure.width as i32 {
            let pos = structure.origin.offset(dx, dy);
            let Some(tile) = map.tile_mut(pos) else {
                continue;
            };
            tile.terrain = TerrainKind::Building;
            tile.walkable = pos == entrance;
            tile.is_entrance = pos == entrance && structure.interior.is_some();
            tile.building_id = Some(building_id.clone());
            tile.region_id = Some(structure.name.clone());
        }
    }
}

/// Makes `pos` walkable, replacing impassable terrain with dirt.
fn carve(map: &mut GameMap, pos: TilePos) {
    let interior = map.is_interior;
    if let Some(tile) = map.tile_mut(pos) {
        if !tile.terrain.default_walkable() {
            tile.terrain = if interior { TerrainKind::Floor } else { TerrainKind::Dirt };
        }
        tile.walkable = true;
    }
}

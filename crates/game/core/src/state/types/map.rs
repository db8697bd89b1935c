//! Map aggregate: tile grid plus everything placed on it.

use super::actor::Actor;
use super::item::Item;
use super::npc::Npc;
use super::tile::Tile;
use super::{Direction, MapId, Position, TilePos};

/// Directional link from one map's edge to an entry point on another map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapConnection {
    pub direction: Direction,
    pub target_map_id: MapId,
    /// Edge tile on this map the connection is drawn from.
    pub from_position: TilePos,
    /// Arrival tile on the target map.
    pub to_position: TilePos,
}

impl MapConnection {
    pub fn new(
        direction: Direction,
        target_map_id: impl Into<MapId>,
        from_position: TilePos,
        to_position: TilePos,
    ) -> Self {
        Self {
            direction,
            target_map_id: target_map_id.into(),
            from_position,
            to_position,
        }
    }
}

/// Container, corpse or cache holding items.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lootable {
    pub id: String,
    pub position: Position,
    pub items: Vec<Item>,
    pub looted: bool,
}

impl Lootable {
    pub fn new(id: impl Into<String>, position: Position, items: Vec<Item>) -> Self {
        Self {
            id: id.into(),
            position,
            items,
            looted: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameMap {
    pub id: MapId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major: `tiles[y][x]`.
    pub tiles: Vec<Vec<Tile>>,
    pub npcs: Vec<Npc>,
    pub enemies: Vec<Actor>,
    pub lootables: Vec<Lootable>,
    pub connections: Vec<MapConnection>,
    /// Default arrival tile when entering without a connection (interiors).
    pub spawn: TilePos,
    /// Indoor maps are fully lit and revealed.
    pub is_interior: bool,
}

impl GameMap {
    /// Creates a map of `width x height` tiles produced by `tile`.
    pub fn from_fn(
        id: impl Into<MapId>,
        name: impl Into<String>,
        width: u32,
        height: u32,
        mut tile: impl FnMut(i32, i32) -> Tile,
    ) -> Self {
        let tiles = (0..height as i32)
            .map(|y| (0..width as i32).map(|x| tile(x, y)).collect())
            .collect();
        Self {
            id: id.into(),
            name: name.into(),
            width,
            height,
            tiles,
            npcs: Vec::new(),
            enemies: Vec::new(),
            lootables: Vec::new(),
            connections: Vec::new(),
            spawn: TilePos::new(width as i32 / 2, height as i32 / 2),
            is_interior: false,
        }
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    pub fn tile(&self, pos: TilePos) -> Option<&Tile> {
        if !self.contains(pos) {
            return None;
        }
        self.tiles
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
    }

    pub fn tile_mut(&mut self, pos: TilePos) -> Option<&mut Tile> {
        if !self.contains(pos) {
            return None;
        }
        self.tiles
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
    }

    pub fn is_walkable(&self, pos: TilePos) -> bool {
        self.tile(pos).is_some_and(|t| t.walkable)
    }

    /// First connection declared for the given edge.
    pub fn connection(&self, direction: Direction) -> Option<&MapConnection> {
        self.connections.iter().find(|c| c.direction == direction)
    }

    pub fn pixel_size(&self, tile_size: f32) -> (f32, f32) {
        (self.width as f32 * tile_size, self.height as f32 * tile_size)
    }

    /// Marks every tile discovered and visible.
    pub fn reveal_all(&mut self) {
        for tile in self.tiles.iter_mut().flatten() {
            tile.reveal();
        }
    }

    pub fn discovered_count(&self) -> usize {
        self.tiles.iter().flatten().filter(|t| t.discovered).count()
    }

    pub fn enemy(&self, id: &str) -> Option<&Actor> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Drops enemies whose ids are listed. Returns how many were removed.
    pub fn remove_enemies(&mut self, ids: &[String]) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|e| !ids.contains(&e.id));
        before - self.enemies.len()
    }

    /// Marks the lootable as looted and removes it from the map.
    pub fn take_lootable(&mut self, id: &str) -> Option<Lootable> {
        let index = self.lootables.iter().position(|l| l.id == id && !l.looted)?;
        let mut lootable = self.lootables.remove(index);
        lootable.looted = true;
        Some(lootable)
    }
}

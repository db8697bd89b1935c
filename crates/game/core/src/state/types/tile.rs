//! Tiles of the world grid.

use super::TilePos;

/// Canonical terrain classes for map tiles.
///
/// Terrain only suggests a default walkability; the per-tile `walkable`
/// flag is what collision checks consult.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerrainKind {
    #[default]
    Grass,
    Dirt,
    Stone,
    Ruins,
    Sand,
    Water,
    Lava,
    Building,
    /// Interior flooring.
    Floor,
    /// Interior wall.
    Wall,
}

impl TerrainKind {
    pub const fn default_walkable(self) -> bool {
        !matches!(self, Self::Water | Self::Lava | Self::Wall)
    }
}

/// A single cell of the world grid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub terrain: TerrainKind,
    /// Sole authority for collision.
    pub walkable: bool,
    /// Permanent fog-of-war reveal. Never reset once set.
    pub discovered: bool,
    /// Inside the player's current vision radius.
    pub visible: bool,
    pub is_entrance: bool,
    pub building_id: Option<String>,
    pub region_id: Option<String>,
}

impl Tile {
    pub fn new(x: i32, y: i32, terrain: TerrainKind) -> Self {
        Self {
            x,
            y,
            terrain,
            walkable: terrain.default_walkable(),
            discovered: false,
            visible: false,
            is_entrance: false,
            building_id: None,
            region_id: None,
        }
    }

    pub fn with_walkable(mut self, walkable: bool) -> Self {
        self.walkable = walkable;
        self
    }

    pub fn position(&self) -> TilePos {
        TilePos::new(self.x, self.y)
    }

    /// Identifier of the interior this entrance leads to, if any.
    pub fn interior_id(&self) -> Option<&str> {
        if !self.is_entrance {
            return None;
        }
        self.building_id
            .as_deref()
            .or(self.region_id.as_deref())
    }

    /// Marks the tile as visible; visibility implies discovery.
    pub fn reveal(&mut self) -> bool {
        self.visible = true;
        let newly = !self.discovered;
        self.discovered = true;
        newly
    }
}

use crate::state::{GameMap, Position, TilePos};

/// Viewport into the current map, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Camera {
    /// Top-left corner of the viewport.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Camera {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    /// Centres on `target`, clamped so the viewport stays inside the map.
    /// Maps smaller than the viewport are pinned to the origin.
    pub fn follow(&mut self, target: Position, map: &GameMap, tile_size: f32) {
        let (map_w, map_h) = map.pixel_size(tile_size);
        self.x = clamp_axis(target.x - self.width / 2.0, map_w - self.width);
        self.y = clamp_axis(target.y - self.height / 2.0, map_h - self.height);
    }

    /// Inclusive tile range covered by the viewport.
    pub fn tile_bounds(&self, tile_size: f32) -> (TilePos, TilePos) {
        let min = Position::new(self.x, self.y).to_tile(tile_size);
        let max = Position::new(self.x + self.width - 1.0, self.y + self.height - 1.0)
            .to_tile(tile_size);
        (min, max)
    }
}

fn clamp_axis(value: f32, max: f32) -> f32 {
    if max <= 0.0 { 0.0 } else { value.clamp(0.0, max) }
}

//! Pixel-space queries over the tile matrix.

use crate::state::{GameMap, Position, TilePos};

/// Collision check for a pixel position. Out of bounds is never walkable.
pub fn is_walkable_at(map: &GameMap, position: Position, tile_size: f32) -> bool {
    map.is_walkable(position.to_tile(tile_size))
}

pub fn clamp_to_bounds(map: &GameMap, pos: TilePos) -> TilePos {
    let max_x = map.width.saturating_sub(1) as i32;
    let max_y = map.height.saturating_sub(1) as i32;
    TilePos::new(pos.x.clamp(0, max_x), pos.y.clamp(0, max_y))
}

/// Tiles at Chebyshev distance exactly `radius` from `center`, row by row.
pub fn ring(center: TilePos, radius: i32) -> impl Iterator<Item = TilePos> {
    (-radius..=radius).flat_map(move |dy| {
        (-radius..=radius)
            .filter(move |dx| dx.abs() == radius || dy.abs() == radius)
            .map(move |dx| center.offset(dx, dy))
    })
}

/// Nearest walkable tile to `origin`, searching rings of radius
/// `1..=max_radius`. Within a ring the Euclidean-closest tile wins, ties
/// broken by scan order.
pub fn nearest_walkable(map: &GameMap, origin: TilePos, max_radius: u32) -> Option<TilePos> {
    if map.is_walkable(origin) {
        return Some(origin);
    }

    for radius in 1..=max_radius as i32 {
        let best = ring(origin, radius)
            .filter(|pos| map.is_walkable(*pos))
            .min_by_key(|pos| pos.distance_squared(origin));
        if best.is_some() {
            return best;
        }
    }

    None
}

/// Tiles whose Euclidean distance from `center` is at most `radius`.
pub fn disc(center: TilePos, radius: u32) -> impl Iterator<Item = TilePos> {
    let r = radius as i32;
    let limit = i64::from(r) * i64::from(r);
    (-r..=r).flat_map(move |dy| {
        (-r..=r)
            .map(move |dx| center.offset(dx, dy))
            .filter(move |pos| pos.distance_squared(center) <= limit)
    })
}

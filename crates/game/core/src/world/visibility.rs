//! Fog of war.
//!
//! `visible` is transient and recomputed around the player each pass;
//! `discovered` is permanent. Only tiles lit by the previous pass can be
//! visible, so clearing that list is enough to reset the transient flag.

use crate::state::{GameMap, MapId, Position, TilePos};

use super::grid;

/// Bookkeeping carried between visibility passes.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibilityState {
    /// Tiles lit by the last pass on `map_id`.
    pub lit: Vec<TilePos>,
    pub map_id: Option<MapId>,
    pub origin: Option<Position>,
    pub radius: u32,
}

impl VisibilityState {
    /// Forgets the last pass so the next update recomputes unconditionally.
    pub fn invalidate(&mut self) {
        self.lit.clear();
        self.map_id = None;
        self.origin = None;
    }

    /// Clears the transient flag on tiles this state lit and invalidates.
    /// Called on a map before it is swapped out.
    pub fn release(&mut self, map: &mut GameMap) {
        if self.map_id.as_ref() == Some(&map.id) && !map.is_interior {
            for pos in self.lit.drain(..) {
                if let Some(tile) = map.tile_mut(pos) {
                    tile.visible = false;
                }
            }
        }
        self.invalidate();
    }

    fn is_fresh(&self, map: &GameMap, origin: Position, radius: u32, jitter: f32) -> bool {
        self.map_id.as_ref() == Some(&map.id)
            && self.radius == radius
            && self.origin.is_some_and(|last| last.distance(origin) < jitter)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityReport {
    pub recomputed: bool,
    pub newly_discovered: u32,
}

/// Recomputes visibility around `origin`.
///
/// Skipped when the player moved less than `jitter` pixels since the last
/// pass on the same map with the same radius.
pub fn update(
    map: &mut GameMap,
    state: &mut VisibilityState,
    origin: Position,
    radius: u32,
    tile_size: f32,
    jitter: f32,
) -> VisibilityReport {
    if state.is_fresh(map, origin, radius, jitter) {
        return VisibilityReport::default();
    }

    if map.is_interior {
        let first_visit = state.map_id.as_ref() != Some(&map.id);
        let mut report = VisibilityReport {
            recomputed: first_visit,
            newly_discovered: 0,
        };
        if first_visit {
            for tile in map.tiles.iter_mut().flatten() {
                report.newly_discovered += u32::from(tile.reveal());
            }
        }
        state.lit.clear();
        state.map_id = Some(map.id.clone());
        state.origin = Some(origin);
        state.radius = radius;
        return report;
    }

    if state.map_id.as_ref() != Some(&map.id) {
        // Saved flags may be stale when the pass history is unknown.
        for tile in map.tiles.iter_mut().flatten() {
            tile.visible = false;
        }
    } else {
        for pos in state.lit.drain(..) {
            if let Some(tile) = map.tile_mut(pos) {
                tile.visible = false;
            }
        }
    }
    state.lit.clear();

    let mut newly_discovered = 0;
    for pos in grid::disc(origin.to_tile(tile_size), radius) {
        if let Some(tile) = map.tile_mut(pos) {
            newly_discovered += u32::from(tile.reveal());
            state.lit.push(pos);
        }
    }

    state.map_id = Some(map.id.clone());
    state.origin = Some(origin);
    state.radius = radius;

    VisibilityReport {
        recomputed: true,
        newly_discovered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{TerrainKind, Tile};

    fn open_map() -> GameMap {
        GameMap::from_fn("field", "Field", 40, 40, |x, y| {
            Tile::new(x, y, TerrainKind::Grass)
        })
    }

    fn discovered(map: &GameMap) -> Vec<bool> {
        map.tiles.iter().flatten().map(|t| t.discovered).collect()
    }

    #[test]
    fn discovery_is_monotonic_while_visibility_moves() {
        let mut map = open_map();
        let mut state = VisibilityState::default();
        let mut before = discovered(&map);

        for step in 0..20 {
            let origin = TilePos::new(5 + step, 5 + step / 2).center(32.0);
            update(&mut map, &mut state, origin, 4, 32.0, 4.0);
            let after = discovered(&map);
            assert!(before.iter().zip(&after).all(|(b, a)| !*b || *a));
            before = after;
        }

        // Origin of the first pass is far outside the last radius.
        let first = map.tile(TilePos::new(5, 5)).unwrap();
        assert!(first.discovered);
        assert!(!first.visible);
    }

    #[test]
    fn radius_is_euclidean_and_clears_previous_pass() {
        let mut map = open_map();
        let mut state = VisibilityState::default();
        let origin = TilePos::new(10, 10);

        let report = update(&mut map, &mut state, origin.center(32.0), 3, 32.0, 4.0);
        assert!(report.recomputed);
        assert!(map.tile(TilePos::new(13, 10)).unwrap().visible);
        assert!(!map.tile(TilePos::new(13, 13)).unwrap().visible);
        assert_eq!(report.newly_discovered as usize, state.lit.len());

        update(&mut map, &mut state, TilePos::new(30, 30).center(32.0), 3, 32.0, 4.0);
        assert!(!map.tile(TilePos::new(10, 10)).unwrap().visible);
        assert!(map.tile(TilePos::new(10, 10)).unwrap().discovered);
    }

    #[test]
    fn small_moves_skip_recompute() {
        let mut map = open_map();
        let mut state = VisibilityState::default();
        let origin = TilePos::new(10, 10).center(32.0);
        update(&mut map, &mut state, origin, 3, 32.0, 4.0);

        let nudged = Position::new(origin.x + 1.0, origin.y);
        let report = update(&mut map, &mut state, nudged, 3, 32.0, 4.0);
        assert!(!report.recomputed);

        // A radius change always recomputes.
        let report = update(&mut map, &mut state, nudged, 2, 32.0, 4.0);
        assert!(report.recomputed);
    }

    #[test]
    fn interiors_are_fully_lit() {
        let mut map = GameMap::from_fn("shack", "Shack", 6, 6, |x, y| {
            Tile::new(x, y, TerrainKind::Floor)
        });
        map.is_interior = true;
        let mut state = VisibilityState::default();

        let report = update(&mut map, &mut state, TilePos::new(1, 1).center(32.0), 1, 32.0, 4.0);
        assert_eq!(report.newly_discovered, 36);
        assert!(map.tiles.iter().flatten().all(|t| t.visible && t.discovered));
    }

    #[test]
    fn release_clears_transient_flags() {
        let mut map = open_map();
        let mut state = VisibilityState::default();
        update(&mut map, &mut state, TilePos::new(10, 10).center(32.0), 3, 32.0, 4.0);

        state.release(&mut map);
        assert!(map.tiles.iter().flatten().all(|t| !t.visible));
        assert!(state.map_id.is_none());
        assert!(map.tile(TilePos::new(10, 10)).unwrap().discovered);
    }
}

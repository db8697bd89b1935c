//! Held-key movement with per-axis collision.
//!
//! Each axis is validated on its own so the player slides along walls. The
//! candidate position is also compared against the map edges, which is how
//! the transition controller learns the player is pushing out of the map.

use bitflags::bitflags;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::mode::GameMode;
use crate::state::{Actor, Direction, GameMap, GameStatistics, Position};

use super::grid;

bitflags! {
    /// Directional keys currently held down.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct HeldKeys: u8 {
        const UP    = 1 << 0;
        const DOWN  = 1 << 1;
        const LEFT  = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl HeldKeys {
    pub const fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::UP,
            Direction::Down => Self::DOWN,
            Direction::Left => Self::LEFT,
            Direction::Right => Self::RIGHT,
        }
    }

    pub fn is_moving(self) -> bool {
        !self.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("movement is locked while in {0} mode")]
    InputLocked(GameMode),
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InputLocked(_) => "MOVE_INPUT_LOCKED",
        }
    }
}

/// Result of one movement step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveOutcome {
    /// Applied `(dx, dy)` after collision.
    pub delta: (f32, f32),
    /// Euclidean length of `delta`.
    pub distance: f32,
    /// At least one requested axis hit a non-walkable tile.
    pub blocked: bool,
    /// Map edge the candidate position pressed against, if any.
    pub edge: Option<Direction>,
}

impl MoveOutcome {
    pub fn moved(&self) -> bool {
        self.distance > 0.0
    }
}

/// Advances `player` by `dt_ms` worth of held-key movement.
///
/// Vertical keys are processed before horizontal ones; the last key processed
/// sets the facing. `is_moving` mirrors whether any key is held, even when
/// every axis is blocked.
pub fn step(
    map: &GameMap,
    player: &mut Actor,
    statistics: &mut GameStatistics,
    keys: HeldKeys,
    dt_ms: u64,
    config: &GameConfig,
) -> MoveOutcome {
    player.is_moving = keys.is_moving();
    if keys.is_empty() {
        return MoveOutcome::default();
    }

    let distance = config.player_speed * dt_ms as f32 / 1000.0;
    let (mut dx, mut dy) = (0.0_f32, 0.0_f32);

    for (key, direction) in [
        (HeldKeys::UP, Direction::Up),
        (HeldKeys::DOWN, Direction::Down),
        (HeldKeys::LEFT, Direction::Left),
        (HeldKeys::RIGHT, Direction::Right),
    ] {
        if keys.contains(key) {
            let (ux, uy) = direction.delta();
            dx += ux as f32 * distance;
            dy += uy as f32 * distance;
            player.direction = direction;
        }
    }

    let origin = player.position;
    let candidate = Position::new(origin.x + dx, origin.y + dy);
    let edge = edge_contact(map, candidate, dx, dy, player.direction, config);

    let mut outcome = MoveOutcome {
        edge,
        ..MoveOutcome::default()
    };
    let mut next = origin;

    if dx != 0.0 {
        let candidate_axis = Position::new(candidate.x, origin.y);
        if grid::is_walkable_at(map, candidate_axis, config.tile_size) {
            next.x = candidate.x;
        } else {
            outcome.blocked = true;
        }
    }
    if dy != 0.0 {
        let candidate_axis = Position::new(origin.x, candidate.y);
        if grid::is_walkable_at(map, candidate_axis, config.tile_size) {
            next.y = candidate.y;
        } else {
            outcome.blocked = true;
        }
    }

    outcome.delta = (next.x - origin.x, next.y - origin.y);
    outcome.distance = origin.distance(next);
    player.position = next;
    statistics.distance_traveled += outcome.distance;
    outcome
}

/// Edge the candidate lies within `edge_buffer` of (or beyond) while moving
/// toward it. At a corner the facing edge wins.
fn edge_contact(
    map: &GameMap,
    candidate: Position,
    dx: f32,
    dy: f32,
    facing: Direction,
    config: &GameConfig,
) -> Option<Direction> {
    let (width, height) = map.pixel_size(config.tile_size);
    let buffer = config.edge_buffer;

    let vertical = if dy < 0.0 && candidate.y <= buffer {
        Some(Direction::Up)
    } else if dy > 0.0 && candidate.y >= height - buffer {
        Some(Direction::Down)
    } else {
        None
    };
    let horizontal = if dx < 0.0 && candidate.x <= buffer {
        Some(Direction::Left)
    } else if dx > 0.0 && candidate.x >= width - buffer {
        Some(Direction::Right)
    } else {
        None
    };

    match (vertical, horizontal) {
        (Some(v), Some(h)) => Some(if h == facing { h } else { v }),
        (v, h) => v.or(h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ActorKind, TerrainKind, Tile, TilePos};

    fn map_with_wall(wall: TilePos) -> GameMap {
        GameMap::from_fn("test", "Test", 30, 30, |x, y| {
            let terrain = if TilePos::new(x, y) == wall {
                TerrainKind::Wall
            } else {
                TerrainKind::Sand
            };
            Tile::new(x, y, terrain)
        })
    }

    fn player_at(tile: TilePos) -> Actor {
        Actor::new("player", "Wanderer", ActorKind::Player).at(tile.center(32.0))
    }

    #[test]
    fn wall_blocks_move_but_keeps_moving_flag() {
        let map = map_with_wall(TilePos::new(14, 15));
        let mut player = player_at(TilePos::new(15, 15));
        let start = player.position;
        let mut stats = GameStatistics::default();
        let config = GameConfig::default();

        // 32px puts the candidate inside the wall tile.
        let outcome = step(&map, &mut player, &mut stats, HeldKeys::LEFT, 200, &config);

        assert_eq!(player.position, start);
        assert!(player.is_moving);
        assert_eq!(player.direction, Direction::Left);
        assert!(outcome.blocked);
        assert_eq!(stats.distance_traveled, 0.0);
    }

    #[test]
    fn blocked_axis_still_lets_other_axis_slide() {
        let map = map_with_wall(TilePos::new(14, 15));
        let mut player = player_at(TilePos::new(15, 15));
        let mut stats = GameStatistics::default();
        let config = GameConfig::default();

        let keys = HeldKeys::LEFT | HeldKeys::UP;
        let outcome = step(&map, &mut player, &mut stats, keys, 200, &config);

        assert!(outcome.blocked);
        assert_eq!(player.position.x, TilePos::new(15, 15).center(32.0).x);
        assert!(player.position.y < TilePos::new(15, 15).center(32.0).y);
        assert!((stats.distance_traveled - 32.0).abs() < 1e-3);
        // Horizontal keys are processed last.
        assert_eq!(player.direction, Direction::Left);
    }

    #[test]
    fn diagonal_is_sum_of_axes() {
        let map = map_with_wall(TilePos::new(0, 0));
        let mut player = player_at(TilePos::new(10, 10));
        let mut stats = GameStatistics::default();
        let config = GameConfig::default();

        let outcome = step(
            &map,
            &mut player,
            &mut stats,
            HeldKeys::DOWN | HeldKeys::RIGHT,
            100,
            &config,
        );
        assert_eq!(outcome.delta, (16.0, 16.0));
        assert!((outcome.distance - 16.0 * 2f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn releasing_keys_clears_moving_flag() {
        let map = map_with_wall(TilePos::new(0, 0));
        let mut player = player_at(TilePos::new(10, 10));
        player.is_moving = true;
        let outcome = step(
            &map,
            &mut player,
            &mut GameStatistics::default(),
            HeldKeys::empty(),
            16,
            &GameConfig::default(),
        );
        assert!(!player.is_moving);
        assert!(!outcome.moved());
    }

    #[test]
    fn pressing_past_edge_reports_contact() {
        let map = map_with_wall(TilePos::new(5, 5));
        let mut player = Actor::new("player", "Wanderer", ActorKind::Player)
            .at(Position::new(30.0 * 32.0 - 4.0, 200.0));
        let outcome = step(
            &map,
            &mut player,
            &mut GameStatistics::default(),
            HeldKeys::RIGHT,
            100,
            &GameConfig::default(),
        );
        assert_eq!(outcome.edge, Some(Direction::Right));
        // Beyond the map is not walkable.
        assert!(outcome.blocked);
    }
}

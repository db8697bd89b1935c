//! Edge-dwell map transitions.
//!
//! ```text
//! Idle ──edge pressed──▶ Armed(dir, elapsed) ──elapsed ≥ dwell──▶ Transitioning
//!  ▲                        │ edge released / switched                │
//!  └────────────────────────┘                      complete / abort ──┘
//! ```
//!
//! A completed transition starts a cooldown during which the controller
//! refuses to arm. An aborted one returns to `Idle` with no cooldown and no
//! other state change.

use crate::config::GameConfig;
use crate::env::{CatalogError, MapCatalog};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Actor, Direction, GameMap, MapConnection, MapId, Position, TilePos};

use super::cache::MapCache;
use super::grid;
use super::visibility::VisibilityState;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "phase", rename_all = "snake_case"))]
pub enum TransitionPhase {
    #[default]
    Idle,
    Armed {
        direction: Direction,
        elapsed_ms: u64,
    },
    Transitioning,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionState {
    pub phase: TransitionPhase,
    /// Remaining re-arm suppression after a completed transition.
    pub cooldown_ms: u64,
}

/// What the dwell timer reports for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DwellSignal {
    Idle,
    /// An armed dwell was reset.
    Cancelled,
    Progress { direction: Direction, ratio: f32 },
    Ready(Direction),
}

impl TransitionState {
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, TransitionPhase::Transitioning)
    }

    /// Feeds one frame of edge contact into the dwell timer.
    pub fn observe(&mut self, edge: Option<Direction>, dt_ms: u64, dwell_ms: u64) -> DwellSignal {
        if self.is_transitioning() {
            return DwellSignal::Idle;
        }
        if self.cooldown_ms > 0 {
            self.cooldown_ms = self.cooldown_ms.saturating_sub(dt_ms);
            self.phase = TransitionPhase::Idle;
            return DwellSignal::Idle;
        }

        let was_armed = matches!(self.phase, TransitionPhase::Armed { .. });
        let Some(edge) = edge else {
            self.phase = TransitionPhase::Idle;
            return if was_armed {
                DwellSignal::Cancelled
            } else {
                DwellSignal::Idle
            };
        };

        let elapsed_ms = match self.phase {
            TransitionPhase::Armed {
                direction,
                elapsed_ms,
            } if direction == edge => elapsed_ms.saturating_add(dt_ms),
            _ => 0,
        };
        self.phase = TransitionPhase::Armed {
            direction: edge,
            elapsed_ms,
        };

        if elapsed_ms >= dwell_ms {
            DwellSignal::Ready(edge)
        } else {
            DwellSignal::Progress {
                direction: edge,
                ratio: elapsed_ms as f32 / dwell_ms.max(1) as f32,
            }
        }
    }

    /// Enters `Transitioning`. Fails if one is already in flight.
    pub fn begin(&mut self) -> Result<(), TransitionError> {
        if self.is_transitioning() {
            return Err(TransitionError::InFlight);
        }
        self.phase = TransitionPhase::Transitioning;
        Ok(())
    }

    pub fn complete(&mut self, cooldown_ms: u64) {
        self.phase = TransitionPhase::Idle;
        self.cooldown_ms = cooldown_ms;
    }

    pub fn abort(&mut self) {
        self.phase = TransitionPhase::Idle;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("no connection leaves '{map}' towards {direction}")]
    NoConnection { map: MapId, direction: Direction },

    #[error("connection target unavailable: {0}")]
    TargetUnavailable(#[from] CatalogError),

    #[error("a transition is already in flight")]
    InFlight,

    #[error("nothing to enter here")]
    NoEntrance,

    #[error("not inside an interior")]
    NotIndoors,
}

impl GameError for TransitionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoConnection { .. } | Self::NoEntrance | Self::NotIndoors => {
                ErrorSeverity::Validation
            }
            Self::TargetUnavailable(inner) => inner.severity(),
            Self::InFlight => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoConnection { .. } => "TRANSITION_NO_CONNECTION",
            Self::TargetUnavailable(_) => "TRANSITION_TARGET_UNAVAILABLE",
            Self::InFlight => "TRANSITION_IN_FLIGHT",
            Self::NoEntrance => "TRANSITION_NO_ENTRANCE",
            Self::NotIndoors => "TRANSITION_NOT_INDOORS",
        }
    }
}

/// Where the player lands on the new map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrival {
    pub tile: TilePos,
    pub position: Position,
    /// False when no walkable tile was found and the computed tile was kept.
    pub walkable: bool,
}

impl Arrival {
    /// Settles on `tile` or the nearest walkable tile around it.
    pub fn settle(map: &GameMap, tile: TilePos, config: &GameConfig) -> Self {
        let tile = grid::clamp_to_bounds(map, tile);
        let found = grid::nearest_walkable(map, tile, config.arrival_search_radius);
        let settled = found.unwrap_or(tile);
        Self {
            tile: settled,
            position: settled.center(config.tile_size),
            walkable: found.is_some(),
        }
    }

    /// Arrival for an edge connection: `to_position` pushed inward by
    /// `arrival_margin` tiles along the direction of travel.
    pub fn for_connection(map: &GameMap, connection: &MapConnection, config: &GameConfig) -> Self {
        let (ux, uy) = connection.direction.delta();
        let margin = config.arrival_margin as i32;
        let tile = connection.to_position.offset(ux * margin, uy * margin);
        Self::settle(map, tile, config)
    }
}

/// Summary of a completed map switch.
#[derive(Clone, Debug, PartialEq)]
pub struct MapSwitch {
    pub from: MapId,
    pub to: MapId,
    pub arrival: Arrival,
    /// Maps the cache dropped to stay within capacity.
    pub evicted: Vec<MapId>,
}

/// Fetches a map from the cache or builds a fresh one.
pub fn load_map(
    id: &MapId,
    cache: &mut MapCache,
    catalog: &dyn MapCatalog,
) -> Result<GameMap, TransitionError> {
    if let Some(map) = cache.take(id) {
        return Ok(map);
    }
    Ok(catalog.build(id)?)
}

/// Makes `target` current and moves the departed map into the cache.
pub fn swap_in(
    current: &mut GameMap,
    target: GameMap,
    visibility: &mut VisibilityState,
    cache: &mut MapCache,
) -> (MapId, Vec<MapId>) {
    visibility.release(current);
    let departed = std::mem::replace(current, target);
    let from = departed.id.clone();
    let evicted = cache.insert(departed);
    (from, evicted)
}

/// Mutable world pieces a map switch may touch.
pub struct SwitchContext<'a> {
    pub current: &'a mut GameMap,
    pub player: &'a mut Actor,
    pub transition: &'a mut TransitionState,
    pub visibility: &'a mut VisibilityState,
    pub cache: &'a mut MapCache,
}

/// Follows the connection leaving the current map towards `direction`.
///
/// On any failure the current map, the player and the cache are left
/// untouched and the controller returns to `Idle`.
pub fn follow_connection(
    ctx: SwitchContext<'_>,
    direction: Direction,
    catalog: &dyn MapCatalog,
    config: &GameConfig,
) -> Result<MapSwitch, TransitionError> {
    ctx.transition.begin()?;

    let result = ctx
        .current
        .connection(direction)
        .cloned()
        .ok_or_else(|| TransitionError::NoConnection {
            map: ctx.current.id.clone(),
            direction,
        })
        .and_then(|connection| {
            load_map(&connection.target_map_id, ctx.cache, catalog).map(|map| (connection, map))
        });

    let (connection, target) = match result {
        Ok(found) => found,
        Err(err) => {
            ctx.transition.abort();
            return Err(err);
        }
    };

    let arrival = Arrival::for_connection(&target, &connection, config);
    let (from, evicted) = swap_in(ctx.current, target, ctx.visibility, ctx.cache);
    ctx.player.position = arrival.position;
    ctx.player.direction = direction;
    ctx.transition.complete(config.transition_cooldown_ms);

    Ok(MapSwitch {
        from,
        to: ctx.current.id.clone(),
        arrival,
        evicted,
    })
}

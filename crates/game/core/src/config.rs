/// Game configuration constants and tunable parameters.
///
/// Distances are in pixels, durations in milliseconds of virtual time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub tile_size: f32,
    /// Player walking speed in pixels per second.
    pub player_speed: f32,
    /// Fog-of-war radius in tiles.
    pub vision_radius: u32,
    /// Radius used after a frame slower than `low_performance_frame_ms`.
    pub reduced_vision_radius: u32,
    pub low_performance_frame_ms: u64,
    /// Movement below this many pixels does not trigger a visibility pass.
    pub visibility_jitter: f32,

    /// Distance from the map edge at which a transition arms.
    pub edge_buffer: f32,
    /// How long the player must keep pressing an armed edge.
    pub edge_dwell_ms: u64,
    /// Tiles the arrival point is pushed inward from the entry edge.
    pub arrival_margin: u32,
    pub arrival_search_radius: u32,
    /// Re-arming is suppressed this long after a completed transition.
    pub transition_cooldown_ms: u64,

    /// Reach of the interact key, in pixels.
    pub interaction_range: f32,
    pub combat_start_delay_ms: u64,
    pub enemy_turn_delay_ms: u64,
    pub combat_end_delay_ms: u64,
    pub energy_regen_per_turn: u32,

    /// Live maps kept by the map cache, current map included.
    pub map_cache_capacity: usize,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Upper bound on initiative slots per encounter (player + enemies).
    pub const MAX_COMBATANTS: usize = 16;
    pub const MAX_SCHEDULED_TASKS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TILE_SIZE: f32 = 32.0;
    pub const DEFAULT_PLAYER_SPEED: f32 = 160.0;
    pub const DEFAULT_VISION_RADIUS: u32 = 8;
    pub const DEFAULT_REDUCED_VISION_RADIUS: u32 = 5;
    pub const DEFAULT_LOW_PERFORMANCE_FRAME_MS: u64 = 50;
    pub const DEFAULT_VISIBILITY_JITTER: f32 = 4.0;
    pub const DEFAULT_EDGE_BUFFER: f32 = 16.0;
    pub const DEFAULT_EDGE_DWELL_MS: u64 = 2_000;
    pub const DEFAULT_ARRIVAL_MARGIN: u32 = 2;
    pub const DEFAULT_ARRIVAL_SEARCH_RADIUS: u32 = 10;
    pub const DEFAULT_TRANSITION_COOLDOWN_MS: u64 = 200;
    pub const DEFAULT_INTERACTION_RANGE: f32 = 48.0;
    pub const DEFAULT_COMBAT_START_DELAY_MS: u64 = 500;
    pub const DEFAULT_ENEMY_TURN_DELAY_MS: u64 = 1_000;
    pub const DEFAULT_COMBAT_END_DELAY_MS: u64 = 2_000;
    pub const DEFAULT_ENERGY_REGEN_PER_TURN: u32 = 5;
    pub const DEFAULT_MAP_CACHE_CAPACITY: usize = 2;
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;

    pub fn new() -> Self {
        Self {
            tile_size: Self::DEFAULT_TILE_SIZE,
            player_speed: Self::DEFAULT_PLAYER_SPEED,
            vision_radius: Self::DEFAULT_VISION_RADIUS,
            reduced_vision_radius: Self::DEFAULT_REDUCED_VISION_RADIUS,
            low_performance_frame_ms: Self::DEFAULT_LOW_PERFORMANCE_FRAME_MS,
            visibility_jitter: Self::DEFAULT_VISIBILITY_JITTER,
            edge_buffer: Self::DEFAULT_EDGE_BUFFER,
            edge_dwell_ms: Self::DEFAULT_EDGE_DWELL_MS,
            arrival_margin: Self::DEFAULT_ARRIVAL_MARGIN,
            arrival_search_radius: Self::DEFAULT_ARRIVAL_SEARCH_RADIUS,
            transition_cooldown_ms: Self::DEFAULT_TRANSITION_COOLDOWN_MS,
            interaction_range: Self::DEFAULT_INTERACTION_RANGE,
            combat_start_delay_ms: Self::DEFAULT_COMBAT_START_DELAY_MS,
            enemy_turn_delay_ms: Self::DEFAULT_ENEMY_TURN_DELAY_MS,
            combat_end_delay_ms: Self::DEFAULT_COMBAT_END_DELAY_MS,
            energy_regen_per_turn: Self::DEFAULT_ENERGY_REGEN_PER_TURN,
            map_cache_capacity: Self::DEFAULT_MAP_CACHE_CAPACITY,
            viewport_width: Self::DEFAULT_VIEWPORT_WIDTH,
            viewport_height: Self::DEFAULT_VIEWPORT_HEIGHT,
        }
    }

    pub fn with_edge_dwell_ms(mut self, edge_dwell_ms: u64) -> Self {
        self.edge_dwell_ms = edge_dwell_ms;
        self
    }

    pub fn with_vision_radius(mut self, vision_radius: u32) -> Self {
        self.vision_radius = vision_radius;
        self
    }

    pub fn with_player_speed(mut self, player_speed: f32) -> Self {
        self.player_speed = player_speed;
        self
    }

    /// Vision radius for a frame that took `frame_ms`.
    pub fn effective_vision_radius(&self, frame_ms: u64) -> u32 {
        if frame_ms > self.low_performance_frame_ms {
            self.reduced_vision_radius
        } else {
            self.vision_radius
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

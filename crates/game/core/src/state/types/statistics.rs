/// Cumulative session statistics.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameStatistics {
    /// Pixels actually travelled (Euclidean length of applied movement).
    pub distance_traveled: f32,
    pub tiles_discovered: u32,
    pub enemies_killed: u32,
    pub items_collected: u32,
    pub maps_visited: u32,
    pub combats_won: u32,
    pub combats_lost: u32,
}

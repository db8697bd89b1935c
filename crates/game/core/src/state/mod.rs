//! Authoritative game state representation.
//!
//! [`GameState`] is the single aggregate the save/load collaborator persists
//! and the engine accepts as its sole source of truth. Components never hold
//! on to it; the engine lends each one only the fields it may mutate.
pub mod types;

pub use types::{
    Achievement, AchievementKind, AchievementProgress, Achievements, Actor, ActorKind,
    CombatOutcome, CombatPhase, CombatState, ConsumableEffect, CoreStats, DialogueChoice,
    DialogueNode, Direction, EquipmentBonus, GameMap, GameStatistics, Inventory, Item, ItemKind,
    Lootable, MapConnection, MapId, Millis, Npc, ObjectiveKind, PlayerState, Position, Quest,
    QuestLog, QuestObjective, QuestProgress, QuestStatus, Side, Skill, SkillEffect, StatusEffect,
    StatusEffectKind, StatusEffects, TerrainKind, Tile, TilePos,
};

use crate::dev::DevTool;
use crate::dialogue::DialogueState;
use crate::mode::GameMode;
use crate::world::{Camera, TransitionState, VisibilityState};

/// Where the player stood before entering an interior.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreviousLocation {
    pub map_id: MapId,
    pub position: Position,
}

/// Canonical snapshot of the game session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// RNG seed for enemy decisions. Set once at game creation.
    pub game_seed: u64,
    /// Random-roll counter, combined with `game_seed` for every roll.
    pub nonce: u64,
    pub mode: GameMode,
    pub current_map: GameMap,
    pub player: PlayerState,
    pub combat: Option<CombatState>,
    pub dialogue: Option<DialogueState>,
    pub quests: QuestLog,
    pub visibility: VisibilityState,
    pub camera: Camera,
    pub transition: TransitionState,
    /// Set while the player is inside an interior map.
    pub previous_location: Option<PreviousLocation>,
    pub statistics: GameStatistics,
    pub achievements: Achievements,
    pub dev_tool: Option<DevTool>,
}

impl GameState {
    /// Creates a fresh exploration session on `current_map`. The player keeps
    /// whatever position it carries.
    pub fn new(current_map: GameMap, player: PlayerState) -> Self {
        Self {
            game_seed: 0,
            nonce: 0,
            mode: GameMode::Exploration,
            current_map,
            player,
            combat: None,
            dialogue: None,
            quests: QuestLog::default(),
            visibility: VisibilityState::default(),
            camera: Camera::default(),
            transition: TransitionState::default(),
            previous_location: None,
            statistics: GameStatistics::default(),
            achievements: Achievements::default(),
            dev_tool: None,
        }
    }

    pub fn with_seed(mut self, game_seed: u64) -> Self {
        self.game_seed = game_seed;
        self
    }

    pub fn with_quests(mut self, quests: QuestLog) -> Self {
        self.quests = quests;
        self
    }

    pub fn with_achievements(mut self, achievements: Achievements) -> Self {
        self.achievements = achievements;
        self
    }

    pub fn current_map_id(&self) -> &MapId {
        &self.current_map.id
    }

    pub fn is_indoors(&self) -> bool {
        self.previous_location.is_some()
    }

    /// Returns the current nonce and advances it.
    pub fn next_nonce(&mut self) -> u64 {
        let nonce = self.nonce;
        self.nonce = self.nonce.wrapping_add(1);
        nonce
    }
}

//! Deterministic rules of the wasteland RPG runtime.
//!
//! `game-core` owns the canonical state ([`GameState`]) and the components
//! that mutate it: movement and collision, edge-dwell map transitions with a
//! bounded map cache, fog of war, turn-based combat, dialogue and the mode
//! controller. Everything is synchronous; [`engine::GameEngine`] runs one frame
//! or one command to completion and reports what happened as events.
//!
//! Map content arrives through the [`env::MapCatalog`] trait so the rules can
//! be exercised with hand-built maps in tests and with procedurally generated
//! ones in the game.
pub mod combat;
pub mod config;
pub mod dev;
pub mod dialogue;
pub mod engine;
pub mod env;
pub mod error;
pub mod mode;
pub mod state;
pub mod world;

pub use combat::{CombatAction, CombatError, TurnResult};
pub use config::GameConfig;
pub use dev::{DevCommit, DevError, DevTool, DevToolKind, ItemDraft, NpcDraft, QuestDraft};
pub use dialogue::{DialogueError, DialogueState, DialogueStep};
pub use engine::{EngineError, GameEngine, GameEvent, InputKey, TaskKind};
pub use env::{CatalogError, FixedCatalog, MapCatalog, PcgRng, RngOracle};
pub use error::{ErrorSeverity, GameError};
pub use mode::{GameMode, Hotkey};
pub use state::{
    Achievement, AchievementKind, Achievements, Actor, ActorKind, CombatOutcome, CombatPhase,
    CombatState, ConsumableEffect, CoreStats, DialogueChoice, DialogueNode, Direction,
    EquipmentBonus, GameMap, GameState, GameStatistics, Inventory, Item, ItemKind, Lootable,
    MapConnection, MapId, Npc, ObjectiveKind, PlayerState, Position, PreviousLocation, Quest,
    QuestLog, QuestObjective, QuestStatus, Side, Skill, SkillEffect, StatusEffect,
    StatusEffectKind, TerrainKind, Tile, TilePos,
};
pub use world::{MapCache, MoveError, TransitionError};

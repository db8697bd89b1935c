pub mod achievement;
pub mod actor;
pub mod combat;
pub mod common;
pub mod item;
pub mod map;
pub mod npc;
pub mod quest;
pub mod skill;
pub mod statistics;
pub mod status;
pub mod tile;

pub use achievement::{Achievement, AchievementKind, AchievementProgress, Achievements};
pub use actor::{Actor, ActorKind, CoreStats, EquipmentBonus, PlayerState, Side};
pub use combat::{CombatOutcome, CombatPhase, CombatState};
pub use common::{Direction, MapId, Millis, Position, TilePos};
pub use item::{ConsumableEffect, Inventory, Item, ItemKind};
pub use map::{GameMap, Lootable, MapConnection};
pub use npc::{DialogueChoice, DialogueNode, Npc};
pub use quest::{ObjectiveKind, Quest, QuestLog, QuestObjective, QuestProgress, QuestStatus};
pub use skill::{Skill, SkillEffect};
pub use statistics::GameStatistics;
pub use status::{StatusEffect, StatusEffectKind, StatusEffects};
pub use tile::{TerrainKind, Tile};

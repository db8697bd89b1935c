//! Notifications produced by the engine for presentation collaborators.

use crate::combat::TurnResult;
use crate::mode::GameMode;
use crate::state::{CombatOutcome, Direction, Item, MapId, QuestProgress};

/// Something observable happened during a tick or command.
///
/// `StateChanged` is emitted at most once per call, after all other events of
/// that call, whenever the aggregate state was mutated.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    StateChanged,
    ModeChanged {
        from: GameMode,
        to: GameMode,
    },
    /// The player is pressing against an edge; `progress` runs 0..1.
    EdgeDwell {
        direction: Direction,
        progress: f32,
    },
    EdgeDwellCancelled,
    MapChanged {
        from: MapId,
        to: MapId,
        evicted: Vec<MapId>,
    },
    /// A lootable was emptied into the inventory.
    LootableDiscovered {
        lootable_id: String,
        items: Vec<Item>,
    },
    CombatStarted {
        enemies: Vec<String>,
    },
    CombatTurn(TurnResult),
    CombatEnded {
        outcome: CombatOutcome,
        experience: u32,
    },
    LevelUp {
        level: u32,
    },
    QuestProgressed(QuestProgress),
    AchievementUnlocked {
        achievement_id: String,
    },
    DialogueStarted {
        npc_id: String,
    },
    /// A dialogue choice carried an action for collaborators to handle.
    DialogueAction {
        npc_id: String,
        action: String,
    },
    DialogueEnded {
        npc_id: String,
    },
    /// A command was refused; the state is unchanged.
    Rejected {
        code: &'static str,
        message: String,
    },
}

//! Turn-based encounter state.

use super::actor::{Actor, Side};

/// Lifecycle of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum CombatPhase {
    /// Participants assembled, waiting for the opening delay.
    Engaging,
    /// `turn_order[current_turn]` is acting.
    TurnActive,
    Victory,
    Defeat,
}

impl CombatPhase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    /// Snapshot copies of the player and every engaged enemy.
    pub participants: Vec<Actor>,
    /// Indices into `participants`, in acting order.
    pub turn_order: Vec<usize>,
    /// Index into `turn_order`.
    pub current_turn: usize,
    pub round: u32,
    pub is_player_turn: bool,
    pub phase: CombatPhase,
    pub log: Vec<String>,
}

impl CombatState {
    pub fn new(participants: Vec<Actor>, turn_order: Vec<usize>) -> Self {
        Self {
            participants,
            turn_order,
            current_turn: 0,
            round: 1,
            is_player_turn: false,
            phase: CombatPhase::Engaging,
            log: Vec::new(),
        }
    }

    /// Participant index of the actor whose turn it is.
    pub fn current_actor_index(&self) -> Option<usize> {
        self.turn_order.get(self.current_turn).copied()
    }

    pub fn current_actor(&self) -> Option<&Actor> {
        self.current_actor_index()
            .and_then(|i| self.participants.get(i))
    }

    pub fn side_alive(&self, side: Side) -> bool {
        self.participants
            .iter()
            .any(|p| p.side() == side && p.is_alive())
    }

    /// Index of the player's combatant.
    pub fn player_index(&self) -> Option<usize> {
        self.participants.iter().position(|p| p.side() == Side::Player)
    }

    pub fn player(&self) -> Option<&Actor> {
        self.player_index().and_then(|i| self.participants.get(i))
    }

    /// Indices of living participants on the given side.
    pub fn living(&self, side: Side) -> Vec<usize> {
        self.participants
            .iter()
            .enumerate()
            .filter(|(_, p)| p.side() == side && p.is_alive())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        match self.phase {
            CombatPhase::Victory => Some(CombatOutcome::Victory),
            CombatPhase::Defeat => Some(CombatOutcome::Defeat),
            _ => None,
        }
    }
}

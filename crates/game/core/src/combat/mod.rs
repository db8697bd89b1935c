//! Turn-based combat resolution.
//!
//! The resolver works on snapshot copies of the participants stored in
//! [`CombatState`]. Player turns suspend until [`player_action`] is called;
//! enemy turns run through [`enemy_turn`] when the engine's scheduler fires.
//! Both finish through the same end-of-turn pipeline:
//!
//! ```text
//! resolve ─▶ evaluate ─▶ tick all living ─▶ evaluate ─▶ advance
//!                                                        │
//!                               stunned? ◀───────────────┘
//!                               └─ log skip, tick, evaluate, advance
//! ```

pub mod ai;
pub mod damage;
pub mod effects;
pub mod initiative;
pub mod outcome;

pub use ai::EnemyDecision;
pub use damage::{SkillResolution, resolve_skill};
pub use effects::{TickReport, apply_consumable, end_of_turn};
pub use initiative::roll_initiative;
pub use outcome::{Fallen, Spoils, spoils};

use crate::env::RngOracle;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    Actor, CombatOutcome, CombatPhase, CombatState, Inventory, Side, StatusEffectKind,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("no combat in progress")]
    NotInCombat,

    #[error("combat is already over")]
    CombatOver,

    #[error("it is not the player's turn")]
    NotPlayerTurn,

    #[error("it is not an enemy's turn")]
    NotEnemyTurn,

    #[error("cannot engage with 0 health")]
    PlayerDefeated,

    #[error("no enemies within reach")]
    NoEnemies,

    #[error("unknown skill '{0}'")]
    UnknownSkill(String),

    #[error("skill '{skill}' unlocks at level {unlock_level}")]
    SkillLocked { skill: String, unlock_level: u32 },

    #[error("skill '{skill}' is cooling down for {remaining} more turns")]
    SkillOnCooldown { skill: String, remaining: u32 },

    #[error("skill '{skill}' needs {required} energy, have {available}")]
    InsufficientEnergy {
        skill: String,
        required: u32,
        available: u32,
    },

    #[error("item '{0}' is not in the inventory")]
    UnknownItem(String),

    #[error("item '{0}' cannot be used")]
    NotConsumable(String),

    #[error("target index {0} is not a valid target")]
    InvalidTarget(usize),

    #[error("participant index {0} does not exist")]
    MissingParticipant(usize),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotPlayerTurn | Self::SkillOnCooldown { .. } => ErrorSeverity::Recoverable,
            Self::NotEnemyTurn | Self::MissingParticipant(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotInCombat => "COMBAT_NOT_IN_COMBAT",
            Self::CombatOver => "COMBAT_OVER",
            Self::NotPlayerTurn => "COMBAT_NOT_PLAYER_TURN",
            Self::NotEnemyTurn => "COMBAT_NOT_ENEMY_TURN",
            Self::PlayerDefeated => "COMBAT_PLAYER_DEFEATED",
            Self::NoEnemies => "COMBAT_NO_ENEMIES",
            Self::UnknownSkill(_) => "COMBAT_UNKNOWN_SKILL",
            Self::SkillLocked { .. } => "COMBAT_SKILL_LOCKED",
            Self::SkillOnCooldown { .. } => "COMBAT_SKILL_ON_COOLDOWN",
            Self::InsufficientEnergy { .. } => "COMBAT_INSUFFICIENT_ENERGY",
            Self::UnknownItem(_) => "COMBAT_UNKNOWN_ITEM",
            Self::NotConsumable(_) => "COMBAT_NOT_CONSUMABLE",
            Self::InvalidTarget(_) => "COMBAT_INVALID_TARGET",
            Self::MissingParticipant(_) => "COMBAT_MISSING_PARTICIPANT",
        }
    }
}

/// Player's choice for their turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum CombatAction {
    Skill {
        skill_id: String,
        target: Option<usize>,
    },
    Item {
        item_id: String,
    },
}

impl CombatAction {
    pub fn skill(skill_id: impl Into<String>) -> Self {
        Self::Skill {
            skill_id: skill_id.into(),
            target: None,
        }
    }

    pub fn skill_at(skill_id: impl Into<String>, target: usize) -> Self {
        Self::Skill {
            skill_id: skill_id.into(),
            target: Some(target),
        }
    }

    pub fn item(item_id: impl Into<String>) -> Self {
        Self::Item {
            item_id: item_id.into(),
        }
    }

    /// Parses a presentation action id: `item:<id>` uses an item, anything
    /// else names a skill.
    pub fn from_id(action_id: &str, target: Option<usize>) -> Self {
        match action_id.strip_prefix("item:") {
            Some(item_id) => Self::item(item_id),
            None => Self::Skill {
                skill_id: action_id.to_owned(),
                target,
            },
        }
    }
}

/// Who acts next once a turn has been resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnResult {
    PlayerTurn,
    EnemyTurn,
    Finished(CombatOutcome),
}

/// Opens an encounter between `player` and `enemies`.
pub fn engage(player: &Actor, enemies: Vec<Actor>) -> Result<(CombatState, TurnResult), CombatError> {
    if !player.is_alive() {
        return Err(CombatError::PlayerDefeated);
    }
    if enemies.is_empty() {
        return Err(CombatError::NoEnemies);
    }

    let names: Vec<&str> = enemies.iter().map(|e| e.name.as_str()).collect();
    let opening = format!("Combat started against {}.", names.join(", "));

    let mut participants = Vec::with_capacity(enemies.len() + 1);
    participants.push(player.clone());
    participants.extend(enemies);
    let order = roll_initiative(&participants);

    let mut state = CombatState::new(participants, order);
    state.push_log(opening);

    let first_is_player = state
        .current_actor()
        .is_some_and(|a| a.side() == Side::Player);
    let next = if first_is_player {
        state.phase = CombatPhase::TurnActive;
        state.is_player_turn = true;
        TurnResult::PlayerTurn
    } else {
        TurnResult::EnemyTurn
    };

    Ok((state, next))
}

/// Resolves the player's action for the current turn.
pub fn player_action(
    state: &mut CombatState,
    inventory: &mut Inventory,
    action: &CombatAction,
    energy_regen: u32,
) -> Result<TurnResult, CombatError> {
    if state.phase.is_terminal() {
        return Err(CombatError::CombatOver);
    }
    if !state.is_player_turn {
        return Err(CombatError::NotPlayerTurn);
    }
    let actor = state
        .current_actor_index()
        .ok_or(CombatError::MissingParticipant(state.current_turn))?;

    match action {
        CombatAction::Skill { skill_id, target } => {
            let (skill, target) = validate_skill(state, actor, skill_id, *target)?;
            resolve_skill(state, actor, skill, target)?;
        }
        CombatAction::Item { item_id } => {
            let effect = inventory
                .get(item_id)
                .ok_or_else(|| CombatError::UnknownItem(item_id.clone()))?
                .consumable_effect()
                .ok_or_else(|| CombatError::NotConsumable(item_id.clone()))?;
            let item = inventory
                .take_one(item_id)
                .ok_or_else(|| CombatError::UnknownItem(item_id.clone()))?;
            let user = state
                .participants
                .get_mut(actor)
                .ok_or(CombatError::MissingParticipant(actor))?;
            let line = apply_consumable(user, &item.name, effect);
            state.push_log(line);
        }
    }

    Ok(finish_turn(state, energy_regen))
}

/// Resolves the current enemy's turn.
pub fn enemy_turn(
    state: &mut CombatState,
    rng: &dyn RngOracle,
    game_seed: u64,
    nonce: u64,
    energy_regen: u32,
) -> Result<TurnResult, CombatError> {
    if state.phase.is_terminal() {
        return Err(CombatError::CombatOver);
    }
    let actor = state
        .current_actor_index()
        .filter(|&i| state.participants[i].side() == Side::Enemy)
        .ok_or(CombatError::NotEnemyTurn)?;
    state.phase = CombatPhase::TurnActive;
    state.is_player_turn = false;

    let enemy = &state.participants[actor];
    if enemy.status_effects.has(StatusEffectKind::Stun) {
        let line = format!("{} is stunned and loses the turn.", enemy.name);
        state.push_log(line);
    } else if let Some(decision) = ai::choose(state, actor, rng, game_seed, nonce) {
        resolve_skill(state, actor, decision.skill, decision.target)?;
    } else {
        let line = format!("{} has no usable skill and waits.", enemy.name);
        state.push_log(line);
    }

    Ok(finish_turn(state, energy_regen))
}

fn validate_skill(
    state: &CombatState,
    actor: usize,
    skill_id: &str,
    target: Option<usize>,
) -> Result<(usize, usize), CombatError> {
    let caster = &state.participants[actor];
    let index = caster
        .skill_index(skill_id)
        .ok_or_else(|| CombatError::UnknownSkill(skill_id.to_owned()))?;
    let skill = &caster.skills[index];

    if skill.unlock_level > caster.level {
        return Err(CombatError::SkillLocked {
            skill: skill.id.clone(),
            unlock_level: skill.unlock_level,
        });
    }
    if !skill.is_ready() {
        return Err(CombatError::SkillOnCooldown {
            skill: skill.id.clone(),
            remaining: skill.current_cooldown,
        });
    }
    if !skill.is_affordable(caster.energy) {
        return Err(CombatError::InsufficientEnergy {
            skill: skill.id.clone(),
            required: skill.energy_cost,
            available: caster.energy,
        });
    }

    let offensive = skill.is_offensive();
    let target = match target {
        Some(target) => target,
        None if offensive => state
            .living(Side::Enemy)
            .first()
            .copied()
            .ok_or(CombatError::NoEnemies)?,
        None => actor,
    };

    let victim = state
        .participants
        .get(target)
        .ok_or(CombatError::InvalidTarget(target))?;
    let wrong_side = if offensive {
        victim.side() == caster.side()
    } else {
        victim.side() != caster.side()
    };
    if wrong_side || !victim.is_alive() {
        return Err(CombatError::InvalidTarget(target));
    }

    Ok((index, target))
}

/// Runs the shared end-of-turn pipeline and decides who acts next.
fn finish_turn(state: &mut CombatState, energy_regen: u32) -> TurnResult {
    // Each stunned turn skipped below consumes one pass; bounded so a
    // permanently stunned table cannot spin.
    for _ in 0..=state.participants.len() {
        if let Some(outcome) = outcome::evaluate(state) {
            return TurnResult::Finished(outcome);
        }

        tick_living(state, energy_regen);
        if let Some(outcome) = outcome::evaluate(state) {
            return TurnResult::Finished(outcome);
        }

        initiative::advance(state);
        state.phase = CombatPhase::TurnActive;

        let Some(next) = state.current_actor() else {
            break;
        };
        if next.side() == Side::Enemy {
            // Enemy stuns are handled when the scheduled turn fires.
            return TurnResult::EnemyTurn;
        }
        if !next.status_effects.has(StatusEffectKind::Stun) {
            return TurnResult::PlayerTurn;
        }
        let line = format!("{} is stunned and loses the turn.", next.name);
        state.push_log(line);
        state.is_player_turn = false;
    }

    if state.is_player_turn {
        TurnResult::PlayerTurn
    } else {
        TurnResult::EnemyTurn
    }
}

fn tick_living(state: &mut CombatState, energy_regen: u32) {
    let mut lines = Vec::new();
    for actor in state.participants.iter_mut().filter(|a| a.is_alive()) {
        let report = end_of_turn(actor, energy_regen);
        lines.extend(report.describe(&actor.name));
        if !actor.is_alive() {
            lines.push(format!("{} succumbs.", actor.name));
        }
    }
    for line in lines {
        state.push_log(line);
    }
}

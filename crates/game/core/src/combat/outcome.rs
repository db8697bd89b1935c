//! Termination checks and victory spoils.

use crate::state::{CombatOutcome, CombatPhase, CombatState, Side};

/// Sets a terminal phase if one side is wiped out.
///
/// Enemy wipe is checked first, so a simultaneous wipe counts as victory.
pub fn evaluate(state: &mut CombatState) -> Option<CombatOutcome> {
    if let Some(outcome) = state.outcome() {
        return Some(outcome);
    }

    let phase = if !state.side_alive(Side::Enemy) {
        CombatPhase::Victory
    } else if !state.side_alive(Side::Player) {
        CombatPhase::Defeat
    } else {
        return None;
    };

    state.phase = phase;
    state.is_player_turn = false;
    state.push_log(match phase {
        CombatPhase::Victory => "Victory!",
        _ => "You have been defeated.",
    });
    state.outcome()
}

/// A defeated enemy, as needed for map cleanup and kill objectives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fallen {
    pub id: String,
    pub enemy_type: String,
}

/// Rewards of a won encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Spoils {
    pub experience: u32,
    pub fallen: Vec<Fallen>,
}

pub fn spoils(state: &CombatState) -> Spoils {
    let mut spoils = Spoils::default();
    for enemy in state
        .participants
        .iter()
        .filter(|p| p.side() == Side::Enemy && !p.is_alive())
    {
        spoils.experience = spoils.experience.saturating_add(enemy.experience_reward());
        spoils.fallen.push(Fallen {
            id: enemy.id.clone(),
            enemy_type: enemy.enemy_type().unwrap_or_default().to_owned(),
        });
    }
    spoils
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Actor, ActorKind};

    fn enemy(id: &str, health: u32, experience: u32) -> Actor {
        Actor::new(
            id,
            id,
            ActorKind::Enemy {
                enemy_type: "raider".into(),
                experience,
            },
        )
        .with_health(health, 50)
    }

    #[test]
    fn victory_when_all_enemies_down() {
        let player = Actor::new("player", "p", ActorKind::Player).with_health(10, 10);
        let mut state = CombatState::new(
            vec![player, enemy("a", 0, 25), enemy("b", 0, 40)],
            vec![0, 1, 2],
        );
        assert_eq!(evaluate(&mut state), Some(CombatOutcome::Victory));
        assert!(state.phase.is_terminal());

        let spoils = spoils(&state);
        assert_eq!(spoils.experience, 65);
        assert_eq!(spoils.fallen.len(), 2);
    }

    #[test]
    fn defeat_when_player_down() {
        let player = Actor::new("player", "p", ActorKind::Player).with_health(0, 10);
        let mut state = CombatState::new(vec![player, enemy("a", 5, 25)], vec![0, 1]);
        assert_eq!(evaluate(&mut state), Some(CombatOutcome::Defeat));
        assert_eq!(state.log.len(), 1);
        // Evaluating again does not log twice.
        evaluate(&mut state);
        assert_eq!(state.log.len(), 1);
    }

    #[test]
    fn ongoing_fight_has_no_outcome() {
        let player = Actor::new("player", "p", ActorKind::Player).with_health(3, 10);
        let mut state = CombatState::new(vec![player, enemy("a", 5, 25)], vec![0, 1]);
        assert_eq!(evaluate(&mut state), None);
        assert_eq!(state.phase, CombatPhase::Engaging);
    }
}

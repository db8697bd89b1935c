//! Enemy turn decisions.

use crate::env::{RngOracle, RollContext, compute_seed};
use crate::state::{CombatState, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyDecision {
    pub skill: usize,
    pub target: usize,
}

/// Picks a usable skill and a target for the enemy at participant `actor`.
///
/// Usable means affordable and off cooldown; the pick is uniform. Offensive
/// skills aim at a uniformly chosen living opponent, support skills at the
/// caster. Returns `None` when nothing is usable or no opponent is alive.
pub fn choose(
    state: &CombatState,
    actor: usize,
    rng: &dyn RngOracle,
    game_seed: u64,
    nonce: u64,
) -> Option<EnemyDecision> {
    let enemy = state.participants.get(actor)?;
    let usable: Vec<usize> = enemy
        .skills
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_ready() && s.is_affordable(enemy.energy))
        .map(|(i, _)| i)
        .collect();

    let slot = actor as u32;
    let pick = rng.pick(
        compute_seed(game_seed, nonce, slot, RollContext::SkillChoice),
        usable.len(),
    )?;
    let skill = usable[pick];

    let target = if enemy.skills[skill].is_offensive() {
        let opponents = state.living(opposite(enemy.side()));
        let pick = rng.pick(
            compute_seed(game_seed, nonce, slot, RollContext::TargetChoice),
            opponents.len(),
        )?;
        opponents[pick]
    } else {
        actor
    };

    Some(EnemyDecision { skill, target })
}

fn opposite(side: Side) -> Side {
    match side {
        Side::Player => Side::Enemy,
        Side::Enemy => Side::Player,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;
    use crate::state::{Actor, ActorKind, Skill};

    fn state(enemy_skills: Vec<Skill>, energy: u32) -> CombatState {
        let player = Actor::new("player", "Wanderer", ActorKind::Player).with_health(100, 100);
        let enemy = Actor::new(
            "robot_1",
            "Robot",
            ActorKind::Enemy {
                enemy_type: "robot".into(),
                experience: 60,
            },
        )
        .with_health(80, 80)
        .with_energy(energy, 40)
        .with_skills(enemy_skills);
        CombatState::new(vec![player, enemy], vec![0, 1])
    }

    #[test]
    fn only_affordable_ready_skills_are_picked() {
        let mut laser = Skill::new("laser", "Laser", 5).with_damage(12);
        laser.current_cooldown = 1;
        let skills = vec![
            laser,
            Skill::new("overload", "Overload", 30).with_damage(40),
            Skill::new("punch", "Punch", 0).with_damage(6),
        ];
        let combat = state(skills, 10);

        for nonce in 0..32 {
            let decision = choose(&combat, 1, &PcgRng, 7, nonce).unwrap();
            assert_eq!(decision.skill, 2);
            assert_eq!(decision.target, 0);
        }
    }

    #[test]
    fn no_usable_skill_means_no_decision() {
        let combat = state(vec![Skill::new("overload", "Overload", 30).with_damage(40)], 10);
        assert_eq!(choose(&combat, 1, &PcgRng, 7, 0), None);
    }

    #[test]
    fn support_skills_target_self() {
        let combat = state(vec![Skill::new("repair", "Repair", 0).with_healing(10)], 0);
        let decision = choose(&combat, 1, &PcgRng, 1, 1).unwrap();
        assert_eq!(decision.target, 1);
    }

    #[test]
    fn decisions_replay_for_same_seed() {
        let skills = vec![
            Skill::new("a", "A", 0).with_damage(1),
            Skill::new("b", "B", 0).with_damage(2),
            Skill::new("c", "C", 0).with_damage(3),
        ];
        let combat = state(skills, 0);
        let first: Vec<_> = (0..16).map(|n| choose(&combat, 1, &PcgRng, 99, n)).collect();
        let second: Vec<_> = (0..16).map(|n| choose(&combat, 1, &PcgRng, 99, n)).collect();
        assert_eq!(first, second);
    }
}

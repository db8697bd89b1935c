//! End-of-turn ticking and consumable effects.

use crate::state::{Actor, ConsumableEffect, StatusEffect, StatusEffectKind};

/// What one end-of-turn tick did to an actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub poison_damage: u32,
    pub regenerated: u32,
    pub expired: Vec<StatusEffectKind>,
}

/// Runs one end-of-turn tick on `actor`.
///
/// Order: skill cooldowns drop by one, per-tick effects apply, effect
/// durations drop by one (expired effects are removed), energy regenerates.
pub fn end_of_turn(actor: &mut Actor, energy_regen: u32) -> TickReport {
    for skill in actor.skills.iter_mut() {
        skill.current_cooldown = skill.current_cooldown.saturating_sub(1);
    }

    let poison = actor.status_effects.total(StatusEffectKind::Poison);
    let regeneration = actor.status_effects.total(StatusEffectKind::Regeneration);

    let mut report = TickReport::default();
    if poison > 0 {
        report.poison_damage = actor.take_damage(poison);
    }
    if regeneration > 0 && actor.is_alive() {
        report.regenerated = actor.heal(regeneration);
    }
    report.expired = actor.status_effects.decrement();
    actor.restore_energy(energy_regen);

    report
}

impl TickReport {
    /// Combat log lines for this tick, if anything visible happened.
    pub fn describe(&self, name: &str) -> Vec<String> {
        let mut lines = Vec::new();
        if self.poison_damage > 0 {
            lines.push(format!("{name} takes {} poison damage.", self.poison_damage));
        }
        if self.regenerated > 0 {
            lines.push(format!("{name} regenerates {} health.", self.regenerated));
        }
        for kind in &self.expired {
            lines.push(format!("{kind} wears off {name}."));
        }
        lines
    }
}

/// Applies a consumable to `actor` and returns the log line.
pub fn apply_consumable(actor: &mut Actor, item_name: &str, effect: ConsumableEffect) -> String {
    match effect {
        ConsumableEffect::Heal(amount) => {
            let healed = actor.heal(amount);
            format!("{} uses {item_name}, restoring {healed} health.", actor.name)
        }
        ConsumableEffect::RestoreEnergy(amount) => {
            let restored = actor.restore_energy(amount);
            format!("{} uses {item_name}, restoring {restored} energy.", actor.name)
        }
        ConsumableEffect::RemoveRadiation(amount) => {
            let removed = amount.min(actor.radiation);
            actor.radiation -= removed;
            format!("{} uses {item_name}, purging {removed} radiation.", actor.name)
        }
        ConsumableEffect::Status {
            kind,
            duration,
            value,
        } => {
            actor
                .status_effects
                .push(StatusEffect::new(kind, duration, value, item_name));
            format!("{} uses {item_name} ({kind} for {duration} turns).", actor.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ActorKind, Skill};

    fn target(health: u32) -> Actor {
        Actor::new("mutant_1", "Mutant", ActorKind::Enemy {
            enemy_type: "mutant".into(),
            experience: 40,
        })
        .with_health(health, 80)
        .with_energy(0, 30)
    }

    #[test]
    fn poison_ticks_then_expires() {
        let mut actor = target(20);
        actor
            .status_effects
            .push(StatusEffect::new(StatusEffectKind::Poison, 3, 5, "Wanderer"));

        for _ in 0..3 {
            end_of_turn(&mut actor, 0);
        }

        assert_eq!(actor.health, 5);
        assert!(actor.status_effects.is_empty());
    }

    #[test]
    fn cooldowns_and_energy_tick() {
        let mut actor = target(20);
        actor.skills.push(Skill::new("claw", "Claw", 0).with_cooldown(2));
        actor.skills[0].current_cooldown = 1;

        end_of_turn(&mut actor, 5);
        end_of_turn(&mut actor, 50);

        assert_eq!(actor.skills[0].current_cooldown, 0);
        assert_eq!(actor.energy, 30);
    }

    #[test]
    fn regeneration_respects_max_health() {
        let mut actor = target(78);
        actor
            .status_effects
            .push(StatusEffect::new(StatusEffectKind::Regeneration, 2, 5, "Stimpak"));
        let report = end_of_turn(&mut actor, 0);
        assert_eq!(report.regenerated, 2);
        assert_eq!(actor.health, 80);
    }

    #[test]
    fn consumables_apply_their_effect() {
        let mut actor = target(10);
        actor.radiation = 30;
        apply_consumable(&mut actor, "Stimpak", ConsumableEffect::Heal(25));
        apply_consumable(&mut actor, "RadAway", ConsumableEffect::RemoveRadiation(50));
        let line = apply_consumable(
            &mut actor,
            "Buffout",
            ConsumableEffect::Status {
                kind: StatusEffectKind::Buff,
                duration: 3,
                value: 20,
            },
        );

        assert_eq!(actor.health, 35);
        assert_eq!(actor.radiation, 0);
        assert!(actor.status_effects.has(StatusEffectKind::Buff));
        assert!(line.contains("buff"));
    }
}

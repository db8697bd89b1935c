//! Skill resolution: energy, damage, healing, effects and cooldown.

use crate::state::{Actor, CombatState, StatusEffect, StatusEffectKind};

use super::CombatError;

/// Damage before the target's mitigation.
///
/// # Formula
///
/// ```text
/// raw     = skill_damage + floor(strength / 2) + equipment_damage
/// boosted = raw * (100 + buff%) / 100        (only under Buff)
/// ```
pub fn outgoing_damage(actor: &Actor, skill_damage: u32) -> u32 {
    let raw = skill_damage
        .saturating_add(actor.strength() / 2)
        .saturating_add(actor.equipment.damage);

    let boost = actor.status_effects.total(StatusEffectKind::Buff);
    if boost == 0 {
        raw
    } else {
        raw.saturating_mul(100 + boost) / 100
    }
}

/// Flat defense from gear plus active shields.
pub fn defense(target: &Actor) -> u32 {
    target
        .equipment
        .defense
        .saturating_add(target.status_effects.total(StatusEffectKind::Shield))
}

/// Damage after defense, never below one.
pub fn mitigate(raw: u32, target: &Actor) -> u32 {
    raw.saturating_sub(defense(target)).max(1)
}

/// What a resolved skill did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillResolution {
    pub damage: Option<u32>,
    pub healed: Option<u32>,
    pub effect: Option<StatusEffectKind>,
}

/// Applies `actor`'s skill at `skill` to participant `target`.
///
/// Validation (readiness, energy, target side) happens in the callers; this
/// only fails on indices that do not exist.
pub fn resolve_skill(
    state: &mut CombatState,
    actor: usize,
    skill: usize,
    target: usize,
) -> Result<SkillResolution, CombatError> {
    if target >= state.participants.len() {
        return Err(CombatError::InvalidTarget(target));
    }
    let caster = state
        .participants
        .get_mut(actor)
        .ok_or(CombatError::MissingParticipant(actor))?;
    let used = caster
        .skills
        .get_mut(skill)
        .ok_or(CombatError::MissingParticipant(actor))?;

    let def = used.clone();
    used.current_cooldown = used.cooldown;
    caster.energy = caster.energy.saturating_sub(def.energy_cost);
    let caster_name = caster.name.clone();
    let raw = def.damage.map(|d| outgoing_damage(caster, d));

    let victim = &mut state.participants[target];
    let victim_name = victim.name.clone();
    let mut resolution = SkillResolution::default();
    let mut line = format!("{caster_name} uses {}", def.name);
    if target != actor {
        line.push_str(&format!(" on {victim_name}"));
    }

    if let Some(raw) = raw {
        let amount = mitigate(raw, victim);
        let dealt = victim.take_damage(amount);
        resolution.damage = Some(dealt);
        line.push_str(&format!(" for {dealt} damage"));
    }
    if let Some(amount) = def.healing {
        let healed = victim.heal(amount);
        resolution.healed = Some(healed);
        line.push_str(&format!(", restoring {healed} health"));
    }
    if let Some(effect) = def.effect {
        let applied = victim.status_effects.push(StatusEffect::new(
            effect.kind,
            effect.duration,
            effect.value,
            caster_name.as_str(),
        ));
        if applied {
            resolution.effect = Some(effect.kind);
            line.push_str(&format!(" ({} for {} turns)", effect.kind, effect.duration));
        } else {
            line.push_str(&format!(" ({} resisted)", effect.kind));
        }
    }

    line.push('.');
    if !victim.is_alive() {
        line.push_str(&format!(" {victim_name} falls."));
    }
    state.push_log(line);

    Ok(resolution)
}

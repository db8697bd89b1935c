//! Status effect system for combat participants.
//!
//! Status effects are timed modifiers attached to an actor. Durations count
//! end-of-turn ticks: each tick applies the per-tick effect first, then
//! decrements `duration`, and the effect is dropped once it reaches zero.

use arrayvec::ArrayVec;

use crate::config::GameConfig;

/// Types of status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusEffectKind {
    /// Loses `value` health every tick.
    Poison,
    /// Skips its turns while active.
    Stun,
    /// Outgoing damage boosted by `value` percent.
    Buff,
    /// Incoming damage reduced by a flat `value`.
    Shield,
    /// Regains `value` health every tick.
    Regeneration,
}

/// A single status effect with remaining duration in ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    pub duration: u32,
    pub value: u32,
    /// Name of the actor that applied the effect.
    pub source: String,
}

impl StatusEffect {
    pub fn new(kind: StatusEffectKind, duration: u32, value: u32, source: impl Into<String>) -> Self {
        Self {
            kind,
            duration,
            value,
            source: source.into(),
        }
    }
}

/// Active status effects on an actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Pushes a new effect. Zero-duration effects are ignored.
    ///
    /// On a full list the shortest-lived effect of the same kind is replaced
    /// instead. Returns false when there is no such effect to refresh.
    pub fn push(&mut self, effect: StatusEffect) -> bool {
        if effect.duration == 0 {
            return true;
        }
        let Err(full) = self.effects.try_push(effect) else {
            return true;
        };
        let effect = full.element();
        match self
            .effects
            .iter_mut()
            .filter(|e| e.kind == effect.kind)
            .min_by_key(|e| e.duration)
        {
            Some(slot) => {
                slot.duration = slot.duration.max(effect.duration);
                slot.value = slot.value.max(effect.value);
                slot.source = effect.source;
                true
            }
            None => false,
        }
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Sum of `value` across all active effects of `kind`.
    pub fn total(&self, kind: StatusEffectKind) -> u32 {
        self.effects
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.value)
            .sum()
    }

    /// Removes every effect of the given kind.
    pub fn remove(&mut self, kind: StatusEffectKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Decrements every duration by one and drops the expired effects.
    ///
    /// Returns the kinds that expired on this tick.
    pub fn decrement(&mut self) -> Vec<StatusEffectKind> {
        let mut expired = Vec::new();
        for effect in self.effects.iter_mut() {
            effect.duration = effect.duration.saturating_sub(1);
            if effect.duration == 0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.duration > 0);
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrement_removes_effect_at_zero() {
        let mut effects = StatusEffects::empty();
        effects.push(StatusEffect::new(StatusEffectKind::Poison, 2, 5, "Raider"));

        assert!(effects.decrement().is_empty());
        assert!(effects.has(StatusEffectKind::Poison));

        assert_eq!(effects.decrement(), vec![StatusEffectKind::Poison]);
        assert!(effects.is_empty());
    }

    #[test]
    fn totals_stack_across_sources() {
        let mut effects = StatusEffects::empty();
        effects.push(StatusEffect::new(StatusEffectKind::Buff, 3, 15, "Medic"));
        effects.push(StatusEffect::new(StatusEffectKind::Buff, 1, 10, "Psycho"));
        effects.push(StatusEffect::new(StatusEffectKind::Shield, 1, 4, "Stance"));

        assert_eq!(effects.total(StatusEffectKind::Buff), 25);
        assert_eq!(effects.total(StatusEffectKind::Shield), 4);
        assert_eq!(effects.total(StatusEffectKind::Poison), 0);
    }

    #[test]
    fn full_list_refreshes_same_kind_and_rejects_others() {
        let mut effects = StatusEffects::empty();
        for turns in 1..=GameConfig::MAX_STATUS_EFFECTS as u32 {
            assert!(effects.push(StatusEffect::new(StatusEffectKind::Poison, turns, 2, "x")));
        }
        assert!(!effects.push(StatusEffect::new(StatusEffectKind::Stun, 3, 1, "Raider")));
        assert!(!effects.has(StatusEffectKind::Stun));

        assert!(effects.push(StatusEffect::new(StatusEffectKind::Poison, 4, 6, "Raider")));
        assert_eq!(effects.len(), GameConfig::MAX_STATUS_EFFECTS);
        let refreshed = effects.iter().find(|e| e.source == "Raider").unwrap();
        assert_eq!((refreshed.duration, refreshed.value), (4, 6));
        // The one-turn poison was the slot replaced.
        assert!(effects.iter().all(|e| e.duration > 1));
    }
}

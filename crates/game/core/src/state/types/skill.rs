use super::status::StatusEffectKind;

/// Status effect a skill applies on hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillEffect {
    pub kind: StatusEffectKind,
    pub duration: u32,
    pub value: u32,
}

impl SkillEffect {
    pub const fn new(kind: StatusEffectKind, duration: u32, value: u32) -> Self {
        Self {
            kind,
            duration,
            value,
        }
    }
}

/// Combat skill owned by an actor.
///
/// `current_cooldown` counts remaining end-of-turn ticks before the skill can
/// be used again; zero means ready.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub energy_cost: u32,
    pub damage: Option<u32>,
    pub healing: Option<u32>,
    pub effect: Option<SkillEffect>,
    pub range: u32,
    pub cooldown: u32,
    pub current_cooldown: u32,
    pub unlock_level: u32,
}

impl Skill {
    pub fn new(id: impl Into<String>, name: impl Into<String>, energy_cost: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            energy_cost,
            damage: None,
            healing: None,
            effect: None,
            range: 1,
            cooldown: 0,
            current_cooldown: 0,
            unlock_level: 1,
        }
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_healing(mut self, healing: u32) -> Self {
        self.healing = Some(healing);
        self
    }

    pub fn with_effect(mut self, effect: SkillEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_unlock_level(mut self, level: u32) -> Self {
        self.unlock_level = level;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.current_cooldown == 0
    }

    pub fn is_affordable(&self, energy: u32) -> bool {
        energy >= self.energy_cost
    }

    /// Offensive skills target opponents; everything else targets the caster's side.
    pub fn is_offensive(&self) -> bool {
        self.damage.is_some()
            || matches!(
                self.effect.map(|e| e.kind),
                Some(StatusEffectKind::Poison | StatusEffectKind::Stun)
            )
    }
}

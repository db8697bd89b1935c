//! Actor state shared by the player and enemies.
//!
//! Player and enemies are the same structure so the combat resolver can treat
//! every participant uniformly. Enemy templates usually omit core stats; stat
//! lookups then fall back to [`CoreStats::NEUTRAL`].

use super::item::Inventory;
use super::skill::Skill;
use super::status::StatusEffects;
use super::{Direction, Position};

/// Primary attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreStats {
    pub strength: u32,
    pub agility: u32,
    pub intelligence: u32,
    pub endurance: u32,
    pub luck: u32,
    pub perception: u32,
    pub charisma: u32,
}

impl CoreStats {
    /// Stat value used when an actor carries no stat block.
    pub const NEUTRAL: u32 = 10;

    pub const fn new(
        strength: u32,
        agility: u32,
        intelligence: u32,
        endurance: u32,
        luck: u32,
        perception: u32,
        charisma: u32,
    ) -> Self {
        Self {
            strength,
            agility,
            intelligence,
            endurance,
            luck,
            perception,
            charisma,
        }
    }
}

/// Flat bonuses granted by equipped gear (or a template's natural armour).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentBonus {
    pub damage: u32,
    pub defense: u32,
}

impl EquipmentBonus {
    pub const fn new(damage: u32, defense: u32) -> Self {
        Self { damage, defense }
    }
}

/// Which side of an encounter an actor fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActorKind {
    Player,
    Enemy {
        /// Template family (`raider`, `mutant`, ...) used by kill objectives.
        enemy_type: String,
        /// Experience awarded when defeated.
        experience: u32,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub kind: ActorKind,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub radiation: u32,
    pub stats: Option<CoreStats>,
    pub equipment: EquipmentBonus,
    pub skills: Vec<Skill>,
    pub status_effects: StatusEffects,
    pub position: Position,
    pub direction: Direction,
    pub is_moving: bool,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            level: 1,
            health: 1,
            max_health: 1,
            energy: 0,
            max_energy: 0,
            radiation: 0,
            stats: None,
            equipment: EquipmentBonus::default(),
            skills: Vec::new(),
            status_effects: StatusEffects::empty(),
            position: Position::ORIGIN,
            direction: Direction::Down,
            is_moving: false,
        }
    }

    pub fn with_health(mut self, health: u32, max_health: u32) -> Self {
        self.max_health = max_health;
        self.health = health.min(max_health);
        self
    }

    pub fn with_energy(mut self, energy: u32, max_energy: u32) -> Self {
        self.max_energy = max_energy;
        self.energy = energy.min(max_energy);
        self
    }

    pub fn with_stats(mut self, stats: CoreStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_equipment(mut self, equipment: EquipmentBonus) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn with_skills(mut self, skills: Vec<Skill>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn side(&self) -> Side {
        match self.kind {
            ActorKind::Player => Side::Player,
            ActorKind::Enemy { .. } => Side::Enemy,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn agility(&self) -> u32 {
        self.stats.map_or(CoreStats::NEUTRAL, |s| s.agility)
    }

    pub fn strength(&self) -> u32 {
        self.stats.map_or(CoreStats::NEUTRAL, |s| s.strength)
    }

    pub fn enemy_type(&self) -> Option<&str> {
        match &self.kind {
            ActorKind::Enemy { enemy_type, .. } => Some(enemy_type),
            ActorKind::Player => None,
        }
    }

    pub fn experience_reward(&self) -> u32 {
        match self.kind {
            ActorKind::Enemy { experience, .. } => experience,
            ActorKind::Player => 0,
        }
    }

    pub fn skill(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn skill_index(&self, id: &str) -> Option<usize> {
        self.skills.iter().position(|s| s.id == id)
    }

    /// Loses health, never dropping below zero. Returns the amount removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.health);
        self.health -= applied;
        applied
    }

    /// Regains health up to the maximum. Returns the amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    pub fn restore_energy(&mut self, amount: u32) -> u32 {
        let before = self.energy;
        self.energy = self.energy.saturating_add(amount).min(self.max_energy);
        self.energy - before
    }
}

/// Player character plus progression and inventory.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub actor: Actor,
    pub experience: u32,
    pub experience_to_next: u32,
    pub inventory: Inventory,
}

impl PlayerState {
    /// Health gained per level.
    pub const HEALTH_PER_LEVEL: u32 = 10;
    /// Energy gained per level.
    pub const ENERGY_PER_LEVEL: u32 = 5;

    pub fn new(actor: Actor) -> Self {
        let experience_to_next = Self::threshold_for(actor.level);
        Self {
            actor,
            experience: 0,
            experience_to_next,
            inventory: Inventory::default(),
        }
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    /// Experience needed to leave `level`.
    pub const fn threshold_for(level: u32) -> u32 {
        level.saturating_mul(100)
    }

    /// Adds experience and applies as many level-ups as it covers.
    ///
    /// Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: u32) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        while self.experience_to_next > 0 && self.experience >= self.experience_to_next {
            self.experience -= self.experience_to_next;
            self.actor.level += 1;
            self.experience_to_next = Self::threshold_for(self.actor.level);
            self.actor.max_health += Self::HEALTH_PER_LEVEL;
            self.actor.max_energy += Self::ENERGY_PER_LEVEL;
            self.actor.heal(Self::HEALTH_PER_LEVEL);
            self.actor.restore_energy(Self::ENERGY_PER_LEVEL);
            gained += 1;
        }
        gained
    }
}

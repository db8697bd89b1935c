//! Static content tables: skills, items, enemy templates, character
//! creation, the starting quest log and the achievement book.
//!
//! Every lookup returns an owned copy; the game state never borrows from the
//! tables.

use game_core::{
    Achievement, AchievementKind, Achievements, Actor, ActorKind, ConsumableEffect, CoreStats,
    EquipmentBonus, Item, ItemKind, ObjectiveKind, PlayerState, Quest, QuestLog, QuestObjective,
    QuestStatus, Skill, SkillEffect, StatusEffectKind,
};

// ============================================================================
// Skills
// ============================================================================

/// Skill by id, with its cooldown ready.
pub fn skill(id: &str) -> Option<Skill> {
    use StatusEffectKind::*;

    let skill = match id {
        // Warrior
        "slash" => Skill::new(id, "Slash", 2).with_damage(15).with_cooldown(1),
        "power_strike" => Skill::new(id, "Power Strike", 5)
            .with_damage(35)
            .with_cooldown(3)
            .with_unlock_level(3),
        "defensive_stance" => Skill::new(id, "Defensive Stance", 3)
            .with_effect(SkillEffect::new(Shield, 5, 10))
            .with_range(0)
            .with_cooldown(5)
            .with_unlock_level(2),

        // Ranger
        "aimed_shot" => Skill::new(id, "Aimed Shot", 4)
            .with_damage(25)
            .with_range(5)
            .with_cooldown(2),
        "quick_shot" => Skill::new(id, "Quick Shot", 2)
            .with_damage(12)
            .with_range(4)
            .with_cooldown(1),
        "explosive_shot" => Skill::new(id, "Explosive Shot", 6)
            .with_damage(30)
            .with_range(5)
            .with_cooldown(4)
            .with_unlock_level(3),

        // Medic
        "heal" => Skill::new(id, "Heal", 4)
            .with_healing(30)
            .with_range(2)
            .with_cooldown(1),
        "poison_dart" => Skill::new(id, "Poison Dart", 3)
            .with_damage(10)
            .with_effect(SkillEffect::new(Poison, 3, 5))
            .with_range(3)
            .with_cooldown(2)
            .with_unlock_level(2),
        "adrenaline_shot" => Skill::new(id, "Adrenaline Shot", 5)
            .with_effect(SkillEffect::new(Buff, 4, 15))
            .with_range(2)
            .with_cooldown(5)
            .with_unlock_level(3),

        // Engineer
        "emp_blast" => Skill::new(id, "EMP Blast", 4)
            .with_damage(25)
            .with_range(3)
            .with_cooldown(3),
        "turret_deploy" => Skill::new(id, "Deploy Turret", 8)
            .with_damage(15)
            .with_cooldown(8)
            .with_unlock_level(3),
        "shock_trap" => Skill::new(id, "Shock Trap", 5)
            .with_damage(20)
            .with_effect(SkillEffect::new(Stun, 2, 1))
            .with_range(2)
            .with_cooldown(4)
            .with_unlock_level(2),

        // Universal
        "stimpack" => Skill::new(id, "Stimpack", 2).with_healing(20).with_cooldown(1),
        "mend" => Skill::new(id, "Mend", 3)
            .with_effect(SkillEffect::new(Regeneration, 3, 6))
            .with_range(2)
            .with_cooldown(2)
            .with_unlock_level(2),

        _ => return None,
    };
    Some(skill)
}

fn skills(ids: &[&str]) -> Vec<Skill> {
    ids.iter().filter_map(|id| skill(id)).collect()
}

// ============================================================================
// Items
// ============================================================================

/// Every item id the loot rolls may produce.
pub const LOOT_ITEMS: &[&str] = &[
    "rusty_pipe",
    "combat_knife",
    "leather_jacket",
    "stimpak",
    "rad_away",
    "psycho",
    "buffout",
    "mentats",
    "scrap_metal",
    "electronics",
    "rare_earth",
];

/// Item by id, as a single unit.
pub fn item(id: &str) -> Option<Item> {
    use ConsumableEffect::*;
    use ItemKind::*;

    let (name, kind, value) = match id {
        "rusty_pipe" => ("Rusty Pipe", Weapon { damage: 8 }, 10),
        "combat_knife" => ("Combat Knife", Weapon { damage: 12 }, 25),
        "assault_rifle" => ("Assault Rifle", Weapon { damage: 20 }, 150),
        "plasma_rifle" => ("Plasma Rifle", Weapon { damage: 35 }, 500),
        "tribal_spear" => ("Tribal Spear", Weapon { damage: 10 }, 20),
        "sawed_off_shotgun" => ("Sawed-Off Shotgun", Weapon { damage: 16 }, 60),

        "vault_suit" => ("Vault Suit", Armor { defense: 2 }, 10),
        "leather_jacket" => ("Leather Jacket", Armor { defense: 5 }, 15),
        "leather_armor" => ("Leather Armor", Armor { defense: 7 }, 30),
        "combat_armor" => ("Combat Armor", Armor { defense: 12 }, 75),
        "power_armor" => ("Power Armor", Armor { defense: 25 }, 1000),

        "stimpak" => ("Stimpak", Consumable(Heal(30)), 20),
        "rad_away" => ("Rad-Away", Consumable(RemoveRadiation(50)), 30),
        "psycho" => (
            "Psycho",
            Consumable(Status {
                kind: StatusEffectKind::Buff,
                duration: 3,
                value: 25,
            }),
            50,
        ),
        "buffout" => (
            "Buffout",
            Consumable(Status {
                kind: StatusEffectKind::Shield,
                duration: 3,
                value: 5,
            }),
            40,
        ),
        "mentats" => ("Mentats", Consumable(RestoreEnergy(20)), 35),
        "water_bottle" => ("Purified Water", Consumable(Heal(10)), 5),
        "healing_powder" => ("Healing Powder", Consumable(Heal(20)), 15),

        "scrap_metal" => ("Scrap Metal", Material, 2),
        "electronics" => ("Electronics", Material, 10),
        "rare_earth" => ("Rare Earth Elements", Material, 50),

        "pip_boy" => ("Pip-Boy 3000", ItemKind::Quest, 0),

        _ => return None,
    };
    Some(Item::new(id, name, kind).with_value(value))
}

// ============================================================================
// Enemies
// ============================================================================

/// Enemy template ids.
pub const ENEMY_TEMPLATES: &[&str] = &["raider", "mutant", "robot", "raider_boss"];

struct EnemyTemplate {
    name: &'static str,
    family: &'static str,
    level: u32,
    health: u32,
    energy: u32,
    defense: u32,
    damage: u32,
    experience: u32,
    skills: &'static [&'static str],
}

fn template(id: &str) -> Option<EnemyTemplate> {
    let template = match id {
        "raider" => EnemyTemplate {
            name: "Wasteland Raider",
            family: "raider",
            level: 1,
            health: 40,
            energy: 10,
            defense: 2,
            damage: 2,
            experience: 15,
            skills: &["slash"],
        },
        "mutant" => EnemyTemplate {
            name: "Irradiated Mutant",
            family: "mutant",
            level: 3,
            health: 80,
            energy: 15,
            defense: 5,
            damage: 4,
            experience: 35,
            skills: &["slash", "poison_dart"],
        },
        "robot" => EnemyTemplate {
            name: "Security Robot",
            family: "robot",
            level: 5,
            health: 120,
            energy: 30,
            defense: 10,
            damage: 6,
            experience: 60,
            skills: &["aimed_shot", "emp_blast"],
        },
        "raider_boss" => EnemyTemplate {
            name: "Raider Chief",
            family: "raider",
            level: 4,
            health: 100,
            energy: 20,
            defense: 8,
            damage: 5,
            experience: 80,
            skills: &["power_strike", "aimed_shot"],
        },
        _ => return None,
    };
    Some(template)
}

/// Instantiates enemy template `template_id` as actor `id`.
///
/// Enemy skills ignore unlock levels; the template decides what they know.
pub fn enemy(template_id: &str, id: impl Into<String>) -> Option<Actor> {
    let t = template(template_id)?;
    let agility = 6 + t.level;
    let mut skills = skills(t.skills);
    for skill in skills.iter_mut() {
        skill.unlock_level = 1;
    }

    Some(
        Actor::new(
            id,
            t.name,
            ActorKind::Enemy {
                enemy_type: t.family.to_owned(),
                experience: t.experience,
            },
        )
        .with_level(t.level)
        .with_health(t.health, t.health)
        .with_energy(t.energy, t.energy)
        .with_stats(CoreStats::new(8 + t.level, agility, 5, 10, 5, 8, 3))
        .with_equipment(EquipmentBonus::new(t.damage, t.defense))
        .with_skills(skills),
    )
}

// ============================================================================
// Character classes
// ============================================================================

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
pub enum CharacterClass {
    Warrior,
    Ranger,
    Medic,
    Engineer,
}

impl CharacterClass {
    pub const ALL: [Self; 4] = [Self::Warrior, Self::Ranger, Self::Medic, Self::Engineer];

    pub const fn base_stats(self) -> CoreStats {
        match self {
            Self::Warrior => CoreStats::new(15, 8, 6, 14, 7, 8, 6),
            Self::Ranger => CoreStats::new(10, 15, 10, 10, 10, 14, 8),
            Self::Medic => CoreStats::new(7, 9, 15, 11, 8, 10, 12),
            Self::Engineer => CoreStats::new(9, 11, 14, 9, 12, 11, 7),
        }
    }

    pub const fn starting_skills(self) -> &'static [&'static str] {
        match self {
            Self::Warrior => &["slash", "power_strike", "defensive_stance", "stimpack"],
            Self::Ranger => &["aimed_shot", "quick_shot", "explosive_shot", "stimpack"],
            Self::Medic => &["heal", "poison_dart", "adrenaline_shot", "stimpack"],
            Self::Engineer => &["emp_blast", "turret_deploy", "shock_trap", "stimpack"],
        }
    }
}

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
pub enum Background {
    VaultDweller,
    WastelandWanderer,
    Tribal,
    #[strum(serialize = "raider", serialize = "ex_raider")]
    ExRaider,
}

impl Background {
    pub const ALL: [Self; 4] = [
        Self::VaultDweller,
        Self::WastelandWanderer,
        Self::Tribal,
        Self::ExRaider,
    ];

    /// Stat deltas in [`CoreStats`] field order.
    const fn modifiers(self) -> [i32; 7] {
        match self {
            Self::VaultDweller => [0, 0, 2, 1, 0, 0, -1],
            Self::WastelandWanderer => [0, 0, -1, 2, 0, 1, 0],
            Self::Tribal => [2, 1, -1, 0, 0, 0, 0],
            Self::ExRaider => [1, 1, 0, 0, 1, 0, -2],
        }
    }

    pub const fn starting_items(self) -> &'static [&'static str] {
        match self {
            Self::VaultDweller => &["pip_boy", "vault_suit"],
            Self::WastelandWanderer => &["leather_jacket", "water_bottle"],
            Self::Tribal => &["tribal_spear", "healing_powder"],
            Self::ExRaider => &["sawed_off_shotgun", "leather_armor"],
        }
    }

    pub fn apply(self, stats: &mut CoreStats) {
        let fields = [
            &mut stats.strength,
            &mut stats.agility,
            &mut stats.intelligence,
            &mut stats.endurance,
            &mut stats.luck,
            &mut stats.perception,
            &mut stats.charisma,
        ];
        for (stat, delta) in fields.into_iter().zip(self.modifiers()) {
            *stat = stat.saturating_add_signed(delta).max(1);
        }
    }
}

/// Character traits with a mechanical effect in this ruleset.
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
pub enum CharacterTrait {
    /// +4 flat damage on every attack.
    HeavyHanded,
    /// +1 agility.
    SmallFrame,
}

impl CharacterTrait {
    pub fn apply(self, actor: &mut Actor, stats: &mut CoreStats) {
        match self {
            Self::HeavyHanded => actor.equipment.damage += 4,
            Self::SmallFrame => stats.agility += 1,
        }
    }
}

/// Everything chosen at character creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterSheet {
    pub class: CharacterClass,
    pub name: String,
    pub background: Option<Background>,
    pub traits: Vec<CharacterTrait>,
}

impl CharacterSheet {
    pub fn new(class: CharacterClass, name: impl Into<String>) -> Self {
        Self {
            class,
            name: name.into(),
            background: None,
            traits: Vec::new(),
        }
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    /// Adds `t` once; repeats are ignored.
    pub fn with_trait(mut self, t: CharacterTrait) -> Self {
        if !self.traits.contains(&t) {
            self.traits.push(t);
        }
        self
    }
}

/// Fresh level-1 character of `class` with no background or traits.
pub fn new_player(class: CharacterClass, name: impl Into<String>) -> PlayerState {
    create_player(&CharacterSheet::new(class, name))
}

/// Fresh level-1 character from `sheet`.
///
/// Class stats get the background and trait deltas first; max health is then
/// `50 + 5 * endurance` and max energy `20 + 2 * intelligence`. The player
/// starts with a few stimpaks plus the background's items.
pub fn create_player(sheet: &CharacterSheet) -> PlayerState {
    let mut stats = sheet.class.base_stats();
    let mut actor = Actor::new("player", sheet.name.clone(), ActorKind::Player)
        .with_skills(skills(sheet.class.starting_skills()));

    if let Some(background) = sheet.background {
        background.apply(&mut stats);
    }
    for t in &sheet.traits {
        t.apply(&mut actor, &mut stats);
    }

    let health = 50 + 5 * stats.endurance;
    let energy = 20 + 2 * stats.intelligence;
    let actor = actor
        .with_health(health, health)
        .with_energy(energy, energy)
        .with_stats(stats);

    let mut player = PlayerState::new(actor);
    if let Some(stimpak) = item("stimpak") {
        player.inventory.add(stimpak.with_quantity(3));
    }
    let granted = sheet.background.map_or(&[][..], Background::starting_items);
    for starting in granted.iter().filter_map(|id| item(id)) {
        player.inventory.add(starting);
    }
    player
}

// ============================================================================
// Quests
// ============================================================================

/// Quest log of a new game. `first_steps` is active from the start; the
/// others are offered by NPCs.
pub fn starting_quests() -> QuestLog {
    QuestLog::new(vec![
        Quest::new("first_steps", "First Steps in the Wasteland")
            .with_objective(QuestObjective::new(
                "explore_tiles",
                ObjectiveKind::Explore,
                "tiles",
                10,
            ))
            .with_objective(QuestObjective::new(
                "talk_to_npc",
                ObjectiveKind::Talk,
                "npc",
                1,
            ))
            .with_objective(QuestObjective::new(
                "collect_items",
                ObjectiveKind::Collect,
                "items",
                3,
            ))
            .with_reward(100),
        Quest::new("raider_threat", "Clear the Raider Camp")
            .with_objective(QuestObjective::new(
                "kill_raiders",
                ObjectiveKind::Kill,
                "raider",
                5,
            ))
            .with_reward(200)
            .with_status(QuestStatus::Available),
        Quest::new("survival_guide", "Wasteland Survival Guide")
            .with_objective(QuestObjective::new(
                "gather_scrap",
                ObjectiveKind::Collect,
                "scrap_metal",
                5,
            ))
            .with_reward(150)
            .with_status(QuestStatus::Available),
    ])
}

// ============================================================================
// Achievements
// ============================================================================

/// Achievement book of a new game.
pub fn achievements() -> Achievements {
    use AchievementKind::*;

    Achievements::new(vec![
        Achievement::new("first_kill", "First Blood", Kill, 1),
        Achievement::new("level_up", "Growing Stronger", Level, 5),
        Achievement::new("explorer", "Wasteland Explorer", Explore, 100),
        Achievement::new("collector", "Scavenger", Collect, 50),
        Achievement::new("survivor", "Survivor", Survive, 3_600),
        Achievement::new("quest_master", "Quest Master", QuestsCompleted, 10),
        Achievement::new("raider_slayer", "Raider Slayer", Kill, 25).for_target("raider"),
    ])
}

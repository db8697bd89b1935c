//! The wasteland: six outdoor regions joined by edge connections, plus the
//! interiors reachable from Capital Wasteland.
//!
//! ```text
//!                    the_pitt
//!                       │
//!  citadel ── capital_wasteland ── point_lookout
//!                       │
//!                 metro_tunnels ── mothership_zeta
//! ```

use game_core::{
    CatalogError, DialogueChoice, DialogueNode, Direction, GameState, MapCatalog, MapId, Npc,
    Position, TerrainKind, TilePos,
};
use tracing::info;

use crate::builder::{MapBuilder, Structure};
use crate::catalog::MapRegistry;
use crate::tables::{self, CharacterClass, CharacterSheet};

pub const START_MAP: &str = "capital_wasteland";

/// Per-map seed derived from the world seed and the map id (FNV-1a).
pub fn map_seed(world_seed: u64, id: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    id.bytes()
        .fold(OFFSET ^ world_seed, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// Every map of the world, seeded from `world_seed`.
pub fn registry(world_seed: u64) -> MapRegistry {
    [
        capital_wasteland(),
        the_pitt(),
        point_lookout(),
        mothership_zeta(),
        citadel(),
        metro_tunnels(),
        vault_101(),
        craterside_supply(),
        megaton_clinic(),
        rivet_city_market(),
    ]
    .into_iter()
    .fold(MapRegistry::new(), |registry, blueprint| {
        let seed = map_seed(world_seed, blueprint.id().as_str());
        registry.with(blueprint.seed(seed))
    })
}

/// A new session: a fresh character on the spawn tile of [`START_MAP`].
pub fn new_game(
    catalog: &dyn MapCatalog,
    class: CharacterClass,
    name: impl Into<String>,
    world_seed: u64,
    tile_size: f32,
) -> Result<GameState, CatalogError> {
    start_game(catalog, &CharacterSheet::new(class, name), world_seed, tile_size)
}

/// [`new_game`] for a full character sheet.
pub fn start_game(
    catalog: &dyn MapCatalog,
    sheet: &CharacterSheet,
    world_seed: u64,
    tile_size: f32,
) -> Result<GameState, CatalogError> {
    let map = catalog.build(&MapId::from(START_MAP))?;
    let mut player = tables::create_player(sheet);
    player.actor.position = map.spawn.center(tile_size);

    info!(
        class = %sheet.class,
        background = ?sheet.background,
        map = START_MAP,
        seed = world_seed,
        "new game"
    );
    Ok(GameState::new(map, player)
        .with_seed(world_seed)
        .with_quests(tables::starting_quests())
        .with_achievements(tables::achievements()))
}

// ============================================================================
// Outdoor regions
// ============================================================================

fn capital_wasteland() -> MapBuilder {
    MapBuilder::new(START_MAP, "Capital Wasteland", 120, 120)
        .terrain(TerrainKind::Dirt, 0.30)
        .terrain(TerrainKind::Stone, 0.10)
        .terrain(TerrainKind::Ruins, 0.05)
        .terrain(TerrainKind::Water, 0.03)
        .structure(
            Structure::new("vault_101", "Vault 101", TilePos::new(15, 15), 8, 6)
                .with_interior("vault_101"),
        )
        .structure(Structure::new("megaton", "Megaton", TilePos::new(40, 20), 6, 4))
        .structure(
            Structure::new("megaton_clinic", "Doc Church's Clinic", TilePos::new(70, 30), 4, 3)
                .with_interior("megaton_clinic"),
        )
        .structure(
            Structure::new("craterside_supply", "Craterside Supply", TilePos::new(25, 50), 5, 4)
                .with_interior("craterside_supply"),
        )
        .structure(
            Structure::new("rivet_city", "Rivet City", TilePos::new(80, 80), 10, 8)
                .with_interior("rivet_city_market"),
        )
        .structure(Structure::new(
            "brotherhood_outpost",
            "Brotherhood Outpost",
            TilePos::new(10, 90),
            6,
            5,
        ))
        .structure(Structure::new(
            "enclave_facility",
            "Enclave Facility",
            TilePos::new(100, 20),
            7,
            5,
        ))
        .structure(Structure::new("scrapyard", "Scrapyard", TilePos::new(50, 70), 4, 4))
        .connection(Direction::Up, "the_pitt", TilePos::new(60, 0), TilePos::new(50, 79))
        .connection(Direction::Right, "point_lookout", TilePos::new(119, 60), TilePos::new(0, 45))
        .connection(Direction::Down, "metro_tunnels", TilePos::new(60, 119), TilePos::new(75, 0))
        .connection(Direction::Left, "citadel", TilePos::new(0, 60), TilePos::new(79, 40))
        .npc(TilePos::new(30, 40), captain_sarah())
        .npc(TilePos::new(44, 44), old_wanderer())
        .enemy("raider", TilePos::new(35, 60))
        .enemy("raider", TilePos::new(38, 62))
        .enemy("raider", TilePos::new(65, 90))
        .enemy("raider_boss", TilePos::new(58, 8))
        .enemy("mutant", TilePos::new(75, 55))
        .loot_density(0.02)
        .spawn(TilePos::new(19, 23))
}

fn the_pitt() -> MapBuilder {
    MapBuilder::new("the_pitt", "The Pitt", 100, 80)
        .base(TerrainKind::Dirt)
        .terrain(TerrainKind::Ruins, 0.20)
        .terrain(TerrainKind::Stone, 0.10)
        .terrain(TerrainKind::Lava, 0.05)
        .structure(Structure::new("the_mill", "The Mill", TilePos::new(20, 20), 12, 8))
        .structure(Structure::new("barracks", "Worker Barracks", TilePos::new(50, 30), 8, 6))
        .structure(Structure::new("haven", "Haven", TilePos::new(70, 15), 6, 4))
        .structure(Structure::new("foundry", "Steel Foundry", TilePos::new(30, 60), 10, 6))
        .connection(Direction::Down, START_MAP, TilePos::new(50, 79), TilePos::new(60, 0))
        .enemy("raider", TilePos::new(40, 45))
        .enemy("raider_boss", TilePos::new(75, 22))
        .enemy("mutant", TilePos::new(60, 60))
        .loot_density(0.03)
}

fn point_lookout() -> MapBuilder {
    MapBuilder::new("point_lookout", "Point Lookout", 90, 90)
        .terrain(TerrainKind::Water, 0.28)
        .terrain(TerrainKind::Sand, 0.12)
        .terrain(TerrainKind::Dirt, 0.10)
        .terrain(TerrainKind::Ruins, 0.10)
        .structure(Structure::new("calvert_mansion", "Calvert Mansion", TilePos::new(15, 15), 6, 4))
        .structure(Structure::new("tribal_huts", "Tribal Huts", TilePos::new(40, 30), 5, 3))
        .structure(Structure::new("lighthouse", "Point Lookout Lighthouse", TilePos::new(60, 50), 4, 3))
        .connection(Direction::Left, START_MAP, TilePos::new(0, 45), TilePos::new(119, 60))
        .enemy("mutant", TilePos::new(30, 45))
        .enemy("mutant", TilePos::new(70, 70))
        .loot_density(0.025)
}

fn mothership_zeta() -> MapBuilder {
    MapBuilder::new("mothership_zeta", "Mothership Zeta", 60, 40)
        .base(TerrainKind::Floor)
        .structure(Structure::new("cryo_lab", "Cryogenic Laboratory", TilePos::new(10, 10), 8, 6))
        .structure(Structure::new("bridge", "Ship Bridge", TilePos::new(30, 15), 6, 4))
        .structure(Structure::new("engine_core", "Engine Core", TilePos::new(45, 20), 5, 3))
        .connection(Direction::Left, "metro_tunnels", TilePos::new(0, 20), TilePos::new(149, 25))
        .enemy("robot", TilePos::new(25, 30))
        .enemy("robot", TilePos::new(50, 10))
        .loot_table(&["electronics", "rare_earth", "stimpak", "mentats"])
        .loot_density(0.04)
}

fn citadel() -> MapBuilder {
    MapBuilder::new("citadel", "The Citadel", 80, 80)
        .base(TerrainKind::Stone)
        .terrain(TerrainKind::Ruins, 0.10)
        .structure(Structure::new("the_citadel", "The Citadel", TilePos::new(30, 30), 20, 15))
        .structure(Structure::new("armory", "Brotherhood Armory", TilePos::new(10, 10), 8, 6))
        .structure(Structure::new("research_lab", "Research Lab", TilePos::new(60, 20), 6, 4))
        .connection(Direction::Right, START_MAP, TilePos::new(79, 40), TilePos::new(0, 60))
        .npc(TilePos::new(25, 50), paladin_gunny())
        .loot_density(0.015)
}

fn metro_tunnels() -> MapBuilder {
    MapBuilder::new("metro_tunnels", "Metro Tunnels", 150, 50)
        .base(TerrainKind::Ruins)
        .terrain(TerrainKind::Water, 0.15)
        .terrain(TerrainKind::Stone, 0.10)
        .structure(Structure::new("dupont_circle", "Dupont Circle Station", TilePos::new(20, 20), 8, 6))
        .structure(Structure::new("gallery_place", "Gallery Place Station", TilePos::new(60, 15), 8, 6))
        .structure(Structure::new("union_station", "Union Station", TilePos::new(100, 25), 8, 6))
        .connection(Direction::Up, START_MAP, TilePos::new(75, 0), TilePos::new(60, 119))
        .connection(Direction::Right, "mothership_zeta", TilePos::new(149, 25), TilePos::new(0, 20))
        .enemy("mutant", TilePos::new(45, 10))
        .enemy("raider", TilePos::new(90, 40))
        .enemy("robot", TilePos::new(130, 30))
        .loot_density(0.035)
}

// ============================================================================
// Interiors
// ============================================================================

fn vault_101() -> MapBuilder {
    MapBuilder::interior("vault_101", "Vault 101", 16, 12)
        .structure(Structure::new("overseer_desk", "Overseer's Desk", TilePos::new(6, 3), 4, 1))
        .loot_table(&["stimpak", "rad_away", "electronics"])
        .loot_density(0.02)
}

fn craterside_supply() -> MapBuilder {
    MapBuilder::interior("craterside_supply", "Craterside Supply", 15, 12)
        .structure(Structure::new("counter", "Counter", TilePos::new(3, 3), 3, 1))
        .npc(TilePos::new(4, 5), moira_brown())
}

fn megaton_clinic() -> MapBuilder {
    MapBuilder::interior("megaton_clinic", "Doc Church's Clinic", 12, 10)
        .npc(TilePos::new(6, 4), doc_church())
}

fn rivet_city_market() -> MapBuilder {
    MapBuilder::interior("rivet_city_market", "Rivet City Market", 20, 14)
        .structure(Structure::new("stalls", "Market Stalls", TilePos::new(4, 4), 12, 2))
        .loot_table(&["scrap_metal", "electronics", "stimpak"])
        .loot_density(0.02)
}

// ============================================================================
// NPCs
// ============================================================================

fn npc(id: &str, name: &str, nodes: Vec<DialogueNode>) -> Npc {
    Npc::new(id, name, Position::ORIGIN).with_dialogue(nodes)
}

fn captain_sarah() -> Npc {
    npc(
        "captain_sarah",
        "Captain Sarah",
        vec![
            DialogueNode::new(
                "greeting",
                "Survivor! Our settlement is under constant threat from raiders. We need someone skilled to help us.",
            )
            .with_choice(
                DialogueChoice::new("accept", "I'll help you deal with the raiders")
                    .with_action("start_quest:raider_threat")
                    .leads_to("quest_given"),
            )
            .with_choice(DialogueChoice::new("info", "Tell me more about these raiders").leads_to("raider_info"))
            .with_choice(DialogueChoice::new("decline", "I'm not ready for that")),
            DialogueNode::new(
                "raider_info",
                "They've set up camp to the north. Heavily armed and dangerous.",
            )
            .with_choice(
                DialogueChoice::new("accept", "I'll take care of them")
                    .with_action("start_quest:raider_threat")
                    .leads_to("quest_given"),
            )
            .with_choice(DialogueChoice::new("decline", "Sounds too dangerous")),
            DialogueNode::new(
                "quest_given",
                "Thank you! Clear out that raider camp and we'll reward you well.",
            )
            .with_choice(DialogueChoice::new("leave", "Consider it done.")),
        ],
    )
}

fn old_wanderer() -> Npc {
    npc(
        "old_wanderer",
        "Old Wanderer",
        vec![
            DialogueNode::new("greeting", "Another soul walking the wastes. Sit a while.")
                .with_choice(DialogueChoice::new("advice", "Any advice?").leads_to("advice"))
                .with_choice(DialogueChoice::new("leave", "Take care, old timer")),
            DialogueNode::new(
                "advice",
                "Stay off the open road after dark, and never pass up a stimpak.",
            )
            .with_choice(DialogueChoice::new("leave", "Wise words, thanks")),
        ],
    )
}

fn paladin_gunny() -> Npc {
    npc(
        "paladin_gunny",
        "Paladin Gunny",
        vec![
            DialogueNode::new("greeting", "State your business, civilian.")
                .with_choice(DialogueChoice::new("leave", "Just passing through.")),
        ],
    )
}

fn moira_brown() -> Npc {
    npc(
        "moira_brown",
        "Moira Brown",
        vec![
            DialogueNode::new(
                "greeting",
                "Welcome to Craterside Supply! What can I do for you?",
            )
            .with_choice(
                DialogueChoice::new("quest", "I heard you're writing a book?")
                    .leads_to("survival_guide"),
            )
            .with_choice(DialogueChoice::new("leave", "Just browsing")),
            DialogueNode::new(
                "survival_guide",
                "The Wasteland Survival Guide! Bring me some scrap metal and I'll test a few theories.",
            )
            .with_choice(
                DialogueChoice::new("accept_guide", "I'd be happy to help")
                    .with_action("start_quest:survival_guide"),
            )
            .with_choice(DialogueChoice::new("leave", "Sounds dangerous")),
        ],
    )
}

fn doc_church() -> Npc {
    npc(
        "doc_church",
        "Doc Church",
        vec![
            DialogueNode::new("greeting", "Bleeding? Irradiated? Both? Sit down.")
                .with_choice(
                    DialogueChoice::new("heal", "I need healing").with_action("heal_player"),
                )
                .with_choice(DialogueChoice::new("leave", "Maybe later")),
        ],
    )
}

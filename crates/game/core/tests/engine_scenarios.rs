//! End-to-end scenarios driven through the `GameEngine` facade with
//! hand-built maps and a virtual clock.

use std::sync::Arc;

use game_core::{
    Achievement, AchievementKind, Achievements, Actor, ActorKind, CombatAction, CombatError, CombatOutcome, CoreStats, DevTool, DevToolKind,
    Direction, EngineError, FixedCatalog, GameConfig, GameEngine, GameEvent, GameMap, GameMode,
    GameState, Hotkey, InputKey, Item, ItemKind, Lootable, MapConnection, MapId, MoveError, Npc,
    ObjectiveKind, PlayerState, Quest, QuestLog, QuestObjective, QuestStatus, Skill, TerrainKind,
    Tile, TilePos, TurnResult,
};

const TILE: f32 = 32.0;

fn field(id: &str, size: u32) -> GameMap {
    GameMap::from_fn(id, id, size, size, |x, y| Tile::new(x, y, TerrainKind::Sand))
}

fn wanderer(tile: TilePos) -> PlayerState {
    PlayerState::new(
        Actor::new("player", "Wanderer", ActorKind::Player)
            .with_health(100, 100)
            .with_energy(50, 50)
            .with_stats(CoreStats::new(10, 12, 10, 10, 10, 10, 10))
            .with_skills(vec![
                Skill::new("slash", "Slash", 5).with_damage(15).with_cooldown(1),
            ])
            .at(tile.center(TILE)),
    )
}

fn raider(id: &str, tile: TilePos, health: u32, agility: u32) -> Actor {
    Actor::new(
        id,
        "Raider",
        ActorKind::Enemy {
            enemy_type: "raider".into(),
            experience: 25,
        },
    )
    .with_health(health, 60)
    .with_energy(30, 30)
    .with_stats(CoreStats::new(10, agility, 10, 10, 10, 10, 10))
    .with_skills(vec![Skill::new("shoot", "Shoot", 5).with_damage(8)])
    .at(tile.center(TILE))
}

fn engine_on(map: GameMap, player: PlayerState, catalog: FixedCatalog) -> GameEngine {
    let state = GameState::new(map, player).with_seed(7);
    GameEngine::new(state, GameConfig::default(), Arc::new(catalog))
}

fn hold(engine: &mut GameEngine, direction: Direction) {
    engine
        .key_down(InputKey::Move(direction))
        .expect("movement key accepted");
}

fn rejected_codes(events: &[GameEvent]) -> Vec<&'static str> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Rejected { code, .. } => Some(*code),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Movement and transitions
// ============================================================================

#[test]
fn wall_blocks_movement_but_other_axis_slides() {
    let mut map = field("wasteland", 30);
    map.tile_mut(TilePos::new(6, 5)).unwrap().walkable = false;
    let mut engine = engine_on(map, wanderer(TilePos::new(5, 5)), FixedCatalog::new());

    hold(&mut engine, Direction::Right);
    engine.tick(200);
    let player = &engine.state().player.actor;
    assert_eq!(player.position, TilePos::new(5, 5).center(TILE));
    assert_eq!(player.direction, Direction::Right);
    assert!(player.is_moving);

    hold(&mut engine, Direction::Down);
    engine.tick(200);
    let player = &engine.state().player.actor;
    assert_eq!(player.position.x, TilePos::new(5, 5).center(TILE).x);
    assert_eq!(player.position.y, TilePos::new(5, 6).center(TILE).y);
    assert_eq!(engine.state().statistics.distance_traveled, 32.0);
}

#[test]
fn edge_dwell_switches_maps_after_two_seconds() {
    let mut north = field("wasteland", 20);
    north.connections.push(MapConnection::new(
        Direction::Up,
        "pitt",
        TilePos::new(10, 0),
        TilePos::new(10, 19),
    ));
    let pitt = field("pitt", 20);
    let catalog = FixedCatalog::new().with_map(north.clone()).with_map(pitt);
    let mut engine = engine_on(north, wanderer(TilePos::new(10, 0)), catalog);

    hold(&mut engine, Direction::Up);
    for _ in 0..20 {
        engine.tick(100);
    }
    assert_eq!(engine.state().current_map_id(), &MapId::from("wasteland"));
    let events = engine.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::EdgeDwell { direction: Direction::Up, progress } if *progress > 0.9
    )));

    engine.tick(100);
    let state = engine.state();
    assert_eq!(state.current_map_id(), &MapId::from("pitt"));
    // to_position pushed two tiles inward from the bottom edge.
    assert_eq!(
        state.player.actor.position.to_tile(TILE),
        TilePos::new(10, 17)
    );
    assert_eq!(state.statistics.maps_visited, 1);
    assert!(engine.cache().contains(&MapId::from("wasteland")));
    assert!(engine.drain_events().iter().any(|e| matches!(
        e,
        GameEvent::MapChanged { from, .. } if from.as_str() == "wasteland"
    )));
}

#[test]
fn leaving_the_edge_resets_the_dwell() {
    let mut north = field("wasteland", 20);
    north.connections.push(MapConnection::new(
        Direction::Up,
        "pitt",
        TilePos::new(10, 0),
        TilePos::new(10, 19),
    ));
    let catalog = FixedCatalog::new().with_map(field("pitt", 20));
    let mut engine = engine_on(north, wanderer(TilePos::new(10, 0)), catalog);

    hold(&mut engine, Direction::Up);
    for _ in 0..15 {
        engine.tick(100);
    }
    engine.key_up(InputKey::Move(Direction::Up));
    engine.tick(100);
    assert!(engine
        .drain_events()
        .contains(&GameEvent::EdgeDwellCancelled));

    hold(&mut engine, Direction::Up);
    for _ in 0..15 {
        engine.tick(100);
    }
    assert_eq!(engine.state().current_map_id(), &MapId::from("wasteland"));
}

#[test]
fn missing_connection_aborts_without_changes() {
    let mut engine = engine_on(
        field("dead_end", 20),
        wanderer(TilePos::new(10, 0)),
        FixedCatalog::new(),
    );

    hold(&mut engine, Direction::Up);
    engine.tick(100);
    let before = engine.snapshot();
    for _ in 0..20 {
        engine.tick(100);
    }

    let state = engine.state();
    assert_eq!(state.current_map, before.current_map);
    assert_eq!(state.player.actor.position, before.player.actor.position);
    assert_eq!(state.statistics.maps_visited, 0);
    assert!(engine.cache().is_empty());
    assert!(
        rejected_codes(&engine.drain_events()).contains(&"TRANSITION_NO_CONNECTION")
    );
}

#[test]
fn unknown_target_map_aborts_without_changes() {
    let mut north = field("wasteland", 20);
    north.connections.push(MapConnection::new(
        Direction::Up,
        "mothership_zeta",
        TilePos::new(10, 0),
        TilePos::new(10, 19),
    ));
    let mut engine = engine_on(north, wanderer(TilePos::new(10, 0)), FixedCatalog::new());

    hold(&mut engine, Direction::Up);
    for _ in 0..21 {
        engine.tick(100);
    }

    assert_eq!(engine.state().current_map_id(), &MapId::from("wasteland"));
    assert!(
        rejected_codes(&engine.drain_events()).contains(&"TRANSITION_TARGET_UNAVAILABLE")
    );
}

#[test]
fn discovery_never_reverts_while_walking() {
    let mut engine = engine_on(
        field("wasteland", 40),
        wanderer(TilePos::new(5, 20)),
        FixedCatalog::new(),
    );
    let discovered = |engine: &GameEngine| -> Vec<TilePos> {
        engine
            .state()
            .current_map
            .tiles
            .iter()
            .flatten()
            .filter(|t| t.discovered)
            .map(Tile::position)
            .collect()
    };

    let mut seen = discovered(&engine);
    assert!(!seen.is_empty());

    hold(&mut engine, Direction::Right);
    for _ in 0..30 {
        engine.tick(100);
        let now = discovered(&engine);
        assert!(seen.iter().all(|p| now.contains(p)));
        assert!(now.len() >= seen.len());
        seen = now;
    }
    assert_eq!(
        engine.state().statistics.tiles_discovered as usize,
        seen.len()
    );
}

// ============================================================================
// Combat
// ============================================================================

#[test]
fn lethal_hit_wins_removes_enemy_and_advances_kill_objective() {
    let mut map = field("wasteland", 20);
    map.enemies.push(raider("raider_1", TilePos::new(6, 5), 10, 8));
    let quests = QuestLog::new(vec![
        Quest::new("raider_problem", "Raider Problem")
            .with_objective(QuestObjective::new("kill", ObjectiveKind::Kill, "raider", 1))
            .with_reward(50),
    ]);
    let state = GameState::new(map, wanderer(TilePos::new(5, 5))).with_quests(quests);
    let mut engine = GameEngine::new(state, GameConfig::default(), Arc::new(FixedCatalog::new()));

    engine.interact().expect("combat starts");
    assert_eq!(engine.mode(), GameMode::Combat);
    assert!(engine.state().combat.as_ref().unwrap().is_player_turn);

    let result = engine
        .handle_combat_action("slash", None)
        .expect("slash resolves");
    assert_eq!(result, TurnResult::Finished(CombatOutcome::Victory));

    engine.tick(2_000);
    let state = engine.state();
    assert_eq!(state.mode, GameMode::Exploration);
    assert!(state.combat.is_none());
    assert!(state.current_map.enemies.is_empty());
    assert_eq!(state.statistics.enemies_killed, 1);
    assert_eq!(state.statistics.combats_won, 1);
    assert_eq!(
        state.quests.quest("raider_problem").unwrap().status,
        QuestStatus::Completed
    );
    // 25 from the raider, 50 from the quest.
    assert_eq!(state.player.experience, 75);
    // Slash cost is written back; the encounter ended before any regen tick.
    assert_eq!(state.player.actor.energy, 45);
}

#[test]
fn achievements_unlock_beside_the_statistics() {
    let mut map = field("wasteland", 20);
    map.enemies.push(raider("raider_1", TilePos::new(6, 5), 10, 8));
    let book = Achievements::new(vec![
        Achievement::new("first_kill", "First Blood", AchievementKind::Kill, 1),
        Achievement::new("mutant_hunter", "Mutant Hunter", AchievementKind::Kill, 1)
            .for_target("mutant"),
        Achievement::new("explorer", "Explorer", AchievementKind::Explore, 5),
        Achievement::new("survivor", "Survivor", AchievementKind::Survive, 3),
    ]);
    let state = GameState::new(map, wanderer(TilePos::new(5, 5))).with_achievements(book);
    let mut engine = GameEngine::new(state, GameConfig::default(), Arc::new(FixedCatalog::new()));

    // The opening view already uncovers more than five tiles.
    let explorer = engine.state().achievements.get("explorer").unwrap();
    assert!(explorer.unlocked);
    assert_eq!(explorer.progress, 5);

    engine.interact().expect("combat starts");
    engine
        .handle_combat_action("slash", None)
        .expect("slash resolves");
    engine.tick(2_000);

    let state = engine.state();
    assert!(state.combat.is_none());
    assert!(state.achievements.get("first_kill").unwrap().unlocked);
    assert_eq!(state.achievements.get("mutant_hunter").unwrap().progress, 0);
    assert_eq!(state.achievements.get("survivor").unwrap().progress, 2);
    let unlocked: Vec<_> = engine
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::AchievementUnlocked { achievement_id } => Some(achievement_id),
            _ => None,
        })
        .collect();
    assert_eq!(unlocked, vec!["first_kill".to_owned()]);

    // Sub-second frames add up.
    engine.tick(600);
    engine.tick(400);
    let events = engine.drain_events();
    assert!(events.contains(&GameEvent::AchievementUnlocked {
        achievement_id: "survivor".into()
    }));
    assert_eq!(events.last(), Some(&GameEvent::StateChanged));
    assert_eq!(engine.state().achievements.unlocked().count(), 3);
}

#[test]
fn enemy_turn_waits_for_the_virtual_clock() {
    let mut map = field("wasteland", 20);
    map.enemies.push(raider("raider_1", TilePos::new(6, 5), 60, 15));
    let mut engine = engine_on(map, wanderer(TilePos::new(5, 5)), FixedCatalog::new());

    engine.interact().expect("combat starts");
    assert!(!engine.state().combat.as_ref().unwrap().is_player_turn);
    assert_eq!(
        engine.handle_combat_action("slash", None),
        Err(EngineError::Combat(CombatError::NotPlayerTurn))
    );

    engine.tick(499);
    assert_eq!(engine.state().combat.as_ref().unwrap().participants[0].health, 100);

    engine.tick(1);
    let combat = engine.state().combat.as_ref().unwrap();
    assert!(combat.is_player_turn);
    assert_eq!(combat.participants[0].health, 87);
    assert_eq!(engine.state().nonce, 1);
}

#[test]
fn shutdown_cancels_pending_enemy_turns() {
    let mut map = field("wasteland", 20);
    map.enemies.push(raider("raider_1", TilePos::new(6, 5), 60, 15));
    let mut engine = engine_on(map, wanderer(TilePos::new(5, 5)), FixedCatalog::new());

    engine.interact().expect("combat starts");
    engine.shutdown();
    engine.tick(5_000);

    let combat = engine.state().combat.as_ref().unwrap();
    assert!(!combat.is_player_turn);
    assert_eq!(combat.participants[0].health, 100);
    assert_eq!(engine.scheduler().pending().count(), 0);
}

#[test]
fn defeat_returns_to_exploration_and_blocks_new_fights() {
    let mut map = field("wasteland", 20);
    map.enemies.push(raider("raider_1", TilePos::new(6, 5), 60, 15));
    let mut player = wanderer(TilePos::new(5, 5));
    player.actor.health = 5;
    let mut engine = engine_on(map, player, FixedCatalog::new());

    engine.interact().expect("combat starts");
    engine.tick(500);
    assert_eq!(
        engine.state().combat.as_ref().unwrap().outcome(),
        Some(CombatOutcome::Defeat)
    );

    engine.tick(2_000);
    let state = engine.state();
    assert_eq!(state.mode, GameMode::Exploration);
    assert_eq!(state.player.actor.health, 0);
    assert_eq!(state.statistics.combats_lost, 1);
    assert_eq!(state.current_map.enemies.len(), 1);

    assert_eq!(
        engine.interact(),
        Err(EngineError::Combat(CombatError::PlayerDefeated))
    );
}

#[test]
fn crowded_engagements_take_the_closest_enemies() {
    let mut map = field("wasteland", 20);
    let here = TilePos::new(5, 5).center(TILE);
    for i in 0..GameConfig::MAX_COMBATANTS {
        map.enemies
            .push(raider(&format!("near_{i}"), TilePos::new(6, 5), 60, 8));
    }
    for i in 0..4 {
        let mut far = raider(&format!("far_{i}"), TilePos::new(5, 5), 60, 8);
        far.position = game_core::Position::new(here.x + 44.0, here.y);
        map.enemies.push(far);
    }
    let mut engine = engine_on(map, wanderer(TilePos::new(5, 5)), FixedCatalog::new());

    engine.interact().expect("combat starts");
    let combat = engine.state().combat.as_ref().unwrap();
    assert_eq!(combat.participants.len(), GameConfig::MAX_COMBATANTS);
    assert!(combat.participants[1..]
        .iter()
        .all(|a| a.id.starts_with("near_")));
    assert_eq!(engine.state().current_map.enemies.len(), GameConfig::MAX_COMBATANTS + 4);
}

#[test]
fn items_can_be_used_in_combat() {
    let mut map = field("wasteland", 20);
    map.enemies.push(raider("raider_1", TilePos::new(6, 5), 60, 8));
    let mut player = wanderer(TilePos::new(5, 5));
    player.actor.health = 50;
    player.inventory.add(
        Item::new(
            "stimpak",
            "Stimpak",
            ItemKind::Consumable(game_core::ConsumableEffect::Heal(30)),
        )
        .with_quantity(1),
    );
    let mut engine = engine_on(map, player, FixedCatalog::new());

    engine.interact().expect("combat starts");
    let next = engine
        .combat_action(&CombatAction::item("stimpak"))
        .expect("item use resolves");
    assert_eq!(next, TurnResult::EnemyTurn);
    assert_eq!(engine.state().combat.as_ref().unwrap().participants[0].health, 80);
    assert_eq!(engine.state().player.inventory.quantity("stimpak"), 0);
}

// ============================================================================
// Dialogue, loot, interiors
// ============================================================================

fn trader() -> Npc {
    use game_core::{DialogueChoice, DialogueNode};

    Npc::new("moira", "Moira", TilePos::new(5, 6).center(TILE)).with_dialogue(vec![
        DialogueNode::new("greeting", "Oh, a customer!")
            .with_choice(DialogueChoice::new("ask", "Got any work?").leads_to("work"))
            .with_choice(DialogueChoice::new("bye", "Later.")),
        DialogueNode::new("work", "I'm writing a survival guide.").with_choice(
            DialogueChoice::new("accept", "I'll help.").with_action("start_quest:survival_guide"),
        ),
    ])
}

#[test]
fn dialogue_follows_choices_and_starts_quests() {
    let mut map = field("megaton", 20);
    map.npcs.push(trader());
    let quests = QuestLog::new(vec![
        Quest::new("survival_guide", "Wasteland Survival Guide")
            .with_objective(QuestObjective::new("scrap", ObjectiveKind::Collect, "scrap_metal", 5))
            .with_status(QuestStatus::Available),
        Quest::new("first_steps", "First Steps")
            .with_objective(QuestObjective::new("talk", ObjectiveKind::Talk, "npc", 1))
            .with_reward(20),
    ]);
    let state = GameState::new(map, wanderer(TilePos::new(5, 5))).with_quests(quests);
    let mut engine = GameEngine::new(state, GameConfig::default(), Arc::new(FixedCatalog::new()));

    engine.interact().expect("dialogue starts");
    assert_eq!(engine.mode(), GameMode::Dialogue);
    assert_eq!(
        engine.state().quests.quest("first_steps").unwrap().status,
        QuestStatus::Completed
    );
    assert_eq!(engine.state().player.experience, 20);

    let step = engine.choose_dialogue("ask").expect("choice accepted");
    assert!(!step.ended);
    let step = engine.choose_dialogue("accept").expect("choice accepted");
    assert!(step.ended);

    let state = engine.state();
    assert_eq!(state.mode, GameMode::Exploration);
    assert!(state.dialogue.is_none());
    assert_eq!(
        state.quests.quest("survival_guide").unwrap().status,
        QuestStatus::Active
    );
    assert!(engine.drain_events().iter().any(|e| matches!(
        e,
        GameEvent::DialogueAction { action, .. } if action == "start_quest:survival_guide"
    )));
}

#[test]
fn escape_ends_dialogue_and_hostiles_refuse() {
    let mut map = field("megaton", 20);
    map.npcs.push(trader());
    let mut engine = engine_on(map, wanderer(TilePos::new(5, 5)), FixedCatalog::new());

    engine.interact().expect("dialogue starts");
    engine.hotkey(Hotkey::Escape).expect("escape accepted");
    assert_eq!(engine.mode(), GameMode::Exploration);
    assert!(engine.state().dialogue.is_none());

    let mut map = field("megaton", 20);
    map.npcs.push(trader().with_hostile(true));
    let mut engine = engine_on(map, wanderer(TilePos::new(5, 5)), FixedCatalog::new());
    assert!(matches!(engine.interact(), Err(EngineError::Dialogue(_))));
    assert_eq!(engine.mode(), GameMode::Exploration);
}

#[test]
fn looting_is_one_way() {
    let mut map = field("wasteland", 20);
    map.lootables.push(Lootable::new(
        "crate_1",
        TilePos::new(5, 5).center(TILE),
        vec![Item::new("scrap_metal", "Scrap Metal", ItemKind::Material).with_quantity(3)],
    ));
    let mut engine = engine_on(map, wanderer(TilePos::new(5, 5)), FixedCatalog::new());

    engine.interact().expect("loot collected");
    let state = engine.state();
    assert_eq!(state.player.inventory.quantity("scrap_metal"), 3);
    assert!(state.current_map.lootables.is_empty());
    assert_eq!(state.statistics.items_collected, 3);
    let events = engine.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::LootableDiscovered { lootable_id, .. } if lootable_id == "crate_1"
    )));
    assert_eq!(events.last(), Some(&GameEvent::StateChanged));

    let before = engine.snapshot();
    assert_eq!(engine.interact(), Err(EngineError::NothingToInteract));
    assert_eq!(engine.snapshot(), before);
    assert_eq!(
        rejected_codes(&engine.drain_events()),
        vec!["ENGINE_NOTHING_TO_INTERACT"]
    );
}

#[test]
fn interiors_are_entered_and_left_through_escape() {
    let entrance = TilePos::new(5, 5);
    let map = GameMap::from_fn("megaton", "Megaton", 20, 20, |x, y| {
        let mut tile = Tile::new(x, y, TerrainKind::Dirt);
        if TilePos::new(x, y) == entrance {
            tile.is_entrance = true;
            tile.building_id = Some("craterside_supply".into());
        }
        tile
    });
    let mut interior = GameMap::from_fn("craterside_supply", "Craterside Supply", 8, 8, |x, y| {
        Tile::new(x, y, TerrainKind::Floor)
    });
    interior.is_interior = true;
    let catalog = FixedCatalog::new()
        .with_map(map.clone())
        .with_map(interior);
    let mut engine = engine_on(map, wanderer(entrance), catalog);

    engine.interact().expect("entered");
    let state = engine.state();
    assert_eq!(state.current_map_id(), &MapId::from("craterside_supply"));
    assert!(state.is_indoors());
    assert_eq!(state.current_map.discovered_count(), 64);

    engine.hotkey(Hotkey::Escape).expect("left");
    let state = engine.state();
    assert_eq!(state.current_map_id(), &MapId::from("megaton"));
    assert!(!state.is_indoors());
    assert_eq!(state.player.actor.position, entrance.center(TILE));
    assert_eq!(state.statistics.maps_visited, 2);
    assert!(engine.cache().contains(&MapId::from("craterside_supply")));
}

#[test]
fn interiors_cannot_be_left_mid_combat_or_mid_dialogue() {
    let entrance = TilePos::new(5, 5);
    let map = GameMap::from_fn("megaton", "Megaton", 20, 20, |x, y| {
        let mut tile = Tile::new(x, y, TerrainKind::Dirt);
        if TilePos::new(x, y) == entrance {
            tile.is_entrance = true;
            tile.building_id = Some("clinic".into());
        }
        tile
    });
    let mut interior = GameMap::from_fn("clinic", "Clinic", 10, 10, |x, y| {
        Tile::new(x, y, TerrainKind::Floor)
    });
    interior.is_interior = true;
    interior.spawn = TilePos::new(5, 5);
    interior.enemies.push(raider("raider_1", TilePos::new(6, 5), 60, 8));
    interior.npcs.push(trader());

    let catalog = FixedCatalog::new()
        .with_map(map.clone())
        .with_map(interior);
    let mut engine = engine_on(map, wanderer(entrance), catalog);
    engine.interact().expect("entered");
    assert_eq!(engine.state().current_map_id(), &MapId::from("clinic"));

    // The raider is the closer target, so interact starts combat.
    engine.interact().expect("combat starts");
    assert_eq!(engine.mode(), GameMode::Combat);
    engine.drain_events();

    let before = engine.snapshot();
    assert_eq!(
        engine.exit_interior(),
        Err(EngineError::ModeLocked {
            mode: GameMode::Combat,
            command: "exit_interior",
        })
    );
    assert_eq!(engine.snapshot(), before);
    assert_eq!(rejected_codes(&engine.drain_events()), vec!["ENGINE_MODE_LOCKED"]);

    // Win, clean up, then talk to the trader and try to leave.
    for _ in 0..30 {
        let Some(combat) = engine.state().combat.as_ref() else {
            break;
        };
        if combat.is_player_turn && combat.outcome().is_none() {
            engine.handle_combat_action("slash", None).ok();
        }
        engine.tick(1_000);
    }
    assert_eq!(engine.mode(), GameMode::Exploration);
    assert_eq!(engine.state().statistics.combats_won, 1);

    engine.interact().expect("dialogue starts");
    assert_eq!(engine.mode(), GameMode::Dialogue);
    assert!(matches!(
        engine.exit_interior(),
        Err(EngineError::ModeLocked {
            mode: GameMode::Dialogue,
            ..
        })
    ));
    assert_eq!(engine.state().current_map_id(), &MapId::from("clinic"));
    assert!(engine.state().dialogue.is_some());
}

// ============================================================================
// Modes and dev tools
// ============================================================================

#[test]
fn menus_lock_movement_and_escape_closes_them() {
    let mut engine = engine_on(
        field("wasteland", 20),
        wanderer(TilePos::new(5, 5)),
        FixedCatalog::new(),
    );

    engine.key_down("i".parse().unwrap()).unwrap();
    assert_eq!(engine.mode(), GameMode::Inventory);
    assert_eq!(
        engine.key_down(InputKey::Move(Direction::Up)),
        Err(EngineError::Move(MoveError::InputLocked(GameMode::Inventory)))
    );
    // Other menu hotkeys are ignored outside exploration.
    engine.hotkey(Hotkey::Map).unwrap();
    assert_eq!(engine.mode(), GameMode::Inventory);

    engine.hotkey(Hotkey::Escape).unwrap();
    assert_eq!(engine.mode(), GameMode::Exploration);

    engine.set_text_focus(true);
    engine.hotkey(Hotkey::Quests).unwrap();
    assert_eq!(engine.mode(), GameMode::Exploration);
}

#[test]
fn dev_editor_places_an_npc() {
    let mut engine = engine_on(
        field("wasteland", 20),
        wanderer(TilePos::new(5, 5)),
        FixedCatalog::new(),
    );

    assert!(matches!(
        engine.open_dev_tool(DevToolKind::NpcEditor),
        Err(EngineError::Dev(_))
    ));

    engine.hotkey(Hotkey::DevToggle).unwrap();
    assert_eq!(engine.mode(), GameMode::DevMode);
    engine.open_dev_tool(DevToolKind::NpcEditor).unwrap();
    engine
        .edit_dev_tool(|tool| {
            if let DevTool::NpcEditor(draft) = tool {
                draft.id = "scavenger".into();
                draft.name = "Scavenger".into();
                draft.tile = Some(TilePos::new(2, 2));
            }
        })
        .unwrap();

    assert_eq!(engine.commit_dev_tool().unwrap(), "scavenger");
    let state = engine.state();
    assert!(state.dev_tool.is_none());
    assert_eq!(state.current_map.npcs.len(), 1);
    assert_eq!(state.current_map.npcs[0].position, TilePos::new(2, 2).center(TILE));
}

#[cfg(feature = "serde")]
#[test]
fn snapshot_round_trips_through_json() {
    let mut map = field("wasteland", 20);
    map.enemies.push(raider("raider_1", TilePos::new(6, 5), 60, 15));
    let mut engine = engine_on(map, wanderer(TilePos::new(5, 5)), FixedCatalog::new());
    engine.interact().expect("combat starts");
    engine.tick(500);

    let snapshot = engine.snapshot();
    let json = serde_json::to_string(&snapshot).expect("serialize");
    let restored: GameState = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, snapshot);

    // A restored mid-combat session keeps running.
    let mut resumed =
        GameEngine::new(restored, GameConfig::default(), Arc::new(FixedCatalog::new()));
    assert_eq!(resumed.mode(), GameMode::Combat);
    resumed
        .handle_combat_action("slash", None)
        .expect("player turn resumes");
}

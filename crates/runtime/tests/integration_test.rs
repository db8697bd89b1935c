use std::sync::Arc;
use std::time::Duration;

use game_content::{CharacterClass, START_MAP, new_game, registry, tables};
use game_core::{
    CombatOutcome, FixedCatalog, GameConfig, GameEvent, GameMap, GameMode, GameState, Hotkey,
    MapCatalog, MapId, TerrainKind, Tile, TilePos,
};
use runtime::{
    Event, InMemoryStateRepo, Runtime, RuntimeConfig, RuntimeError, StateRepository, Topic,
};

const TILE: f32 = 32.0;

/// Manual clock: frames only advance through `RuntimeHandle::advance`.
fn manual_config(seed: u64) -> RuntimeConfig {
    RuntimeConfig {
        frame_interval: None,
        world_seed: seed,
        ..RuntimeConfig::default()
    }
}

fn arena_with_raider(health: u32) -> GameState {
    let mut map = GameMap::from_fn("arena", "Arena", 20, 20, |x, y| {
        Tile::new(x, y, TerrainKind::Dirt)
    });
    let mut raider = tables::enemy("raider", "arena_raider_0")
        .expect("raider template")
        .at(TilePos::new(6, 5).center(TILE));
    raider.health = health;
    map.enemies.push(raider);

    let mut player = tables::new_player(CharacterClass::Warrior, "Tester");
    player.actor.position = TilePos::new(5, 5).center(TILE);
    GameState::new(map, player).with_seed(99)
}

async fn next_matching(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    mut pred: impl FnMut(&Event) -> bool,
) -> Event {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = rx.recv().await.expect("bus open");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("event within two seconds")
}

#[tokio::test]
async fn new_game_starts_in_the_capital_and_menus_publish_snapshots() {
    let runtime = Runtime::builder()
        .config(manual_config(11))
        .character(CharacterClass::Medic, "Doc")
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let mut state_rx = handle.subscribe(Topic::State);

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.current_map_id().as_str(), START_MAP);
    assert_eq!(state.player.actor.name, "Doc");
    assert_eq!(state.game_seed, 11);

    handle.hotkey(Hotkey::Inventory).await.unwrap();
    let event = next_matching(&mut state_rx, |e| matches!(e, Event::StateChanged(_))).await;
    let Event::StateChanged(snapshot) = event else {
        unreachable!()
    };
    assert_eq!(snapshot.mode, GameMode::Inventory);

    handle.press("Escape").await.unwrap();
    assert_eq!(handle.query_state().await.unwrap().mode, GameMode::Exploration);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn combat_runs_to_victory_through_the_handle() {
    let runtime = Runtime::builder()
        .config(manual_config(1))
        .catalog(Arc::new(FixedCatalog::new()))
        .initial_state(arena_with_raider(1))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut combat_rx = handle.subscribe(Topic::Combat);

    handle.interact().await.expect("combat starts");
    assert_eq!(handle.query_state().await.unwrap().mode, GameMode::Combat);

    for _ in 0..20 {
        let state = handle.query_state().await.unwrap();
        match &state.combat {
            None => break,
            Some(combat) if combat.outcome().is_none() && combat.is_player_turn => {
                handle.combat_action("slash", None).await.expect("slash lands");
            }
            Some(_) => handle.advance(1_000).await.unwrap(),
        }
    }

    let ended = next_matching(&mut combat_rx, |e| {
        matches!(e, Event::Game(GameEvent::CombatEnded { .. }))
    })
    .await;
    assert!(matches!(
        ended,
        Event::Game(GameEvent::CombatEnded {
            outcome: CombatOutcome::Victory,
            ..
        })
    ));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.mode, GameMode::Exploration);
    assert!(state.current_map.enemies.is_empty());
    assert_eq!(state.statistics.combats_won, 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn rejected_commands_return_codes_and_reach_the_rejected_topic() {
    let runtime = Runtime::builder()
        .config(manual_config(2))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut rejected_rx = handle.subscribe(Topic::Rejected);
    let before = handle.query_state().await.unwrap();

    let err = handle.combat_action("slash", None).await.unwrap_err();
    assert_eq!(err.error_code(), Some("COMBAT_NOT_IN_COMBAT"));
    assert!(err.is_recoverable());

    let event = next_matching(&mut rejected_rx, |_| true).await;
    assert!(matches!(
        event,
        Event::Game(GameEvent::Rejected {
            code: "COMBAT_NOT_IN_COMBAT",
            ..
        })
    ));
    assert_eq!(handle.query_state().await.unwrap(), before);

    assert!(matches!(
        handle.press("F13").await,
        Err(RuntimeError::UnboundKey(_))
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn holding_against_the_north_edge_travels_to_the_pitt() {
    let seed = 4;
    let world = registry(seed);
    let mut state = new_game(&world, CharacterClass::Ranger, "Scout", seed, TILE).unwrap();
    state.player.actor.position = TilePos::new(60, 0).center(TILE);

    let runtime = Runtime::builder()
        .config(manual_config(seed))
        .catalog(Arc::new(world))
        .initial_state(state)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut world_rx = handle.subscribe(Topic::World);

    handle.press("ArrowUp").await.unwrap();
    for _ in 0..25 {
        handle.advance(100).await.unwrap();
    }
    handle.release("ArrowUp").await.unwrap();

    let event = next_matching(&mut world_rx, |e| {
        matches!(e, Event::Game(GameEvent::MapChanged { .. }))
    })
    .await;
    let Event::Game(GameEvent::MapChanged { from, to, .. }) = event else {
        unreachable!()
    };
    assert_eq!(from, MapId::from(START_MAP));
    assert_eq!(to, MapId::from("the_pitt"));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.current_map_id().as_str(), "the_pitt");
    let tile = state.player.actor.position.to_tile(TILE);
    assert!(state.current_map.is_walkable(tile));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn saved_snapshots_resume_the_session() {
    let repo = Arc::new(InMemoryStateRepo::new());
    let runtime = Runtime::builder()
        .config(manual_config(8))
        .repository(repo.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    handle.hotkey(Hotkey::Quests).await.unwrap();
    handle.save("slot-1").await.unwrap();
    let saved = handle.query_state().await.unwrap();
    runtime.shutdown().await.unwrap();

    assert!(matches!(
        handle.query_state().await,
        Err(RuntimeError::CommandChannelClosed)
    ));

    let loaded = repo.load("slot-1").unwrap().expect("slot written");
    assert_eq!(loaded, saved);

    let resumed = Runtime::builder()
        .config(manual_config(8))
        .initial_state(loaded)
        .build()
        .await
        .unwrap();
    let state = resumed.handle().query_state().await.unwrap();
    assert_eq!(state.mode, GameMode::Quests);
    assert_eq!(state.player, saved.player);
    resumed.shutdown().await.unwrap();
}

#[tokio::test]
async fn save_without_repository_is_an_error() {
    let runtime = Runtime::builder()
        .config(manual_config(3))
        .build()
        .await
        .unwrap();
    assert!(matches!(
        runtime.handle().save("nowhere").await,
        Err(RuntimeError::NoRepository)
    ));
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn real_time_frames_move_the_player() {
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            frame_interval: Some(Duration::from_millis(5)),
            ..RuntimeConfig::default()
        })
        .catalog(Arc::new(FixedCatalog::new()))
        .initial_state(arena_with_raider(60))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let start = handle.query_state().await.unwrap().player.actor.position;

    handle.press("ArrowDown").await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    handle.release("ArrowDown").await.unwrap();

    let state = handle.query_state().await.unwrap();
    assert!(state.player.actor.position.y > start.y);
    assert_eq!(state.player.actor.position.x, start.x);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_start_map_fails_the_build() {
    let result = Runtime::builder()
        .config(manual_config(0))
        .catalog(Arc::new(FixedCatalog::new()))
        .build()
        .await;
    assert!(matches!(result, Err(RuntimeError::Catalog(_))));

    let catalog = FixedCatalog::new();
    assert!(!catalog.contains(&MapId::from(START_MAP)));
}

#[tokio::test(start_paused = true)]
async fn slow_frames_shrink_the_vision_radius() {
    let config = GameConfig::default();
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            frame_interval: Some(Duration::from_millis(16)),
            ..RuntimeConfig::default()
        })
        .catalog(Arc::new(FixedCatalog::new()))
        .initial_state(arena_with_raider(60))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut state_rx = handle.subscribe(Topic::State);

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.visibility.radius, config.vision_radius);

    // One beat that lands well past the low-performance threshold.
    tokio::time::advance(Duration::from_millis(config.low_performance_frame_ms + 30)).await;
    let event = next_matching(&mut state_rx, |e| {
        matches!(e, Event::StateChanged(s) if s.visibility.radius == config.reduced_vision_radius)
    })
    .await;
    let Event::StateChanged(slow) = event else {
        unreachable!()
    };
    assert!(slow.current_map.tile(TilePos::new(5, 5)).unwrap().visible);

    // Regular beats restore the full radius.
    next_matching(&mut state_rx, |e| {
        matches!(e, Event::StateChanged(s) if s.visibility.radius == config.vision_radius)
    })
    .await;
    runtime.shutdown().await.unwrap();
}

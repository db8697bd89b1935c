//! Scripted headless session.
//!
//! Walks the character around the start map, opens the quest log, tries an
//! interaction and saves, logging every event the runtime publishes.

use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use game_core::{GameEvent, Hotkey, QuestStatus};
use runtime::{Event, RuntimeHandle, Topic};

const WATCHED: [Topic; 5] = [
    Topic::World,
    Topic::Combat,
    Topic::Progress,
    Topic::Dialogue,
    Topic::Rejected,
];

/// Logs events from every watched topic until the bus closes.
pub fn spawn_event_log(handle: &RuntimeHandle) -> Vec<JoinHandle<()>> {
    handle
        .subscribe_multiple(&WATCHED)
        .into_iter()
        .map(|(topic, mut rx)| {
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(Event::Game(event)) => log_event(topic, &event),
                        Ok(Event::StateChanged(_)) => {}
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            warn!(%topic, skipped = n, "event log lagging");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            })
        })
        .collect()
}

fn log_event(topic: Topic, event: &GameEvent) {
    match event {
        GameEvent::EdgeDwell { .. } => {}
        GameEvent::Rejected { code, message } => info!(%topic, code, "{message}"),
        GameEvent::MapChanged { from, to, evicted } => {
            info!(%topic, %from, %to, evicted = evicted.len(), "map changed")
        }
        GameEvent::LootableDiscovered { lootable_id, items } => {
            info!(%topic, lootable_id, items = items.len(), "looted")
        }
        other => info!(%topic, "{other:?}"),
    }
}

/// Holds `key` for `frames` frames of `frame_ms`.
async fn walk(handle: &RuntimeHandle, key: &str, frames: u32, frame_ms: u64) -> Result<()> {
    handle.press(key).await?;
    for _ in 0..frames {
        handle.advance(frame_ms).await?;
    }
    handle.release(key).await?;
    Ok(())
}

pub async fn run(handle: &RuntimeHandle, frame_ms: u64, save: bool) -> Result<()> {
    let state = handle.query_state().await?;
    info!(
        map = %state.current_map_id(),
        player = %state.player.actor.name,
        health = state.player.actor.health,
        energy = state.player.actor.energy,
        "session started"
    );

    let frames = (1_000 / frame_ms.max(1)) as u32;
    for key in ["ArrowRight", "ArrowDown", "ArrowLeft", "ArrowUp"] {
        walk(handle, key, frames, frame_ms).await?;
    }

    // Nothing may be in range; a refusal is part of the demo.
    if let Err(err) = handle.interact().await {
        info!(code = err.error_code().unwrap_or("-"), "interact: {err}");
    }

    handle.hotkey(Hotkey::Quests).await?;
    let state = handle.query_state().await?;
    for quest in state
        .quests
        .quests
        .iter()
        .filter(|q| q.status == QuestStatus::Active)
    {
        let done = quest.objectives.iter().filter(|o| o.completed).count();
        info!(quest = %quest.title, done, total = quest.objectives.len(), "active quest");
    }
    handle.hotkey(Hotkey::Escape).await?;

    let state = handle.query_state().await?;
    let stats = &state.statistics;
    info!(
        tiles_discovered = stats.tiles_discovered,
        distance = stats.distance_traveled,
        position = ?state.player.actor.position.to_tile(32.0),
        "exploration summary"
    );

    if save {
        handle.save("demo").await?;
    }

    // Give the log tasks a moment to drain before shutdown closes the bus.
    tokio::time::sleep(Duration::from_millis(20)).await;
    Ok(())
}

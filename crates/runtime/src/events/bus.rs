//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tokio::sync::broadcast;

use game_core::{GameEvent, GameState};

/// Topics for event routing
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// Deep-copied snapshots after every accepted mutation, plus mode switches.
    State,
    /// Edge dwell, map switches and looting.
    World,
    /// Encounters, turns and their outcome.
    Combat,
    /// Level-ups and quest objective progress.
    Progress,
    Dialogue,
    /// Commands the engine refused.
    Rejected,
}

/// Event wrapper carrying either a snapshot or an engine notification.
#[derive(Debug, Clone)]
pub enum Event {
    /// The state after an accepted mutation. Shared, never mutated.
    StateChanged(Arc<GameState>),
    Game(GameEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::StateChanged(_) => Topic::State,
            Event::Game(event) => match event {
                GameEvent::StateChanged | GameEvent::ModeChanged { .. } => Topic::State,
                GameEvent::EdgeDwell { .. }
                | GameEvent::EdgeDwellCancelled
                | GameEvent::MapChanged { .. }
                | GameEvent::LootableDiscovered { .. } => Topic::World,
                GameEvent::CombatStarted { .. }
                | GameEvent::CombatTurn(_)
                | GameEvent::CombatEnded { .. } => Topic::Combat,
                GameEvent::LevelUp { .. }
                | GameEvent::QuestProgressed(_)
                | GameEvent::AchievementUnlocked { .. } => Topic::Progress,
                GameEvent::DialogueStarted { .. }
                | GameEvent::DialogueAction { .. }
                | GameEvent::DialogueEnded { .. } => Topic::Dialogue,
                GameEvent::Rejected { .. } => Topic::Rejected,
            },
        }
    }
}

/// Topic-based event bus
///
/// Every topic has its own broadcast channel, created up front, so a slow
/// combat log never lags the state feed.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::iter()
            .map(|topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(%topic, "no subscribers");
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Every topic is created in `with_capacity`; a detached receiver
            // keeps the signature infallible.
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

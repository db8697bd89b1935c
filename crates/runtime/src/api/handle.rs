//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! every engine command, plus topic subscriptions on the event bus.

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{DevTool, DevToolKind, DialogueStep, GameState, Hotkey, InputKey, TurnResult};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, DevEdit};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Sends a command and waits for the worker's answer.
    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(command(reply_tx)).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Runs one frame of `dt_ms` milliseconds on the virtual clock.
    pub async fn advance(&self, dt_ms: u64) -> Result<()> {
        self.request(|reply| Command::Advance { dt_ms, reply }).await
    }

    pub async fn key_down(&self, key: InputKey) -> Result<()> {
        self.request(|reply| Command::KeyDown { key, reply }).await?
    }

    pub async fn key_up(&self, key: InputKey) -> Result<()> {
        self.send(Command::KeyUp { key }).await
    }

    /// Presses a key by its DOM-style name (`ArrowUp`, `w`, `Escape`, ...).
    pub async fn press(&self, key: &str) -> Result<()> {
        self.key_down(key.parse::<InputKey>()?).await
    }

    /// Releases a key by its DOM-style name.
    pub async fn release(&self, key: &str) -> Result<()> {
        self.key_up(key.parse::<InputKey>()?).await
    }

    pub async fn hotkey(&self, hotkey: Hotkey) -> Result<()> {
        self.request(|reply| Command::Hotkey { hotkey, reply }).await?
    }

    pub async fn set_text_focus(&self, focused: bool) -> Result<()> {
        self.send(Command::TextFocus { focused }).await
    }

    pub async fn interact(&self) -> Result<()> {
        self.request(|reply| Command::Interact { reply }).await?
    }

    pub async fn use_item(&self, item_id: impl Into<String>) -> Result<()> {
        let item_id = item_id.into();
        self.request(|reply| Command::UseItem { item_id, reply })
            .await?
    }

    pub async fn exit_interior(&self) -> Result<()> {
        self.request(|reply| Command::ExitInterior { reply }).await?
    }

    /// Resolves the player's combat action: a skill id, or `item:<id>`.
    pub async fn combat_action(
        &self,
        action_id: impl Into<String>,
        target: Option<usize>,
    ) -> Result<TurnResult> {
        let action_id = action_id.into();
        self.request(|reply| Command::CombatAction {
            action_id,
            target,
            reply,
        })
        .await?
    }

    pub async fn choose_dialogue(&self, choice_id: impl Into<String>) -> Result<DialogueStep> {
        let choice_id = choice_id.into();
        self.request(|reply| Command::ChooseDialogue { choice_id, reply })
            .await?
    }

    pub async fn open_dev_tool(&self, kind: DevToolKind) -> Result<()> {
        self.request(|reply| Command::OpenDevTool { kind, reply })
            .await?
    }

    pub async fn edit_dev_tool(
        &self,
        edit: impl FnOnce(&mut DevTool) + Send + 'static,
    ) -> Result<()> {
        let edit: DevEdit = Box::new(edit);
        self.request(|reply| Command::EditDevTool { edit, reply })
            .await?
    }

    /// Commits the open draft and returns the id of the created entity.
    pub async fn commit_dev_tool(&self) -> Result<String> {
        self.request(|reply| Command::CommitDevTool { reply }).await?
    }

    pub async fn close_dev_tool(&self) -> Result<()> {
        self.send(Command::CloseDevTool).await
    }

    /// Query the current game state (deep copy).
    pub async fn query_state(&self) -> Result<GameState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Writes the current state to the configured repository.
    pub async fn save(&self, slot: impl Into<String>) -> Result<()> {
        let slot = slot.into();
        self.request(|reply| Command::Save { slot, reply }).await?
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut combat_rx = handle.subscribe(Topic::Combat);
    /// while let Ok(event) = combat_rx.recv().await {
    ///     // Render the combat log
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}

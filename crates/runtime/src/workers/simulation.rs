//! Simulation worker that owns the authoritative [`game_core::GameEngine`].
//!
//! Receives commands from [`crate::RuntimeHandle`], advances the frame loop
//! on a frame interval and publishes engine events to the [`EventBus`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use game_core::{
    DevTool, DevToolKind, DialogueStep, GameEngine, GameEvent, GameState, Hotkey, InputKey,
    TurnResult,
};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus};
use crate::repository::StateRepository;

type Reply<T> = oneshot::Sender<Result<T>>;

/// In-place edit of the open dev tool draft.
pub type DevEdit = Box<dyn FnOnce(&mut DevTool) + Send>;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Run one frame of `dt_ms` milliseconds.
    Advance { dt_ms: u64, reply: oneshot::Sender<()> },
    KeyDown { key: InputKey, reply: Reply<()> },
    KeyUp { key: InputKey },
    Hotkey { hotkey: Hotkey, reply: Reply<()> },
    TextFocus { focused: bool },
    Interact { reply: Reply<()> },
    UseItem { item_id: String, reply: Reply<()> },
    ExitInterior { reply: Reply<()> },
    CombatAction {
        action_id: String,
        target: Option<usize>,
        reply: Reply<TurnResult>,
    },
    ChooseDialogue { choice_id: String, reply: Reply<DialogueStep> },
    OpenDevTool { kind: DevToolKind, reply: Reply<()> },
    EditDevTool { edit: DevEdit, reply: Reply<()> },
    CommitDevTool { reply: Reply<String> },
    CloseDevTool,
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    Save { slot: String, reply: Reply<()> },
    /// Cancel timers and stop the loop.
    Shutdown,
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    engine: GameEngine,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    frame_interval: Option<Duration>,
    repository: Option<Arc<dyn StateRepository>>,
}

impl SimulationWorker {
    pub fn new(
        engine: GameEngine,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        frame_interval: Option<Duration>,
        repository: Option<Arc<dyn StateRepository>>,
    ) -> Self {
        info!(
            map = %engine.state().current_map_id(),
            mode = %engine.mode(),
            frame_interval_ms = frame_interval.map(|d| d.as_millis() as u64),
            "SimulationWorker initialized"
        );

        Self {
            engine,
            command_rx,
            event_bus,
            frame_interval,
            repository,
        }
    }

    /// Main worker loop.
    ///
    /// With a frame interval each beat ticks the engine by the wall time since
    /// the previous beat; without one it only moves on [`Command::Advance`].
    pub async fn run(mut self) {
        let mut frames = self.frame_interval.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        let mut last_beat = Instant::now();

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                _ = next_frame(&mut frames) => {
                    let now = Instant::now();
                    let dt_ms = now.duration_since(last_beat).as_millis() as u64;
                    last_beat = now;
                    self.advance(dt_ms);
                }
            }
        }

        self.engine.shutdown();
        self.publish_pending();
        debug!("SimulationWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Advance { dt_ms, reply } => {
                self.advance(dt_ms);
                if reply.send(()).is_err() {
                    debug!("Advance reply channel closed (caller dropped)");
                }
            }
            Command::KeyDown { key, reply } => {
                let result = self.engine.key_down(key).map_err(RuntimeError::from);
                self.respond("KeyDown", reply, result);
            }
            Command::KeyUp { key } => {
                self.engine.key_up(key);
            }
            Command::Hotkey { hotkey, reply } => {
                let result = self.engine.hotkey(hotkey).map_err(RuntimeError::from);
                self.respond("Hotkey", reply, result);
            }
            Command::TextFocus { focused } => {
                self.engine.set_text_focus(focused);
            }
            Command::Interact { reply } => {
                let result = self.engine.interact().map_err(RuntimeError::from);
                self.respond("Interact", reply, result);
            }
            Command::UseItem { item_id, reply } => {
                let result = self.engine.use_item(&item_id).map_err(RuntimeError::from);
                self.respond("UseItem", reply, result);
            }
            Command::ExitInterior { reply } => {
                let result = self.engine.exit_interior().map_err(RuntimeError::from);
                self.respond("ExitInterior", reply, result);
            }
            Command::CombatAction {
                action_id,
                target,
                reply,
            } => {
                let result = self
                    .engine
                    .handle_combat_action(&action_id, target)
                    .map_err(RuntimeError::from);
                self.respond("CombatAction", reply, result);
            }
            Command::ChooseDialogue { choice_id, reply } => {
                let result = self
                    .engine
                    .choose_dialogue(&choice_id)
                    .map_err(RuntimeError::from);
                self.respond("ChooseDialogue", reply, result);
            }
            Command::OpenDevTool { kind, reply } => {
                let result = self.engine.open_dev_tool(kind).map_err(RuntimeError::from);
                self.respond("OpenDevTool", reply, result);
            }
            Command::EditDevTool { edit, reply } => {
                let result = self.engine.edit_dev_tool(edit).map_err(RuntimeError::from);
                self.respond("EditDevTool", reply, result);
            }
            Command::CommitDevTool { reply } => {
                let result = self.engine.commit_dev_tool().map_err(RuntimeError::from);
                self.respond("CommitDevTool", reply, result);
            }
            Command::CloseDevTool => {
                self.engine.close_dev_tool();
                self.publish_pending();
            }
            Command::QueryState { reply } => {
                if reply.send(self.engine.snapshot()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::Save { slot, reply } => {
                let result = self.save(&slot);
                self.respond("Save", reply, result);
            }
            Command::Shutdown => {}
        }
    }

    fn advance(&mut self, dt_ms: u64) {
        self.engine.tick(dt_ms);
        self.publish_pending();
    }

    fn save(&self, slot: &str) -> Result<()> {
        let repository = self.repository.as_ref().ok_or(RuntimeError::NoRepository)?;
        repository.save(slot, self.engine.state())?;
        info!(slot, nonce = self.engine.state().nonce, "session saved");
        Ok(())
    }

    /// Publishes the command's events before answering, so a caller that
    /// awaits the reply can already read them from the bus.
    fn respond<T>(&mut self, command: &'static str, reply: Reply<T>, result: Result<T>) {
        self.publish_pending();
        if reply.send(result).is_err() {
            debug!(command, "reply channel closed (caller dropped)");
        }
    }

    /// Forwards drained engine events; `StateChanged` carries a snapshot.
    fn publish_pending(&mut self) {
        for event in self.engine.drain_events() {
            let event = match event {
                GameEvent::StateChanged => Event::StateChanged(Arc::new(self.engine.snapshot())),
                other => Event::Game(other),
            };
            self.event_bus.publish(event);
        }
    }
}

async fn next_frame(frames: &mut Option<Interval>) {
    match frames {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

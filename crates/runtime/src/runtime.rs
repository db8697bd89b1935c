//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command and event
//! channels, and exposes a builder-based API for clients to drive a session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use game_content::{Background, CharacterClass, CharacterSheet, CharacterTrait};
use game_core::{GameConfig, GameEngine, GameState, MapCatalog};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::repository::StateRepository;
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Real-time frame pacing. `None` leaves the clock to
    /// [`RuntimeHandle::advance`], which is what tests use.
    pub frame_interval: Option<Duration>,
    /// Seed of the built-in world when no catalog or state is supplied.
    pub world_seed: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 256,
            command_buffer_size: 32,
            frame_interval: Some(Duration::from_millis(16)),
            world_seed: 0,
        }
    }
}

/// Main runtime that hosts one game session.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Stops the frame loop, cancels pending timers and joins the worker.
    ///
    /// Outstanding handles fail with [`RuntimeError::CommandChannelClosed`]
    /// afterwards.
    pub async fn shutdown(self) -> Result<()> {
        // A worker that already stopped has dropped its receiver.
        let _ = self.handle.shutdown().await;
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        info!("runtime shut down");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    catalog: Option<Arc<dyn MapCatalog>>,
    repository: Option<Arc<dyn StateRepository>>,
    character: CharacterSheet,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            catalog: None,
            repository: None,
            character: CharacterSheet::new(CharacterClass::Warrior, "Lone Wanderer"),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Resume from a full state instead of starting a new game.
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Map source for transitions. Defaults to the built-in world.
    pub fn catalog(mut self, catalog: Arc<dyn MapCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Where [`RuntimeHandle::save`] writes snapshots.
    pub fn repository(mut self, repository: Arc<dyn StateRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Character for a new game; ignored when an initial state is given.
    pub fn character(mut self, class: CharacterClass, name: impl Into<String>) -> Self {
        self.character.class = class;
        self.character.name = name.into();
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.character = self.character.with_background(background);
        self
    }

    pub fn with_trait(mut self, t: CharacterTrait) -> Self {
        self.character = self.character.with_trait(t);
        self
    }

    /// Build the runtime and spawn its worker.
    pub async fn build(self) -> Result<Runtime> {
        let seed = self.config.world_seed;
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Arc::new(game_content::registry(seed)) as Arc<dyn MapCatalog>,
        };

        let state = match self.state {
            Some(state) => state,
            None => game_content::start_game(
                catalog.as_ref(),
                &self.character,
                seed,
                self.config.game_config.tile_size,
            )?,
        };

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let engine = GameEngine::new(state, self.config.game_config, catalog);
        let sim_worker = SimulationWorker::new(
            engine,
            command_rx,
            event_bus,
            self.config.frame_interval,
            self.repository,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}

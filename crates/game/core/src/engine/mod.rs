//! Frame loop and command dispatch.
//!
//! [`GameEngine`] owns the [`GameState`] and is its only writer. Each command
//! or frame lends the components exactly the fields they mutate, then turns
//! the results into [`GameEvent`]s. Rejected commands leave the state as it
//! was, are logged at `debug` and surface as [`GameEvent::Rejected`].
//!
//! ```text
//! tick(dt) ─▶ fire due timers ─▶ movement ─▶ edge dwell ─▶ visibility ─▶ camera
//!              │
//!              ├─ EnemyTurn      ─▶ combat::enemy_turn
//!              └─ CombatCleanup  ─▶ back to exploration
//! ```

mod errors;
mod events;
mod input;
mod timers;

pub use errors::EngineError;
pub use events::GameEvent;
pub use input::{InputKey, InputState, UnboundKey};
pub use timers::{ScheduledTask, Scheduler, SchedulerFull, TaskKind, TimerId};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::combat::{self, CombatAction, CombatError, TurnResult};
use crate::config::GameConfig;
use crate::dev::{DevCommit, DevError, DevTool, DevToolKind};
use crate::dialogue::{DialogueError, DialogueState, DialogueStep};
use crate::env::{MapCatalog, PcgRng};
use crate::error::GameError;
use crate::mode::{self, GameMode, Hotkey, InputContext, Route};
use crate::state::{
    AchievementKind, CombatOutcome, GameState, MapId, ObjectiveKind, Position, PreviousLocation,
    Quest, QuestStatus,
};
use crate::world::{
    Arrival, DwellSignal, MapCache, MoveError, SwitchContext, TransitionError, movement,
    transition, visibility,
};

/// Authoritative owner of a running session.
pub struct GameEngine {
    state: GameState,
    config: GameConfig,
    catalog: Arc<dyn MapCatalog>,
    cache: MapCache,
    scheduler: Scheduler,
    input: InputState,
    rng: PcgRng,
    events: Vec<GameEvent>,
    last_frame_ms: u64,
    /// Play time not yet credited to achievements, below one second.
    unplayed_ms: u64,
    dirty: bool,
}

impl GameEngine {
    /// Takes `state` as the sole source of truth.
    ///
    /// A combat saved mid-encounter is resumed by rescheduling its pending
    /// timer; a combat mode without a combat falls back to exploration.
    pub fn new(state: GameState, config: GameConfig, catalog: Arc<dyn MapCatalog>) -> Self {
        let mut engine = Self {
            cache: MapCache::new(config.map_cache_capacity),
            state,
            config,
            catalog,
            scheduler: Scheduler::new(),
            input: InputState::default(),
            rng: PcgRng,
            events: Vec::new(),
            last_frame_ms: 0,
            unplayed_ms: 0,
            dirty: false,
        };

        engine.state.camera.width = engine.config.viewport_width;
        engine.state.camera.height = engine.config.viewport_height;
        engine.resume_timers();
        let level = engine.state.player.actor.level;
        engine.record_achievement(AchievementKind::Level, None, level);
        engine.refresh_view();
        engine.events.clear();
        engine.dirty = false;
        engine
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Deep copy of the current state for collaborators.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn cache(&self) -> &MapCache {
        &self.cache
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn input(&self) -> InputState {
        self.input
    }

    /// Takes every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Teardown: cancels every pending timer and drops held input. The
    /// state itself is left as it was.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel_all();
        self.input.release_all();
        info!(map = %self.state.current_map_id(), "engine shut down");
    }

    // ------------------------------------------------------------------
    // Frame loop
    // ------------------------------------------------------------------

    /// Runs one frame of `dt_ms` milliseconds.
    pub fn tick(&mut self, dt_ms: u64) {
        self.last_frame_ms = dt_ms;
        self.credit_play_time(dt_ms);

        for task in self.scheduler.advance(dt_ms) {
            self.run_task(task);
        }

        if self.state.mode.allows_movement() {
            self.step_movement(dt_ms);
        }

        self.refresh_view();
        self.flush();
    }

    fn step_movement(&mut self, dt_ms: u64) {
        let was_moving = self.state.player.actor.is_moving;
        let outcome = movement::step(
            &self.state.current_map,
            &mut self.state.player.actor,
            &mut self.state.statistics,
            self.input.held,
            dt_ms,
            &self.config,
        );
        if outcome.moved() || was_moving != self.state.player.actor.is_moving {
            self.dirty = true;
        }

        let before = self.state.transition;
        let signal = self
            .state
            .transition
            .observe(outcome.edge, dt_ms, self.config.edge_dwell_ms);
        if before != self.state.transition {
            self.dirty = true;
        }

        match signal {
            DwellSignal::Idle => {}
            DwellSignal::Cancelled => self.events.push(GameEvent::EdgeDwellCancelled),
            DwellSignal::Progress { direction, ratio } => self.events.push(GameEvent::EdgeDwell {
                direction,
                progress: ratio,
            }),
            DwellSignal::Ready(direction) => {
                self.events.push(GameEvent::EdgeDwell {
                    direction,
                    progress: 1.0,
                });
                let ctx = SwitchContext {
                    current: &mut self.state.current_map,
                    player: &mut self.state.player.actor,
                    transition: &mut self.state.transition,
                    visibility: &mut self.state.visibility,
                    cache: &mut self.cache,
                };
                match transition::follow_connection(
                    ctx,
                    direction,
                    self.catalog.as_ref(),
                    &self.config,
                ) {
                    Ok(switch) => {
                        if !switch.arrival.walkable {
                            warn!(map = %switch.to, tile = %switch.arrival.tile, "no walkable arrival tile");
                        }
                        self.after_map_switch(switch.from, switch.evicted);
                    }
                    Err(err) => self.reject("edge_transition", &EngineError::from(err)),
                }
            }
        }
    }

    /// Recomputes fog of war and the camera for the current position.
    fn refresh_view(&mut self) {
        let radius = self.config.effective_vision_radius(self.last_frame_ms);
        let report = visibility::update(
            &mut self.state.current_map,
            &mut self.state.visibility,
            self.state.player.actor.position,
            radius,
            self.config.tile_size,
            self.config.visibility_jitter,
        );

        if report.recomputed {
            self.dirty = true;
        }
        if report.newly_discovered > 0 {
            self.state.statistics.tiles_discovered += report.newly_discovered;
            self.record_quest(ObjectiveKind::Explore, "tiles", report.newly_discovered);
            self.record_achievement(AchievementKind::Explore, None, report.newly_discovered);
        }

        let before = self.state.camera;
        self.state.camera.follow(
            self.state.player.actor.position,
            &self.state.current_map,
            self.config.tile_size,
        );
        if before != self.state.camera {
            self.dirty = true;
        }
    }

    /// Emits the coalesced `StateChanged` for this call, if anything changed.
    fn flush(&mut self) {
        if std::mem::take(&mut self.dirty) {
            self.events.push(GameEvent::StateChanged);
        }
    }

    fn reject(&mut self, command: &'static str, err: &EngineError) {
        debug!(command, code = err.error_code(), severity = %err.severity(), "{err}");
        self.events.push(GameEvent::Rejected {
            code: err.error_code(),
            message: err.to_string(),
        });
    }

    /// Wraps a command: logs and reports rejections, flushes state changes.
    fn command<T>(
        &mut self,
        name: &'static str,
        run: impl FnOnce(&mut Self) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let result = run(self);
        if let Err(err) = &result {
            self.reject(name, err);
        }
        self.flush();
        result
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn key_down(&mut self, key: InputKey) -> Result<(), EngineError> {
        match key {
            InputKey::Move(direction) => self.command("move", |engine| {
                if engine.input.text_focus {
                    return Ok(());
                }
                if !engine.state.mode.allows_movement() {
                    return Err(MoveError::InputLocked(engine.state.mode).into());
                }
                engine.input.press(direction);
                Ok(())
            }),
            InputKey::Hotkey(hotkey) => self.hotkey(hotkey),
        }
    }

    pub fn key_up(&mut self, key: InputKey) {
        if let InputKey::Move(direction) = key {
            self.input.release(direction);
        }
    }

    /// Text fields own the keyboard while focused; held movement is dropped.
    pub fn set_text_focus(&mut self, focused: bool) {
        self.input.text_focus = focused;
        if focused {
            self.input.release_all();
        }
    }

    pub fn hotkey(&mut self, hotkey: Hotkey) -> Result<(), EngineError> {
        let ctx = InputContext {
            text_focus: self.input.text_focus,
            indoors: self.state.is_indoors(),
        };
        match mode::route(self.state.mode, hotkey, ctx) {
            Route::Ignored => Ok(()),
            Route::SetMode(to) => self.command("set_mode", |engine| {
                engine.set_mode(to);
                Ok(())
            }),
            Route::Interact => self.interact(),
            Route::ExitInterior => self.exit_interior(),
            Route::EndDialogue => self.command("end_dialogue", |engine| {
                engine.end_dialogue();
                Ok(())
            }),
        }
    }

    fn set_mode(&mut self, to: GameMode) {
        let from = self.state.mode;
        if from == to {
            return;
        }
        if from == GameMode::DevMode {
            self.state.dev_tool = None;
        }
        if !to.allows_movement() {
            self.input.release_all();
            self.state.player.actor.is_moving = false;
            self.state.transition.abort();
        }
        self.state.mode = to;
        self.dirty = true;
        debug!(%from, %to, "mode changed");
        self.events.push(GameEvent::ModeChanged { from, to });
    }

    // ------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------

    /// Engages whatever is within reach, in priority order: enemies, NPCs,
    /// lootables, then the entrance under the player.
    pub fn interact(&mut self) -> Result<(), EngineError> {
        self.command("interact", |engine| {
            if engine.state.mode != GameMode::Exploration {
                return Err(EngineError::mode_locked(engine.state.mode, "interact"));
            }

            let here = engine.state.player.actor.position;
            let range = engine.config.interaction_range;
            let map = &engine.state.current_map;

            let mut in_range: Vec<(usize, f32)> = map
                .enemies
                .iter()
                .enumerate()
                .filter(|(_, e)| e.is_alive())
                .map(|(i, e)| (i, e.position.distance(here)))
                .filter(|(_, d)| *d <= range)
                .collect();
            // Closest first; the rest wait on the map for the next encounter.
            in_range.sort_by(|a, b| a.1.total_cmp(&b.1));
            in_range.truncate(GameConfig::MAX_COMBATANTS - 1);
            let enemies: Vec<usize> = in_range.into_iter().map(|(i, _)| i).collect();
            if !enemies.is_empty() {
                return engine.start_combat(&enemies);
            }

            if let Some(npc) = nearest(map.npcs.iter().map(|n| n.position), here, range) {
                return engine.start_dialogue(npc);
            }

            if let Some(loot) = nearest(map.lootables.iter().map(|l| l.position), here, range) {
                let id = map.lootables[loot].id.clone();
                engine.loot(&id);
                return Ok(());
            }

            let tile = here.to_tile(engine.config.tile_size);
            let interior = map.tile(tile).and_then(|t| t.interior_id()).map(MapId::from);
            match interior {
                Some(interior) => engine.enter_interior(&interior),
                None => Err(EngineError::NothingToInteract),
            }
        })
    }

    fn loot(&mut self, lootable_id: &str) {
        let Some(lootable) = self.state.current_map.take_lootable(lootable_id) else {
            return;
        };

        for item in &lootable.items {
            self.state.statistics.items_collected += item.quantity;
            self.state.player.inventory.add(item.clone());
        }
        for item in &lootable.items {
            self.record_quest(ObjectiveKind::Collect, &item.id, item.quantity);
            self.record_achievement(AchievementKind::Collect, Some(&item.id), item.quantity);
        }

        debug!(lootable = %lootable.id, items = lootable.items.len(), "looted");
        self.dirty = true;
        self.events.push(GameEvent::LootableDiscovered {
            lootable_id: lootable.id,
            items: lootable.items,
        });
    }

    /// Uses a consumable outside combat.
    pub fn use_item(&mut self, item_id: &str) -> Result<(), EngineError> {
        self.command("use_item", |engine| {
            if !matches!(
                engine.state.mode,
                GameMode::Exploration | GameMode::Inventory
            ) {
                return Err(EngineError::mode_locked(engine.state.mode, "use_item"));
            }
            let inventory = &mut engine.state.player.inventory;
            let effect = inventory
                .get(item_id)
                .ok_or_else(|| EngineError::UnknownItem(item_id.to_owned()))?
                .consumable_effect()
                .ok_or_else(|| EngineError::NotConsumable(item_id.to_owned()))?;
            let item = inventory
                .take_one(item_id)
                .ok_or_else(|| EngineError::UnknownItem(item_id.to_owned()))?;

            let line = combat::apply_consumable(&mut engine.state.player.actor, &item.name, effect);
            debug!("{line}");
            engine.dirty = true;
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Interiors
    // ------------------------------------------------------------------

    fn enter_interior(&mut self, interior: &MapId) -> Result<(), EngineError> {
        if self.state.is_indoors() {
            return Err(TransitionError::NoEntrance.into());
        }
        self.state.transition.begin()?;
        let target = match transition::load_map(interior, &mut self.cache, self.catalog.as_ref()) {
            Ok(map) => map,
            Err(err) => {
                self.state.transition.abort();
                return Err(err.into());
            }
        };

        let previous = PreviousLocation {
            map_id: self.state.current_map.id.clone(),
            position: self.state.player.actor.position,
        };
        let arrival = Arrival::settle(&target, target.spawn, &self.config);
        let (from, evicted) = transition::swap_in(
            &mut self.state.current_map,
            target,
            &mut self.state.visibility,
            &mut self.cache,
        );
        self.state.previous_location = Some(previous);
        self.state.player.actor.position = arrival.position;
        self.state
            .transition
            .complete(self.config.transition_cooldown_ms);
        self.after_map_switch(from, evicted);
        Ok(())
    }

    /// Returns from an interior to where the player entered it. Exploration
    /// only, like every other map switch.
    pub fn exit_interior(&mut self) -> Result<(), EngineError> {
        self.command("exit_interior", |engine| {
            if engine.state.mode != GameMode::Exploration {
                return Err(EngineError::mode_locked(engine.state.mode, "exit_interior"));
            }
            let previous = engine
                .state
                .previous_location
                .clone()
                .ok_or(TransitionError::NotIndoors)?;
            engine.state.transition.begin()?;
            let target = match transition::load_map(
                &previous.map_id,
                &mut engine.cache,
                engine.catalog.as_ref(),
            ) {
                Ok(map) => map,
                Err(err) => {
                    engine.state.transition.abort();
                    return Err(err.into());
                }
            };

            let (from, evicted) = transition::swap_in(
                &mut engine.state.current_map,
                target,
                &mut engine.state.visibility,
                &mut engine.cache,
            );
            engine.state.previous_location = None;
            engine.state.player.actor.position = previous.position;
            engine
                .state
                .transition
                .complete(engine.config.transition_cooldown_ms);
            engine.after_map_switch(from, evicted);
            Ok(())
        })
    }

    fn after_map_switch(&mut self, from: MapId, evicted: Vec<MapId>) {
        let to = self.state.current_map.id.clone();
        info!(%from, %to, evicted = evicted.len(), "map changed");

        self.state.statistics.maps_visited += 1;
        self.state.visibility.invalidate();
        self.refresh_view();
        self.dirty = true;
        self.events.push(GameEvent::MapChanged { from, to, evicted });
    }

    // ------------------------------------------------------------------
    // Combat
    // ------------------------------------------------------------------

    fn start_combat(&mut self, enemy_indices: &[usize]) -> Result<(), EngineError> {
        let enemies: Vec<_> = enemy_indices
            .iter()
            .map(|&i| self.state.current_map.enemies[i].clone())
            .collect();
        let names: Vec<String> = enemies.iter().map(|e| e.name.clone()).collect();

        let (combat, next) = combat::engage(&self.state.player.actor, enemies)?;
        if next == TurnResult::EnemyTurn {
            self.scheduler
                .schedule(TaskKind::EnemyTurn, self.config.combat_start_delay_ms)?;
        }

        info!(enemies = enemy_indices.len(), "combat started");
        self.state.combat = Some(combat);
        self.set_mode(GameMode::Combat);
        self.events.push(GameEvent::CombatStarted { enemies: names });
        self.events.push(GameEvent::CombatTurn(next));
        Ok(())
    }

    /// Resolves the player's combat action. Only valid on the player's turn.
    ///
    /// `action_id` is a skill id, or `item:<id>` to use a consumable.
    pub fn handle_combat_action(
        &mut self,
        action_id: &str,
        target: Option<usize>,
    ) -> Result<TurnResult, EngineError> {
        let action = CombatAction::from_id(action_id, target);
        self.combat_action(&action)
    }

    pub fn combat_action(&mut self, action: &CombatAction) -> Result<TurnResult, EngineError> {
        self.command("combat_action", |engine| {
            let combat = engine
                .state
                .combat
                .as_mut()
                .ok_or(CombatError::NotInCombat)?;
            let result = combat::player_action(
                combat,
                &mut engine.state.player.inventory,
                action,
                engine.config.energy_regen_per_turn,
            )?;
            engine.dirty = true;
            engine.after_turn(result);
            Ok(result)
        })
    }

    fn run_task(&mut self, task: ScheduledTask) {
        match task.kind {
            TaskKind::EnemyTurn => self.run_enemy_turn(),
            TaskKind::CombatCleanup => self.cleanup_combat(),
        }
    }

    fn run_enemy_turn(&mut self) {
        let Some(combat) = self.state.combat.as_mut() else {
            return;
        };
        let nonce = self.state.nonce;
        match combat::enemy_turn(
            combat,
            &self.rng,
            self.state.game_seed,
            nonce,
            self.config.energy_regen_per_turn,
        ) {
            Ok(result) => {
                self.state.next_nonce();
                self.dirty = true;
                self.after_turn(result);
            }
            Err(err) => warn!(code = err.error_code(), "enemy turn skipped: {err}"),
        }
    }

    fn after_turn(&mut self, result: TurnResult) {
        self.events.push(GameEvent::CombatTurn(result));
        match result {
            TurnResult::PlayerTurn => {}
            TurnResult::EnemyTurn => self.schedule(TaskKind::EnemyTurn, self.config.enemy_turn_delay_ms),
            TurnResult::Finished(outcome) => self.conclude_combat(outcome),
        }
    }

    fn schedule(&mut self, kind: TaskKind, delay_ms: u64) {
        if let Err(err) = self.scheduler.schedule(kind, delay_ms) {
            warn!(%kind, "{err}");
        }
    }

    /// Writes the player back and hands out rewards. The combat itself stays
    /// visible until the cleanup task runs.
    fn conclude_combat(&mut self, outcome: CombatOutcome) {
        let Some(combat) = self.state.combat.as_ref() else {
            return;
        };
        let spoils = combat::spoils(combat);
        if let Some(mut fighter) = combat.player().cloned() {
            fighter.status_effects.clear();
            for skill in fighter.skills.iter_mut() {
                skill.current_cooldown = 0;
            }
            fighter.is_moving = false;
            self.state.player.actor = fighter;
        }

        let mut experience = 0;
        match outcome {
            CombatOutcome::Victory => {
                experience = spoils.experience;
                let ids: Vec<String> = spoils.fallen.iter().map(|f| f.id.clone()).collect();
                self.state.current_map.remove_enemies(&ids);
                self.state.statistics.enemies_killed += spoils.fallen.len() as u32;
                self.state.statistics.combats_won += 1;
                self.grant_experience(experience);
                for fallen in &spoils.fallen {
                    self.record_quest(ObjectiveKind::Kill, &fallen.enemy_type, 1);
                    self.record_achievement(AchievementKind::Kill, Some(&fallen.enemy_type), 1);
                }
            }
            CombatOutcome::Defeat => self.state.statistics.combats_lost += 1,
        }

        info!(%outcome, experience, "combat finished");
        self.dirty = true;
        self.events
            .push(GameEvent::CombatEnded { outcome, experience });
        self.schedule(TaskKind::CombatCleanup, self.config.combat_end_delay_ms);
    }

    fn cleanup_combat(&mut self) {
        if self.state.combat.take().is_some() {
            self.dirty = true;
        }
        if self.state.mode == GameMode::Combat {
            self.set_mode(GameMode::Exploration);
        }
    }

    fn resume_timers(&mut self) {
        let pending = match self.state.combat.as_ref() {
            Some(combat) if combat.phase.is_terminal() => {
                Some((TaskKind::CombatCleanup, self.config.combat_end_delay_ms))
            }
            Some(combat) if !combat.is_player_turn => {
                Some((TaskKind::EnemyTurn, self.config.enemy_turn_delay_ms))
            }
            Some(_) => None,
            None => {
                if self.state.mode == GameMode::Combat {
                    self.state.mode = GameMode::Exploration;
                }
                None
            }
        };
        if let Some((kind, delay_ms)) = pending {
            self.schedule(kind, delay_ms);
        }
    }

    // ------------------------------------------------------------------
    // Progression
    // ------------------------------------------------------------------

    fn grant_experience(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        let gained = self.state.player.gain_experience(amount);
        if gained > 0 {
            let level = self.state.player.actor.level;
            info!(level, "level up");
            self.events.push(GameEvent::LevelUp { level });
            self.record_achievement(AchievementKind::Level, None, level);
        }
    }

    fn record_quest(&mut self, kind: ObjectiveKind, subject: &str, amount: u32) {
        let progress = self.state.quests.record(kind, subject, amount);
        for step in progress {
            if step.quest_completed {
                info!(quest = %step.quest_id, "quest completed");
                self.grant_experience(step.experience_reward);
                self.record_achievement(AchievementKind::QuestsCompleted, None, 1);
            }
            self.dirty = true;
            self.events.push(GameEvent::QuestProgressed(step));
        }
    }

    fn record_achievement(&mut self, kind: AchievementKind, subject: Option<&str>, value: u32) {
        for step in self.state.achievements.record(kind, subject, value) {
            self.dirty = true;
            if step.unlocked {
                info!(achievement = %step.achievement_id, "achievement unlocked");
                self.events.push(GameEvent::AchievementUnlocked {
                    achievement_id: step.achievement_id,
                });
            }
        }
    }

    /// Credits whole seconds of play to `Survive` achievements.
    fn credit_play_time(&mut self, dt_ms: u64) {
        self.unplayed_ms = self.unplayed_ms.saturating_add(dt_ms);
        let seconds = self.unplayed_ms / 1_000;
        if seconds > 0 {
            self.unplayed_ms %= 1_000;
            let seconds = u32::try_from(seconds).unwrap_or(u32::MAX);
            self.record_achievement(AchievementKind::Survive, None, seconds);
        }
    }

    // ------------------------------------------------------------------
    // Dialogue
    // ------------------------------------------------------------------

    fn start_dialogue(&mut self, npc_index: usize) -> Result<(), EngineError> {
        let npc = &self.state.current_map.npcs[npc_index];
        let dialogue = DialogueState::start(npc)?;
        let npc_id = npc.id.clone();

        self.state.dialogue = Some(dialogue);
        self.set_mode(GameMode::Dialogue);
        self.record_quest(ObjectiveKind::Talk, &npc_id, 1);
        self.events.push(GameEvent::DialogueStarted { npc_id });
        Ok(())
    }

    /// Picks a dialogue choice.
    ///
    /// `start_quest:<id>` and `heal_player` actions are applied here; every
    /// action is also surfaced as [`GameEvent::DialogueAction`].
    pub fn choose_dialogue(&mut self, choice_id: &str) -> Result<DialogueStep, EngineError> {
        self.command("choose_dialogue", |engine| {
            let dialogue = engine
                .state
                .dialogue
                .as_mut()
                .ok_or(DialogueError::NotInDialogue)?;
            let step = dialogue.choose(choice_id)?;
            let npc_id = dialogue.npc_id.clone();
            engine.dirty = true;

            if let Some(action) = &step.action {
                engine.apply_dialogue_action(action);
                engine.events.push(GameEvent::DialogueAction {
                    npc_id,
                    action: action.clone(),
                });
            }
            if step.ended {
                engine.end_dialogue();
            }
            Ok(step)
        })
    }

    fn apply_dialogue_action(&mut self, action: &str) {
        if let Some(quest_id) = action.strip_prefix("start_quest:") {
            if self.state.quests.start(quest_id) {
                info!(quest = quest_id, "quest started");
            }
        } else if action == "heal_player" {
            let actor = &mut self.state.player.actor;
            actor.heal(actor.max_health);
            actor.restore_energy(actor.max_energy);
        }
    }

    fn end_dialogue(&mut self) {
        if let Some(dialogue) = self.state.dialogue.take() {
            self.events.push(GameEvent::DialogueEnded {
                npc_id: dialogue.npc_id,
            });
            self.dirty = true;
        }
        if self.state.mode == GameMode::Dialogue {
            self.set_mode(GameMode::Exploration);
        }
    }

    // ------------------------------------------------------------------
    // Dev tools
    // ------------------------------------------------------------------

    pub fn open_dev_tool(&mut self, kind: DevToolKind) -> Result<(), EngineError> {
        self.command("open_dev_tool", |engine| {
            if engine.state.mode != GameMode::DevMode {
                return Err(DevError::NotInDevMode.into());
            }
            engine.state.dev_tool = Some(DevTool::open(kind));
            engine.dirty = true;
            Ok(())
        })
    }

    /// Edits the open draft in place.
    pub fn edit_dev_tool(&mut self, edit: impl FnOnce(&mut DevTool)) -> Result<(), EngineError> {
        self.command("edit_dev_tool", |engine| {
            let tool = engine.state.dev_tool.as_mut().ok_or(DevError::NoEditor)?;
            edit(tool);
            engine.dirty = true;
            Ok(())
        })
    }

    /// Merges the open draft into the session and closes the editor.
    /// Returns the id of the created entity.
    pub fn commit_dev_tool(&mut self) -> Result<String, EngineError> {
        self.command("commit_dev_tool", |engine| {
            let tool = engine.state.dev_tool.as_ref().ok_or(DevError::NoEditor)?;
            let commit = tool.commit(engine.config.tile_size)?;
            let id = commit.id().to_owned();

            match commit {
                DevCommit::Quest(quest) => {
                    if engine.state.quests.quest(&quest.id).is_some() {
                        return Err(DevError::DuplicateId(id).into());
                    }
                    engine.state.quests.quests.push(quest);
                }
                DevCommit::Npc(npc) => {
                    let map = &mut engine.state.current_map;
                    if map.npcs.iter().any(|n| n.id == npc.id) {
                        return Err(DevError::DuplicateId(id).into());
                    }
                    let tile = npc.position.to_tile(engine.config.tile_size);
                    if !map.is_walkable(tile) {
                        return Err(DevError::InvalidPlacement(tile).into());
                    }
                    map.npcs.push(npc);
                }
                DevCommit::Item(item) => engine.state.player.inventory.add(item),
            }

            debug!(id = %id, "dev tool committed");
            engine.state.dev_tool = None;
            engine.dirty = true;
            Ok(id)
        })
    }

    pub fn close_dev_tool(&mut self) {
        if self.state.dev_tool.take().is_some() {
            self.dirty = true;
        }
        self.flush();
    }

    /// Active quests, for menus.
    pub fn active_quests(&self) -> impl Iterator<Item = &Quest> {
        self.state
            .quests
            .quests
            .iter()
            .filter(|q| q.status == QuestStatus::Active)
    }
}

/// Index of the position closest to `here` within `range`.
fn nearest(positions: impl Iterator<Item = Position>, here: Position, range: f32) -> Option<usize> {
    positions
        .enumerate()
        .map(|(i, p)| (i, p.distance(here)))
        .filter(|(_, d)| *d <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

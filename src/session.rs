//! Game session state machine
//!
//! `Idle --start--> Running --lives hit 0--> GameOver --acknowledge--> Idle`.
//! `restart` goes straight to a fresh run from any phase, and `quit_to_menu`
//! abandons a run without recording it.
//!
//! The session owns the only copy of the run state. Every mutation happens
//! inside one of its `&mut self` methods, so the level-up timer and the tick
//! can never interleave. Leaving a run always disarms the timer and drops
//! held keys before anything else happens.

use serde::{Deserialize, Serialize};

use crate::error::GameResult;
use crate::leaderboard::{Leaderboard, LeaderboardRecord, normalize_name, DEFAULT_NAME};
use crate::persistence::Storage;
use crate::platform::{Clock, FrameTimer};
use crate::scene::{FrameView, Scene};
use crate::settings::Settings;
use crate::sim::{
    EntityRegistry, GameEvent, GameState, InputState, Notification, Player, RunState, tick,
};
use crate::tuning::Tuning;
use crate::unlocks::UnlockFlags;

/// Top-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Menu; nothing simulated
    Idle,
    /// Simulation advancing
    Running,
    /// Run finished; still rendered, frozen
    GameOver,
}

pub struct GameSession<S: Scene, P: Storage> {
    phase: SessionPhase,
    state: GameState,
    input: InputState,
    tuning: Tuning,
    settings: Settings,
    unlocks: UnlockFlags,
    /// Persisted board as of the last write
    leaderboard: Leaderboard,
    /// Record written for the most recent run
    last_record: Option<LeaderboardRecord>,
    banner: Option<Notification>,
    /// Name field on the game over screen
    name_input: String,
    events: Vec<GameEvent>,
    scene: S,
    storage: P,
    clock: Box<dyn Clock>,
    frame_timer: FrameTimer,
}

impl<S: Scene, P: Storage> GameSession<S, P> {
    pub fn new(scene: S, storage: P, clock: Box<dyn Clock>, tuning: Tuning, seed: u64) -> Self {
        let settings = Settings::load(&storage);
        let unlocks = UnlockFlags::load(&storage);
        let leaderboard = Leaderboard::load(&storage);
        log::info!(
            "Session ready (seed {}, {} leaderboard entries)",
            seed,
            leaderboard.len()
        );

        Self {
            phase: SessionPhase::Idle,
            state: GameState::new(seed, &tuning),
            input: InputState::new(),
            tuning,
            settings,
            unlocks,
            leaderboard,
            last_record: None,
            banner: None,
            name_input: String::new(),
            events: Vec::new(),
            scene,
            storage,
            clock,
            frame_timer: FrameTimer::default(),
        }
    }

    // === Transitions ===

    /// Begin a run from the menu (or from the game over screen)
    pub fn start(&mut self) -> GameResult<()> {
        match self.phase {
            SessionPhase::Running => {
                log::warn!("start() ignored: already running");
                return Ok(());
            }
            SessionPhase::GameOver => {
                self.submit_name();
                self.teardown();
                self.phase = SessionPhase::Idle;
            }
            SessionPhase::Idle => {}
        }

        if let Err(e) = self.scene.attach() {
            log::error!("Cannot start session: {}", e);
            return Err(e.into());
        }

        self.state.reset_run(&self.tuning);
        self.input.clear();
        self.frame_timer.reset();
        self.last_record = None;
        self.name_input = self.settings.player_name.clone();
        self.phase = SessionPhase::Running;
        log::info!("Run started");
        Ok(())
    }

    /// Drop whatever is happening and start a fresh run
    pub fn restart(&mut self) -> GameResult<()> {
        if self.phase != SessionPhase::Idle {
            self.submit_name();
            self.teardown();
            self.phase = SessionPhase::Idle;
        }
        self.start()
    }

    /// Leave the game over screen
    pub fn acknowledge(&mut self) {
        if self.phase != SessionPhase::GameOver {
            return;
        }
        self.submit_name();
        self.teardown();
        self.name_input.clear();
        self.phase = SessionPhase::Idle;
        log::info!("Back to menu");
    }

    /// Apply the name field to the record written for the finished run.
    /// Only meaningful on the game over screen; a no-op elsewhere.
    pub fn submit_name(&mut self) {
        if self.phase != SessionPhase::GameOver {
            return;
        }
        let Some(record) = self.last_record.clone() else {
            return;
        };
        let name = normalize_name(&self.name_input);
        if name == record.name {
            return;
        }

        match Leaderboard::rename(&mut self.storage, &record, &name) {
            Ok(board) => self.leaderboard = board,
            Err(e) => {
                log::warn!("Leaderboard write failed: {}", e);
                let stale = self
                    .leaderboard
                    .entries
                    .iter_mut()
                    .rev()
                    .find(|e| **e == record);
                if let Some(entry) = stale {
                    entry.name = name.clone();
                }
            }
        }
        log::info!("Run recorded as {}", name);
        self.remember_name(&name);
        self.last_record = Some(LeaderboardRecord { name, ..record });
    }

    /// Keep a real (non-default) name for the next run's name field
    fn remember_name(&mut self, name: &str) {
        if name == DEFAULT_NAME || name == self.settings.player_name {
            return;
        }
        self.settings.player_name = name.to_string();
        if let Err(e) = self.settings.save(&mut self.storage) {
            log::warn!("Settings write failed: {}", e);
        }
    }

    /// Abandon the current run (no leaderboard entry) or leave game over
    pub fn quit_to_menu(&mut self) {
        match self.phase {
            SessionPhase::Idle => {}
            SessionPhase::Running => {
                self.teardown();
                self.phase = SessionPhase::Idle;
                log::info!("Run abandoned");
            }
            SessionPhase::GameOver => self.acknowledge(),
        }
    }

    /// Stop the level timer, release keys, and clear the river
    fn teardown(&mut self) {
        self.state.level_timer.disarm();
        self.input.clear();
        self.banner = None;
        for id in self.state.registry.clear() {
            self.scene.remove_entity(id);
        }
    }

    fn enter_game_over(&mut self) {
        self.state.level_timer.disarm();
        self.input.clear();
        self.phase = SessionPhase::GameOver;

        let run = &self.state.run;
        let record =
            LeaderboardRecord::new(&self.name_input, run.score, run.level, run.elapsed_secs());
        log::info!(
            "Game over: {} scored {} (level {}, {}s)",
            record.name,
            record.score,
            record.level,
            record.time
        );
        self.events.push(GameEvent::GameOver {
            score: record.score,
            level: record.level,
            time: record.time,
        });

        match Leaderboard::append(&mut self.storage, record.clone()) {
            Ok(board) => self.leaderboard = board,
            Err(e) => {
                log::warn!("Leaderboard write failed: {}", e);
                self.leaderboard.push(record.clone());
            }
        }

        let newly = self.unlocks.evaluate(record.score, &self.tuning);
        if !newly.is_empty() {
            for unlock in &newly {
                log::info!("Unlocked {}", unlock.as_str());
            }
            if let Err(e) = self.unlocks.save(&mut self.storage) {
                log::warn!("Unlock write failed: {}", e);
            }
            self.events.extend(newly.into_iter().map(GameEvent::Unlocked));
        }

        self.remember_name(&record.name);
        self.last_record = Some(record);
    }

    // === Input ===

    /// Forward a key press. Returns false if the key was ignored.
    pub fn key_down(&mut self, code: &str) -> bool {
        self.phase == SessionPhase::Running && self.input.key_down(code)
    }

    /// Forward a key release. Returns false for unrecognized keys.
    pub fn key_up(&mut self, code: &str) -> bool {
        self.input.key_up(code)
    }

    /// Edit the name field. On the game over screen it is applied to the
    /// finished run by `submit_name` (or on leaving the screen).
    pub fn set_player_name(&mut self, name: &str) {
        self.name_input = name.to_string();
    }

    // === Loop ===

    /// One display refresh: measure the frame, advance, render
    pub fn frame(&mut self) {
        let dt = self.frame_timer.delta(self.clock.now());
        self.advance(dt);
        self.render();
    }

    /// Advance the simulation by `dt` seconds (no render)
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        if let Some(banner) = &mut self.banner {
            if !banner.tick(dt) {
                self.banner = None;
            }
        }

        if self.phase != SessionPhase::Running {
            return;
        }

        let report = tick(&mut self.state, &self.input, dt, &self.tuning);

        for entity in &report.spawned {
            self.scene.add_entity(entity);
        }
        for id in &report.removed {
            self.scene.remove_entity(*id);
        }
        for event in &report.events {
            if let GameEvent::LevelUp { level } = event {
                if self.settings.show_level_banner {
                    self.banner = Some(Notification::new(
                        format!("Level {}!", level),
                        self.tuning.level_banner_secs,
                    ));
                }
            }
        }
        self.events.extend(report.events);

        if report.died {
            self.enter_game_over();
        }
    }

    /// Hand the current frame to the scene
    pub fn render(&mut self) {
        let top = self.tuning.leaderboard_top;
        let view = FrameView {
            phase: self.phase,
            player: &self.state.player,
            registry: &self.state.registry,
            run: &self.state.run,
            banner: self.banner.as_ref(),
            leaderboard: self.leaderboard.top(top),
            bob: self.settings.collectible_bob,
        };
        self.scene.render_frame(&view);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Leaderboard ===

    /// Best runs, read from storage
    pub fn top_records(&self) -> Vec<LeaderboardRecord> {
        Leaderboard::load(&self.storage)
            .top(self.tuning.leaderboard_top)
            .to_vec()
    }

    /// Erase every stored record
    pub fn reset_leaderboard(&mut self) -> GameResult<()> {
        Leaderboard::reset(&mut self.storage)?;
        self.leaderboard = Leaderboard::new();
        Ok(())
    }

    // === Accessors ===

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn run(&self) -> &RunState {
        &self.state.run
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.state.registry
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn unlocks(&self) -> &UnlockFlags {
        &self.unlocks
    }

    pub fn banner(&self) -> Option<&Notification> {
        self.banner.as_ref()
    }

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    /// Name that would be recorded right now
    pub fn effective_name(&self) -> String {
        normalize_name(&self.name_input)
    }

    pub fn last_record(&self) -> Option<&LeaderboardRecord> {
        self.last_record.as_ref()
    }

    pub fn level_timer_armed(&self) -> bool {
        self.state.level_timer.is_armed()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn storage(&self) -> &P {
        &self.storage
    }

    /// Direct access to the simulation, for hosts that script scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

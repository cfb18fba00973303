//! Renderer collaborator
//!
//! The core tells the scene which entities exist (keyed by [`EntityId`]) and
//! hands it a read-only [`FrameView`] once per frame. It never reads geometry
//! back.

use thiserror::Error;

use crate::leaderboard::LeaderboardRecord;
use crate::session::SessionPhase;
use crate::sim::{EntityId, EntityRegistry, MovingEntity, Notification, Player, RunState};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The underlying graphics context could not be created
    #[error("{0}")]
    Unavailable(String),
}

/// Everything a renderer or HUD needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub phase: SessionPhase,
    pub player: &'a Player,
    pub registry: &'a EntityRegistry,
    pub run: &'a RunState,
    /// Active level-up banner
    pub banner: Option<&'a Notification>,
    /// Best runs, shown on the game over screen
    pub leaderboard: &'a [LeaderboardRecord],
    /// Collectibles should bob
    pub bob: bool,
}

pub trait Scene {
    /// Prepare the renderer. Called by `start()`; an error keeps the session idle.
    fn attach(&mut self) -> Result<(), SceneError> {
        Ok(())
    }

    fn add_entity(&mut self, entity: &MovingEntity);

    fn remove_entity(&mut self, id: EntityId);

    fn render_frame(&mut self, view: &FrameView<'_>);
}

/// Call made on a [`RecordingScene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCall {
    Add(EntityId),
    Remove(EntityId),
    Render,
}

/// Scene that records every call, for tests and replays
#[derive(Debug, Clone, Default)]
pub struct RecordingScene {
    pub calls: Vec<SceneCall>,
    /// Make `attach` fail with this message
    pub fail_attach: Option<String>,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            calls: Vec::new(),
            fail_attach: Some(message.into()),
        }
    }

    /// Ids added and not yet removed, in add order
    pub fn live(&self) -> Vec<EntityId> {
        let mut live = Vec::new();
        for call in &self.calls {
            match *call {
                SceneCall::Add(id) => live.push(id),
                SceneCall::Remove(id) => live.retain(|l| *l != id),
                SceneCall::Render => {}
            }
        }
        live
    }

    pub fn renders(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SceneCall::Render))
            .count()
    }

    pub fn removals_of(&self, id: EntityId) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == SceneCall::Remove(id))
            .count()
    }
}

impl Scene for RecordingScene {
    fn attach(&mut self) -> Result<(), SceneError> {
        match &self.fail_attach {
            Some(message) => Err(SceneError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }

    fn add_entity(&mut self, entity: &MovingEntity) {
        self.calls.push(SceneCall::Add(entity.id));
    }

    fn remove_entity(&mut self, id: EntityId) {
        self.calls.push(SceneCall::Remove(id));
    }

    fn render_frame(&mut self, _view: &FrameView<'_>) {
        self.calls.push(SceneCall::Render);
    }
}

/// Headless scene: logs entity churn and a HUD line every `hud_every` frames
#[derive(Debug, Clone)]
pub struct LogScene {
    hud_every: u64,
    frames: u64,
}

impl LogScene {
    pub fn new(hud_every: u64) -> Self {
        Self {
            hud_every: hud_every.max(1),
            frames: 0,
        }
    }
}

impl Scene for LogScene {
    fn add_entity(&mut self, entity: &MovingEntity) {
        log::trace!("+ {} #{}", entity.kind.as_str(), entity.id.0);
    }

    fn remove_entity(&mut self, id: EntityId) {
        log::trace!("- #{}", id.0);
    }

    fn render_frame(&mut self, view: &FrameView<'_>) {
        self.frames += 1;
        if self.frames % self.hud_every != 0 {
            return;
        }
        log::info!(
            "[{:?}] t={:.1}s score={} lives={} level={} entities={} player=({:.1}, {:.1})",
            view.phase,
            view.run.elapsed,
            view.run.score,
            view.run.lives,
            view.run.level,
            view.registry.len(),
            view.player.pos.x,
            view.player.pos.y,
        );
        if let Some(banner) = view.banner {
            log::info!("  {}", banner.text);
        }
    }
}

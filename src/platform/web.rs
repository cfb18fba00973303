//! Browser host (wasm32 only)
//!
//! The page owns the 3D scene and the DOM. It hands `WebGame` four callbacks
//! and forwards keyboard events and animation frames; everything else stays
//! on this side of the boundary.

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::time::SystemClock;
use crate::error::GameError;
use crate::persistence::LocalStorage;
use crate::scene::{FrameView, Scene, SceneError};
use crate::session::GameSession;
use crate::sim::{EntityId, MovingEntity};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // Already initialized when the module is instantiated twice
    let _ = console_log::init_with_level(log::Level::Info);
}

fn js_error(err: GameError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Per-frame payload handed to the page's render callback as JSON
#[derive(Serialize)]
struct FrameSnapshot<'a> {
    phase: &'a str,
    score: u32,
    lives: u32,
    level: u32,
    elapsed: f32,
    banner: Option<&'a str>,
    player: [f32; 3],
    /// `[id, x, y, z, rotation]`, y includes the collectible bob
    entities: Vec<(u32, f32, f32, f32, f32)>,
    leaderboard: &'a [crate::leaderboard::LeaderboardRecord],
}

/// Scene implemented by JavaScript callbacks
pub struct JsScene {
    on_attach: Function,
    on_add: Function,
    on_remove: Function,
    on_render: Function,
}

impl JsScene {
    fn report(result: Result<JsValue, JsValue>, what: &str) {
        if let Err(e) = result {
            log::warn!("Scene {} callback threw: {:?}", what, e);
        }
    }
}

impl Scene for JsScene {
    fn attach(&mut self) -> Result<(), SceneError> {
        self.on_attach
            .call0(&JsValue::NULL)
            .map(|_| ())
            .map_err(|e| SceneError::Unavailable(format!("{:?}", e)))
    }

    fn add_entity(&mut self, entity: &MovingEntity) {
        let args = js_sys::Array::of5(
            &JsValue::from(entity.id.0),
            &JsValue::from_str(entity.kind.as_str()),
            &JsValue::from(entity.pos.x),
            &JsValue::from(entity.pos.y),
            &JsValue::from(entity.scale),
        );
        Self::report(self.on_add.apply(&JsValue::NULL, &args), "add");
    }

    fn remove_entity(&mut self, id: EntityId) {
        Self::report(
            self.on_remove.call1(&JsValue::NULL, &JsValue::from(id.0)),
            "remove",
        );
    }

    fn render_frame(&mut self, view: &FrameView<'_>) {
        let elapsed = view.run.elapsed;
        let bob = view.bob;
        let snapshot = FrameSnapshot {
            phase: match view.phase {
                crate::session::SessionPhase::Idle => "idle",
                crate::session::SessionPhase::Running => "running",
                crate::session::SessionPhase::GameOver => "game_over",
            },
            score: view.run.score,
            lives: view.run.lives,
            level: view.run.level,
            elapsed,
            banner: view.banner.map(|b| b.text.as_str()),
            player: [view.player.pos.x, view.player.pos.y, view.player.facing],
            entities: view
                .registry
                .iter()
                .map(|e| {
                    let bob_y = if bob { e.bob_offset(elapsed) } else { 0.0 };
                    let y = crate::consts::SURFACE_Y + bob_y;
                    (e.id.0, e.pos.x, y, e.pos.y, e.rotation)
                })
                .collect(),
            leaderboard: view.leaderboard,
        };
        match serde_json::to_string(&snapshot) {
            Ok(json) => Self::report(
                self.on_render.call1(&JsValue::NULL, &JsValue::from_str(&json)),
                "render",
            ),
            Err(e) => log::warn!("Frame snapshot failed: {}", e),
        }
    }
}

#[wasm_bindgen]
pub struct WebGame {
    session: GameSession<JsScene, LocalStorage>,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` overrides any subset of the tuning constants
    #[wasm_bindgen(constructor)]
    pub fn new(
        on_attach: Function,
        on_add: Function,
        on_remove: Function,
        on_render: Function,
        tuning_json: Option<String>,
    ) -> Result<WebGame, JsValue> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(js_error)?,
            None => Tuning::default(),
        };
        let scene = JsScene {
            on_attach,
            on_add,
            on_remove,
            on_render,
        };
        let seed = rand::random::<u64>();
        Ok(Self {
            session: GameSession::new(
                scene,
                LocalStorage::new(),
                Box::new(SystemClock::new()),
                tuning,
                seed,
            ),
        })
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.session.start().map_err(js_error)
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.session.restart().map_err(js_error)
    }

    pub fn acknowledge(&mut self) {
        self.session.acknowledge();
    }

    #[wasm_bindgen(js_name = quitToMenu)]
    pub fn quit_to_menu(&mut self) {
        self.session.quit_to_menu();
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, code: &str) -> bool {
        self.session.key_down(code)
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, code: &str) -> bool {
        self.session.key_up(code)
    }

    #[wasm_bindgen(js_name = setPlayerName)]
    pub fn set_player_name(&mut self, name: &str) {
        self.session.set_player_name(name);
    }

    /// Call from `requestAnimationFrame`
    pub fn frame(&mut self) {
        self.session.frame();
    }

    #[wasm_bindgen(js_name = resetLeaderboard)]
    pub fn reset_leaderboard(&mut self) -> Result<(), JsValue> {
        self.session.reset_leaderboard().map_err(js_error)
    }

    /// Events since the last call, as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> String {
        let events = self.session.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(js_name = unlocks)]
    pub fn unlocks(&self) -> String {
        serde_json::to_string(self.session.unlocks()).unwrap_or_else(|_| "{}".to_string())
    }
}

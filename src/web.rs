//! Browser facade
//!
//! The JS host owns the canvas, asset loading, and drag handling. It calls
//! into `CatchGame` once per animation frame and polls events as JSON.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::config::RoundConfig;
use crate::sim::{RoundController, autopilot};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Gold Catch loaded");
}

#[wasm_bindgen]
pub struct CatchGame {
    round: RoundController,
    demo: bool,
}

#[wasm_bindgen]
impl CatchGame {
    /// Build from a JSON config, or from the stored/default config when
    /// `config_json` is absent
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<CatchGame, JsValue> {
        let config = match config_json {
            Some(json) => RoundConfig::from_json(&json).map_err(to_js)?,
            None => RoundConfig::load(),
        };
        let round = RoundController::new(config).map_err(to_js)?;
        Ok(Self { round, demo: false })
    }

    pub fn begin(&mut self) -> bool {
        self.round.begin()
    }

    pub fn cancel_to_ready(&mut self) -> bool {
        self.round.cancel_to_ready()
    }

    /// One animation frame; `dt` in seconds
    pub fn advance(&mut self, dt: f32) {
        if self.demo {
            if let Some(x) = autopilot::target_x(&self.round) {
                self.round.catcher_mut().center_on_x(x);
            }
        }
        self.round.advance(dt);
    }

    pub fn on_frame(&mut self, dt: f32) {
        self.round.on_frame(dt);
    }

    pub fn on_second(&mut self) {
        self.round.on_second();
    }

    /// Drag-move: top-left corner of the catcher in field coordinates
    pub fn drag_catcher(&mut self, x: f32, y: f32) {
        self.round.catcher_mut().drag_to(Vec2::new(x, y));
    }

    pub fn set_demo(&mut self, demo: bool) {
        self.demo = demo;
    }

    pub fn score(&self) -> u32 {
        self.round.score()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.round.remaining_secs()
    }

    pub fn phase(&self) -> String {
        self.round.phase().as_str().to_string()
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.round.snapshot()).map_err(to_js)
    }

    /// Queued events since the last call, oldest first
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.round.drain_events()).map_err(to_js)
    }
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

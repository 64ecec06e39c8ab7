//! Gold Catch - a timed catch-the-falling-item minigame
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (spawning, catching, scoring)
//! - `config`: Data-driven round setup
//! - `web`: wasm-bindgen facade for the browser host

pub mod config;
pub mod error;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{RoundConfig, SpawnLayout};
pub use error::ConfigError;

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate of the host's frame clock
    pub const FRAME_RATE: f32 = 60.0;
    /// Nominal frame duration
    pub const FRAME_DT: f32 = 1.0 / FRAME_RATE;
    /// Largest frame step accepted by `advance` (tab switches, hitches)
    pub const MAX_FRAME_DT: f32 = 0.25;
    /// Longest step a single `on_frame` call will simulate
    pub const MAX_SIM_DT: f32 = 10.0;

    /// Play field (a 375x667 viewport rendered at 2x)
    pub const FIELD_WIDTH: f32 = 750.0;
    pub const FIELD_HEIGHT: f32 = 1334.0;

    /// Round timing
    pub const ROUND_LENGTH_SECS: u32 = 30;
    pub const COUNTDOWN_SECS: u8 = 3;

    /// Spawning and falling
    pub const SPAWN_INTERVAL_MS: u32 = 500;
    pub const FALL_SPEED: f32 = 600.0; // px/s
    pub const ITEM_SIZE: f32 = 120.0;
    pub const SPAWN_LANES: u32 = 5;

    /// Catcher
    pub const CATCHER_WIDTH: f32 = 200.0;
    pub const CATCHER_HEIGHT: f32 = 180.0;
    /// Gap between catcher bottom and field bottom
    pub const CATCHER_BOTTOM_MARGIN: f32 = 80.0;
}

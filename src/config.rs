//! Round configuration
//!
//! Defaults reproduce the shipped game. A JSON override can be stored in
//! LocalStorage on the web build; fields missing from the JSON keep their
//! defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::SpawnPattern;

/// How spawned items are placed horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnLayout {
    /// The n-th pattern item falls in lane `n % lanes`
    #[default]
    Cycle,
    /// Lanes drawn from an RNG reseeded at every round start
    Seeded { seed: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub field_width: f32,
    pub field_height: f32,

    pub round_length_secs: u32,
    pub countdown_secs: u8,

    pub spawn_interval_ms: u32,
    /// Pixels per second
    pub fall_speed: f32,
    /// Kind codes, consumed left to right
    pub pattern: String,
    pub item_size: Vec2,
    pub lanes: u32,
    pub layout: SpawnLayout,

    pub catcher_size: Vec2,
    pub catcher_bottom_margin: f32,
    /// Vertical freedom of the catcher's drag band (0 = horizontal only)
    pub catcher_band_height: f32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            round_length_secs: ROUND_LENGTH_SECS,
            countdown_secs: COUNTDOWN_SECS,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            fall_speed: FALL_SPEED,
            pattern: SpawnPattern::default_codes(),
            item_size: Vec2::splat(ITEM_SIZE),
            lanes: SPAWN_LANES,
            layout: SpawnLayout::Cycle,

            catcher_size: Vec2::new(CATCHER_WIDTH, CATCHER_HEIGHT),
            catcher_bottom_margin: CATCHER_BOTTOM_MARGIN,
            catcher_band_height: 0.0,
        }
    }
}

impl RoundConfig {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gold_catch_config";

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field; returns the parsed spawn pattern on success
    pub fn validate(&self) -> Result<SpawnPattern, ConfigError> {
        let field = Vec2::new(self.field_width, self.field_height);
        if !(field.is_finite() && field.x > 0.0 && field.y > 0.0) {
            return Err(ConfigError::InvalidField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if self.round_length_secs == 0 {
            return Err(ConfigError::NonPositiveRoundLength);
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::NonPositiveSpawnInterval);
        }
        if !(self.fall_speed.is_finite() && self.fall_speed > 0.0) {
            return Err(ConfigError::InvalidFallSpeed(self.fall_speed));
        }
        if !fits(self.item_size, field) {
            return Err(ConfigError::InvalidItemSize {
                width: self.item_size.x,
                height: self.item_size.y,
            });
        }
        let margins_ok = self.catcher_bottom_margin.is_finite()
            && self.catcher_band_height.is_finite()
            && self.catcher_bottom_margin >= 0.0
            && self.catcher_band_height >= 0.0;
        let catcher_room = self.catcher_size.y + self.catcher_bottom_margin + self.catcher_band_height;
        if !fits(self.catcher_size, field) || !margins_ok || catcher_room > self.field_height
        {
            return Err(ConfigError::InvalidCatcher {
                width: self.catcher_size.x,
                height: self.catcher_size.y,
            });
        }
        if self.lanes == 0 {
            return Err(ConfigError::NoLanes);
        }
        SpawnPattern::parse(&self.pattern)
    }

    /// Load the config override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded round config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored round config: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

fn fits(size: Vec2, field: Vec2) -> bool {
    size.is_finite() && size.x > 0.0 && size.y > 0.0 && size.x <= field.x && size.y <= field.y
}

//! Deterministic round simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only arrives through the host's frame and 1-second clocks
//! - Seeded RNG only
//! - Stable iteration order (items by spawn id)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod catalog;
pub mod catcher;
pub mod collision;
pub mod round;
pub mod spawner;
pub mod state;
pub mod timer;

pub use catalog::{ItemCatalog, ItemKind, ScoreEffect, SpawnPattern};
pub use catcher::Catcher;
pub use collision::Rect;
pub use round::RoundController;
pub use spawner::{Spawner, SpawnerTick};
pub use state::{
    EndReason, Item, ItemId, ItemOutcome, RoundEvent, RoundPhase, RoundSnapshot, RoundStats,
};
pub use timer::Timer;

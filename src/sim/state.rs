//! Round state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::ItemKind;
use super::collision::Rect;

/// Stable item identifier; assigned in spawn order
pub type ItemId = u32;

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Remaining time reached zero
    TimeUp,
    /// A penalty was caught while the score was already zero
    ZeroScorePenalty,
    /// A bomb was caught
    Bomb,
}

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Begin screen, waiting for the begin signal
    Ready,
    /// Pre-round countdown (seconds left before play starts)
    Countdown { remaining: u8 },
    /// Active gameplay
    Playing,
    /// Terminal until the host returns to the begin screen
    Ended(EndReason),
}

impl RoundPhase {
    pub fn is_playing(&self) -> bool {
        matches!(self, RoundPhase::Playing)
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self {
            RoundPhase::Ended(reason) => Some(*reason),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Ready => "ready",
            RoundPhase::Countdown { .. } => "countdown",
            RoundPhase::Playing => "playing",
            RoundPhase::Ended(_) => "ended",
        }
    }
}

/// A falling item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    /// Top-left corner in field coordinates
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per second, constant for the round
    pub fall_speed: f32,
    /// Caught or expired; never reset
    pub resolved: bool,
    /// Which pattern entry produced this item
    pub pattern_index: usize,
}

impl Item {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Move down by one frame's worth of fall
    pub fn fall(&mut self, dt: f32) {
        self.pos.y += self.fall_speed * dt;
    }
}

/// How an item left the live set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemOutcome {
    Caught,
    /// Fell past the field bottom; no score effect
    Expired,
}

/// Notifications for the rendering layer. Hosts poll these; the core never
/// waits on their handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoundEvent {
    CountdownTick { remaining: u8 },
    RoundStarted { round_length_secs: u32 },
    TimeChanged { remaining_secs: u32 },
    ItemSpawned { item: Item },
    ItemResolved { item: Item, outcome: ItemOutcome },
    ScoreChanged { score: u32 },
    RoundEnded { reason: EndReason, score: u32 },
    ReturnedToReady,
}

/// Per-round tallies for the end screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStats {
    pub spawned: u32,
    /// Indexed by `ItemKind::index`
    pub caught: [u32; 5],
    pub expired: u32,
}

impl RoundStats {
    pub fn record_caught(&mut self, kind: ItemKind) {
        self.caught[kind.index()] += 1;
    }

    pub fn caught_of(&self, kind: ItemKind) -> u32 {
        self.caught[kind.index()]
    }

    pub fn total_caught(&self) -> u32 {
        self.caught.iter().sum()
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub score: u32,
    pub remaining_secs: u32,
    pub catcher: Rect,
    pub items: Vec<Item>,
    pub stats: RoundStats,
}

//! Falling item spawner
//!
//! Owns the live items: materialises one item per spawn-timer fire from the
//! pattern, moves them every frame, and drops them once they are caught or
//! fall out of the field. Live items stay sorted by id (spawn order).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::catalog::SpawnPattern;
use super::state::{Item, ItemId};
use super::timer::Timer;
use crate::config::{RoundConfig, SpawnLayout};

/// What changed during one `Spawner::tick`
#[derive(Debug, Clone, Default)]
pub struct SpawnerTick {
    pub spawned: Vec<Item>,
    pub expired: Vec<Item>,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    pattern: SpawnPattern,
    cursor: usize,
    timer: Timer,
    fall_speed: f32,
    item_size: Vec2,
    field: Vec2,
    lanes: u32,
    layout: SpawnLayout,
    rng: Option<Pcg32>,
    items: Vec<Item>,
    next_id: ItemId,
}

impl Spawner {
    pub fn new(config: &RoundConfig, pattern: SpawnPattern) -> Self {
        Self {
            pattern,
            cursor: 0,
            timer: Timer::from_millis(config.spawn_interval_ms),
            fall_speed: config.fall_speed,
            item_size: config.item_size,
            field: Vec2::new(config.field_width, config.field_height),
            lanes: config.lanes.max(1),
            layout: config.layout,
            rng: None,
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Clear the live set, rewind the pattern, and arm the spawn timer.
    /// Ignored (returns false) while already running; `stop` first. A zero
    /// interval is refused and leaves the spawner idle.
    pub fn start(&mut self, spawn_interval_ms: u32, fall_speed: f32, pattern: SpawnPattern) -> bool {
        if self.timer.is_armed() {
            return false;
        }
        if spawn_interval_ms == 0 {
            log::warn!("Refusing to start spawner with a zero interval");
            return false;
        }
        self.pattern = pattern;
        self.fall_speed = fall_speed;
        self.timer = Timer::from_millis(spawn_interval_ms);
        self.cursor = 0;
        self.items.clear();
        self.rng = match self.layout {
            SpawnLayout::Seeded { seed } => Some(Pcg32::seed_from_u64(seed)),
            SpawnLayout::Cycle => None,
        };
        self.timer.arm();
        true
    }

    /// Cancel the spawn timer. Live items are kept. Safe to repeat.
    pub fn stop(&mut self) {
        self.timer.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    /// Drop every live item without resolving it
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Advance one frame: move live items, expire the ones past the bottom,
    /// then spawn whatever the timer says is due.
    pub fn tick(&mut self, dt: f32) -> SpawnerTick {
        let mut out = SpawnerTick::default();
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let field_height = self.field.y;
        for item in &mut self.items {
            item.fall(dt);
            if item.pos.y > field_height {
                item.resolved = true;
            }
        }
        let (expired, live): (Vec<Item>, Vec<Item>) = self.items.drain(..).partition(|i| i.resolved);
        self.items = live;
        out.expired = expired;

        let due = self.timer.advance(dt);
        for _ in 0..due {
            if let Some(item) = self.spawn_due() {
                out.spawned.push(item);
            }
        }

        out
    }

    /// Create the next pattern item at the top of the field. Returns `None`
    /// once the pattern is exhausted; spawning then simply stops.
    pub fn spawn_due(&mut self) -> Option<Item> {
        let index = self.cursor;
        let kind = self.pattern.get(index)?;
        self.cursor += 1;

        let lane = match self.rng.as_mut() {
            Some(rng) => rng.random_range(0..self.lanes),
            None => (index % self.lanes as usize) as u32,
        };

        let item = Item {
            id: self.next_id,
            kind,
            pos: Vec2::new(self.lane_x(lane), 0.0),
            size: self.item_size,
            fall_speed: self.fall_speed,
            resolved: false,
            pattern_index: index,
        };
        self.next_id += 1;
        self.items.push(item.clone());
        log::debug!("Spawned {:?} #{} in lane {}", kind, item.id, lane);
        Some(item)
    }

    /// Mark a live item caught and remove it. Returns `None` if the id is not
    /// live (already caught or expired), so a second call is a no-op.
    pub fn resolve(&mut self, id: ItemId) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        let mut item = self.items.remove(idx);
        item.resolved = true;
        Some(item)
    }

    /// Live items in spawn order
    pub fn live(&self) -> &[Item] {
        &self.items
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.pattern.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Left edge of a lane's item, centred in the lane and kept in the field
    fn lane_x(&self, lane: u32) -> f32 {
        let lane_width = self.field.x / self.lanes as f32;
        let x = lane as f32 * lane_width + (lane_width - self.item_size.x) / 2.0;
        x.clamp(0.0, (self.field.x - self.item_size.x).max(0.0))
    }
}

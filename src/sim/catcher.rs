//! The player's catcher
//!
//! Drag input lives in the host; the catcher only stores where it is and
//! answers hit-tests. Every position it accepts is clamped into its drag
//! area, so its bounds never leave the play field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::Item;
use crate::config::RoundConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catcher {
    bounds: Rect,
    /// Region the catcher's top-left corner may occupy
    drag_area: Rect,
}

impl Catcher {
    pub fn new(config: &RoundConfig) -> Self {
        let size = config.catcher_size;
        let rest_y = config.field_height - size.y - config.catcher_bottom_margin;
        let drag_area = Rect::from_xywh(
            0.0,
            (rest_y - config.catcher_band_height).max(0.0),
            (config.field_width - size.x).max(0.0),
            config.catcher_band_height,
        );
        let mut catcher = Self {
            bounds: Rect::new(Vec2::ZERO, size),
            drag_area,
        };
        catcher.reset(config.field_width);
        catcher
    }

    /// Centre horizontally at the resting height
    pub fn reset(&mut self, field_width: f32) {
        let x = (field_width - self.bounds.size.x) / 2.0;
        self.drag_to(Vec2::new(x, self.drag_area.max().y));
    }

    /// Move the top-left corner, clamped into the drag area
    pub fn drag_to(&mut self, top_left: Vec2) {
        if top_left.is_finite() {
            self.bounds.min = self.drag_area.clamp_point(top_left);
        }
    }

    /// Centre the catcher on `x`, keeping its current height
    pub fn center_on_x(&mut self, x: f32) {
        let y = self.bounds.min.y;
        self.drag_to(Vec2::new(x - self.bounds.size.x / 2.0, y));
    }

    /// Accept bounds from the drag collaborator. The size is fixed; only the
    /// position is taken, after clamping.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.drag_to(bounds.min);
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn drag_area(&self) -> Rect {
        self.drag_area
    }

    /// Pure overlap query between the catcher and an item
    pub fn hit_test(&self, item: &Item) -> bool {
        self.bounds.overlaps(&item.bounds())
    }
}

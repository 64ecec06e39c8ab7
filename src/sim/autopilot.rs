//! Demo mode: steer the catcher without a player
//!
//! Chases the lowest reachable prize and keeps clear of hazards (bombs, and
//! penalties while the score is zero) that are about to reach the catcher.

use super::catalog::ScoreEffect;
use super::round::RoundController;
use super::state::Item;

/// How far above the catcher a hazard starts to matter (px)
pub const DANGER_LOOKAHEAD: f32 = 400.0;

/// Desired catcher centre x, or `None` to stay put
pub fn target_x(rc: &RoundController) -> Option<f32> {
    if !rc.phase().is_playing() {
        return None;
    }

    let catcher = rc.catcher().bounds();
    let half_width = catcher.size.x / 2.0;
    let score = rc.score();

    // Items that have not yet fallen past the catcher
    let incoming: Vec<&Item> = rc
        .spawner()
        .live()
        .iter()
        .filter(|item| item.pos.y < catcher.max().y)
        .collect();

    let hazards: Vec<&Item> = incoming
        .iter()
        .copied()
        .filter(|item| match item.kind.score_effect() {
            ScoreEffect::InstantLoss => true,
            ScoreEffect::Points(p) => p < 0 && score == 0,
        })
        .filter(|item| item.pos.y + item.size.y > catcher.min.y - DANGER_LOOKAHEAD)
        .collect();

    let danger_at = |center: f32| {
        let (left, right) = (center - half_width, center + half_width);
        hazards
            .iter()
            .any(|h| left < h.pos.x + h.size.x && right > h.pos.x)
    };

    // Lowest prize first
    let mut prizes: Vec<&Item> = incoming.iter().copied().filter(|i| i.kind.is_prize()).collect();
    prizes.sort_by(|a, b| b.pos.y.total_cmp(&a.pos.y));

    if let Some(prize) = prizes.iter().find(|p| !danger_at(p.bounds().center().x)) {
        return Some(prize.bounds().center().x);
    }

    let current = catcher.center().x;
    if !danger_at(current) {
        return None;
    }

    // Nearest safe spot, sampled every quarter catcher width
    let area = rc.catcher().drag_area();
    let lo = area.min.x + half_width;
    let hi = area.max().x + half_width;
    let step = (half_width / 2.0).max(1.0);
    let mut best: Option<f32> = None;
    let mut x = lo;
    while x <= hi {
        if !danger_at(x) && best.is_none_or(|b| (x - current).abs() < (b - current).abs()) {
            best = Some(x);
        }
        x += step;
    }
    best
}

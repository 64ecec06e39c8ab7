//! Round controller
//!
//! Owns the round phase, score, and remaining time. Two host clocks drive
//! it: `on_frame` (~60 Hz) moves items and resolves catches, `on_second`
//! runs the countdown and the round timer. Hosts with only a frame clock
//! call `advance`, which derives the second ticks itself.

use super::catalog::{ItemCatalog, ScoreEffect};
use super::catcher::Catcher;
use super::collision::Rect;
use super::spawner::Spawner;
use super::state::{
    EndReason, ItemId, ItemOutcome, RoundEvent, RoundPhase, RoundSnapshot, RoundStats,
};
use super::timer::Timer;
use crate::config::RoundConfig;
use crate::consts::{MAX_FRAME_DT, MAX_SIM_DT};
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct RoundController {
    config: RoundConfig,
    catalog: ItemCatalog,
    phase: RoundPhase,
    score: u32,
    remaining_secs: u32,
    spawner: Spawner,
    catcher: Catcher,
    /// Derived 1-second clock used by `advance`
    second_timer: Timer,
    stats: RoundStats,
    events: Vec<RoundEvent>,
}

impl RoundController {
    /// Validate the config and build a controller in `Ready`
    pub fn new(config: RoundConfig) -> Result<Self, ConfigError> {
        let pattern = config.validate()?;
        let spawner = Spawner::new(&config, pattern.clone());
        let catcher = Catcher::new(&config);
        Ok(Self {
            catalog: ItemCatalog::new(pattern),
            phase: RoundPhase::Ready,
            score: 0,
            remaining_secs: config.round_length_secs,
            spawner,
            catcher,
            second_timer: Timer::new(1.0),
            stats: RoundStats::default(),
            events: Vec::new(),
            config,
        })
    }

    // --- Host signals ---

    /// Ready -> Countdown. Ignored in any other phase.
    pub fn begin(&mut self) -> bool {
        if self.phase != RoundPhase::Ready {
            log::debug!("Ignoring begin in {:?}", self.phase);
            return false;
        }
        if self.config.countdown_secs == 0 {
            self.start_playing();
            return true;
        }
        let remaining = self.config.countdown_secs;
        self.phase = RoundPhase::Countdown { remaining };
        self.second_timer.arm();
        self.events.push(RoundEvent::CountdownTick { remaining });
        log::info!("Countdown started ({}s)", remaining);
        true
    }

    /// Ended -> Ready. Ignored in any other phase.
    pub fn cancel_to_ready(&mut self) -> bool {
        if !matches!(self.phase, RoundPhase::Ended(_)) {
            log::debug!("Ignoring return to ready in {:?}", self.phase);
            return false;
        }
        self.phase = RoundPhase::Ready;
        self.spawner.clear();
        self.second_timer.cancel();
        self.catcher.reset(self.config.field_width);
        self.remaining_secs = self.config.round_length_secs;
        self.events.push(RoundEvent::ReturnedToReady);
        log::info!("Back to begin screen");
        true
    }

    /// Catcher position from the drag collaborator
    pub fn catcher_position_update(&mut self, bounds: Rect) {
        self.catcher.set_bounds(bounds);
    }

    pub fn catcher_mut(&mut self) -> &mut Catcher {
        &mut self.catcher
    }

    // --- Clocks ---

    /// Single-clock driver: one frame of `dt` seconds, plus any whole
    /// seconds that elapsed on the derived 1-second timer.
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.on_frame(dt);
        let seconds = self.second_timer.advance(dt);
        for _ in 0..seconds {
            self.on_second();
        }
    }

    /// 1-second clock: counts down before play, then runs the round timer
    pub fn on_second(&mut self) {
        match self.phase {
            RoundPhase::Countdown { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.start_playing();
                } else {
                    self.phase = RoundPhase::Countdown { remaining };
                    self.events.push(RoundEvent::CountdownTick { remaining });
                }
            }
            RoundPhase::Playing => {
                self.remaining_secs = self.remaining_secs.saturating_sub(1);
                self.events.push(RoundEvent::TimeChanged {
                    remaining_secs: self.remaining_secs,
                });
                if self.remaining_secs == 0 {
                    self.end_round(EndReason::TimeUp);
                }
            }
            RoundPhase::Ready | RoundPhase::Ended(_) => {}
        }
    }

    /// Frame clock: move items, then resolve catches in spawn order. No-op
    /// outside `Playing`.
    pub fn on_frame(&mut self, dt: f32) {
        if !self.phase.is_playing() {
            return;
        }
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_SIM_DT) } else { 0.0 };

        let tick = self.spawner.tick(dt);
        for item in tick.expired {
            self.stats.expired += 1;
            self.events.push(RoundEvent::ItemResolved {
                item,
                outcome: ItemOutcome::Expired,
            });
        }
        for item in tick.spawned {
            self.stats.spawned += 1;
            self.events.push(RoundEvent::ItemSpawned { item });
        }

        let hits: Vec<ItemId> = self
            .spawner
            .live()
            .iter()
            .filter(|item| self.catcher.hit_test(item))
            .map(|item| item.id)
            .collect();

        for id in hits {
            if let Some(reason) = self.catch_item(id) {
                self.end_round(reason);
                break;
            }
        }
    }

    /// Resolve one caught item and apply its score effect. Returns the end
    /// reason if this catch ends the round.
    fn catch_item(&mut self, id: ItemId) -> Option<EndReason> {
        let item = self.spawner.resolve(id)?;
        let kind = item.kind;
        log::debug!("Caught {:?} #{}", kind, id);
        self.stats.record_caught(kind);
        self.events.push(RoundEvent::ItemResolved {
            item,
            outcome: ItemOutcome::Caught,
        });

        match self.catalog.score_delta_for(kind) {
            ScoreEffect::InstantLoss => Some(EndReason::Bomb),
            ScoreEffect::Points(delta) if delta < 0 && self.score == 0 => {
                Some(EndReason::ZeroScorePenalty)
            }
            ScoreEffect::Points(delta) => {
                self.score = self.score.saturating_add_signed(delta);
                self.events.push(RoundEvent::ScoreChanged { score: self.score });
                None
            }
        }
    }

    fn start_playing(&mut self) {
        self.phase = RoundPhase::Playing;
        self.score = 0;
        self.remaining_secs = self.config.round_length_secs;
        self.stats = RoundStats::default();
        self.spawner.stop();
        self.spawner.start(
            self.config.spawn_interval_ms,
            self.config.fall_speed,
            self.catalog.pattern().clone(),
        );
        self.second_timer.arm();
        self.events.push(RoundEvent::RoundStarted {
            round_length_secs: self.remaining_secs,
        });
        self.events.push(RoundEvent::ScoreChanged { score: 0 });
        log::info!("Round started ({}s)", self.remaining_secs);
    }

    /// Playing -> Ended. Only the first terminal condition wins.
    fn end_round(&mut self, reason: EndReason) {
        if !self.phase.is_playing() {
            return;
        }
        self.phase = RoundPhase::Ended(reason);
        self.spawner.stop();
        self.second_timer.cancel();
        self.events.push(RoundEvent::RoundEnded {
            reason,
            score: self.score,
        });
        log::info!("Round ended: {:?} with score {}", reason, self.score);
    }

    // --- Queries ---

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn catcher(&self) -> &Catcher {
        &self.catcher
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn stats(&self) -> &RoundStats {
        &self.stats
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.phase,
            score: self.score,
            remaining_secs: self.remaining_secs,
            catcher: self.catcher.bounds(),
            items: self.spawner.live().to_vec(),
            stats: self.stats.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::sim::ItemKind;
    use glam::Vec2;
    use proptest::prelude::*;

    /// A controller whose items fall straight into a catcher spanning the
    /// whole field width. Items spawn every 3s and reach the catcher after
    /// ~1.6s, so at most one is live at a time.
    fn controller(codes: &str) -> RoundController {
        let config = RoundConfig {
            pattern: codes.into(),
            catcher_size: Vec2::new(750.0, 180.0),
            spawn_interval_ms: 3000,
            ..Default::default()
        };
        RoundController::new(config).unwrap()
    }

    fn playing(codes: &str) -> RoundController {
        let mut rc = controller(codes);
        assert!(rc.begin());
        for _ in 0..3 {
            rc.on_second();
        }
        assert_eq!(rc.phase(), RoundPhase::Playing);
        rc
    }

    /// Run frames until the next item has been caught
    fn catch_next(rc: &mut RoundController) {
        let caught_before = rc.stats().total_caught();
        for _ in 0..(6 * 60) {
            if !rc.phase().is_playing() {
                break;
            }
            rc.on_frame(FRAME_DT);
            if rc.stats().total_caught() > caught_before {
                break;
            }
        }
    }

    #[test]
    fn test_phases_ready_countdown_playing() {
        let mut rc = controller("2");
        assert_eq!(rc.phase(), RoundPhase::Ready);
        rc.on_frame(1.0);
        rc.on_second();
        assert_eq!(rc.phase(), RoundPhase::Ready);

        assert!(rc.begin());
        assert_eq!(rc.phase(), RoundPhase::Countdown { remaining: 3 });
        assert!(!rc.begin());
        rc.on_second();
        assert_eq!(rc.phase(), RoundPhase::Countdown { remaining: 2 });
        rc.on_second();
        assert_eq!(rc.phase(), RoundPhase::Countdown { remaining: 1 });
        rc.on_second();
        assert_eq!(rc.phase(), RoundPhase::Playing);
        assert_eq!(rc.score(), 0);
        assert_eq!(rc.remaining_secs(), 30);
        assert!(rc.spawner().is_running());

        let events = rc.drain_events();
        assert_eq!(
            events,
            vec![
                RoundEvent::CountdownTick { remaining: 3 },
                RoundEvent::CountdownTick { remaining: 2 },
                RoundEvent::CountdownTick { remaining: 1 },
                RoundEvent::RoundStarted { round_length_secs: 30 },
                RoundEvent::ScoreChanged { score: 0 },
            ]
        );
        assert!(!rc.begin());
    }

    #[test]
    fn test_prizes_then_bomb() {
        let mut rc = playing("2ab0r");
        catch_next(&mut rc);
        assert_eq!(rc.score(), 2);
        catch_next(&mut rc);
        assert_eq!(rc.score(), 3);
        catch_next(&mut rc);
        assert_eq!(rc.score(), 4);
        catch_next(&mut rc);
        assert_eq!(rc.phase(), RoundPhase::Ended(EndReason::Bomb));
        assert_eq!(rc.score(), 4);
        assert!(!rc.spawner().is_running());
        assert_eq!(rc.stats().caught_of(ItemKind::Bomb), 1);
    }

    #[test]
    fn test_penalty_at_zero_ends_round() {
        let mut rc = playing("r");
        catch_next(&mut rc);
        assert_eq!(rc.phase(), RoundPhase::Ended(EndReason::ZeroScorePenalty));
        assert_eq!(rc.score(), 0);
        let events = rc.drain_events();
        assert!(events.contains(&RoundEvent::RoundEnded {
            reason: EndReason::ZeroScorePenalty,
            score: 0
        }));
        assert!(!events.contains(&RoundEvent::ScoreChanged { score: 1 }));
    }

    #[test]
    fn test_penalty_above_zero_reduces_score() {
        let mut rc = playing("2r");
        catch_next(&mut rc);
        assert_eq!(rc.score(), 2);
        catch_next(&mut rc);
        assert_eq!(rc.score(), 1);
        assert_eq!(rc.phase(), RoundPhase::Playing);
    }

    #[test]
    fn test_time_up() {
        let mut rc = playing("");
        for _ in 0..29 {
            rc.on_second();
        }
        assert_eq!(rc.remaining_secs(), 1);
        assert_eq!(rc.phase(), RoundPhase::Playing);
        rc.on_second();
        assert_eq!(rc.remaining_secs(), 0);
        assert_eq!(rc.phase(), RoundPhase::Ended(EndReason::TimeUp));

        // Further seconds do nothing
        rc.on_second();
        assert_eq!(rc.remaining_secs(), 0);
    }

    #[test]
    fn test_no_time_up_after_bomb() {
        let mut rc = playing("0");
        catch_next(&mut rc);
        assert_eq!(rc.phase(), RoundPhase::Ended(EndReason::Bomb));
        rc.drain_events();
        for _ in 0..40 {
            rc.on_second();
        }
        assert_eq!(rc.phase(), RoundPhase::Ended(EndReason::Bomb));
        assert!(rc.drain_events().is_empty());
    }

    #[test]
    fn test_exhausted_pattern_does_not_end_round() {
        let mut rc = playing("2");
        catch_next(&mut rc);
        rc.on_frame(5.0);
        assert!(rc.spawner().is_exhausted());
        assert!(rc.spawner().live().is_empty());
        assert_eq!(rc.phase(), RoundPhase::Playing);
    }

    #[test]
    fn test_missed_item_expires_without_score() {
        let config = RoundConfig {
            pattern: "2".into(),
            spawn_interval_ms: 1000,
            ..Default::default()
        };
        let mut rc = RoundController::new(config).unwrap();
        rc.begin();
        for _ in 0..3 {
            rc.on_second();
        }
        // Item spawns in lane 0 (x 15..135); park the catcher on the right
        rc.catcher_mut().drag_to(Vec2::new(550.0, 0.0));
        rc.on_frame(1.0);
        assert_eq!(rc.spawner().live().len(), 1);
        for _ in 0..3 {
            rc.on_frame(1.0);
        }
        assert!(rc.spawner().live().is_empty());
        assert_eq!(rc.score(), 0);
        assert_eq!(rc.stats().expired, 1);
        assert_eq!(rc.phase(), RoundPhase::Playing);
        let events = rc.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            RoundEvent::ItemResolved {
                outcome: ItemOutcome::Expired,
                ..
            }
        )));
    }

    #[test]
    fn test_first_terminal_catch_wins_in_a_frame() {
        // Bomb and prizes land in the catcher on the same frame
        let config = RoundConfig {
            pattern: "022".into(),
            catcher_size: Vec2::new(750.0, 180.0),
            spawn_interval_ms: 1,
            ..Default::default()
        };
        let mut rc = RoundController::new(config).unwrap();
        rc.begin();
        for _ in 0..3 {
            rc.on_second();
        }
        // Spawn all three at once, then drop them into the catcher together
        rc.on_frame(0.01);
        assert_eq!(rc.spawner().live().len(), 3);
        rc.on_frame(1.7);
        assert_eq!(rc.phase(), RoundPhase::Ended(EndReason::Bomb));
        assert_eq!(rc.score(), 0);
        assert_eq!(rc.stats().total_caught(), 1);
        // Later items are abandoned, not resolved
        assert_eq!(rc.spawner().live().len(), 2);

        // Abandoned items freeze once ended
        let before = rc.snapshot().items;
        rc.on_frame(1.0);
        assert_eq!(rc.snapshot().items, before);
    }

    #[test]
    fn test_return_to_ready_and_replay() {
        let mut rc = playing("0");
        catch_next(&mut rc);
        assert!(matches!(rc.phase(), RoundPhase::Ended(_)));
        assert!(rc.cancel_to_ready());
        assert_eq!(rc.phase(), RoundPhase::Ready);
        assert!(rc.spawner().live().is_empty());
        assert!(!rc.cancel_to_ready());

        assert!(rc.begin());
        for _ in 0..3 {
            rc.on_second();
        }
        assert_eq!(rc.phase(), RoundPhase::Playing);
        assert_eq!(rc.score(), 0);
        assert_eq!(rc.spawner().cursor(), 0);
    }

    #[test]
    fn test_advance_drives_whole_round() {
        let mut rc = RoundController::new(RoundConfig {
            pattern: "2".into(),
            ..Default::default()
        })
        .unwrap();
        rc.begin();
        // Countdown (3s) plus the 30s round, with a little slack
        for _ in 0..(34 * 60) {
            rc.advance(FRAME_DT);
        }
        assert_eq!(rc.phase(), RoundPhase::Ended(EndReason::TimeUp));
        assert_eq!(rc.remaining_secs(), 0);
    }

    #[test]
    fn test_huge_frame_step_returns() {
        let mut rc = RoundController::new(RoundConfig {
            countdown_secs: 0,
            spawn_interval_ms: 1,
            ..Default::default()
        })
        .unwrap();
        rc.begin();
        rc.on_frame(100_000.0);
        rc.on_frame(f32::INFINITY);
        assert_eq!(rc.stats().spawned, 75);
        assert!(rc.spawner().live().iter().all(|i| i.pos.y.is_finite()));
        assert_eq!(rc.phase(), RoundPhase::Playing);
    }

    /// Frames and stray signals in Ready or Countdown change nothing
    fn assert_inert(rc: &mut RoundController) {
        rc.drain_events();
        let phase = rc.phase();
        let score = rc.score();
        let spawned = rc.stats().spawned;

        rc.on_frame(1.0);
        assert!(!rc.cancel_to_ready());
        assert!(!rc.begin() || phase == RoundPhase::Ready);
        if phase == RoundPhase::Ready {
            return;
        }
        assert_eq!(rc.phase(), phase);
        assert_eq!(rc.score(), score);
        assert_eq!(rc.stats().spawned, spawned);
        assert!(rc.snapshot().items.is_empty());
        assert!(rc.drain_events().is_empty());
    }

    #[test]
    fn test_out_of_order_signals_during_countdown() {
        let mut rc = controller("2ab0r");
        rc.begin();
        assert_inert(&mut rc);
        rc.on_second();
        assert_eq!(rc.phase(), RoundPhase::Countdown { remaining: 2 });
        assert_inert(&mut rc);
    }

    #[test]
    fn test_out_of_order_signals_after_each_end() {
        let ends = [
            ("0", EndReason::Bomb),
            ("r", EndReason::ZeroScorePenalty),
            ("2", EndReason::TimeUp),
        ];
        for (codes, reason) in ends {
            let mut rc = playing(codes);
            if reason == EndReason::TimeUp {
                for _ in 0..30 {
                    rc.on_second();
                }
            } else {
                catch_next(&mut rc);
            }
            assert_eq!(rc.phase(), RoundPhase::Ended(reason));
            rc.drain_events();
            let score = rc.score();
            let stats = rc.stats().clone();
            let items = rc.snapshot().items;

            rc.on_frame(1.0);
            rc.on_second();
            assert!(!rc.begin());
            assert_eq!(rc.phase(), RoundPhase::Ended(reason));
            assert_eq!(rc.score(), score);
            assert_eq!(rc.stats(), &stats);
            assert_eq!(rc.snapshot().items, items);
            assert!(rc.drain_events().is_empty());

            // The one signal Ended accepts, after which a fresh round can begin
            assert!(rc.cancel_to_ready());
            assert!(!rc.cancel_to_ready());
            assert!(rc.snapshot().items.is_empty());
            assert!(rc.begin());
        }
    }

    #[test]
    fn test_invalid_config_fails_setup() {
        let err = RoundController::new(RoundConfig {
            round_length_secs: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveRoundLength));
        assert!(RoundController::new(RoundConfig {
            pattern: "2?".into(),
            ..Default::default()
        })
        .is_err());
    }

    proptest! {
        #[test]
        fn prop_score_never_negative_and_single_resolution(
            codes in "[2abr0]{1,40}",
            moves in proptest::collection::vec(0.0f32..750.0, 1..400),
        ) {
            let mut rc = RoundController::new(RoundConfig {
                pattern: codes,
                spawn_interval_ms: 200,
                ..Default::default()
            })
            .unwrap();
            rc.begin();
            let mut caught = std::collections::HashSet::new();
            for x in moves {
                rc.catcher_mut().center_on_x(x);
                rc.advance(FRAME_DT * 3.0);
                for event in rc.drain_events() {
                    if let RoundEvent::ItemResolved { item, .. } = event {
                        prop_assert!(caught.insert(item.id), "item {} resolved twice", item.id);
                    }
                }
                prop_assert!(rc.spawner().live().iter().all(|i| !i.resolved));
            }
            if rc.phase() == RoundPhase::Ended(EndReason::ZeroScorePenalty) {
                prop_assert_eq!(rc.score(), 0);
            }
        }

        #[test]
        fn prop_time_up_only_while_playing(seconds in 0u32..60, bomb_first in any::<bool>()) {
            let mut rc = playing("0");
            if bomb_first {
                catch_next(&mut rc);
            }
            for _ in 0..seconds {
                rc.on_second();
            }
            match rc.phase() {
                RoundPhase::Ended(EndReason::TimeUp) => {
                    prop_assert!(!bomb_first);
                    prop_assert!(seconds >= 30);
                }
                RoundPhase::Ended(EndReason::Bomb) => prop_assert!(bomb_first),
                RoundPhase::Playing => prop_assert!(seconds < 30),
                other => prop_assert!(false, "unexpected phase {:?}", other),
            }
        }
    }
}

//! Repeating timer driven by elapsed seconds
//!
//! Replaces self-rescheduling timeouts: the owner arms it, feeds it frame
//! time, and gets back how many periods elapsed. Cancelling is idempotent.

use serde::{Deserialize, Serialize};

/// Most periods reported by one `advance`; any backlog beyond is dropped
pub const MAX_FIRES_PER_ADVANCE: u32 = 240;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    period: f32,
    elapsed: f32,
    armed: bool,
}

impl Timer {
    /// A disarmed timer firing every `period` seconds once armed
    pub fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
            armed: false,
        }
    }

    pub fn from_millis(ms: u32) -> Self {
        Self::new(ms as f32 / 1000.0)
    }

    /// Arm (or re-arm) from zero elapsed time
    pub fn arm(&mut self) {
        self.elapsed = 0.0;
        self.armed = true;
    }

    pub fn cancel(&mut self) {
        self.armed = false;
        self.elapsed = 0.0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    /// Advance by `dt` seconds; returns the number of times the timer fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.armed || self.period <= 0.0 || !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period && fired < MAX_FIRES_PER_ADVANCE {
            self.elapsed -= self.period;
            fired += 1;
        }
        if self.elapsed >= self.period {
            self.elapsed %= self.period;
        }
        fired
    }
}

//! Frame countdowns
//!
//! Cooldowns, invincibility, interaction holds and patrol waits all share one
//! shape: set to a duration, decremented once per tick, active while > 0.

use serde::{Deserialize, Serialize};

/// Integer frame counter with a one-shot completion edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    /// A countdown already running for `ticks`
    pub fn running(ticks: u32) -> Self {
        Self { remaining: ticks }
    }

    pub fn start(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }

    /// Advance one tick. Returns `true` only on the tick that moves the counter
    /// from 1 to 0; an idle counter never reports completion.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Fraction of `total` still to go (1.0 just after start, 0.0 when idle)
    pub fn fraction_remaining(&self, total: u32) -> f32 {
        if total == 0 {
            0.0
        } else {
            (self.remaining as f32 / total as f32).min(1.0)
        }
    }
}

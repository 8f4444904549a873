//! Wall-clock pacing toward a fixed cycle rate.
//!
//! The runner executes in bursts: it compares the cycles retired so
//! far against what the elapsed wall time says a real part would have
//! retired, catches up when behind, and sleeps briefly when ahead.

use std::time::{Duration, Instant};

pub struct Pacer {
    started: Instant,
    hz: u64,
    executed: u64,
}

impl Pacer {
    pub fn new(hz: u64) -> Self {
        Self {
            started: Instant::now(),
            hz,
            executed: 0,
        }
    }

    /// Cycles the wall clock says should have retired by now.
    pub fn expected(&self) -> u64 {
        let micros = self.started.elapsed().as_micros();
        u64::try_from(micros.saturating_mul(u128::from(self.hz)) / 1_000_000)
            .unwrap_or(u64::MAX)
    }

    /// Cycles retired so far.
    pub const fn executed(&self) -> u64 {
        self.executed
    }

    /// Records one instruction's cycle cost.
    pub fn record(&mut self, cycles: u16) {
        self.executed = self.executed.saturating_add(u64::from(cycles));
    }

    /// Yields the thread briefly once execution is ahead of the clock.
    pub fn rest(&self) {
        spin_sleep::sleep(Duration::from_millis(1));
    }
}

//! Frame pacing.

use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use tracing::debug;

/// Bounds the cycle rate to a target frames-per-second.
///
/// Late cycles proceed immediately; there is no catch-up for time lost in
/// earlier cycles.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    target_rate: u32,
    rate_range: RangeInclusive<u32>,
    budget: Duration,
    last_cycle_start: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(target_rate: u32, rate_range: RangeInclusive<u32>) -> Self {
        let mut scheduler = Self {
            target_rate: 0,
            rate_range,
            budget: Duration::ZERO,
            last_cycle_start: None,
        };
        scheduler.set_target_rate(target_rate);
        scheduler
    }

    /// Milliseconds per cycle for a rate: `max(1, 1000 / rate)`.
    pub fn budget_for(rate: u32) -> Duration {
        let millis = 1000 / u64::from(rate.max(1));
        Duration::from_millis(millis.max(1))
    }

    /// Clamp `rate` into the configured range and apply it.
    pub fn set_target_rate(&mut self, rate: u32) {
        let low = (*self.rate_range.start()).max(1);
        let high = (*self.rate_range.end()).max(low);
        let clamped = rate.clamp(low, high);
        if clamped != self.target_rate {
            self.target_rate = clamped;
            self.budget = Self::budget_for(clamped);
            debug!(
                "Frame budget set to {}ms ({} fps)",
                self.budget.as_millis(),
                clamped
            );
        }
    }

    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time still to wait after `elapsed` has passed since the last cycle
    /// start. Never negative.
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.budget.saturating_sub(elapsed)
    }

    /// Return how long to suspend before the next cycle's work, given the
    /// current time. The cycle is taken to start once that suspension ends.
    pub fn begin_cycle_at(&mut self, now: Instant) -> Duration {
        let delay = match self.last_cycle_start {
            Some(last) => self.remaining(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        };
        self.last_cycle_start = Some(now + delay);
        delay
    }

    /// Start a cycle now, sleeping off whatever is left of the budget.
    pub fn pace(&mut self) {
        let delay = self.begin_cycle_at(Instant::now());
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

//! Time management utilities

use std::time::Duration;

/// Host-driven periodic ticker
///
/// The engine never reads the wall clock. The host feeds elapsed frame time
/// through [`PeriodicTicker::advance`], and the ticker reports how many whole
/// periods have elapsed since the previous call.
#[derive(Debug, Clone)]
pub struct PeriodicTicker {
    period: Duration,
    accumulated: Duration,
    total_time: Duration,
    fired: u64,
}

impl PeriodicTicker {
    /// Create a new ticker firing once per `period`
    ///
    /// A zero period is clamped to one millisecond.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            accumulated: Duration::ZERO,
            total_time: Duration::ZERO,
            fired: 0,
        }
    }

    /// Advance the ticker by `delta` and return the number of periods that elapsed
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.accumulated += delta;
        self.total_time += delta;

        let mut fired = 0;
        while self.accumulated >= self.period {
            self.accumulated -= self.period;
            fired += 1;
        }
        self.fired += u64::from(fired);
        fired
    }

    /// Get the ticker period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Get the total time fed into the ticker
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    /// Get the number of times the ticker has fired
    pub fn fire_count(&self) -> u64 {
        self.fired
    }

    /// Reset the ticker to zero
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.total_time = Duration::ZERO;
        self.fired = 0;
    }
}

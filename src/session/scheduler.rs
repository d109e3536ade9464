//! Fixed-frequency tick scheduling.
//!
//! The ticker sleeps away whatever remains of each period after the
//! tick's work is done. If a tick overruns its period the schedule
//! realigns instead of bursting to catch up; sampling is statistical,
//! late ticks carry no debt.

use std::thread;
use std::time::{Duration, Instant};

/// Paces the sampling loop at a configured frequency.
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    /// A ticker firing `frequency_hz` times per second.
    ///
    /// A zero frequency is clamped to one tick per second rather than
    /// dividing by zero.
    pub fn new(frequency_hz: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / f64::from(frequency_hz.max(1)));
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleep until the next tick boundary.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
        }

        self.next += self.period;
        let now = Instant::now();
        if self.next < now {
            // Fell behind; realign to now instead of firing a burst
            self.next = now + self.period;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_from_frequency() {
        assert_eq!(Ticker::new(1000).period(), Duration::from_millis(1));
        assert_eq!(Ticker::new(1).period(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_frequency_clamped() {
        assert_eq!(Ticker::new(0).period(), Duration::from_secs(1));
    }

    #[test]
    fn test_wait_paces_roughly_at_period() {
        let mut ticker = Ticker::new(1000);
        let start = Instant::now();
        for _ in 0..5 {
            ticker.wait();
        }
        let elapsed = start.elapsed();
        // Five 1ms periods; generous upper bound for slow CI
        assert!(elapsed >= Duration::from_millis(4));
        assert!(elapsed < Duration::from_millis(500));
    }
}

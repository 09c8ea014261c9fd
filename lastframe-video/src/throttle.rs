//! Minimum-interval frame gate

use std::time::{Duration, Instant};

/// Drops frames that arrive sooner than the configured interval after the
/// last accepted one.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    min_interval: Option<Duration>,
    last_accepted: Option<Instant>,
}

impl FrameThrottle {
    /// `rate` is in frames per second; `None` or a non-positive rate disables
    /// throttling.
    pub fn new(rate: Option<f64>) -> Self {
        Self {
            min_interval: interval_for(rate),
            last_accepted: None,
        }
    }

    /// Change the rate. The next frame is accepted unconditionally.
    pub fn set_rate(&mut self, rate: Option<f64>) {
        self.min_interval = interval_for(rate);
        self.last_accepted = None;
    }

    pub fn min_interval(&self) -> Option<Duration> {
        self.min_interval
    }

    /// Whether a frame arriving at `now` may proceed
    pub fn is_open(&self, now: Instant) -> bool {
        match self.min_interval {
            Some(interval) => self.is_open_after(now, interval),
            None => true,
        }
    }

    /// Like [`is_open`](Self::is_open) with `interval` in place of the
    /// configured one
    pub fn is_open_after(&self, now: Instant, interval: Duration) -> bool {
        match self.last_accepted {
            Some(last) => now.saturating_duration_since(last) >= interval,
            None => true,
        }
    }

    /// Record a successful accept
    pub fn mark_accepted(&mut self, now: Instant) {
        self.last_accepted = Some(now);
    }
}

fn interval_for(rate: Option<f64>) -> Option<Duration> {
    rate.filter(|fps| fps.is_finite() && *fps > 0.0)
        .map(|fps| Duration::from_nanos((1e9 / fps) as u64))
}

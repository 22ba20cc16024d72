//! Counter-to-rate conversion.
//!
//! In rate mode every incoming value is treated as an absolute counter and
//! replaced by its change per second since the previous record of the same
//! series.

use std::time::{Duration, Instant};

/// Previous raw value and timestamp of one series.
#[derive(Debug, Clone, Default)]
pub struct Derivative {
    previous: Option<(f64, Instant)>,
    last_interval: Option<Duration>,
}

impl Derivative {
    /// Turn `value`, observed at `now`, into a rate.
    ///
    /// - The first sample of a run yields 0 and becomes the reference.
    /// - A zero (or backwards) interval yields 0 and keeps the old reference,
    ///   so the increase shows up in the next measurable interval.
    /// - A negative rate (counter rewind) yields 0; the reference still moves
    ///   to the new, smaller counter value.
    pub fn apply(&mut self, value: f64, now: Instant) -> f64 {
        let Some((prev_value, prev_t)) = self.previous else {
            self.previous = Some((value, now));
            return 0.0;
        };
        let dt = now.saturating_duration_since(prev_t);
        if dt.is_zero() {
            return 0.0;
        }
        self.previous = Some((value, now));
        self.last_interval = Some(dt);
        let rate = (value - prev_value) / dt.as_secs_f64();
        if rate < 0.0 {
            0.0
        } else {
            rate
        }
    }

    /// Interval used for the most recent non-zero rate computation.
    pub fn last_interval(&self) -> Option<Duration> {
        self.last_interval
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Derivative state for both series plus the mode switch.
#[derive(Debug, Clone, Default)]
pub struct RateTransform {
    enabled: bool,
    series: [Derivative; 2],
}

impl RateTransform {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip rate mode. Turning it on starts a fresh run for both series.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if self.enabled {
            self.series.iter_mut().for_each(Derivative::reset);
        }
        self.enabled
    }

    /// Pass a record through the transform. Identity when disabled.
    pub fn apply(&mut self, v1: f64, v2: Option<f64>, now: Instant) -> (f64, Option<f64>) {
        if !self.enabled {
            return (v1, v2);
        }
        let r1 = self.series[0].apply(v1, now);
        let r2 = v2.map(|v| self.series[1].apply(v, now));
        (r1, r2)
    }

    /// Sampling interval shown next to the statistics.
    pub fn last_interval(&self) -> Option<Duration> {
        self.series[0].last_interval()
    }
}

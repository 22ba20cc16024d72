//! Mapping sample values to a number of character rows.

use serde::{Deserialize, Serialize};

/// Spans narrower than this are scaled with [`FALLBACK_SPAN`] instead.
pub const MIN_PLOT_SPAN: f64 = 1e-9;

/// Span used to place values when the real span is degenerate.
pub const FALLBACK_SPAN: f64 = 1.0;

/// Soft and hard limits of the vertical axis.
///
/// Soft limits are the initial window: data may push the axis beyond them but
/// the axis never shrinks inside them. Hard limits pin the axis; samples
/// outside them are flagged instead of scaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisLimits {
    pub soft_min: f64,
    pub soft_max: f64,
    pub hard_min: Option<f64>,
    pub hard_max: Option<f64>,
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self {
            soft_min: 0.0,
            soft_max: 0.0,
            hard_min: None,
            hard_max: None,
        }
    }
}

/// The value range the plot area shows in the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisWindow {
    pub min: f64,
    pub max: f64,
}

impl AxisWindow {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Too narrow to divide by.
    pub fn is_degenerate(&self) -> bool {
        self.span() < MIN_PLOT_SPAN
    }

    /// Span actually used for scaling; never zero.
    fn plot_span(&self) -> f64 {
        if self.is_degenerate() {
            FALLBACK_SPAN
        } else {
            self.span()
        }
    }
}

/// How a sample relates to the configured hard limits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Normal,
    AboveHardMax,
    BelowHardMin,
    Unset,
}

/// Vertical extent of one plot column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Extent {
    /// Rows filled from the bottom of the plot area; 0 only when unset.
    pub rows: usize,
    pub class: Classification,
}

impl Extent {
    pub const UNSET: Extent = Extent {
        rows: 0,
        class: Classification::Unset,
    };

    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self.class,
            Classification::AboveHardMax | Classification::BelowHardMin
        )
    }
}

impl AxisLimits {
    /// Pick the axis window for a frame.
    ///
    /// `observed` is the min/max over the visible data of both series.
    pub fn window(&self, observed: Option<(f64, f64)>) -> AxisWindow {
        let (obs_min, obs_max) = observed.unwrap_or((self.soft_min, self.soft_max));
        let max = self.hard_max.unwrap_or_else(|| self.soft_max.max(obs_max));
        let min = self.hard_min.unwrap_or_else(|| self.soft_min.min(obs_min));
        AxisWindow { min, max }
    }

    /// Map one sample to its column extent.
    pub fn map(&self, value: Option<f64>, window: &AxisWindow, plot_height: usize) -> Extent {
        let Some(v) = value else {
            return Extent::UNSET;
        };
        if plot_height == 0 {
            return Extent::UNSET;
        }
        if self.hard_max.is_some_and(|hm| v > hm) {
            return Extent {
                rows: plot_height,
                class: Classification::AboveHardMax,
            };
        }
        if self.hard_min.is_some_and(|hm| v < hm) {
            return Extent {
                rows: 1,
                class: Classification::BelowHardMin,
            };
        }
        let scaled = ((v - window.min) / window.plot_span() * plot_height as f64).round();
        let rows = if scaled.is_nan() {
            1
        } else {
            (scaled.max(1.0) as usize).min(plot_height)
        };
        Extent {
            rows,
            class: Classification::Normal,
        }
    }

    /// Check the limits are usable: finite, and each hard pair ordered.
    pub fn validate(&self) -> Result<(), String> {
        let all = [
            Some(self.soft_min),
            Some(self.soft_max),
            self.hard_min,
            self.hard_max,
        ];
        if all.iter().flatten().any(|v| !v.is_finite()) {
            return Err("axis limits must be finite numbers".to_string());
        }
        if self.soft_min > self.soft_max {
            return Err(format!(
                "soft minimum {} is above soft maximum {}",
                self.soft_min, self.soft_max
            ));
        }
        if let (Some(lo), Some(hi)) = (self.hard_min, self.hard_max) {
            if lo >= hi {
                return Err(format!("hard minimum {lo} must be below hard maximum {hi}"));
            }
        }
        if let Some(hi) = self.hard_max {
            if self.soft_min >= hi {
                return Err(format!(
                    "soft minimum {} must be below hard maximum {hi}",
                    self.soft_min
                ));
            }
        }
        Ok(())
    }
}

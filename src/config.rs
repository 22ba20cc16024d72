//! Dashboard configuration.
//!
//! Values come from three layers, lowest precedence first: built-in defaults,
//! a YAML file, then command-line flags applied by the binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::{AxisLimits, RecordMode};
use crate::error::{Error, Result};
use crate::hotkeys::Hotkeys;

pub const DEFAULT_TITLE: &str = ".: ttyplot :.";

/// Everything the dashboard needs to know before the first byte arrives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Headline centered on the top row.
    pub title: String,
    /// Unit printed after every value.
    pub unit: String,
    /// Read two values per record and draw two series.
    pub two_series: bool,
    /// Start in rate mode.
    pub rate: bool,
    /// Plot glyph. `None` picks the default for the series count.
    pub plot_char: Option<char>,
    /// Glyph for samples above the hard maximum.
    pub error_char: char,
    /// Glyph for samples below the hard minimum.
    pub error_char_min: char,
    #[serde(flatten)]
    pub limits: AxisLimits,
    pub hotkeys: Hotkeys,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            unit: String::new(),
            two_series: false,
            rate: false,
            plot_char: None,
            error_char: 'e',
            error_char_min: 'v',
            limits: AxisLimits::default(),
            hotkeys: Hotkeys::default(),
        }
    }
}

impl PlotConfig {
    /// `$HOME/.ttyplot/config.yaml`, if `HOME` is set.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".ttyplot").join("config.yaml"))
    }

    pub fn load_from_path(path: &Path) -> Result<PlotConfig> {
        let s = fs::read_to_string(path)
            .map_err(|e| Error::config(Some(path), format!("cannot read file: {}", e)))?;
        let cfg: PlotConfig = serde_yaml::from_str(&s)
            .map_err(|e| Error::config(Some(path), format!("YAML error: {}", e)))?;
        cfg.validate()
            .map_err(|reason| Error::config(Some(path), reason))?;
        Ok(cfg)
    }

    /// Load the default file if there is one; defaults otherwise.
    pub fn load_default() -> Result<PlotConfig> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                log::info!("loading configuration from {:?}", path);
                Self::load_from_path(&path)
            }
            _ => Ok(PlotConfig::default()),
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let s = serde_yaml::to_string(self)
            .map_err(|e| Error::config(Some(path), format!("serialization error: {}", e)))?;
        fs::write(path, s)?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        self.limits.validate()?;
        self.hotkeys.validate()?;
        for (name, ch) in [
            ("plot_char", self.plot_char),
            ("error_char", Some(self.error_char)),
            ("error_char_min", Some(self.error_char_min)),
        ] {
            if ch.is_some_and(char::is_control) {
                return Err(format!("{} must be a printable character", name));
            }
        }
        Ok(())
    }

    pub fn record_mode(&self) -> RecordMode {
        if self.two_series {
            RecordMode::Pair
        } else {
            RecordMode::Single
        }
    }

    /// The glyph actually used for the plot line.
    ///
    /// In two-series mode the second series is drawn in reverse video, which
    /// reads best with a plain bar.
    pub fn effective_plot_char(&self) -> char {
        self.plot_char
            .unwrap_or(if self.two_series { '|' } else { '│' })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = PlotConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.record_mode(), RecordMode::Single);
        assert_eq!(cfg.effective_plot_char(), '│');
    }

    #[test]
    fn two_series_defaults_to_ascii_bar() {
        let cfg = PlotConfig {
            two_series: true,
            ..Default::default()
        };
        assert_eq!(cfg.effective_plot_char(), '|');
        assert_eq!(cfg.record_mode(), RecordMode::Pair);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg: PlotConfig = serde_yaml::from_str("title: cpu\nhard_max: 100.0\n").unwrap();
        assert_eq!(cfg.title, "cpu");
        assert_eq!(cfg.limits.hard_max, Some(100.0));
        assert_eq!(cfg.limits.soft_max, 0.0);
        assert_eq!(cfg.error_char, 'e');
        assert_eq!(cfg.hotkeys, Hotkeys::default());
    }

    #[test]
    fn control_glyph_is_rejected() {
        let cfg = PlotConfig {
            error_char: '\n',
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}

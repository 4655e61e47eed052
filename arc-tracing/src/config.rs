//! Viewer configuration
//!
//! Loaded from an optional TOML file. Every field has a default, so an
//! empty file or no file at all gives the stock behavior; command-line flags
//! override individual values afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{ConfigError, Zoom, DEFAULT_ZOOM_LEVEL, ZOOMS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Expected frame interval in microseconds (60 Hz).
    pub target_frame_time_us: u64,
    /// How many times the CPU detail view is zoomed relative to the overview.
    pub zoom_factor: f64,
    /// Minimum width in pixels of the CPU detail bands.
    pub detail_min_width: f64,
    /// Share of the window width the CPU detail view tries to use.
    pub detail_width_fraction: f64,
    /// Window of the smoothed FPS rate, microseconds.
    pub fps_window_us: u64,
    /// Step of the smoothed FPS rate, microseconds.
    pub fps_step_us: u64,
    /// Initial index into the zoom table.
    pub zoom_level: usize,
    /// Width of the viewing window in pixels.
    pub window_width: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            target_frame_time_us: 16_667,
            zoom_factor: 4.0,
            detail_min_width: 600.0,
            detail_width_fraction: 0.8,
            fps_window_us: 500_000,
            fps_step_us: 50_000,
            zoom_level: DEFAULT_ZOOM_LEVEL,
            window_width: 1280.0,
        }
    }
}

impl ViewConfig {
    /// Load from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file can't be read, is not valid TOML, or
    /// holds an out-of-range value.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse from TOML text.
    ///
    /// # Errors
    /// Returns an error if the text is not valid TOML or holds an
    /// out-of-range value.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_frame_time_us == 0 {
            return Err(ConfigError::InvalidValue("target_frame_time_us must be positive".into()));
        }
        if self.zoom_factor <= 0.0 {
            return Err(ConfigError::InvalidValue("zoom_factor must be positive".into()));
        }
        if self.fps_window_us == 0 || self.fps_step_us == 0 {
            return Err(ConfigError::InvalidValue(
                "fps_window_us and fps_step_us must be positive".into(),
            ));
        }
        if self.zoom_level >= ZOOMS.len() {
            return Err(ConfigError::InvalidValue(format!(
                "zoom_level must be below {}, got {}",
                ZOOMS.len(),
                self.zoom_level
            )));
        }
        if !(self.detail_width_fraction > 0.0 && self.detail_width_fraction <= 1.0) {
            return Err(ConfigError::InvalidValue(
                "detail_width_fraction must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn zoom(&self) -> Zoom {
        Zoom::new(self.zoom_level)
    }
}

//! Report configuration.
//!
//! The shipped defaults live in `default.toml`, embedded at compile time.
//! A user config may set any subset of keys; the rest fall back to the
//! same defaults.

use std::path::Path;

use qrtrack_heatmap_models::HeatmapOptions;
use serde::{Deserialize, Serialize};

use crate::ReportError;

/// The embedded default config, verbatim.
pub const DEFAULT_CONFIG: &str = include_str!("../default.toml");

/// How many rows of each summary table to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    /// Rows kept per category table.
    pub top_n: usize,
    /// Cities kept per country.
    pub top_cities: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            top_n: 5,
            top_cities: 5,
        }
    }
}

/// Full report configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Heat map tunables.
    pub heatmap: HeatmapOptions,
    /// Summary table sizes.
    pub summary: SummaryOptions,
}

impl ReportConfig {
    /// Parses and validates a TOML config.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if the TOML is malformed, or
    /// [`ReportError::InvalidConfig`] if a value is out of range.
    pub fn from_toml(source: &str) -> Result<Self, ReportError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path`, or the embedded defaults when no path
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if the file cannot be read, parsed or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ReportError> {
        let Some(path) = path else {
            return Self::from_toml(DEFAULT_CONFIG);
        };

        let source = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })?;

        log::debug!("Loaded config from {}", path.display());
        Self::from_toml(&source)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidConfig`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ReportError> {
        let heatmap = &self.heatmap;

        if !(heatmap.radius.is_finite() && heatmap.radius > 0.0) {
            return Err(invalid(format!(
                "heatmap.radius must be a positive number of degrees, got {}",
                heatmap.radius
            )));
        }

        for (key, value) in [
            ("heatmap.canvas.width", heatmap.canvas.width),
            ("heatmap.canvas.height", heatmap.canvas.height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{key} must be positive, got {value}")));
            }
        }

        for (key, value) in [
            ("heatmap.marker.base", heatmap.marker.base),
            ("heatmap.marker.range", heatmap.marker.range),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{key} must not be negative, got {value}")));
            }
        }

        Ok(())
    }
}

const fn invalid(message: String) -> ReportError {
    ReportError::InvalidConfig { message }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scan report assembly.
//!
//! Glues the aggregation crates to the outside world: loads scan payloads
//! and report configuration, applies the optional "last N days" window,
//! then runs the categorical summary and the heat map over the same scan
//! snapshot.

pub mod config;
pub mod load;
pub mod render;
pub mod window;

use chrono::{DateTime, Utc};
use qrtrack_analytics_models::AnalyticsSummary;
use qrtrack_heatmap_models::Heatmap;
use qrtrack_scan_models::ScanRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{DEFAULT_CONFIG, ReportConfig, SummaryOptions};

/// Errors that can occur while loading inputs for a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// The file path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The scan payload is not valid JSON or has the wrong shape.
    #[error("Invalid scan payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The config file is not valid TOML or has the wrong shape.
    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    /// A config value is out of range.
    #[error("Invalid config: {message}")]
    InvalidConfig {
        /// Description of what went wrong.
        message: String,
    },
}

/// Summary and heat map computed from one scan snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Window the scans were filtered to, if any.
    pub window_days: Option<u32>,
    /// Categorical summary, cut to the configured top-N.
    pub summary: AnalyticsSummary,
    /// Heat map of located scans.
    pub heatmap: Heatmap,
}

/// Categorical summary cut to the configured table sizes.
#[must_use]
pub fn summary(scans: &[ScanRecord], options: &SummaryOptions) -> AnalyticsSummary {
    qrtrack_analytics::summarize(scans).truncated(options.top_n, options.top_cities)
}

/// Filters `scans` to the window ending at `now` and builds a [`Report`].
#[must_use]
pub fn generate(
    scans: Vec<ScanRecord>,
    days: Option<u32>,
    now: DateTime<Utc>,
    config: &ReportConfig,
) -> Report {
    let scans = window::within_days(scans, days, now);

    Report {
        window_days: days.filter(|d| *d > 0),
        summary: summary(&scans, &config.summary),
        heatmap: qrtrack_heatmap::build(&scans, &config.heatmap),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};
    use qrtrack_analytics_models::CategoryKey;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
    }

    fn scan(id: i64, days_ago: i64, browser: &str, coords: Option<(f64, f64)>) -> ScanRecord {
        let mut s = ScanRecord::new(id, format!("10.0.0.{id}"), now() - TimeDelta::days(days_ago));
        s.browser = Some(browser.to_string());
        if let Some((lat, lon)) = coords {
            s.latitude = Some(lat.into());
            s.longitude = Some(lon.into());
        }
        s
    }

    fn fixture() -> Vec<ScanRecord> {
        vec![
            scan(1, 30, "Chrome", Some((10.0, 10.0))),
            scan(2, 3, "Chrome", Some((10.1, 10.1))),
            scan(3, 2, "Safari", Some((50.0, 50.0))),
            scan(4, 1, "Firefox", None),
            scan(5, 1, "Edge", None),
            scan(6, 0, "Opera", None),
            scan(7, 0, "Brave", None),
        ]
    }

    #[test]
    fn all_time_report() {
        let mut config = ReportConfig::default();
        config.heatmap.radius = 20.0;

        let report = generate(fixture(), None, now(), &config);

        assert_eq!(report.window_days, None);
        assert_eq!(report.summary.total_scans, 7);
        assert_eq!(report.summary.unique_visitors, 7);
        assert_eq!(report.summary.top_browsers.len(), 5);
        assert_eq!(
            report.summary.top_browsers[0].name,
            CategoryKey::Known("Chrome".to_string())
        );
        assert_eq!(report.heatmap.located_scans, 3);
        assert_eq!(report.heatmap.points.len(), 2);
        assert_eq!(report.heatmap.max_count, 2);
    }

    #[test]
    fn windowed_report_filters_before_aggregating() {
        let report = generate(fixture(), Some(7), now(), &ReportConfig::default());

        assert_eq!(report.window_days, Some(7));
        assert_eq!(report.summary.total_scans, 6);
        assert_eq!(report.heatmap.located_scans, 2);
        assert_eq!(report.heatmap.points.len(), 2);
        assert_eq!(report.heatmap.max_count, 1);
    }

    #[test]
    fn zero_day_window_is_all_time() {
        let report = generate(fixture(), Some(0), now(), &ReportConfig::default());
        assert_eq!(report.window_days, None);
        assert_eq!(report.summary.total_scans, 7);
    }

    #[test]
    fn empty_report() {
        let report = generate(Vec::new(), Some(30), now(), &ReportConfig::default());
        assert_eq!(report.summary, AnalyticsSummary::default());
        assert!(report.heatmap.points.is_empty());
        assert!(report.heatmap.bounds.is_none());

        let text = render::ReportText(&report).to_string();
        assert!(text.starts_with("Period: last 30 days\n"));
        assert!(text.contains("No scan locations available yet"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = generate(fixture(), None, now(), &ReportConfig::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["total_scans"], 7);
        assert_eq!(json["heatmap"]["points"][0]["count"], 2);
        assert_eq!(json["heatmap"]["points"][1]["count"], 1);
        assert!(json["heatmap"]["points"][0]["intensity"].is_number());
    }
}

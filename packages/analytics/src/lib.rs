#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Categorical aggregation over a scan history.
//!
//! [`summarize`] builds the full [`AnalyticsSummary`] for whatever scan
//! snapshot it is given: totals, unique visitors, and descending frequency
//! tables for browser, OS, device and country (with nested cities). Tables
//! are returned in full; cutting them to a top-N is up to the caller.

pub mod tables;

use std::collections::BTreeSet;

use qrtrack_analytics_models::{AnalyticsSummary, CategoryDimension};
use qrtrack_scan_models::ScanRecord;

pub use tables::{country_table, frequency_table};

/// Number of distinct IP addresses among `scans`.
#[must_use]
pub fn unique_visitors(scans: &[ScanRecord]) -> u64 {
    scans
        .iter()
        .map(|s| s.ip_address.as_str())
        .collect::<BTreeSet<_>>()
        .len() as u64
}

/// Aggregates a scan set into an [`AnalyticsSummary`].
#[must_use]
pub fn summarize(scans: &[ScanRecord]) -> AnalyticsSummary {
    let table = |dimension: CategoryDimension| {
        frequency_table(scans.iter().map(|s| dimension.value_of(s)))
    };

    let summary = AnalyticsSummary {
        total_scans: scans.len() as u64,
        unique_visitors: unique_visitors(scans),
        top_browsers: table(CategoryDimension::Browser),
        top_os: table(CategoryDimension::Os),
        top_devices: table(CategoryDimension::Device),
        top_countries: country_table(scans),
    };

    log::debug!(
        "Summarized {} scans from {} visitors",
        summary.total_scans,
        summary.unique_visitors
    );

    summary
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use qrtrack_analytics_models::CategoryKey;

    use super::*;

    fn scan(ip: &str, browser: Option<&str>) -> ScanRecord {
        let mut s = ScanRecord::new(0, ip, Utc::now());
        s.browser = browser.map(str::to_string);
        s
    }

    #[test]
    fn empty_scan_list() {
        let summary = summarize(&[]);
        assert_eq!(summary, AnalyticsSummary::default());
        assert_eq!(summary.total_scans, 0);
        assert_eq!(summary.unique_visitors, 0);
        assert!(summary.top_browsers.is_empty());
        assert!(summary.top_os.is_empty());
        assert!(summary.top_devices.is_empty());
        assert!(summary.top_countries.is_empty());
    }

    #[test]
    fn browser_table_with_unknown() {
        let scans = vec![
            scan("1.1.1.1", Some("Chrome")),
            scan("1.1.1.2", None),
            scan("1.1.1.1", Some("Chrome")),
        ];
        let summary = summarize(&scans);

        assert_eq!(summary.total_scans, 3);
        assert_eq!(summary.unique_visitors, 2);
        assert_eq!(summary.top_browsers.len(), 2);
        assert_eq!(
            summary.top_browsers[0].name,
            CategoryKey::Known("Chrome".to_string())
        );
        assert_eq!(summary.top_browsers[0].count, 2);
        assert_eq!(summary.top_browsers[1].name, CategoryKey::Unknown);
        assert_eq!(summary.top_browsers[1].count, 1);
    }

    #[test]
    fn every_dimension_sums_to_total() {
        let browsers = [Some("Chrome"), Some("Safari"), None, Some("")];
        let oses = [Some("iOS"), None, Some("Android")];
        let devices = [None, Some("iPhone")];
        let countries = [Some("Brazil"), None, Some("Japan"), Some("Brazil"), Some(" ")];

        let scans: Vec<ScanRecord> = (0..37usize)
            .map(|i| {
                let mut s = scan(&format!("10.0.{}.1", i % 11), browsers[i % browsers.len()]);
                s.os = oses[i % oses.len()].map(str::to_string);
                s.device = devices[i % devices.len()].map(str::to_string);
                s.country = countries[i % countries.len()].map(str::to_string);
                s
            })
            .collect();

        let summary = summarize(&scans);
        assert_eq!(summary.total_scans, 37);
        assert_eq!(summary.unique_visitors, 11);
        assert!(summary.unique_visitors <= summary.total_scans);

        for dimension in CategoryDimension::all() {
            let sum: u64 = summary.counts(*dimension).iter().map(|(_, n)| n).sum();
            assert_eq!(sum, summary.total_scans, "{dimension} does not sum to total");

            let counts: Vec<u64> = summary.counts(*dimension).iter().map(|(_, n)| *n).collect();
            assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{dimension} not sorted");
        }
    }

    #[test]
    fn unique_visitors_are_exact() {
        let scans = vec![scan("a", None), scan("b", None), scan("a", None), scan("c", None)];
        assert_eq!(unique_visitors(&scans), 3);
    }
}

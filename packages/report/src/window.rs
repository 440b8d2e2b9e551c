//! "Last N days" filtering, applied before any aggregation.

use chrono::{DateTime, TimeDelta, Utc};
use qrtrack_scan_models::ScanRecord;

/// Keeps scans made at or after `now - days`.
///
/// `None` and `Some(0)` both mean "all time". A window reaching past the
/// earliest representable date keeps everything.
#[must_use]
pub fn within_days(scans: Vec<ScanRecord>, days: Option<u32>, now: DateTime<Utc>) -> Vec<ScanRecord> {
    let Some(days) = days.filter(|d| *d > 0) else {
        return scans;
    };

    let Some(cutoff) = TimeDelta::try_days(i64::from(days)).and_then(|d| now.checked_sub_signed(d))
    else {
        return scans;
    };

    let total = scans.len();
    let kept: Vec<ScanRecord> = scans
        .into_iter()
        .filter(|scan| scan.scanned_at >= cutoff)
        .collect();

    log::info!(
        "{} of {total} scans fall within the last {days} days",
        kept.len()
    );

    kept
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scan analytics summary types.
//!
//! Frequency tables over the categorical fields of a scan history (browser,
//! OS, device, country with nested cities) plus the scalar totals shown on
//! the analytics page. Scans whose field is missing are counted under
//! [`CategoryKey::Unknown`] rather than dropped.

use std::fmt;

use qrtrack_scan_models::{ScanRecord, non_blank};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Key of a frequency-table row.
///
/// Serialized as the plain name, or `null` for [`Self::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryKey {
    /// A reported value.
    Known(String),
    /// The field was missing or blank.
    Unknown,
}

impl CategoryKey {
    /// Builds a key from an optional field value. Surrounding whitespace is
    /// trimmed; missing or blank values map to [`Self::Unknown`].
    #[must_use]
    pub fn from_field(value: Option<&str>) -> Self {
        non_blank(value).map_or(Self::Unknown, |v| Self::Known(v.trim().to_string()))
    }

    /// The reported name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Known(name) => Some(name.as_str()),
            Self::Unknown => None,
        }
    }

    /// Whether this is the unknown bucket.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(name) => f.write_str(name),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Category value.
    pub name: CategoryKey,
    /// Number of scans.
    pub count: u64,
}

/// A country row with its own city breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
    /// Country name.
    pub name: CategoryKey,
    /// Number of scans from this country.
    pub count: u64,
    /// Cities within this country, descending by count.
    pub top_cities: Vec<CategoryCount>,
}

/// A categorical field of a scan.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategoryDimension {
    /// Browser family.
    Browser,
    /// Operating system family.
    Os,
    /// Device family.
    Device,
    /// Country name.
    Country,
}

impl CategoryDimension {
    /// Returns all variants in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Browser, Self::Os, Self::Device, Self::Country]
    }

    /// Reads this dimension's raw value from a scan.
    #[must_use]
    pub fn value_of(self, scan: &ScanRecord) -> Option<&str> {
        match self {
            Self::Browser => scan.browser.as_deref(),
            Self::Os => scan.os.as_deref(),
            Self::Device => scan.device.as_deref(),
            Self::Country => scan.country.as_deref(),
        }
    }

    /// Section heading for rendered reports.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Browser => "Browsers",
            Self::Os => "Operating systems",
            Self::Device => "Devices",
            Self::Country => "Countries",
        }
    }
}

/// Aggregated analytics for one scan set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    /// Number of scans.
    pub total_scans: u64,
    /// Number of distinct IP addresses.
    pub unique_visitors: u64,
    /// Browser table.
    pub top_browsers: Vec<CategoryCount>,
    /// Operating system table.
    pub top_os: Vec<CategoryCount>,
    /// Device table.
    pub top_devices: Vec<CategoryCount>,
    /// Country table with nested cities.
    pub top_countries: Vec<CountryCount>,
}

impl AnalyticsSummary {
    /// Flat `(key, count)` view of one dimension's table.
    #[must_use]
    pub fn counts(&self, dimension: CategoryDimension) -> Vec<(&CategoryKey, u64)> {
        match dimension {
            CategoryDimension::Browser => pairs(&self.top_browsers),
            CategoryDimension::Os => pairs(&self.top_os),
            CategoryDimension::Device => pairs(&self.top_devices),
            CategoryDimension::Country => self
                .top_countries
                .iter()
                .map(|c| (&c.name, c.count))
                .collect(),
        }
    }

    /// Copy of this summary with every table cut to its first `limit` rows
    /// and every country's city list cut to `city_limit` rows. Totals are
    /// left untouched.
    #[must_use]
    pub fn truncated(&self, limit: usize, city_limit: usize) -> Self {
        Self {
            total_scans: self.total_scans,
            unique_visitors: self.unique_visitors,
            top_browsers: top_n(&self.top_browsers, limit),
            top_os: top_n(&self.top_os, limit),
            top_devices: top_n(&self.top_devices, limit),
            top_countries: self
                .top_countries
                .iter()
                .take(limit)
                .map(|c| CountryCount {
                    name: c.name.clone(),
                    count: c.count,
                    top_cities: top_n(&c.top_cities, city_limit),
                })
                .collect(),
        }
    }
}

fn pairs(table: &[CategoryCount]) -> Vec<(&CategoryKey, u64)> {
    table.iter().map(|c| (&c.name, c.count)).collect()
}

/// The first `n` rows of an already sorted table.
#[must_use]
pub fn top_n<T: Clone>(table: &[T], n: usize) -> Vec<T> {
    table.iter().take(n).cloned().collect()
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw scan record types as published by the dashboard API.
//!
//! A [`ScanRecord`] is one logged scan of a tracked QR code, enriched at
//! scan time with user-agent and IP geolocation data. Any of that metadata
//! may be missing because the lookups can fail, so nearly every field is
//! optional. Records are read-only input for the aggregation crates.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A latitude or longitude as it arrives over the wire.
///
/// The geolocation service stores coordinates as decimal strings, but
/// hand-built payloads commonly use plain JSON numbers. Both are accepted
/// and validated lazily by [`Coordinate::degrees`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    /// A JSON number.
    Number(f64),
    /// A numeric string such as `"-23.5505"`.
    Text(String),
}

impl Coordinate {
    /// Returns the coordinate in decimal degrees, or `None` if it does not
    /// parse or is not finite.
    #[must_use]
    pub fn degrees(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A single scan of a tracked code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Scan ID assigned by the storage layer.
    pub id: i64,
    /// Client IP address.
    pub ip_address: String,
    /// Browser family (e.g. "Chrome Mobile").
    #[serde(default)]
    pub browser: Option<String>,
    /// Browser version string.
    #[serde(default)]
    pub browser_version: Option<String>,
    /// Operating system family.
    #[serde(default)]
    pub os: Option<String>,
    /// Operating system version string.
    #[serde(default)]
    pub os_version: Option<String>,
    /// Device family (e.g. "iPhone", "Other").
    #[serde(default)]
    pub device: Option<String>,
    /// Country name from IP geolocation.
    #[serde(default)]
    pub country: Option<String>,
    /// City name from IP geolocation.
    #[serde(default)]
    pub city: Option<String>,
    /// Latitude in decimal degrees.
    #[serde(default)]
    pub latitude: Option<Coordinate>,
    /// Longitude in decimal degrees.
    #[serde(default)]
    pub longitude: Option<Coordinate>,
    /// IANA timezone name.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Internet service provider.
    #[serde(default)]
    pub isp: Option<String>,
    /// When the scan happened.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub scanned_at: DateTime<Utc>,
}

impl ScanRecord {
    /// Creates a record with only the required fields set.
    #[must_use]
    pub fn new(id: i64, ip_address: impl Into<String>, scanned_at: DateTime<Utc>) -> Self {
        Self {
            id,
            ip_address: ip_address.into(),
            browser: None,
            browser_version: None,
            os: None,
            os_version: None,
            device: None,
            country: None,
            city: None,
            latitude: None,
            longitude: None,
            timezone: None,
            isp: None,
            scanned_at,
        }
    }

    /// Converts this scan into a raw [`LocationPoint`].
    ///
    /// Returns `None` when either coordinate is missing, unparseable or
    /// non-finite. Blank city/country names are dropped.
    #[must_use]
    pub fn location(&self) -> Option<LocationPoint> {
        let latitude = self.latitude.as_ref()?.degrees()?;
        let longitude = self.longitude.as_ref()?.degrees()?;

        Some(LocationPoint {
            latitude,
            longitude,
            count: 1,
            city: non_blank(self.city.as_deref()).map(str::to_string),
            country: non_blank(self.country.as_deref()).map(str::to_string),
        })
    }
}

/// Returns the value if it contains anything other than whitespace.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accepts both RFC 3339 timestamps and the naive ISO 8601 form the API
/// emits for UTC datetimes (`2025-03-01T14:22:05.123456`).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid scanned_at '{raw}': {e}")))
}

/// A geographic point fed to the clusterer.
///
/// Raw points always have `count == 1`; the same shape is reused for
/// aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Number of scans represented by this point.
    pub count: u64,
    /// City name, if known.
    pub city: Option<String>,
    /// Country name, if known.
    pub country: Option<String>,
}

impl LocationPoint {
    /// Creates a raw point with no place names.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            count: 1,
            city: None,
            country: None,
        }
    }

    /// Sets the city and country names.
    #[must_use]
    pub fn with_place(mut self, city: Option<&str>, country: Option<&str>) -> Self {
        self.city = city.map(str::to_string);
        self.country = country.map(str::to_string);
        self
    }
}

/// Scan data as accepted from the storage collaborator.
///
/// Either a bare array of scans or the full analytics response object, in
/// which case only its `scans` array is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScanPayload {
    /// `[ {...}, {...} ]`
    Scans(Vec<ScanRecord>),
    /// `{ "qr_code": {...}, "scans": [ ... ], ... }`
    Response {
        /// Scans embedded in the response.
        scans: Vec<ScanRecord>,
    },
}

impl ScanPayload {
    /// Unwraps the payload into its scan list.
    #[must_use]
    pub fn into_scans(self) -> Vec<ScanRecord> {
        match self {
            Self::Scans(scans) | Self::Response { scans } => scans,
        }
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cluster and heat point types for the scan-location heat map.
//!
//! A [`Cluster`] is the aggregate of nearby scan locations. A [`HeatPoint`]
//! decorates a cluster with the presentation values (intensity, marker
//! size, canvas position) the map renderer needs.

use qrtrack_scan_models::LocationPoint;
use serde::{Deserialize, Serialize};

/// Default per-axis merge radius in degrees.
pub const DEFAULT_RADIUS: f64 = 5.0;

/// An aggregate of one or more scan locations.
///
/// The coordinates are those of the first point absorbed (the anchor) and
/// never move as more points join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Anchor latitude in decimal degrees.
    pub latitude: f64,
    /// Anchor longitude in decimal degrees.
    pub longitude: f64,
    /// Number of raw points absorbed.
    pub count: u64,
    /// First non-blank city seen among absorbed points.
    pub city: Option<String>,
    /// First non-blank country seen among absorbed points.
    pub country: Option<String>,
}

impl Cluster {
    /// Opens a new cluster anchored at `point`, holding just that point.
    #[must_use]
    pub fn anchored_at(point: &LocationPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
            count: 1,
            city: point.city.clone(),
            country: point.country.clone(),
        }
    }

    /// Human-readable place name, available only when both the city and
    /// the country are known.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match (&self.city, &self.country) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            _ => None,
        }
    }
}

impl From<Cluster> for LocationPoint {
    fn from(cluster: Cluster) -> Self {
        Self {
            latitude: cluster.latitude,
            longitude: cluster.longitude,
            count: cluster.count,
            city: cluster.city,
            country: cluster.country,
        }
    }
}

/// Linear mapping from intensity to marker size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerScale {
    /// Size of a marker at zero intensity.
    pub base: f64,
    /// Extra size added at full intensity.
    pub range: f64,
}

impl MarkerScale {
    /// Marker size for an intensity in `[0, 1]`.
    #[must_use]
    pub fn size(&self, intensity: f64) -> f64 {
        intensity.mul_add(self.range, self.base)
    }
}

impl Default for MarkerScale {
    fn default() -> Self {
        Self {
            base: 30.0,
            range: 40.0,
        }
    }
}

/// Dimensions of the planar canvas clusters are projected onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapCanvas {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
}

impl Default for MapCanvas {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 600.0,
        }
    }
}

/// Tunables for building a heat map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapOptions {
    /// Per-axis merge radius in degrees.
    pub radius: f64,
    /// Number of clusters listed as top locations.
    pub top_locations: usize,
    /// Marker sizing.
    pub marker: MarkerScale,
    /// Projection canvas.
    pub canvas: MapCanvas,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            top_locations: 10,
            marker: MarkerScale::default(),
            canvas: MapCanvas::default(),
        }
    }
}

/// A cluster with its derived presentation values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    /// The underlying cluster.
    #[serde(flatten)]
    pub cluster: Cluster,
    /// `count / max_count`, in `[0, 1]`.
    pub intensity: f64,
    /// Marker size.
    pub size: f64,
    /// Projected canvas x.
    pub x: f64,
    /// Projected canvas y.
    pub y: f64,
    /// "City, Country" when both are known.
    pub label: Option<String>,
}

/// Geographic bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    /// Southern latitude.
    pub south: f64,
    /// Western longitude.
    pub west: f64,
    /// Northern latitude.
    pub north: f64,
    /// Eastern longitude.
    pub east: f64,
}

/// Everything a renderer needs to draw the scan heat map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    /// Scans that had usable coordinates.
    pub located_scans: u64,
    /// Largest cluster count, floored at 1.
    pub max_count: u64,
    /// All clusters in creation order.
    pub points: Vec<HeatPoint>,
    /// Busiest clusters, descending by count.
    pub top_locations: Vec<HeatPoint>,
    /// Padded bounding box of all anchors.
    pub bounds: Option<MapBounds>,
}

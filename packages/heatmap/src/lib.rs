#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scan-location heat map.
//!
//! Turns the located subset of a scan history into a short list of
//! clusters and decorates each with the intensity, marker size and canvas
//! position a map renderer needs. Everything is recomputed from the full
//! scan set on each call; nothing is cached between calls.

pub mod cluster;
pub mod projection;

pub use cluster::{cluster, cluster_with_assignments, intensity, max_cluster_count};

use qrtrack_heatmap_models::{Cluster, Heatmap, HeatmapOptions, HeatPoint, MapCanvas, MarkerScale};
use qrtrack_scan_models::{LocationPoint, ScanRecord};

/// Extracts clusterable points from scans, in scan order.
///
/// Scans without usable coordinates are skipped.
#[must_use]
pub fn locations(scans: &[ScanRecord]) -> Vec<LocationPoint> {
    let points: Vec<LocationPoint> = scans.iter().filter_map(ScanRecord::location).collect();

    let skipped = scans.len() - points.len();
    if skipped > 0 {
        log::debug!(
            "{skipped} of {} scans have no usable coordinates",
            scans.len()
        );
    }

    points
}

/// Derives intensity, marker size, canvas position and label for each
/// cluster. Output order matches input order.
#[must_use]
pub fn heat_points(clusters: &[Cluster], marker: &MarkerScale, canvas: &MapCanvas) -> Vec<HeatPoint> {
    let max_count = max_cluster_count(clusters);

    clusters
        .iter()
        .map(|cluster| {
            let intensity = intensity(cluster.count, max_count);
            let position = projection::project(cluster.latitude, cluster.longitude, canvas);
            HeatPoint {
                cluster: cluster.clone(),
                intensity,
                size: marker.size(intensity),
                x: position.x,
                y: position.y,
                label: cluster.label(),
            }
        })
        .collect()
}

/// The `limit` busiest heat points, descending by count. Ties keep their
/// original order.
#[must_use]
pub fn top_locations(points: &[HeatPoint], limit: usize) -> Vec<HeatPoint> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| b.cluster.count.cmp(&a.cluster.count));
    sorted.truncate(limit);
    sorted
}

/// Clusters the located scans and assembles the full [`Heatmap`].
#[must_use]
pub fn build(scans: &[ScanRecord], options: &HeatmapOptions) -> Heatmap {
    let points = locations(scans);
    let clusters = cluster(&points, options.radius);

    log::info!(
        "{} scans from {} locations (radius {}°)",
        points.len(),
        clusters.len(),
        options.radius
    );

    let heat = heat_points(&clusters, &options.marker, &options.canvas);
    let top = top_locations(&heat, options.top_locations);
    let bounds = projection::bounds(&clusters, projection::BOUNDS_PADDING)
        .map(|rect| projection::to_map_bounds(&rect));

    Heatmap {
        located_scans: points.len() as u64,
        max_count: max_cluster_count(&clusters),
        points: heat,
        top_locations: top,
        bounds,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn located(id: i64, lat: f64, lon: f64, city: Option<&str>) -> ScanRecord {
        let mut scan = ScanRecord::new(id, format!("10.0.0.{id}"), Utc::now());
        scan.latitude = Some(lat.into());
        scan.longitude = Some(lon.into());
        scan.city = city.map(str::to_string);
        scan.country = city.map(|_| "Brazil".to_string());
        scan
    }

    #[test]
    fn locations_skip_scans_without_coordinates() {
        let mut unlocated = ScanRecord::new(99, "1.2.3.4", Utc::now());
        unlocated.latitude = Some(1.0.into());

        let scans = vec![located(1, 1.0, 1.0, None), unlocated, located(2, 2.0, 2.0, None)];
        let points = locations(&scans);
        assert_eq!(points.len(), 2);
        assert!((points[1].latitude - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn heat_points_scale_with_intensity() {
        let clusters = cluster(
            &[
                LocationPoint::new(10.0, 10.0),
                LocationPoint::new(10.1, 10.1),
                LocationPoint::new(50.0, 50.0),
            ],
            20.0,
        );
        let heat = heat_points(&clusters, &MarkerScale::default(), &MapCanvas::default());

        assert_eq!(heat.len(), 2);
        assert!((heat[0].intensity - 1.0).abs() < f64::EPSILON);
        assert!((heat[0].size - 70.0).abs() < f64::EPSILON);
        assert!((heat[1].intensity - 0.5).abs() < f64::EPSILON);
        assert!((heat[1].size - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn top_locations_sort_descending_and_truncate() {
        let points: Vec<LocationPoint> = [(0.0, 0.0), (40.0, 40.0), (40.1, 40.1), (-40.0, 0.0)]
            .iter()
            .map(|&(lat, lon)| LocationPoint::new(lat, lon))
            .collect();
        let heat = heat_points(
            &cluster(&points, 5.0),
            &MarkerScale::default(),
            &MapCanvas::default(),
        );

        let top = top_locations(&heat, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].cluster.count, 2);
        assert!((top[1].cluster.latitude - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn build_from_scans() {
        let scans = vec![
            located(1, -8.05, -34.9, Some("Recife")),
            located(2, -8.1, -34.95, None),
            located(3, -23.55, -46.63, Some("Sao Paulo")),
            ScanRecord::new(4, "10.0.0.4", Utc::now()),
        ];
        let heatmap = build(&scans, &HeatmapOptions::default());

        assert_eq!(heatmap.located_scans, 3);
        assert_eq!(heatmap.max_count, 2);
        assert_eq!(heatmap.points.len(), 2);
        assert_eq!(heatmap.points[0].label.as_deref(), Some("Recife, Brazil"));
        assert_eq!(heatmap.top_locations[0].cluster.count, 2);
        assert!(heatmap.bounds.is_some());
    }

    #[test]
    fn build_from_no_scans() {
        let heatmap = build(&[], &HeatmapOptions::default());
        assert_eq!(heatmap.located_scans, 0);
        assert_eq!(heatmap.max_count, 1);
        assert!(heatmap.points.is_empty());
        assert!(heatmap.top_locations.is_empty());
        assert!(heatmap.bounds.is_none());
    }
}

//! Anchor-based greedy clustering of scan locations.
//!
//! Each point joins the first existing cluster whose anchor lies strictly
//! within `radius` degrees on both axes, otherwise it opens a new cluster.
//! Anchors never re-center, and the threshold is a flat per-axis degree
//! distance rather than a geodesic one, so clusters stretch near the poles
//! and do not wrap across the antimeridian.

use qrtrack_heatmap_models::Cluster;
use qrtrack_scan_models::LocationPoint;

/// Returns `true` if `point` is strictly within `radius` of the cluster's
/// anchor on both axes.
#[must_use]
pub fn is_within_radius(cluster: &Cluster, point: &LocationPoint, radius: f64) -> bool {
    (cluster.latitude - point.latitude).abs() < radius
        && (cluster.longitude - point.longitude).abs() < radius
}

/// Adds one point to a cluster, backfilling place names that are still
/// unset. Earlier points keep precedence.
fn absorb(cluster: &mut Cluster, point: &LocationPoint) {
    cluster.count += 1;

    if cluster.city.is_none() {
        cluster.city.clone_from(&point.city);
    }
    if cluster.country.is_none() {
        cluster.country.clone_from(&point.country);
    }
}

/// Clusters `points` and also returns, for every input point, the index of
/// the cluster that absorbed it.
///
/// Points are folded in input order; cluster indices follow creation order.
#[must_use]
pub fn cluster_with_assignments(
    points: &[LocationPoint],
    radius: f64,
) -> (Vec<Cluster>, Vec<usize>) {
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut assignments = Vec::with_capacity(points.len());

    for point in points {
        if let Some(idx) = clusters
            .iter()
            .position(|c| is_within_radius(c, point, radius))
        {
            absorb(&mut clusters[idx], point);
            assignments.push(idx);
        } else {
            assignments.push(clusters.len());
            clusters.push(Cluster::anchored_at(point));
        }
    }

    (clusters, assignments)
}

/// Groups nearby points into clusters.
///
/// Callers must drop points with non-finite coordinates beforehand
/// ([`qrtrack_scan_models::ScanRecord::location`] already does).
#[must_use]
pub fn cluster(points: &[LocationPoint], radius: f64) -> Vec<Cluster> {
    cluster_with_assignments(points, radius).0
}

/// Largest cluster count, floored at 1 so it is always a safe divisor.
#[must_use]
pub fn max_cluster_count(clusters: &[Cluster]) -> u64 {
    clusters.iter().map(|c| c.count).max().unwrap_or(1).max(1)
}

/// `count / max_count`, clamped to `[0, 1]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn intensity(count: u64, max_count: u64) -> f64 {
    (count as f64 / max_count.max(1) as f64).clamp(0.0, 1.0)
}

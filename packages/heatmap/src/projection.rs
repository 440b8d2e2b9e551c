//! Planar placement helpers for drawing clusters.
//!
//! These are display conveniences only: a linear equirectangular mapping
//! onto a fixed canvas and a padded bounding box for framing a map view.

use geo::{BoundingRect, Coord, MultiPoint, Rect};
use qrtrack_heatmap_models::{Cluster, MapBounds, MapCanvas};

/// Fraction of the bounding box extent added on every side.
pub const BOUNDS_PADDING: f64 = 0.1;

/// Maps a latitude/longitude onto the canvas. `(0, 0)` is the north-west
/// corner (lat 90, lon -180).
#[must_use]
pub fn project(latitude: f64, longitude: f64, canvas: &MapCanvas) -> Coord<f64> {
    Coord {
        x: (longitude + 180.0) / 360.0 * canvas.width,
        y: (90.0 - latitude) * (canvas.height / 180.0),
    }
}

/// Bounding rectangle of all cluster anchors, grown by `padding` times its
/// width and height on each side. `x` is longitude and `y` latitude.
///
/// Returns `None` when there are no clusters.
#[must_use]
pub fn bounds(clusters: &[Cluster], padding: f64) -> Option<Rect<f64>> {
    let anchors: MultiPoint<f64> = clusters
        .iter()
        .map(|c| (c.longitude, c.latitude))
        .collect::<Vec<_>>()
        .into();

    let rect = anchors.bounding_rect()?;
    let dx = rect.width() * padding;
    let dy = rect.height() * padding;

    Some(Rect::new(
        Coord {
            x: rect.min().x - dx,
            y: rect.min().y - dy,
        },
        Coord {
            x: rect.max().x + dx,
            y: rect.max().y + dy,
        },
    ))
}

/// Converts a longitude/latitude rectangle into [`MapBounds`].
#[must_use]
pub fn to_map_bounds(rect: &Rect<f64>) -> MapBounds {
    MapBounds {
        south: rect.min().y,
        west: rect.min().x,
        north: rect.max().y,
        east: rect.max().x,
    }
}

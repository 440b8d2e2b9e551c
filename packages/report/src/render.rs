//! Plain-text rendering for terminal output.

use std::fmt;

use qrtrack_analytics_models::{AnalyticsSummary, CategoryDimension, CategoryKey};
use qrtrack_heatmap_models::Heatmap;

use crate::Report;

const NAME_WIDTH: usize = 32;

/// Displays an [`AnalyticsSummary`] as aligned text tables.
pub struct SummaryText<'a>(pub &'a AnalyticsSummary);

/// Displays a [`Heatmap`] as a location list.
pub struct HeatmapText<'a>(pub &'a Heatmap);

/// Displays a full [`Report`].
pub struct ReportText<'a>(pub &'a Report);

fn row(f: &mut fmt::Formatter<'_>, indent: usize, name: &CategoryKey, count: u64) -> fmt::Result {
    let width = NAME_WIDTH.saturating_sub(indent);
    writeln!(f, "{:indent$}{:<width$} {count:>6}", "", name.to_string())
}

impl fmt::Display for SummaryText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;

        writeln!(f, "Total scans:     {}", summary.total_scans)?;
        writeln!(f, "Unique visitors: {}", summary.unique_visitors)?;

        for dimension in CategoryDimension::all() {
            writeln!(f)?;
            writeln!(f, "{}", dimension.title())?;

            if summary.counts(*dimension).is_empty() {
                writeln!(f, "  (no data)")?;
                continue;
            }

            if *dimension == CategoryDimension::Country {
                for country in &summary.top_countries {
                    row(f, 2, &country.name, country.count)?;
                    for city in &country.top_cities {
                        row(f, 6, &city.name, city.count)?;
                    }
                }
            } else {
                for (name, count) in summary.counts(*dimension) {
                    row(f, 2, name, count)?;
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for HeatmapText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heatmap = self.0;

        if heatmap.points.is_empty() {
            return writeln!(f, "No scan locations available yet");
        }

        writeln!(
            f,
            "{} scans from {} locations",
            heatmap.located_scans,
            heatmap.points.len()
        )?;

        if let Some(bounds) = &heatmap.bounds {
            writeln!(
                f,
                "Bounds: {:.2}°..{:.2}° lat, {:.2}°..{:.2}° lon",
                bounds.south, bounds.north, bounds.west, bounds.east
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Top locations")?;
        for point in &heatmap.top_locations {
            let place = point
                .label
                .clone()
                .unwrap_or_else(|| "Unknown location".to_string());
            let coords = format!(
                "({:.2}°, {:.2}°)",
                point.cluster.latitude, point.cluster.longitude
            );
            writeln!(
                f,
                "  {place:<width$} {coords:<20} {:>6} scans  {:>3.0}%",
                point.cluster.count,
                point.intensity * 100.0,
                width = NAME_WIDTH - 2,
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        match report.window_days {
            Some(days) => writeln!(f, "Period: last {days} days")?,
            None => writeln!(f, "Period: all time")?,
        }
        writeln!(f)?;
        write!(f, "{}", SummaryText(&report.summary))?;
        writeln!(f)?;
        write!(f, "{}", HeatmapText(&report.heatmap))
    }
}

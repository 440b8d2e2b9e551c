#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for QR scan analytics.
//!
//! Reads a scan export (a JSON array of scans, or the dashboard's analytics
//! response) and prints the categorical summary, the location heat map, or
//! both, as text or JSON.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use qrtrack_report::render::{HeatmapText, ReportText, SummaryText};
use qrtrack_report::{DEFAULT_CONFIG, ReportConfig, load, window};
use qrtrack_scan_models::ScanRecord;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "qrtrack_cli", about = "QR scan analytics reports")]
struct Cli {
    /// Report config file (TOML). Uses the built-in defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Totals and top browsers, OS, devices and countries
    Summary {
        #[command(flatten)]
        input: InputArgs,
        /// Rows kept per table
        #[arg(long)]
        top: Option<usize>,
    },
    /// Scan location clusters
    Heatmap {
        #[command(flatten)]
        input: InputArgs,
        /// Per-axis merge radius in degrees
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Summary and heat map together
    Report {
        #[command(flatten)]
        input: InputArgs,
        /// Rows kept per table
        #[arg(long)]
        top: Option<usize>,
        /// Per-axis merge radius in degrees
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Print the built-in config
    DefaultConfig,
}

#[derive(Args)]
struct InputArgs {
    /// Scan export JSON file, or `-` for stdin
    #[arg(long, short)]
    input: PathBuf,
    /// Only include scans from the last N days
    #[arg(long)]
    days: Option<u32>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn read_input(path: &Path) -> Result<Vec<ScanRecord>, qrtrack_report::ReportError> {
    if path == Path::new("-") {
        let scans = load::read_scans(std::io::stdin().lock())?;
        log::info!("Loaded {} scans from stdin", scans.len());
        Ok(scans)
    } else {
        load::load_scans(path)
    }
}

fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl Display,
) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => print!("{text}"),
    }
    Ok(())
}

fn apply_overrides(
    config: &mut ReportConfig,
    top: Option<usize>,
    radius: Option<f64>,
) -> Result<(), qrtrack_report::ReportError> {
    if let Some(top) = top {
        config.summary.top_n = top;
    }
    if let Some(radius) = radius {
        config.heatmap.radius = radius;
    }
    config.validate()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = ReportConfig::load(cli.config.as_deref())?;
    let now = Utc::now();

    match cli.command {
        Commands::Summary { input, top } => {
            apply_overrides(&mut config, top, None)?;
            let scans = window::within_days(read_input(&input.input)?, input.days, now);
            let summary = qrtrack_report::summary(&scans, &config.summary);
            emit(input.format, &summary, SummaryText(&summary))?;
        }
        Commands::Heatmap { input, radius } => {
            apply_overrides(&mut config, None, radius)?;
            let scans = window::within_days(read_input(&input.input)?, input.days, now);
            let heatmap = qrtrack_heatmap::build(&scans, &config.heatmap);
            emit(input.format, &heatmap, HeatmapText(&heatmap))?;
        }
        Commands::Report { input, top, radius } => {
            apply_overrides(&mut config, top, radius)?;
            let scans = read_input(&input.input)?;
            let report = qrtrack_report::generate(scans, input.days, now, &config);
            emit(input.format, &report, ReportText(&report))?;
        }
        Commands::DefaultConfig => print!("{DEFAULT_CONFIG}"),
    }

    Ok(())
}

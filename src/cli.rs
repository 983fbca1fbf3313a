//! Command-line interface parsing for Manzanita Tides
//!
//! This module handles parsing of CLI arguments using clap: how many days
//! of predictions to show and whether to bypass the cache.

use clap::Parser;

/// Manzanita Tides - view NOAA high/low tide predictions
#[derive(Parser, Debug)]
#[command(name = "manzanita")]
#[command(about = "High/low tide predictions for Manzanita, Oregon (NOAA station 9437908)")]
#[command(version)]
pub struct Cli {
    /// Number of days of predictions to show, starting today
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=31))]
    pub days: u32,

    /// Ignore the cached record and fetch fresh predictions
    #[arg(long)]
    pub refresh: bool,

    /// Print the raw prediction batch as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

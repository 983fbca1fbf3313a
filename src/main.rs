//! Manzanita Tides - NOAA high/low tide predictions for Manzanita, Oregon
//!
//! Fetches tide predictions from the NOAA CO-OPS API for the Nehalem Bay
//! reference station and caches them on disk so repeated invocations don't
//! hit the network.

use chrono::Utc;
use clap::Parser;

use manzanita::cache::CacheStore;
use manzanita::cli::Cli;
use manzanita::data::{date_range, PredictionsResponse, TideService, TideType};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let service = TideService::new(CacheStore::new());
    let (begin_date, end_date) = date_range(Utc::now(), cli.days);

    let batch = service
        .hilo_predictions(&begin_date, &end_date, cli.refresh)
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        print_table(&batch);
    }

    Ok(())
}

/// Prints the prediction batch as a plain-text table
fn print_table(batch: &PredictionsResponse) {
    if batch.predictions.is_empty() {
        println!("No predictions available for the requested range.");
        return;
    }

    println!("{:<18}  {:<4}  {:>8}", "Time (GMT)", "Tide", "Height");
    for prediction in &batch.predictions {
        let label = match prediction.tide_type {
            TideType::High => "High",
            TideType::Low => "Low",
        };
        println!(
            "{:<18}  {:<4}  {:>5} ft",
            prediction.time, label, prediction.value
        );
    }
}

//! Sensorstats CLI
//!
//! Command-line interface for Sensorstats:
//! - Query a running server
//! - Run a query locally against a CSV file
//! - Check server status
//! - Generate a config file

use clap::{Args, Parser, Subcommand};
use sensorstats::config::generate_default_config;
use sensorstats::dataset::{CsvLoader, DatasetStore};
use sensorstats::query::{AggregateResult, QueryFilter, QueryService};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "sensorstats")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cached count/avg/min/max over sensor readings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8000", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

/// Filter flags shared by `stats` and `query`
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Location to match (case-insensitive)
    #[arg(short, long)]
    pub location: Option<String>,
    /// Sensor to match (case-insensitive)
    #[arg(short, long)]
    pub sensor: Option<String>,
    /// Inclusive start date/datetime
    #[arg(long)]
    pub start: Option<String>,
    /// Inclusive end date/datetime
    #[arg(long)]
    pub end: Option<String>,
}

impl From<FilterArgs> for QueryFilter {
    fn from(args: FilterArgs) -> Self {
        QueryFilter {
            location: args.location,
            sensor: args.sensor,
            start_date: args.start,
            end_date: args.end,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a running server for stats
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Load a CSV locally and run a query against it
    Query {
        /// Path to the readings CSV
        #[arg(long)]
        csv: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let client = reqwest::Client::new();

    match cli.command {
        Commands::Stats { filter } => {
            let filter = QueryFilter::from(filter);

            let response = client
                .get(format!("{}/api/v1/stats", cli.api_url))
                .query(&filter)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("Query failed ({}): {}", status, text);
                std::process::exit(1);
            }

            let cache = response
                .headers()
                .get("x-cache")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string();

            let data: serde_json::Value = response.json().await?;

            match cli.format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&data)?);
                }
                _ => {
                    let stats: AggregateResult = serde_json::from_value(data["stats"].clone())?;
                    print_table(&stats);
                    println!();
                    println!("Cache: {}", cache);
                }
            }
        }

        Commands::Query { csv, filter } => {
            if !csv.exists() {
                eprintln!("File not found: {:?}", csv);
                std::process::exit(1);
            }

            let load_start = Instant::now();
            let (dataset, report) = CsvLoader::new().load(&csv)?;
            println!(
                "Loaded {} rows ({} dropped) in {:?}",
                report.rows_loaded,
                report.rows_dropped,
                load_start.elapsed()
            );
            for error in report.errors.iter().take(5) {
                println!("  {}", error);
            }
            println!();

            let service = QueryService::new(DatasetStore::loaded(dataset));
            let filter = QueryFilter::from(filter);

            // Run twice so the second pass shows the cached path
            for _ in 0..2 {
                let start = Instant::now();
                let outcome = match service.execute(&filter) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        eprintln!("Query failed: {}", e);
                        std::process::exit(1);
                    }
                };
                let elapsed = start.elapsed();

                match cli.format.as_str() {
                    "json" => {
                        let body = serde_json::json!({ "stats": *outcome.result });
                        println!("{}", serde_json::to_string_pretty(&body)?);
                    }
                    _ => print_table(&outcome.result),
                }
                println!("Cache: {} ({:?})", outcome.cache, elapsed);
                println!();
            }
        }

        Commands::Status => {
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Sensorstats v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Dataset: {} ({} rows)",
                        health["dataset"].as_str().unwrap_or("unknown"),
                        health["dataset_rows"].as_u64().unwrap_or(0)
                    );
                    println!(
                        "Cached queries: {}",
                        health["cache_entries"].as_u64().unwrap_or(0)
                    );

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Sensorstats API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the Sensorstats API server is running:");
                    eprintln!("  cargo run --bin sensorstats");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    std::fs::write(&path, config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Print an aggregate as a two-column table
fn print_table(stats: &AggregateResult) {
    let fmt = |v: Option<f64>| v.map(|x| format!("{:.4}", x)).unwrap_or_else(|| "-".to_string());

    println!("{:<8} {}", "Stat", "Value");
    println!("{}", "-".repeat(24));
    println!("{:<8} {}", "count", stats.count);
    println!("{:<8} {}", "avg", fmt(stats.avg));
    println!("{:<8} {}", "min", fmt(stats.min));
    println!("{:<8} {}", "max", fmt(stats.max));
}

/// Format seconds as a human-readable duration
fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

//! ligtas CLI - farm registry server and soil-acidity predictions
//!
//! - `serve`: run the HTTP API (farm submissions, registry, model info)
//! - `predict`: one-off prediction for a location and measurements
//! - `locations`: print the baseline table
//! - `importance`: rank the model's input features

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "ligtas",
    author,
    version,
    about = "Farm registry with soil-acidity prediction",
    long_about = "Record farm locations and predict soil acidity from a frozen \
                  gradient-boosted classifier plus per-location baseline measurements."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Predict soil acidity for one set of measurements
    Predict(commands::predict::PredictArgs),
    /// Show the per-location baseline table
    Locations(commands::inspect::LocationsArgs),
    /// Rank model features by importance
    Importance(commands::inspect::ImportanceArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Predict(args) => commands::run_predict(args)?,
        Commands::Locations(args) => commands::run_locations(args)?,
        Commands::Importance(args) => commands::run_importance(args)?,
    }

    Ok(())
}

//! Read-only views of the baseline table and the loaded model

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use ligtas_core::{top_features, LocationCode, BASELINE_FIELDS, DEFAULT_TOP_FEATURES};

use super::{load_predictor, model_path};

#[derive(Parser, Debug)]
pub struct LocationsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ImportanceArgs {
    /// Number of features to show
    #[arg(long, short = 'n', default_value_t = DEFAULT_TOP_FEATURES)]
    pub top: usize,

    /// Path to the JSON-exported classifier (default from config)
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct LocationRow {
    code: LocationCode,
    baseline: &'static [f64; 9],
}

pub fn run_locations(args: LocationsArgs) -> Result<()> {
    if args.json {
        let rows: Vec<LocationRow> = LocationCode::all()
            .into_iter()
            .map(|code| LocationRow {
                code,
                baseline: code.baseline(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    print!("{:<6}", "code");
    for field in BASELINE_FIELDS {
        print!("{:>10}", field);
    }
    println!();

    for code in LocationCode::all() {
        print!("{:<6}", code.as_str());
        for value in code.baseline() {
            print!("{:>10}", value);
        }
        println!();
    }

    Ok(())
}

pub fn run_importance(args: ImportanceArgs) -> Result<()> {
    let path = model_path(args.model)?;
    let predictor = load_predictor(&path)?;
    let ranked = top_features(predictor.model(), args.top);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    println!("📊 Feature importance ({} trees)", predictor.model().n_trees());
    for (rank, entry) in ranked.iter().enumerate() {
        println!("  {:>2}. {:<14} {:>6.2}%", rank + 1, entry.feature, entry.importance);
    }

    Ok(())
}

//! One-off prediction from the command line
//!
//! Measurements not given on the command line count as 0, matching how the
//! submission form treats blank fields.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use ligtas_core::{parse_measurement, LocationCode, Measurements};

use super::{load_predictor, model_path};

#[derive(Parser, Debug)]
pub struct PredictArgs {
    /// Location code (Loc1..Loc5)
    #[arg(long, short = 'l')]
    pub location: LocationCode,

    #[arg(long, default_value_t = 0.0, value_parser = measurement)]
    pub rainfall: f64,

    /// Hydrogen
    #[arg(long = "h", default_value_t = 0.0, value_parser = measurement)]
    pub h: f64,

    #[arg(long, default_value_t = 0.0, value_parser = measurement)]
    pub zn: f64,

    #[arg(long, default_value_t = 0.0, value_parser = measurement)]
    pub mn: f64,

    #[arg(long, default_value_t = 0.0, value_parser = measurement)]
    pub fe: f64,

    #[arg(long, default_value_t = 0.0, value_parser = measurement)]
    pub cu: f64,

    #[arg(long, default_value_t = 0.0, value_parser = measurement)]
    pub p: f64,

    #[arg(long, default_value_t = 0.0, value_parser = measurement)]
    pub na: f64,

    #[arg(long, default_value_t = 0.0, value_parser = measurement)]
    pub n: f64,

    /// Path to the JSON-exported classifier (default from config)
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// Print the full prediction as JSON
    #[arg(long)]
    pub json: bool,
}

/// Same rule as the submission form: a finite number, blank means 0
fn measurement(raw: &str) -> Result<f64, String> {
    parse_measurement("measurement", Some(raw)).map_err(|_| "must be a finite number".to_owned())
}

impl PredictArgs {
    fn measurements(&self) -> Measurements {
        Measurements::from_array([
            self.rainfall,
            self.h,
            self.zn,
            self.mn,
            self.fe,
            self.cu,
            self.p,
            self.na,
            self.n,
        ])
    }
}

pub fn run_predict(args: PredictArgs) -> Result<()> {
    let path = model_path(args.model.clone())?;
    let predictor = load_predictor(&path)?;

    let prediction = predictor.predict(args.location, &args.measurements())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    println!("📍 Location:    {}", prediction.location);
    println!("🧪 Prediction:  {}", prediction.label);
    println!("   Class:       {}", prediction.class_name);
    println!("   Probability: {:.3}", prediction.probability);

    Ok(())
}

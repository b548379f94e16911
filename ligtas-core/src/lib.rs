//! ligtas-core: soil-acidity inference for registered farms
//!
//! Holds everything that does not need a database or an HTTP stack:
//! - the fixed per-location baseline table
//! - parsing of user-supplied soil measurements
//! - assembly of the 18-slot feature vector
//! - loading and evaluating the frozen oblivious-tree classifier
//! - feature importance derived from the model's leaves
//! - configuration loading

pub mod config;
pub mod error;
pub mod features;
pub mod importance;
pub mod location;
pub mod model;
pub mod predictor;

pub use config::LigtasConfig;
pub use error::{LigtasError, Result};
pub use features::{
    parse_measurement, FeatureVector, Measurements, FEATURE_COUNT, FEATURE_NAMES, MEASUREMENT_FIELDS,
};
pub use importance::{feature_importance, top_features, FeatureImportance, DEFAULT_TOP_FEATURES};
pub use location::{LocationCode, BASELINE_FIELDS};
pub use model::{ClassLabel, ClassPrediction, SoilModel};
pub use predictor::{SoilPrediction, SoilPredictor};

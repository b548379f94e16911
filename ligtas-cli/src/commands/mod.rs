//! Command implementations for ligtas CLI

pub mod inspect;
pub mod predict;
pub mod serve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ligtas_core::{LigtasConfig, SoilModel, SoilPredictor};

pub use inspect::{run_importance, run_locations};
pub use predict::run_predict;
pub use serve::run_serve;

/// Config is read only by commands that need it
pub(crate) fn load_config() -> Result<LigtasConfig> {
    LigtasConfig::load().context("Failed to load configuration")
}

/// `--model` wins; otherwise the configured path
pub(crate) fn model_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag {
        Some(path) => Ok(path),
        None => Ok(load_config()?.model.path),
    }
}

/// Load the frozen model and check it fits the 18-slot feature layout
pub(crate) fn load_predictor(path: &Path) -> Result<SoilPredictor> {
    let model = SoilModel::load(path)
        .with_context(|| format!("Failed to load model from {}", path.display()))?;
    SoilPredictor::new(model).context("Model does not match the farm feature layout")
}

/// Structured error types for ligtas-core.
///
/// Library consumers get `thiserror` enums; the `ligtas` binary wraps them
/// in `anyhow` with context.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ligtas-core operations
#[derive(Error, Debug)]
pub enum LigtasError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing failed
    #[error("JSON error in {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Model file not found
    #[error("Model not found: {path:?}")]
    ModelNotFound { path: PathBuf },

    /// Model file parsed but is structurally unusable
    #[error("Invalid model format: {reason}")]
    ModelFormat { reason: String },

    /// Feature vector length does not match what the model reads
    #[error("Feature count mismatch: model expects {expected}, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    /// Location code not present in the baseline table
    #[error("Unknown location code '{code}'")]
    UnknownLocation { code: String },

    /// A measurement field could not be parsed as a finite number
    #[error("Invalid value for {field}: '{value}'")]
    InvalidMeasurement { field: &'static str, value: String },
}

/// Convenience Result type for ligtas-core operations
pub type Result<T> = std::result::Result<T, LigtasError>;

impl LigtasError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a model format error
    pub fn model_format(reason: impl Into<String>) -> Self {
        Self::ModelFormat {
            reason: reason.into(),
        }
    }
}

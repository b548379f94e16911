//! Validation error types

use std::fmt;

use ligtas_core::LigtasError;

/// Rejected user input
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required field missing or blank
    Empty { field: &'static str },

    /// Field exceeds maximum length (in characters)
    TooLong { field: &'static str, max: usize },

    /// Field has characters or shape we don't store
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Measurement is not a finite number
    InvalidNumber { field: &'static str, value: String },

    /// Body or query string could not be decoded at all
    Malformed { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::InvalidNumber { field, value } => {
                write!(f, "{} must be a number, got '{}'", field, value)
            }
            Self::Malformed { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Map input-shaped core errors; anything else is not a validation problem.
    pub fn from_core(err: &LigtasError) -> Option<Self> {
        match err {
            LigtasError::InvalidMeasurement { field, value } => Some(Self::InvalidNumber {
                field: *field,
                value: value.clone(),
            }),
            _ => None,
        }
    }
}

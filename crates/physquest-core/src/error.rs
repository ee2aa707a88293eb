//! Error types shared by the simulations and puzzles.

use thiserror::Error;

/// Rejected simulation setup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("{name} must be a finite number")]
    NonFinite { name: &'static str },

    #[error("dataset has no samples")]
    EmptyDataset,

    #[error("expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

impl SimError {
    /// Reject non-finite values.
    pub fn check_finite(name: &'static str, value: f64) -> Result<f64, SimError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(SimError::NonFinite { name })
        }
    }

    /// Reject values that are not strictly positive.
    pub fn check_positive(name: &'static str, value: f64) -> Result<f64, SimError> {
        Self::check_finite(name, value)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(SimError::InvalidParameter {
                name,
                value,
                reason: "must be greater than zero",
            })
        }
    }
}

/// Rejected text answer typed by the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{field}: '{input}' is not a number")]
    NotANumber { field: &'static str, input: String },
}

/// Parse a numeric text answer, trimming surrounding whitespace.
pub fn parse_answer(field: &'static str, input: &str) -> Result<f64, InputError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::NotANumber {
            field,
            input: input.to_string(),
        })
}

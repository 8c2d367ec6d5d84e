//! Error types for the localizer

use super::types::Mode;
use thiserror::Error;

/// Errors surfaced by filter operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocalizationError {
    /// A parameter was rejected at the call that introduced it
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A coordinate lookup fell outside the grid
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    /// Normalization was attempted on an all-zero or non-finite distribution
    #[error("cannot normalize belief: total probability mass is {total}")]
    DegenerateDistribution { total: f64 },

    /// The operation is not available in the current mode
    #[error("`{operation}` is not available in {mode} mode")]
    WrongMode { operation: &'static str, mode: Mode },
}

impl LocalizationError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        LocalizationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LocalizationError>;

/// Check that a rate lies in `[0, 1]`
pub(crate) fn validate_rate(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(LocalizationError::invalid(
            name,
            format!("must be within [0, 1], got {}", value),
        ))
    }
}

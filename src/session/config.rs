//! Session configuration

use crate::common::error::{validate_rate, LocalizationError, Result};
use crate::grid::GridTopology;
use crate::world::validate_identity_count;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Grid extent, identity palette size and randomness source of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    /// How many palette identities the world draws from
    pub identity_count: usize,
    /// Fixed seed for reproducible sessions; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            width: 5,
            height: 1,
            identity_count: 2,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Check every field, returning the grid topology it describes
    pub fn validate(&self) -> Result<GridTopology> {
        validate_identity_count(self.identity_count)?;
        GridTopology::new(self.width, self.height)
    }

    /// Configure the session with named parameters
    ///
    /// Recognized keys are `width`, `height`, `identity_count` and `seed`.
    /// Nothing is applied unless every value is valid.
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<()> {
        let mut updated = *self;

        if let Some(&width) = params.get("width") {
            updated.width = whole_number("width", width)? as usize;
        }

        if let Some(&height) = params.get("height") {
            updated.height = whole_number("height", height)? as usize;
        }

        if let Some(&identity_count) = params.get("identity_count") {
            updated.identity_count = whole_number("identity_count", identity_count)? as usize;
        }

        if let Some(&seed) = params.get("seed") {
            updated.seed = Some(whole_number("seed", seed)?);
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn whole_number(name: &'static str, value: f64) -> Result<u64> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Ok(value as u64)
    } else {
        Err(LocalizationError::invalid(
            name,
            format!("must be a non-negative whole number, got {}", value),
        ))
    }
}

/// Noise rates of the motion and sensor models
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParameters {
    /// Probability the sensor reading is wrong
    pub sensor_error_rate: f64,
    /// Probability a commanded step does not happen
    pub motion_failure_rate: f64,
}

impl NoiseParameters {
    /// Check that both rates lie in `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        validate_rate("sensor_error_rate", self.sensor_error_rate)?;
        validate_rate("motion_failure_rate", self.motion_failure_rate)?;
        Ok(())
    }
}

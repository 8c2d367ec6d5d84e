//! Belief grid
//!
//! Holds the probability mass function over every cell of the grid. Updates
//! are staged into a fresh matrix and committed through [`BeliefGrid::commit`],
//! which normalizes the candidate before it replaces the live distribution.

use super::GridTopology;
use crate::common::error::{LocalizationError, Result};
use crate::common::types::Cell;
use nalgebra::DMatrix;

/// Probability of the agent occupying each cell (rows are `y`, columns are `x`)
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefGrid {
    topology: GridTopology,
    probabilities: DMatrix<f64>,
}

impl BeliefGrid {
    /// Create a uniform belief over the grid
    pub fn uniform(topology: GridTopology) -> Self {
        BeliefGrid {
            topology,
            probabilities: DMatrix::from_element(
                topology.height(),
                topology.width(),
                1.0 / topology.cell_count() as f64,
            ),
        }
    }

    /// Create a belief from row-major cell weights, normalizing them
    pub fn from_probabilities(topology: GridTopology, values: &[f64]) -> Result<Self> {
        if values.len() != topology.cell_count() {
            return Err(LocalizationError::invalid(
                "probabilities",
                format!(
                    "expected {} values for a {}x{} grid, got {}",
                    topology.cell_count(),
                    topology.width(),
                    topology.height(),
                    values.len()
                ),
            ));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(LocalizationError::invalid(
                "probabilities",
                format!("entries must be finite and non-negative, got {}", bad),
            ));
        }

        let matrix = DMatrix::from_row_slice(topology.height(), topology.width(), values);
        Ok(BeliefGrid {
            topology,
            probabilities: normalized(matrix)?,
        })
    }

    /// Reset every cell to `1 / (width * height)`
    pub fn reset(&mut self) {
        self.probabilities
            .fill(1.0 / self.topology.cell_count() as f64);
    }

    pub fn topology(&self) -> GridTopology {
        self.topology
    }

    /// Probability held by a single cell
    pub fn probability(&self, cell: Cell) -> Result<f64> {
        self.topology.index_of(cell)?;
        Ok(self.probabilities[(cell.y, cell.x)])
    }

    /// Read-only access to the underlying matrix
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.probabilities
    }

    /// Copy of all probabilities in row-major order
    pub fn values(&self) -> Vec<f64> {
        self.topology
            .cells()
            .map(|cell| self.probabilities[(cell.y, cell.x)])
            .collect()
    }

    /// Total probability mass
    pub fn total(&self) -> f64 {
        self.probabilities.sum()
    }

    /// Divide every cell by the total mass
    ///
    /// Fails with `DegenerateDistribution` when the total is zero or not
    /// finite; the grid is left untouched in that case.
    pub fn normalize(&mut self) -> Result<()> {
        self.probabilities = normalized(self.probabilities.clone())?;
        Ok(())
    }

    /// Normalize `candidate` and make it the live distribution
    pub(crate) fn commit(&mut self, candidate: DMatrix<f64>) -> Result<()> {
        debug_assert_eq!(candidate.shape(), self.probabilities.shape());
        self.probabilities = normalized(candidate)?;
        Ok(())
    }

    /// Largest cell probability
    pub fn max_probability(&self) -> f64 {
        self.probabilities
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Linearly interpolated percentile over all cell values, `p` in `[0, 100]`
    pub fn percentile(&self, p: f64) -> Result<f64> {
        if !(0.0..=100.0).contains(&p) {
            return Err(LocalizationError::invalid(
                "percentile",
                format!("must be within [0, 100], got {}", p),
            ));
        }
        let mut values: Vec<f64> = self.probabilities.iter().copied().collect();
        Ok(linear_percentile(&mut values, p))
    }
}

fn normalized(mut matrix: DMatrix<f64>) -> Result<DMatrix<f64>> {
    let total = matrix.sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(LocalizationError::DegenerateDistribution { total });
    }
    for value in matrix.iter_mut() {
        *value /= total;
    }
    Ok(matrix)
}

/// Percentile with linear interpolation between closest ranks
fn linear_percentile(values: &mut [f64], p: f64) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let rank = p / 100.0 * (values.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    values[lower] + (values[upper] - values[lower]) * (rank - lower as f64)
}

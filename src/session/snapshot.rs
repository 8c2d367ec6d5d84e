//! Immutable belief snapshots handed to presentation layers

use crate::common::error::Result;
use crate::common::types::{Cell, Mode};
use crate::grid::belief::BeliefGrid;
use crate::world::{Identity, WorldModel};
use serde::Serialize;
use std::fmt;

/// Probabilities below this never count as a candidate
const CANDIDATE_FLOOR: f64 = 0.01;

/// How strongly a renderer should mark a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Highlight {
    /// Holds the maximum probability
    Leading,
    /// At or above the 75th percentile (and at least 1%)
    Candidate,
    /// Neither leading nor a candidate
    Plain,
}

/// A copy of the belief and everything needed to display it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeliefSnapshot {
    width: usize,
    height: usize,
    mode: Mode,
    probabilities: Vec<f64>,
    identities: Vec<Identity>,
    highlights: Vec<Highlight>,
    max_probability: f64,
    percentile_75: f64,
    true_position: Option<Cell>,
    last_observation: Option<Identity>,
}

impl BeliefSnapshot {
    pub(crate) fn capture(
        belief: &BeliefGrid,
        world: &WorldModel,
        mode: Mode,
        last_observation: Option<Identity>,
    ) -> Result<Self> {
        let topology = belief.topology();
        let probabilities = belief.values();
        let max_probability = belief.max_probability();
        let percentile_75 = belief.percentile(75.0)?;

        let highlights = probabilities
            .iter()
            .map(|&p| {
                if p == max_probability {
                    Highlight::Leading
                } else if p >= percentile_75 && p >= CANDIDATE_FLOOR {
                    Highlight::Candidate
                } else {
                    Highlight::Plain
                }
            })
            .collect();

        Ok(BeliefSnapshot {
            width: topology.width(),
            height: topology.height(),
            mode,
            probabilities,
            identities: world.identities().to_vec(),
            highlights,
            max_probability,
            percentile_75,
            true_position: match mode {
                Mode::Inspection => Some(world.true_position()),
                Mode::Game => None,
            },
            last_observation,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// All probabilities in row-major order
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn probability(&self, cell: Cell) -> Option<f64> {
        self.index(cell).map(|i| self.probabilities[i])
    }

    pub fn identity(&self, cell: Cell) -> Option<Identity> {
        self.index(cell).map(|i| self.identities[i])
    }

    pub fn highlight(&self, cell: Cell) -> Option<Highlight> {
        self.index(cell).map(|i| self.highlights[i])
    }

    pub fn max_probability(&self) -> f64 {
        self.max_probability
    }

    pub fn percentile_75(&self) -> f64 {
        self.percentile_75
    }

    /// The agent cell; only revealed in inspection mode
    pub fn true_position(&self) -> Option<Cell> {
        self.true_position
    }

    pub fn last_observation(&self) -> Option<Identity> {
        self.last_observation
    }

    /// Probability as a percentage rounded to two decimals, e.g. `33.33%`
    pub fn percent_label(&self, cell: Cell) -> Option<String> {
        self.probability(cell).map(percent_label)
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        (cell.x < self.width && cell.y < self.height).then(|| cell.y * self.width + cell.x)
    }
}

/// Halves round to even, so `0.125%` reads `0.12%`
fn percent_label(probability: f64) -> String {
    let percent = (probability * 100.0 * 100.0).round_ties_even() / 100.0;
    if percent.fract() == 0.0 {
        format!("{:.1}%", percent)
    } else {
        format!("{}%", percent)
    }
}

impl fmt::Display for BeliefSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let i = y * self.width + x;
                let marker = match self.highlights[i] {
                    Highlight::Leading => '#',
                    Highlight::Candidate => '+',
                    Highlight::Plain => ' ',
                };
                let agent = if self.true_position == Some(Cell { x, y }) {
                    '@'
                } else {
                    ' '
                };
                write!(
                    f,
                    "[{}{} {:>7}{}]",
                    agent,
                    self.identities[i].symbol(),
                    percent_label(self.probabilities[i]),
                    marker
                )?;
            }
            writeln!(f)?;
        }
        if let Some(observed) = self.last_observation {
            writeln!(f, "sensor: {}", observed)?;
        }
        Ok(())
    }
}

//! Ground truth of the simulated world
//!
//! The world knows where the agent really is and which identity each cell
//! carries. Identities are what the sensor reports; neighbouring cells may
//! share one, which is what makes a single reading ambiguous.

use crate::common::error::{LocalizationError, Result};
use crate::common::types::Cell;
use crate::grid::GridTopology;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sensor-observable label of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity {
    Red,
    Blue,
    Green,
    Yellow,
    Cyan,
}

impl Identity {
    /// The full palette; worlds draw from a prefix of it
    pub const ALL: [Identity; 5] = [
        Identity::Red,
        Identity::Blue,
        Identity::Green,
        Identity::Yellow,
        Identity::Cyan,
    ];

    /// Single-letter tag for compact rendering
    pub fn symbol(self) -> char {
        match self {
            Identity::Red => 'R',
            Identity::Blue => 'B',
            Identity::Green => 'G',
            Identity::Yellow => 'Y',
            Identity::Cyan => 'C',
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// True agent position and per-cell identities
#[derive(Debug, Clone, PartialEq)]
pub struct WorldModel {
    topology: GridTopology,
    true_position: Cell,
    // Row-major, one entry per cell
    identities: Vec<Identity>,
}

impl WorldModel {
    /// Draw a random start position and independent random identities
    ///
    /// Each cell takes one of the first `identity_count` palette entries.
    pub fn random<R: Rng + ?Sized>(
        topology: GridTopology,
        identity_count: usize,
        rng: &mut R,
    ) -> Result<Self> {
        validate_identity_count(identity_count)?;

        let identities = (0..topology.cell_count())
            .map(|_| Identity::ALL[rng.gen_range(0..identity_count)])
            .collect();
        let true_position = Cell {
            x: rng.gen_range(0..topology.width()),
            y: rng.gen_range(0..topology.height()),
        };

        Ok(WorldModel {
            topology,
            true_position,
            identities,
        })
    }

    /// Build a world from explicit row-major identities and a start cell
    pub fn from_identities(
        topology: GridTopology,
        identities: Vec<Identity>,
        true_position: Cell,
    ) -> Result<Self> {
        if identities.len() != topology.cell_count() {
            return Err(LocalizationError::invalid(
                "identities",
                format!(
                    "expected {} identities, got {}",
                    topology.cell_count(),
                    identities.len()
                ),
            ));
        }
        topology.index_of(true_position)?;

        Ok(WorldModel {
            topology,
            true_position,
            identities,
        })
    }

    pub fn topology(&self) -> GridTopology {
        self.topology
    }

    /// Where the agent actually is
    pub fn true_position(&self) -> Cell {
        self.true_position
    }

    /// Identity of a cell
    pub fn identity_at(&self, x: usize, y: usize) -> Result<Identity> {
        let index = self.topology.index_of(Cell { x, y })?;
        Ok(self.identities[index])
    }

    /// Reassign the identity of a single cell
    pub fn set_identity(&mut self, cell: Cell, identity: Identity) -> Result<()> {
        let index = self.topology.index_of(cell)?;
        self.identities[index] = identity;
        Ok(())
    }

    /// All identities in row-major order
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    /// Move the agent by `(dx, dy)` with wraparound
    pub fn apply_displacement(&mut self, dx: i64, dy: i64) {
        self.true_position = self.topology.offset(self.true_position, dx, dy);
    }
}

pub(crate) fn validate_identity_count(identity_count: usize) -> Result<()> {
    if identity_count == 0 || identity_count > Identity::ALL.len() {
        return Err(LocalizationError::invalid(
            "identity_count",
            format!(
                "must be within 1..={}, got {}",
                Identity::ALL.len(),
                identity_count
            ),
        ));
    }
    Ok(())
}

//! Motion model (prediction step)
//!
//! A commanded step succeeds with probability `1 - failure_rate`. The belief
//! is spread according to that rate, while the true agent position follows a
//! single sampled outcome. The two are deliberately independent: the belief
//! encodes what the filter knows about the model, not the realized draw.

use crate::common::error::{validate_rate, Result};
use crate::common::types::Direction;
use crate::grid::belief::BeliefGrid;
use crate::world::WorldModel;
use nalgebra::DMatrix;
use rand::Rng;
use tracing::debug;

/// Motion model with a fixed failure rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionModel {
    failure_rate: f64,
}

impl MotionModel {
    /// Create a new motion model, `failure_rate` in `[0, 1]`
    pub fn new(failure_rate: f64) -> Result<Self> {
        Ok(MotionModel {
            failure_rate: validate_rate("motion_failure_rate", failure_rate)?,
        })
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    pub fn success_rate(&self) -> f64 {
        1.0 - self.failure_rate
    }

    /// Shift belief mass by `direction`, keeping the failed share in place
    ///
    /// The new distribution is accumulated from an untouched copy of the prior,
    /// so several sources landing on one destination (small grids) are summed
    /// correctly.
    pub fn predict_belief(&self, belief: &mut BeliefGrid, direction: Direction) -> Result<()> {
        let topology = belief.topology();
        let (dx, dy) = direction.delta();
        let success = self.success_rate();
        let prior = belief.matrix();

        let mut next = DMatrix::<f64>::zeros(prior.nrows(), prior.ncols());
        for cell in topology.cells() {
            let mass = prior[(cell.y, cell.x)];
            let target = topology.offset(cell, dx, dy);
            next[(target.y, target.x)] += mass * success;
            next[(cell.y, cell.x)] += mass * self.failure_rate;
        }

        belief.commit(next)
    }

    /// Draw whether a single attempted step actually happens
    pub fn sample_outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.success_rate())
    }

    /// Apply a commanded step to both the belief and the true position
    ///
    /// Returns whether the agent really moved. On error neither the belief nor
    /// the world is modified.
    pub fn predict<R: Rng + ?Sized>(
        &self,
        belief: &mut BeliefGrid,
        world: &mut WorldModel,
        direction: Direction,
        rng: &mut R,
    ) -> Result<bool> {
        self.predict_belief(belief, direction)?;

        let moved = self.sample_outcome(rng);
        if moved {
            let (dx, dy) = direction.delta();
            world.apply_displacement(dx, dy);
        }
        debug!(
            ?direction,
            moved,
            failure_rate = self.failure_rate,
            "applied motion update"
        );
        Ok(moved)
    }
}

//! Sensor interfaces and the cell identity sensor (correction step)

use crate::common::error::{validate_rate, Result};
use crate::grid::belief::BeliefGrid;
use crate::world::{Identity, WorldModel};
use tracing::{debug, warn};

/// A generic sensor interface
pub trait Sensor {
    /// What a single observation yields
    type Reading;

    /// Get the sensor name
    fn name(&self) -> &str;

    /// Take a reading of the world at the agent's true position
    fn observe(&self, world: &WorldModel) -> Result<Self::Reading>;
}

/// Reports the identity of the cell the agent stands on
///
/// The report itself is never corrupted. Sensor noise lives entirely in
/// [`IdentitySensor::correct`], which trusts a matching cell with weight
/// `1 - error_rate` and a mismatching one with weight `error_rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentitySensor {
    error_rate: f64,
}

impl IdentitySensor {
    /// Create a new identity sensor, `error_rate` in `[0, 1]`
    pub fn new(error_rate: f64) -> Result<Self> {
        Ok(IdentitySensor {
            error_rate: validate_rate("sensor_error_rate", error_rate)?,
        })
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Weight every cell by how well its identity explains `observed`
    ///
    /// With a zero error rate this is a hard mask. If no cell survives the
    /// weighting the belief is left as it was and `DegenerateDistribution` is
    /// returned.
    pub fn correct(
        &self,
        belief: &mut BeliefGrid,
        world: &WorldModel,
        observed: Identity,
    ) -> Result<()> {
        let topology = belief.topology();
        let hit = 1.0 - self.error_rate;
        let mut next = belief.matrix().clone();

        for cell in topology.cells() {
            let weight = if world.identity_at(cell.x, cell.y)? == observed {
                hit
            } else {
                self.error_rate
            };
            next[(cell.y, cell.x)] *= weight;
        }

        belief.commit(next).map_err(|err| {
            warn!(%err, %observed, error_rate = self.error_rate, "rejected sensor update");
            err
        })?;
        debug!(%observed, error_rate = self.error_rate, "applied sensor update");
        Ok(())
    }
}

impl Sensor for IdentitySensor {
    type Reading = Identity;

    fn name(&self) -> &str {
        "IdentitySensor"
    }

    fn observe(&self, world: &WorldModel) -> Result<Identity> {
        let position = world.true_position();
        world.identity_at(position.x, position.y)
    }
}

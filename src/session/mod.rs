//! Filter session
//!
//! A [`FilterSession`] owns exactly one world and one belief over the same
//! grid, the current noise models, and the random source that drives world
//! generation and motion outcomes. Callers drive it one operation at a time
//! and receive a [`BeliefSnapshot`] back for display.

pub mod config;
pub mod snapshot;

pub use self::config::{NoiseParameters, SessionConfig};
pub use self::snapshot::{BeliefSnapshot, Highlight};

use crate::common::error::{LocalizationError, Result};
use crate::common::types::{Cell, Direction, Mode};
use crate::control::MotionModel;
use crate::grid::belief::BeliefGrid;
use crate::grid::GridTopology;
use crate::perception::{IdentitySensor, Sensor};
use crate::world::{Identity, WorldModel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Histogram filter session over a toroidal grid
#[derive(Debug)]
pub struct FilterSession<R: Rng = StdRng> {
    config: SessionConfig,
    mode: Mode,
    motion: MotionModel,
    sensor: IdentitySensor,
    world: WorldModel,
    belief: BeliefGrid,
    last_observation: Option<Identity>,
    rng: R,
}

impl FilterSession<StdRng> {
    /// Create a new session, seeded from the config when a seed is set
    pub fn new(config: SessionConfig, mode: Mode) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        FilterSession::with_rng(config, mode, rng)
    }
}

impl<R: Rng> FilterSession<R> {
    /// Create a new session drawing all randomness from `rng`
    pub fn with_rng(config: SessionConfig, mode: Mode, mut rng: R) -> Result<Self> {
        let topology = config.validate()?;
        let world = WorldModel::random(topology, config.identity_count, &mut rng)?;

        info!(
            width = topology.width(),
            height = topology.height(),
            %mode,
            "created filter session"
        );
        Ok(FilterSession {
            config,
            mode,
            motion: MotionModel::new(0.0)?,
            sensor: IdentitySensor::new(0.0)?,
            world,
            belief: BeliefGrid::uniform(topology),
            last_observation: None,
            rng,
        })
    }

    /// Create a session around an explicit world and belief
    ///
    /// Later resets keep the extent and draw from as many palette entries as
    /// the given world uses.
    pub fn from_parts(world: WorldModel, belief: BeliefGrid, mode: Mode, rng: R) -> Result<Self> {
        let topology = world.topology();
        if belief.topology() != topology {
            return Err(LocalizationError::invalid(
                "belief",
                format!(
                    "belief covers {}x{} but the world is {}x{}",
                    belief.topology().width(),
                    belief.topology().height(),
                    topology.width(),
                    topology.height()
                ),
            ));
        }

        let identity_count = world
            .identities()
            .iter()
            .filter_map(|id| Identity::ALL.iter().position(|p| p == id))
            .max()
            .map_or(1, |highest| highest + 1);

        Ok(FilterSession {
            config: SessionConfig {
                width: topology.width(),
                height: topology.height(),
                identity_count,
                seed: None,
            },
            mode,
            motion: MotionModel::new(0.0)?,
            sensor: IdentitySensor::new(0.0)?,
            world,
            belief,
            last_observation: None,
            rng,
        })
    }

    /// Start over in `mode` with a fresh world, uniform belief and zero noise
    pub fn reset(&mut self, mode: Mode) -> Result<BeliefSnapshot> {
        let topology = self.topology();
        let world = WorldModel::random(topology, self.config.identity_count, &mut self.rng)?;

        self.world = world;
        self.belief.reset();
        self.motion = MotionModel::new(0.0)?;
        self.sensor = IdentitySensor::new(0.0)?;
        self.last_observation = None;
        if self.mode != mode {
            info!(from = %self.mode, to = %mode, "switched session mode");
        }
        self.mode = mode;

        info!(%mode, "reset filter session");
        self.snapshot()
    }

    /// Reset while staying in the current mode
    pub fn restart(&mut self) -> Result<BeliefSnapshot> {
        self.reset(self.mode)
    }

    /// Command a unit step; the belief always moves by the motion model
    pub fn move_agent(&mut self, direction: Direction) -> Result<BeliefSnapshot> {
        self.motion
            .predict(&mut self.belief, &mut self.world, direction, &mut self.rng)?;
        self.last_observation = None;
        self.snapshot()
    }

    /// Observe the identity under the agent and correct the belief
    pub fn sense(&mut self) -> Result<(Identity, BeliefSnapshot)> {
        let observed = self.sensor.observe(&self.world)?;
        self.sensor.correct(&mut self.belief, &self.world, observed)?;
        self.last_observation = Some(observed);
        Ok((observed, self.snapshot()?))
    }

    /// Check a guess of the hidden agent position; game mode only
    pub fn guess(&self, cell: Cell) -> Result<bool> {
        if self.mode != Mode::Game {
            return Err(LocalizationError::WrongMode {
                operation: "guess",
                mode: self.mode,
            });
        }
        self.topology().index_of(cell)?;

        let correct = cell == self.world.true_position();
        info!(%cell, correct, "evaluated guess");
        Ok(correct)
    }

    /// Set the probability that a sensor reading is wrong
    pub fn set_sensor_error_rate(&mut self, value: f64) -> Result<()> {
        self.sensor = IdentitySensor::new(value)?;
        Ok(())
    }

    /// Set the probability that a commanded step does not happen
    pub fn set_motion_failure_rate(&mut self, value: f64) -> Result<()> {
        self.motion = MotionModel::new(value)?;
        Ok(())
    }

    /// Replace both noise rates at once
    pub fn set_noise(&mut self, noise: NoiseParameters) -> Result<()> {
        noise.validate()?;
        self.set_sensor_error_rate(noise.sensor_error_rate)?;
        self.set_motion_failure_rate(noise.motion_failure_rate)
    }

    pub fn noise(&self) -> NoiseParameters {
        NoiseParameters {
            sensor_error_rate: self.sensor.error_rate(),
            motion_failure_rate: self.motion.failure_rate(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn topology(&self) -> GridTopology {
        self.world.topology()
    }

    /// The live belief
    pub fn belief(&self) -> &BeliefGrid {
        &self.belief
    }

    /// The live world, including the hidden agent position
    #[cfg(test)]
    pub(crate) fn world(&self) -> &WorldModel {
        &self.world
    }

    /// Agent cell, revealed only in inspection mode
    pub fn true_position(&self) -> Option<Cell> {
        match self.mode {
            Mode::Inspection => Some(self.world.true_position()),
            Mode::Game => None,
        }
    }

    /// Identity reported by the most recent sense, cleared by moves and resets
    pub fn last_observation(&self) -> Option<Identity> {
        self.last_observation
    }

    /// Copy the current belief for display
    pub fn snapshot(&self) -> Result<BeliefSnapshot> {
        BeliefSnapshot::capture(&self.belief, &self.world, self.mode, self.last_observation)
    }
}

//! Discrete Bayesian localization on a toroidal grid
//!
//! A histogram filter tracks the probability of an agent occupying each grid
//! cell. Motion spreads that mass according to how reliably steps succeed,
//! and sensing reweights it by how well each cell's identity explains the
//! reading. [`FilterSession`] ties the pieces together for a caller such as
//! a terminal front end or a test harness.

pub mod common;
pub mod control;
pub mod grid;
pub mod perception;
pub mod session;
pub mod world;

pub use crate::common::error::{LocalizationError, Result};
pub use crate::common::types::{Cell, Direction, Mode};
pub use crate::control::MotionModel;
pub use crate::grid::belief::BeliefGrid;
pub use crate::grid::GridTopology;
pub use crate::perception::{IdentitySensor, Sensor};
pub use crate::session::{BeliefSnapshot, FilterSession, Highlight, NoiseParameters, SessionConfig};
pub use crate::world::{Identity, WorldModel};

//! Perception module: sensing the world and correcting the belief
pub mod sensors;

pub use self::sensors::{IdentitySensor, Sensor};

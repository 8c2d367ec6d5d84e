//! Control module: how commanded steps act on the world and the belief
pub mod motion;

pub use self::motion::MotionModel;

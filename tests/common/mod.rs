//! Shared helpers for integration tests
#![allow(dead_code)]

use approx::assert_relative_eq;
use grid_localizer::{BeliefGrid, Cell, FilterSession, GridTopology, Identity, Mode, WorldModel};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const TOLERANCE: f64 = 1e-9;

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Map `A`/`B`/... letters onto palette identities
pub fn identities(pattern: &str) -> Vec<Identity> {
    pattern
        .chars()
        .map(|c| Identity::ALL[(c as u8 - b'A') as usize])
        .collect()
}

/// A 5x1 world laid out `A B A B A` with the agent at `x`
pub fn striped_world(x: usize) -> WorldModel {
    let topology = GridTopology::new(5, 1).unwrap();
    WorldModel::from_identities(topology, identities("ABABA"), Cell::new(x, 0)).unwrap()
}

pub fn striped_session(x: usize, mode: Mode) -> FilterSession<StdRng> {
    let world = striped_world(x);
    let belief = BeliefGrid::uniform(world.topology());
    FilterSession::from_parts(world, belief, mode, rng(7)).unwrap()
}

pub fn assert_values_eq(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() < TOLERANCE,
            "cell {i}: expected {e}, got {a} (full: {actual:?})"
        );
    }
}

pub fn assert_normalized(belief: &BeliefGrid) {
    assert_relative_eq!(belief.total(), 1.0, epsilon = TOLERANCE);
    assert!(belief.values().iter().all(|p| *p >= 0.0));
}

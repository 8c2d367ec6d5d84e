mod common;

use approx::assert_relative_eq;
use common::{assert_normalized, assert_values_eq, identities, rng, striped_session};
use grid_localizer::{
    BeliefGrid, Cell, Direction, FilterSession, GridTopology, Highlight, Identity,
    LocalizationError, Mode, NoiseParameters, SessionConfig, WorldModel,
};

fn seeded(seed: u64, mode: Mode) -> FilterSession {
    let config = SessionConfig {
        width: 6,
        height: 4,
        identity_count: 3,
        seed: Some(seed),
    };
    FilterSession::new(config, mode).unwrap()
}

#[test]
fn test_reset_gives_uniform_belief_and_zero_noise() {
    let mut session = seeded(1, Mode::Inspection);
    session.set_sensor_error_rate(0.3).unwrap();
    session.set_motion_failure_rate(0.2).unwrap();
    session.move_agent(Direction::Up).unwrap();
    session.sense().unwrap();

    let snapshot = session.reset(Mode::Inspection).unwrap();
    assert_eq!(session.noise(), NoiseParameters::default());
    assert_eq!(session.last_observation(), None);
    for p in snapshot.probabilities() {
        assert_eq!(*p, 1.0 / 24.0);
    }
    assert_relative_eq!(snapshot.max_probability(), 1.0 / 24.0);
    assert_relative_eq!(snapshot.percentile_75(), 1.0 / 24.0);
}

#[test]
fn test_sense_scenario_on_striped_world() {
    let mut session = striped_session(0, Mode::Inspection);
    let (observed, snapshot) = session.sense().unwrap();
    assert_eq!(observed, Identity::Red);
    let third = 1.0 / 3.0;
    assert_values_eq(snapshot.probabilities(), &[third, 0.0, third, 0.0, third]);
    assert_eq!(snapshot.last_observation(), Some(Identity::Red));
    assert_eq!(snapshot.percent_label(Cell::new(0, 0)).unwrap(), "33.33%");
    assert_eq!(snapshot.highlight(Cell::new(2, 0)), Some(Highlight::Leading));
    assert_eq!(snapshot.highlight(Cell::new(1, 0)), Some(Highlight::Plain));
}

#[test]
fn test_move_then_sense_localizes_agent() {
    // Agent at 0 (A); after moving right it stands on B at 1
    let mut session = striped_session(0, Mode::Inspection);
    session.sense().unwrap();
    let snapshot = session.move_agent(Direction::Right).unwrap();
    assert_eq!(snapshot.true_position(), Some(Cell::new(1, 0)));
    assert_eq!(snapshot.last_observation(), None);
    let third = 1.0 / 3.0;
    assert_values_eq(snapshot.probabilities(), &[third, third, 0.0, third, 0.0]);

    let (observed, snapshot) = session.sense().unwrap();
    assert_eq!(observed, Identity::Blue);
    assert_values_eq(snapshot.probabilities(), &[0.0, 0.5, 0.0, 0.5, 0.0]);
}

#[test]
fn test_sense_is_legal_in_game_mode() {
    let mut session = striped_session(0, Mode::Game);
    let (observed, snapshot) = session.sense().unwrap();
    assert_eq!(observed, Identity::Red);
    assert_eq!(snapshot.true_position(), None);
    assert_eq!(session.true_position(), None);
}

#[test]
fn test_guess_only_in_game_mode() {
    let session = striped_session(2, Mode::Inspection);
    assert_eq!(
        session.guess(Cell::new(2, 0)),
        Err(LocalizationError::WrongMode {
            operation: "guess",
            mode: Mode::Inspection
        })
    );

    let session = striped_session(2, Mode::Game);
    assert!(session.guess(Cell::new(2, 0)).unwrap());
    assert!(!session.guess(Cell::new(3, 0)).unwrap());
    assert!(matches!(
        session.guess(Cell::new(9, 0)),
        Err(LocalizationError::OutOfRange { .. })
    ));
}

#[test]
fn test_game_mode_hides_agent_but_keeps_it() {
    let mut session = seeded(1, Mode::Game);
    assert_eq!(session.true_position(), None);
    assert_eq!(session.snapshot().unwrap().true_position(), None);

    let hits = session
        .topology()
        .cells()
        .filter(|cell| session.guess(*cell).unwrap())
        .count();
    assert_eq!(hits, 1);

    let (_, snapshot) = session.sense().unwrap();
    assert_eq!(snapshot.true_position(), None);
}

#[test]
fn test_guess_does_not_touch_belief() {
    let mut session = striped_session(4, Mode::Game);
    session.sense().unwrap();
    let before = session.belief().clone();
    let _ = session.guess(Cell::new(0, 0)).unwrap();
    assert_eq!(session.belief(), &before);
}

#[test]
fn test_mode_switch_resets_session() {
    let mut session = seeded(5, Mode::Inspection);
    session.set_motion_failure_rate(0.4).unwrap();
    session.move_agent(Direction::Left).unwrap();
    session.sense().unwrap();

    let snapshot = session.reset(Mode::Game).unwrap();
    assert_eq!(session.mode(), Mode::Game);
    assert_eq!(snapshot.mode(), Mode::Game);
    assert_eq!(snapshot.true_position(), None);
    assert_eq!(session.noise(), NoiseParameters::default());
    assert_normalized(session.belief());

    let snapshot = session.restart().unwrap();
    assert_eq!(snapshot.mode(), Mode::Game);
}

#[test]
fn test_invalid_rates_leave_configuration_unchanged() {
    let mut session = seeded(2, Mode::Inspection);
    session.set_sensor_error_rate(0.1).unwrap();
    session.set_motion_failure_rate(0.2).unwrap();

    assert!(session.set_sensor_error_rate(1.2).is_err());
    assert!(session.set_motion_failure_rate(-0.5).is_err());
    let bad = NoiseParameters {
        sensor_error_rate: 0.5,
        motion_failure_rate: 2.0,
    };
    assert!(session.set_noise(bad).is_err());

    assert_eq!(
        session.noise(),
        NoiseParameters {
            sensor_error_rate: 0.1,
            motion_failure_rate: 0.2
        }
    );
}

#[test]
fn test_degenerate_sense_is_surfaced() {
    // Every cell matches, and the sensor claims matches are always wrong
    let topology = GridTopology::new(3, 1).unwrap();
    let world = WorldModel::from_identities(topology, identities("AAA"), Cell::new(1, 0)).unwrap();
    let belief = BeliefGrid::uniform(topology);
    let mut session = FilterSession::from_parts(world, belief, Mode::Inspection, rng(9)).unwrap();
    session.set_sensor_error_rate(1.0).unwrap();

    let before = session.belief().clone();
    assert!(matches!(
        session.sense(),
        Err(LocalizationError::DegenerateDistribution { .. })
    ));
    assert_eq!(session.belief(), &before);
    assert_eq!(session.last_observation(), None);
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let mut a = seeded(42, Mode::Inspection);
    let mut b = seeded(42, Mode::Inspection);
    assert_eq!(a.snapshot().unwrap(), b.snapshot().unwrap());
    assert_eq!(a.true_position(), b.true_position());

    a.set_motion_failure_rate(0.5).unwrap();
    b.set_motion_failure_rate(0.5).unwrap();
    for direction in [Direction::Up, Direction::Right, Direction::Right, Direction::Down] {
        let snap_a = a.move_agent(direction).unwrap();
        let snap_b = b.move_agent(direction).unwrap();
        assert_eq!(snap_a, snap_b);
    }
    assert_eq!(a.sense().unwrap(), b.sense().unwrap());
}

#[test]
fn test_from_parts_rejects_mismatched_extent() {
    let world = common::striped_world(0);
    let belief = BeliefGrid::uniform(GridTopology::new(4, 1).unwrap());
    assert!(matches!(
        FilterSession::from_parts(world, belief, Mode::Inspection, rng(1)),
        Err(LocalizationError::InvalidParameter { name: "belief", .. })
    ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SessionConfig {
        width: 0,
        ..SessionConfig::default()
    };
    assert!(matches!(
        FilterSession::new(config, Mode::Inspection),
        Err(LocalizationError::InvalidParameter { name: "width", .. })
    ));

    let config = SessionConfig {
        identity_count: 6,
        ..SessionConfig::default()
    };
    assert!(FilterSession::new(config, Mode::Inspection).is_err());

    let config = SessionConfig {
        width: usize::MAX,
        height: 2,
        ..SessionConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(LocalizationError::InvalidParameter { .. })
    ));
    assert!(FilterSession::new(config, Mode::Inspection).is_err());
}

#[test]
fn test_random_world_uses_configured_palette() {
    let session = seeded(3, Mode::Inspection);
    let allowed = &Identity::ALL[..3];
    let snapshot = session.snapshot().unwrap();
    assert!(session
        .topology()
        .cells()
        .all(|cell| allowed.contains(&snapshot.identity(cell).unwrap())));
    let position = session.true_position().unwrap();
    assert!(session.topology().contains(position.x as i64, position.y as i64));
}

#[test]
fn test_candidate_highlights() {
    let topology = GridTopology::new(5, 1).unwrap();
    let world = WorldModel::from_identities(topology, identities("ABABA"), Cell::new(0, 0)).unwrap();
    let belief =
        BeliefGrid::from_probabilities(topology, &[0.5, 0.3, 0.195, 0.005, 0.0]).unwrap();
    let session = FilterSession::from_parts(world, belief, Mode::Inspection, rng(4)).unwrap();
    let snapshot = session.snapshot().unwrap();

    // sorted [0, .005, .195, .3, .5], 75th percentile = .3
    assert_relative_eq!(snapshot.percentile_75(), 0.3, epsilon = 1e-12);
    let highlights: Vec<_> = (0..5)
        .map(|x| snapshot.highlight(Cell::new(x, 0)).unwrap())
        .collect();
    assert_eq!(
        highlights,
        vec![
            Highlight::Leading,
            Highlight::Candidate,
            Highlight::Plain,
            Highlight::Plain,
            Highlight::Plain
        ]
    );
    assert!(snapshot.to_string().contains("@R"));
}

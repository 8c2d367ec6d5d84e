//! Common types and errors shared across the localizer

pub mod error;

/// Common types used across the codebase
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// A cell coordinate in the grid (column `x`, row `y`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Cell {
        pub x: usize,
        pub y: usize,
    }

    impl Cell {
        /// Create a new cell coordinate
        pub fn new(x: usize, y: usize) -> Self {
            Cell { x, y }
        }
    }

    impl fmt::Display for Cell {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "({}, {})", self.x, self.y)
        }
    }

    /// Operating mode of a session
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub enum Mode {
        /// The true position is known and displayed
        Inspection,
        /// The true position is hidden and guessed from the belief
        Game,
    }

    impl fmt::Display for Mode {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Mode::Inspection => write!(f, "inspection"),
                Mode::Game => write!(f, "game"),
            }
        }
    }

    /// A commanded unit step
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub enum Direction {
        Up,
        Down,
        Left,
        Right,
    }

    impl Direction {
        pub const ALL: [Direction; 4] = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];

        /// Displacement `(dx, dy)` of this step; `y` grows downwards
        pub fn delta(self) -> (i64, i64) {
            match self {
                Direction::Up => (0, -1),
                Direction::Down => (0, 1),
                Direction::Left => (-1, 0),
                Direction::Right => (1, 0),
            }
        }

        /// The step that undoes this one
        pub fn opposite(self) -> Direction {
            match self {
                Direction::Up => Direction::Down,
                Direction::Down => Direction::Up,
                Direction::Left => Direction::Right,
                Direction::Right => Direction::Left,
            }
        }
    }
}

//! Toroidal grid topology
//!
//! Every position in the world lives on a `width x height` torus: stepping off
//! one edge re-enters on the opposite edge. All position arithmetic goes
//! through [`GridTopology::wrap`] so coordinates never leave the grid.

pub mod belief;

use crate::common::error::{LocalizationError, Result};
use crate::common::types::Cell;

/// Extent of a toroidal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTopology {
    width: usize,
    height: usize,
}

impl GridTopology {
    /// Create a new topology, rejecting zero extents
    ///
    /// The cell count must also fit in `i64`, since wrap arithmetic works on
    /// signed coordinates.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 {
            return Err(LocalizationError::invalid("width", "must be positive"));
        }
        if height == 0 {
            return Err(LocalizationError::invalid("height", "must be positive"));
        }
        match width.checked_mul(height) {
            Some(count) if count <= i64::MAX as usize => Ok(GridTopology { width, height }),
            _ => Err(LocalizationError::invalid(
                "height",
                format!("a {}x{} grid has too many cells", width, height),
            )),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Reduce `value` modulo `extent` into `[0, extent)`, negatives included
    pub fn wrap(value: i64, extent: usize) -> usize {
        value.rem_euclid(extent as i64) as usize
    }

    /// Cell reached from `cell` after a displacement of `(dx, dy)`
    pub fn offset(&self, cell: Cell, dx: i64, dy: i64) -> Cell {
        Cell {
            x: Self::wrap(cell.x as i64 + dx, self.width),
            y: Self::wrap(cell.y as i64 + dy, self.height),
        }
    }

    /// Check if a coordinate lies inside the grid
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && x < self.width as i64 && y >= 0 && y < self.height as i64
    }

    /// Row-major index of a cell
    pub fn index_of(&self, cell: Cell) -> Result<usize> {
        if cell.x < self.width && cell.y < self.height {
            Ok(cell.y * self.width + cell.x)
        } else {
            Err(self.out_of_range(cell.x as i64, cell.y as i64))
        }
    }

    /// Cell at a row-major index
    pub fn cell_at(&self, index: usize) -> Result<Cell> {
        if index < self.cell_count() {
            Ok(Cell {
                x: index % self.width,
                y: index / self.width,
            })
        } else {
            Err(LocalizationError::invalid(
                "index",
                format!("{} exceeds the {} cells of the grid", index, self.cell_count()),
            ))
        }
    }

    /// Iterate over every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width;
        (0..self.cell_count()).map(move |i| Cell {
            x: i % width,
            y: i / width,
        })
    }

    pub(crate) fn out_of_range(&self, x: i64, y: i64) -> LocalizationError {
        LocalizationError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

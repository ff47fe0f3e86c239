//! Read-only snapshots handed to render callbacks.

use life_grid::{Dimensions, GridState};
use serde::Serialize;

/// Snapshot of the current buffer after the most recently completed swap.
///
/// A frame owns its cells, so a render callback can hold it for as long as
/// it likes without blocking edits or the next generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Grid dimensions.
    pub dimensions: Dimensions,
    /// Cells in storage order (`x * height + y`).
    pub cells: Vec<bool>,
    /// Generations completed since the grid was created, cleared, or loaded.
    pub generation: u64,
    /// Number of live cells.
    pub population: usize,
    /// Whether the animator was playing when the frame was taken.
    pub playing: bool,
    /// Whether the grid was edited since the previous animator frame.
    pub dirty: bool,
}

impl Frame {
    /// Copy the current buffer of `grid`.
    pub fn capture(grid: &GridState, playing: bool, dirty: bool) -> Self {
        Self {
            dimensions: grid.dimensions(),
            cells: grid.current().to_vec(),
            generation: grid.generation(),
            population: grid.population(),
            playing,
            dirty,
        }
    }

    /// The cell at `(x, y)`, or `None` outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Option<bool> {
        let idx = self.dimensions.index(x, y).ok()?;
        self.cells.get(idx).copied()
    }

    /// Iterate rows top to bottom, each as an iterator over cells left to
    /// right.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = bool> + '_> + '_ {
        let dims = self.dimensions;
        (0..dims.height())
            .map(move |y| (0..dims.width()).map(move |x| self.cell(x, y).unwrap_or(false)))
    }
}

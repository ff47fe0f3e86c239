//! Named seed patterns.
//!
//! Each [`Pattern`] is a list of live-cell offsets relative to an origin.
//! [`Pattern::stamp`] writes those cells into the current buffer with
//! toroidal wrapping, leaving all other cells as they were.

use crate::error::GridError;
use crate::grid::GridState;

/// A named set of live cells, as `(dx, dy)` offsets from an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    /// Lower-case name used to look the pattern up.
    pub name: &'static str,
    /// Live cells relative to the origin.
    pub cells: &'static [(usize, usize)],
}

/// 2x2 still life.
pub const BLOCK: Pattern = Pattern {
    name: "block",
    cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
};

/// Period-2 oscillator, horizontal phase.
pub const BLINKER: Pattern = Pattern {
    name: "blinker",
    cells: &[(0, 0), (1, 0), (2, 0)],
};

/// Period-2 oscillator.
pub const TOAD: Pattern = Pattern {
    name: "toad",
    cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
};

/// Period-2 oscillator made of two diagonal blocks.
pub const BEACON: Pattern = Pattern {
    name: "beacon",
    cells: &[(0, 0), (1, 0), (0, 1), (3, 2), (2, 3), (3, 3)],
};

/// Spaceship travelling one cell down-right every four generations.
pub const GLIDER: Pattern = Pattern {
    name: "glider",
    cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
};

/// Methuselah that stabilizes after 1103 generations on an open plane.
pub const R_PENTOMINO: Pattern = Pattern {
    name: "r-pentomino",
    cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
};

/// Every built-in pattern.
pub const PATTERNS: &[Pattern] = &[BLOCK, BLINKER, TOAD, BEACON, GLIDER, R_PENTOMINO];

impl Pattern {
    /// Look up a built-in pattern by name, ignoring case.
    pub fn by_name(name: &str) -> Option<Self> {
        PATTERNS
            .iter()
            .copied()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Set this pattern's cells alive with its origin at `(x, y)`.
    ///
    /// Offsets that run past an edge wrap around, matching the grid's
    /// toroidal neighbor rule.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the origin itself lies outside
    /// the grid; nothing is written in that case.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn stamp(&self, grid: &mut GridState, x: usize, y: usize) -> Result<(), GridError> {
        let dims = grid.dimensions();
        dims.index(x, y)?;
        for &(dx, dy) in self.cells {
            // Offsets are tiny; wrapping each term first keeps the sum in range.
            let cx = (x + dx % dims.width()) % dims.width();
            let cy = (y + dy % dims.height()) % dims.height();
            grid.set_cell(cx, cy, true)?;
        }
        Ok(())
    }
}

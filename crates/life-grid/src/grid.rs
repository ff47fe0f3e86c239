//! The double-buffered toroidal grid.
//!
//! [`GridState`] holds two equally sized cell buffers. One is *current*: it is
//! read for display, edited by the control surface, and encoded by save. The
//! other receives the next generation computed by [`stepper::step`]. After a
//! complete pass the roles flip, so the current index alternates strictly
//! between 0 and 1 once per generation.
//!
//! Cells are stored column by column (`index = x * height + y`), which is the
//! same order the save format uses.
//!
//! [`stepper::step`]: crate::stepper::step

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::error::GridError;
use crate::stepper;

/// Upper bound (inclusive) for a seeding density percentage.
pub const MAX_DENSITY_PERCENT: u32 = 100;

/// Longest accepted grid side. Keeps buffers allocatable and neighbor
/// arithmetic far from `usize` overflow.
pub const MAX_GRID_EXTENT: usize = 4096;

/// Width and height of a grid, both non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    width: usize,
    height: usize,
}

impl Dimensions {
    /// The 40x40 grid the simulation runs on by default.
    pub const DEFAULT: Self = Self {
        width: 40,
        height: 40,
    };

    /// Create dimensions, rejecting zero extents and sides longer than
    /// [`MAX_GRID_EXTENT`].
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] for a zero or oversized
    /// side.
    pub const fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 || width > MAX_GRID_EXTENT || height > MAX_GRID_EXTENT {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of columns.
    pub const fn width(self) -> usize {
        self.width
    }

    /// Number of rows.
    pub const fn height(self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn cell_count(self) -> usize {
        // Checked in `new`.
        self.width * self.height
    }

    /// Buffer offset of `(x, y)`, or [`GridError::OutOfBounds`].
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if either coordinate is outside
    /// the grid. Coordinates never wrap here; wrapping is only applied to
    /// neighbor lookups.
    pub const fn index(self, x: usize, y: usize) -> Result<usize, GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.offset(x, y))
    }

    /// Unchecked offset for coordinates already known to be in range.
    #[allow(clippy::arithmetic_side_effects)]
    pub(crate) const fn offset(self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    /// Coordinates for a buffer offset.
    #[allow(clippy::arithmetic_side_effects)]
    pub(crate) const fn coords(self, offset: usize) -> (usize, usize) {
        (offset / self.height, offset % self.height)
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Double-buffered grid of boolean cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    dims: Dimensions,
    buffers: [Vec<bool>; 2],
    /// Index of the current buffer, always 0 or 1.
    current: usize,
    /// Completed generation advances since creation, clear, or load.
    generation: u64,
    /// Set by external edits, cleared by [`GridState::take_dirty`].
    dirty: bool,
}

impl GridState {
    /// Create a grid with every cell dead in both buffers and buffer 0
    /// current.
    pub fn new(dims: Dimensions) -> Self {
        let cells = dims.cell_count();
        Self {
            dims,
            buffers: [vec![false; cells], vec![false; cells]],
            current: 0,
            generation: 0,
            dirty: false,
        }
    }

    /// Grid dimensions.
    pub const fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Index (0 or 1) of the buffer currently designated current.
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Number of completed generation advances.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an external edit happened since the last [`take_dirty`].
    ///
    /// [`take_dirty`]: Self::take_dirty
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return the dirty flag and reset it.
    pub const fn take_dirty(&mut self) -> bool {
        let was = self.dirty;
        self.dirty = false;
        was
    }

    /// Read-only view of the current buffer in storage order.
    pub fn current(&self) -> &[bool] {
        self.buffer(self.current)
    }

    /// Read-only view of the buffer that will receive the next generation.
    pub fn next_buffer(&self) -> &[bool] {
        self.buffer(self.current ^ 1)
    }

    /// Number of live cells in the current buffer.
    pub fn population(&self) -> usize {
        self.current().iter().filter(|&&alive| alive).count()
    }

    /// Read the cell at `(x, y)` in the current buffer.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] for coordinates outside the grid.
    pub fn get_cell(&self, x: usize, y: usize) -> Result<bool, GridError> {
        let idx = self.dims.index(x, y)?;
        Ok(self.current().get(idx).copied().unwrap_or(false))
    }

    /// Write the cell at `(x, y)` in the current buffer.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] for coordinates outside the grid.
    pub fn set_cell(&mut self, x: usize, y: usize, alive: bool) -> Result<(), GridError> {
        let cell = self.cell_mut(x, y)?;
        *cell = alive;
        self.dirty = true;
        Ok(())
    }

    /// Flip the cell at `(x, y)` in the current buffer and return its new
    /// state.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] for coordinates outside the grid.
    pub fn toggle_cell(&mut self, x: usize, y: usize) -> Result<bool, GridError> {
        let cell = self.cell_mut(x, y)?;
        *cell = !*cell;
        let alive = *cell;
        self.dirty = true;
        Ok(alive)
    }

    /// Reseed the current buffer: each cell independently becomes alive with
    /// probability `density_percent / 100`.
    ///
    /// Densities above [`MAX_DENSITY_PERCENT`] are rejected and leave the
    /// grid untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDensity`] if `density_percent > 100`.
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        density_percent: u32,
        rng: &mut R,
    ) -> Result<(), GridError> {
        if density_percent > MAX_DENSITY_PERCENT {
            return Err(GridError::InvalidDensity {
                density: density_percent,
            });
        }
        let current = self.current;
        for cell in self.buffer_mut(current) {
            *cell = rng.random_range(0..MAX_DENSITY_PERCENT) < density_percent;
        }
        self.dirty = true;
        debug!(
            density_percent,
            population = self.population(),
            "Grid randomized"
        );
        Ok(())
    }

    /// Kill every cell in the current buffer and reset the generation count.
    pub fn clear(&mut self) {
        let current = self.current;
        self.buffer_mut(current).fill(false);
        self.generation = 0;
        self.dirty = true;
    }

    /// Overwrite the current buffer with decoded cells.
    ///
    /// The generation counter restarts at 0 since the grid no longer
    /// descends from the previous run.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::BufferLength`] if `cells` does not hold exactly
    /// one entry per grid cell; the grid is left unchanged.
    pub fn replace_current(&mut self, cells: &[bool]) -> Result<(), GridError> {
        let expected = self.dims.cell_count();
        if cells.len() != expected {
            return Err(GridError::BufferLength {
                expected,
                actual: cells.len(),
            });
        }
        let current = self.current;
        self.buffer_mut(current).copy_from_slice(cells);
        self.generation = 0;
        self.dirty = true;
        Ok(())
    }

    /// Compute the next generation into the next buffer.
    ///
    /// The current buffer is only read. Call [`swap_buffers`] afterwards to
    /// publish the result; [`advance`] does both.
    ///
    /// [`swap_buffers`]: Self::swap_buffers
    /// [`advance`]: Self::advance
    pub fn compute_next(&mut self) {
        let dims = self.dims;
        let [first, second] = &mut self.buffers;
        let (current, next) = if self.current == 0 {
            (&*first, second)
        } else {
            (&*second, first)
        };
        stepper::step(current, next, dims);
    }

    /// Make the next buffer current and count the completed generation.
    pub const fn swap_buffers(&mut self) {
        self.current ^= 1;
        self.generation = self.generation.saturating_add(1);
    }

    /// Advance one generation: compute into the next buffer, then swap.
    pub fn advance(&mut self) {
        self.compute_next();
        self.swap_buffers();
    }

    fn buffer(&self, index: usize) -> &[bool] {
        match self.buffers.get(index) {
            Some(buf) => buf,
            None => &[],
        }
    }

    fn buffer_mut(&mut self, index: usize) -> &mut [bool] {
        match self.buffers.get_mut(index) {
            Some(buf) => buf,
            None => &mut [],
        }
    }

    fn cell_mut(&mut self, x: usize, y: usize) -> Result<&mut bool, GridError> {
        let dims = self.dims;
        let idx = dims.index(x, y)?;
        let current = self.current;
        self.buffer_mut(current)
            .get_mut(idx)
            .ok_or(GridError::OutOfBounds {
                x,
                y,
                width: dims.width(),
                height: dims.height(),
            })
    }
}

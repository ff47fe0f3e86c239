//! The B3/S23 generation transition.
//!
//! [`step`] reads every cell of the current buffer, counts its eight
//! toroidally wrapped neighbors, and writes the result into the next buffer.
//! The current buffer is taken by shared reference, so later cells always see
//! the unmodified previous generation rather than partially computed results.

use crate::grid::Dimensions;

/// Neighbor offsets: every `(dx, dy)` in `{-1, 0, 1}^2` except `(0, 0)`.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Wrap `coord + delta` onto `0..extent`.
///
/// Equivalent to `(coord + delta + extent) % extent` for `delta` in
/// `-1..=1` and `coord < extent`.
#[allow(clippy::arithmetic_side_effects)]
const fn wrap(coord: usize, delta: isize, extent: usize) -> usize {
    // extent is non-zero (Dimensions invariant); coord + extent cannot
    // overflow since extent * other_extent fits in usize.
    (coord + extent).wrapping_add_signed(delta) % extent
}

/// Count live neighbors of `(x, y)` in `cells`, wrapping at every edge.
pub fn live_neighbors(cells: &[bool], dims: Dimensions, x: usize, y: usize) -> u8 {
    let mut count: u8 = 0;
    for (dx, dy) in NEIGHBOR_OFFSETS {
        let nx = wrap(x, dx, dims.width());
        let ny = wrap(y, dy, dims.height());
        if cells.get(dims.offset(nx, ny)).copied().unwrap_or(false) {
            count = count.saturating_add(1);
        }
    }
    count
}

/// Conway's rule: a live cell survives with 2 or 3 neighbors, a dead cell is
/// born with exactly 3.
pub const fn next_state(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2 | 3) | (false, 3))
}

/// Compute one generation from `current` into `next`.
///
/// Both slices must hold `dims.cell_count()` cells in storage order; this
/// is guaranteed when called through [`GridState`](crate::GridState).
pub fn step(current: &[bool], next: &mut [bool], dims: Dimensions) {
    debug_assert_eq!(current.len(), dims.cell_count());
    debug_assert_eq!(next.len(), dims.cell_count());

    for (offset, (out, &alive)) in next.iter_mut().zip(current).enumerate() {
        let (x, y) = dims.coords(offset);
        *out = next_state(alive, live_neighbors(current, dims, x, y));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn cells_with(dims: Dimensions, live: &[(usize, usize)]) -> Vec<bool> {
        let mut cells = vec![false; dims.cell_count()];
        for &(x, y) in live {
            cells[dims.index(x, y).unwrap()] = true;
        }
        cells
    }

    #[test]
    fn rule_table() {
        for n in 0..=8_u8 {
            assert_eq!(next_state(true, n), n == 2 || n == 3, "live with {n}");
            assert_eq!(next_state(false, n), n == 3, "dead with {n}");
        }
    }

    #[test]
    fn wrap_matches_modular_formula() {
        assert_eq!(wrap(0, -1, 40), 39);
        assert_eq!(wrap(39, 1, 40), 0);
        assert_eq!(wrap(17, 0, 40), 17);
        assert_eq!(wrap(0, -1, 1), 0);
    }

    #[test]
    fn corner_counts_wrapped_neighbors() {
        let dims = Dimensions::DEFAULT;
        let cells = cells_with(dims, &[(39, 0), (0, 39), (39, 39)]);
        assert_eq!(live_neighbors(&cells, dims, 0, 0), 3);

        let cells = cells_with(dims, &[(0, 0)]);
        assert_eq!(live_neighbors(&cells, dims, 39, 0), 1);
        assert_eq!(live_neighbors(&cells, dims, 0, 39), 1);
        assert_eq!(live_neighbors(&cells, dims, 39, 39), 1);
        assert_eq!(live_neighbors(&cells, dims, 38, 38), 0);
    }

    #[test]
    fn cell_does_not_count_itself() {
        let dims = Dimensions::DEFAULT;
        let cells = cells_with(dims, &[(5, 5)]);
        assert_eq!(live_neighbors(&cells, dims, 5, 5), 0);
    }

    #[test]
    fn step_reads_only_previous_generation() {
        // A vertical blinker: if the pass read its own output the middle
        // column would cascade.
        let dims = Dimensions::new(5, 5).unwrap();
        let current = cells_with(dims, &[(2, 1), (2, 2), (2, 3)]);
        let mut next = vec![true; dims.cell_count()];
        step(&current, &mut next, dims);
        assert_eq!(next, cells_with(dims, &[(1, 2), (2, 2), (3, 2)]));
    }

    #[test]
    fn corner_block_survives_wrap() {
        let dims = Dimensions::DEFAULT;
        let current = cells_with(dims, &[(0, 0), (39, 0), (0, 39), (39, 39)]);
        let mut next = vec![false; dims.cell_count()];
        step(&current, &mut next, dims);
        assert_eq!(next, current);
    }
}

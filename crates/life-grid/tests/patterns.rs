//! Behavioral tests for the generation rule on well-known patterns.
//!
//! These exercise the public API only: stamp a pattern, advance, and compare
//! the current buffer against the expected configuration.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc
)]

use life_grid::pattern::{BEACON, BLINKER, BLOCK, GLIDER, TOAD};
use life_grid::{Dimensions, GridState, Pattern, SaveFormat, decode, encode};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn grid_with(pattern: Pattern, x: usize, y: usize) -> GridState {
    let mut grid = GridState::new(Dimensions::DEFAULT);
    pattern.stamp(&mut grid, x, y).unwrap();
    grid
}

fn live_cells(grid: &GridState) -> Vec<(usize, usize)> {
    let dims = grid.dimensions();
    let mut cells = Vec::new();
    for x in 0..dims.width() {
        for y in 0..dims.height() {
            if grid.get_cell(x, y).unwrap() {
                cells.push((x, y));
            }
        }
    }
    cells
}

// =============================================================================
// Still lifes
// =============================================================================

#[test]
fn block_is_stable_everywhere() {
    for x in 0..40 {
        for y in 0..40 {
            let mut grid = grid_with(BLOCK, x, y);
            let before = grid.current().to_vec();
            grid.advance();
            assert_eq!(grid.current(), before.as_slice(), "block at ({x}, {y})");
        }
    }
}

// =============================================================================
// Oscillators
// =============================================================================

#[test]
fn blinker_has_period_two() {
    let mut grid = grid_with(BLINKER, 10, 10);
    let original = grid.current().to_vec();

    grid.advance();
    assert_ne!(grid.current(), original.as_slice());
    assert_eq!(live_cells(&grid), vec![(11, 9), (11, 10), (11, 11)]);

    grid.advance();
    assert_eq!(grid.current(), original.as_slice());
}

#[test]
fn blinker_across_the_seam() {
    let mut grid = grid_with(BLINKER, 39, 0);
    let original = grid.current().to_vec();
    grid.advance();
    assert_eq!(live_cells(&grid), vec![(0, 0), (0, 1), (0, 39)]);
    grid.advance();
    assert_eq!(grid.current(), original.as_slice());
}

#[test]
fn toad_and_beacon_have_period_two() {
    for pattern in [TOAD, BEACON] {
        let mut grid = grid_with(pattern, 15, 15);
        let original = grid.current().to_vec();
        grid.advance();
        assert_ne!(grid.current(), original.as_slice(), "{}", pattern.name);
        grid.advance();
        assert_eq!(grid.current(), original.as_slice(), "{}", pattern.name);
    }
}

// =============================================================================
// Spaceships
// =============================================================================

#[test]
fn glider_translates_diagonally_every_four_generations() {
    let mut grid = grid_with(GLIDER, 5, 5);
    for _ in 0..4 {
        grid.advance();
    }
    let expected = grid_with(GLIDER, 6, 6);
    assert_eq!(grid.current(), expected.current());
    assert_eq!(grid.generation(), 4);
}

#[test]
fn glider_wraps_back_to_start_after_full_lap() {
    // 40 translations of (1, 1) bring the glider home on a 40x40 torus.
    let mut grid = grid_with(GLIDER, 0, 0);
    let original = grid.current().to_vec();
    for _ in 0..160 {
        grid.advance();
    }
    assert_eq!(grid.current(), original.as_slice());
    assert_eq!(grid.population(), 5);
}

// =============================================================================
// Buffers and persistence
// =============================================================================

#[test]
fn advance_only_writes_the_next_buffer() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut grid = GridState::new(Dimensions::DEFAULT);
    grid.randomize(35, &mut rng).unwrap();

    let current_before = grid.current().to_vec();
    let index_before = grid.current_index();

    grid.compute_next();
    assert_eq!(grid.current(), current_before.as_slice());
    assert_eq!(grid.current_index(), index_before);

    let computed = grid.next_buffer().to_vec();
    grid.swap_buffers();
    assert_eq!(grid.current_index(), index_before ^ 1);
    assert_eq!(grid.current(), computed.as_slice());
    assert_eq!(grid.next_buffer(), current_before.as_slice());
}

#[test]
fn save_text_round_trips_random_grids() {
    let mut rng = StdRng::seed_from_u64(2024);
    let dims = Dimensions::DEFAULT;
    for density in [0, 5, 25, 50, 90, 100] {
        let mut grid = GridState::new(dims);
        grid.randomize(density, &mut rng).unwrap();
        for format in [SaveFormat::Legacy, SaveFormat::V1] {
            let text = encode(grid.current(), dims, format);
            let cells = decode(&text, dims).unwrap();

            let mut restored = GridState::new(dims);
            restored.replace_current(&cells).unwrap();
            assert_eq!(restored.current(), grid.current(), "density {density}");
        }
    }
}

#[test]
fn legacy_save_is_exactly_one_char_per_cell() {
    let grid = grid_with(GLIDER, 0, 0);
    let text = encode(grid.current(), grid.dimensions(), SaveFormat::Legacy);
    assert_eq!(text.len(), 1600);
    assert!(text.bytes().all(|b| b == b'0' || b == b'1'));
    // Column 0 holds the glider's (0, 2) cell at offset 2.
    assert_eq!(&text[..3], "001");
}

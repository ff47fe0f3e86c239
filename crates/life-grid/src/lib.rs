//! Grid state, generation stepping, and save encoding for the Life simulation.
//!
//! This crate models the cellular automaton itself: a fixed-size toroidal
//! grid held in two alternating buffers, the B3/S23 transition rule, and the
//! flat text encoding used to persist one buffer. Nothing here performs I/O
//! or spawns tasks; the async engine lives in `life-core`.
//!
//! # Modules
//!
//! - [`codec`] -- Encode/decode a buffer to the `'0'`/`'1'` save format, in
//!   both the headerless legacy layout and the versioned `v1` layout.
//! - [`error`] -- Error types for grid access and payload decoding.
//! - [`grid`] -- [`GridState`]: the double-buffered grid with bounds-checked
//!   accessors, seeding, and generation advance.
//! - [`pattern`] -- Well-known still lifes, oscillators, and spaceships that
//!   can be stamped onto a grid.
//! - [`stepper`] -- The pure neighbor-counting transition from one buffer
//!   into the other.
//!
//! [`GridState`]: grid::GridState

pub mod codec;
pub mod error;
pub mod grid;
pub mod pattern;
pub mod stepper;

// Re-export primary types at crate root.
pub use codec::{SaveFormat, decode, decode_bytes, encode};
pub use error::{DecodeError, GridError};
pub use grid::{Dimensions, GridState, MAX_DENSITY_PERCENT, MAX_GRID_EXTENT};
pub use pattern::Pattern;

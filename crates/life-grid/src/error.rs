//! Error types for the `life-grid` crate.
//!
//! Grid accessors return [`GridError`]; the save codec returns
//! [`DecodeError`]. Both are caller-recoverable: a failed operation never
//! leaves a buffer partially written.

/// Errors raised by grid access and seeding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A coordinate fell outside the grid.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// A seeding density outside `0..=100` was requested.
    #[error("density {density}% is outside 0..=100")]
    InvalidDensity {
        /// The rejected density percentage.
        density: u32,
    },

    /// Grid dimensions were zero or too large to address.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// A replacement buffer did not match the grid's cell count.
    #[error("buffer holds {actual} cells, grid needs {expected}")]
    BufferLength {
        /// Cells required by the grid dimensions.
        expected: usize,
        /// Cells supplied.
        actual: usize,
    },
}

/// Errors raised while decoding a persisted grid payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The payload does not contain exactly one character per cell.
    #[error("payload has {actual} cells, expected {expected}")]
    LengthMismatch {
        /// Cells required by the grid dimensions.
        expected: usize,
        /// Characters found in the payload.
        actual: usize,
    },

    /// The payload contains something other than `'0'` or `'1'`.
    #[error("invalid character {found:?} at offset {index}")]
    InvalidCharacter {
        /// Offset of the character within the payload.
        index: usize,
        /// The offending character.
        found: char,
    },

    /// The save file is not valid UTF-8 text.
    #[error("save file is not text: invalid byte at offset {offset}")]
    NotText {
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },

    /// A `life` header line was present but could not be parsed.
    #[error("malformed header: {header:?}")]
    MalformedHeader {
        /// The header line as read.
        header: String,
    },

    /// The header names dimensions that differ from the target grid.
    #[error("saved grid is {saved_width}x{saved_height}, target grid is {width}x{height}")]
    DimensionMismatch {
        /// Width recorded in the header.
        saved_width: usize,
        /// Height recorded in the header.
        saved_height: usize,
        /// Width of the grid being loaded into.
        width: usize,
        /// Height of the grid being loaded into.
        height: usize,
    },
}

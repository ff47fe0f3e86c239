//! Text encoding of one grid buffer.
//!
//! The payload is one ASCII character per cell, `'1'` alive and `'0'` dead,
//! in storage order (outer loop over columns `x`, inner loop over rows `y`),
//! with no delimiters.
//!
//! Two layouts are understood:
//!
//! | Format | Layout |
//! |--------|--------|
//! | [`SaveFormat::Legacy`] | payload only, exactly `W * H` characters |
//! | [`SaveFormat::V1`] | `life v1 <W>x<H>` header line, then payload and a newline |
//!
//! The legacy layout carries no dimensions and can only be loaded into a grid
//! of the same size; the `v1` header lets a mismatched file be rejected by
//! name instead of by length. [`decode`] accepts either layout.

use serde::Deserialize;

use crate::error::DecodeError;
use crate::grid::Dimensions;

/// Prefix that marks a headered save.
const HEADER_MAGIC: &str = "life ";

/// On-disk layout written by [`encode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    /// Headerless payload, byte-compatible with saves from the 40x40 original.
    Legacy,
    /// Header line naming the version and dimensions, followed by the payload.
    #[default]
    V1,
}

/// Encode `cells` (one buffer in storage order) as save text.
pub fn encode(cells: &[bool], dims: Dimensions, format: SaveFormat) -> String {
    let mut out = String::with_capacity(cells.len().saturating_add(32));
    if format == SaveFormat::V1 {
        out.push_str(&format!(
            "{HEADER_MAGIC}v1 {}x{}\n",
            dims.width(),
            dims.height()
        ));
    }
    out.extend(cells.iter().map(|&alive| if alive { '1' } else { '0' }));
    if format == SaveFormat::V1 {
        out.push('\n');
    }
    out
}

/// Decode save text into a buffer for a grid of `dims`.
///
/// Headered and headerless text are both accepted. One trailing line ending
/// is tolerated. The payload length is validated before any cell is read.
///
/// # Errors
///
/// Returns [`DecodeError`] if the header is malformed or names other
/// dimensions, the payload length differs from `dims.cell_count()`, or a
/// character other than `'0'`/`'1'` is present.
pub fn decode(text: &str, dims: Dimensions) -> Result<Vec<bool>, DecodeError> {
    let payload = match text.strip_prefix(HEADER_MAGIC) {
        Some(rest) => {
            let (header, body) = rest.split_once('\n').unwrap_or((rest, ""));
            check_header(header.trim_end_matches('\r'), dims)?;
            body
        }
        None => text,
    };
    let payload = strip_line_ending(payload);

    let expected = dims.cell_count();
    let actual = payload.chars().count();
    if actual != expected {
        return Err(DecodeError::LengthMismatch { expected, actual });
    }

    payload
        .chars()
        .enumerate()
        .map(|(index, found)| match found {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(DecodeError::InvalidCharacter { index, found }),
        })
        .collect()
}

/// Decode raw save file bytes for a grid of `dims`.
///
/// # Errors
///
/// Returns [`DecodeError::NotText`] if `bytes` is not UTF-8, otherwise
/// whatever [`decode`] reports.
pub fn decode_bytes(bytes: &[u8], dims: Dimensions) -> Result<Vec<bool>, DecodeError> {
    let text = std::str::from_utf8(bytes).map_err(|e| DecodeError::NotText {
        offset: e.valid_up_to(),
    })?;
    decode(text, dims)
}

fn strip_line_ending(payload: &str) -> &str {
    payload
        .strip_suffix("\r\n")
        .or_else(|| payload.strip_suffix('\n'))
        .unwrap_or(payload)
}

/// Validate a header of the form `v1 <W>x<H>` against `dims`.
fn check_header(header: &str, dims: Dimensions) -> Result<(), DecodeError> {
    let malformed = || DecodeError::MalformedHeader {
        header: format!("{HEADER_MAGIC}{header}"),
    };

    let (version, size) = header.split_once(' ').ok_or_else(malformed)?;
    if version != "v1" {
        return Err(malformed());
    }
    let (w, h) = size.split_once('x').ok_or_else(malformed)?;
    let saved_width = w.parse::<usize>().ok().ok_or_else(malformed)?;
    let saved_height = h.parse::<usize>().ok().ok_or_else(malformed)?;

    if saved_width != dims.width() || saved_height != dims.height() {
        return Err(DecodeError::DimensionMismatch {
            saved_width,
            saved_height,
            width: dims.width(),
            height: dims.height(),
        });
    }
    Ok(())
}

//! Plain-text rendering of packed rows.

use crate::encode::ROW_BITS;

/// Character drawn for a set pixel.
pub const ON_PIXEL: char = '#';

/// Character drawn for a clear pixel.
pub const OFF_PIXEL: char = '.';

/// Draws packed rows as text, one line per row, reading bits LSB-first.
pub fn render_rows(rows: &[u8], width: usize) -> String {
    let mut out = String::with_capacity(rows.len() * (width + 1));
    for &row in rows {
        for col in 0..width.min(ROW_BITS) {
            out.push(if (row >> col) & 0x01 != 0 {
                ON_PIXEL
            } else {
                OFF_PIXEL
            });
        }
        out.push('\n');
    }
    out
}

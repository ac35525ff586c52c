//! Coverage-to-bitrow encoding.
//!
//! A glyph is packed into a fixed box of `max_rows` rows by `max_cols`
//! columns. Each row becomes one byte; column `c` maps to bit `c`, so the
//! leftmost pixel is the least significant bit. This is the XBM bit order:
//! a renderer reading bits LSB-first reproduces the glyph left to right.
//!
//! Pixels outside the box are dropped. The drop is recorded in the bitmap's
//! [`ClipInfo`] so callers can report it.

use bitglyph_spec::{ClipInfo, FitMode};
use thiserror::Error;

use crate::fit::scale_coverage;
use crate::grid::CoverageGrid;

/// Number of columns a single output byte can hold.
pub const ROW_BITS: usize = 8;

/// Minimum number of set 8-neighbours a pixel needs to survive despeckling.
const DESPECKLE_MIN_NEIGHBOURS: usize = 2;

/// Errors that can occur when configuring an encoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Column count does not fit in one byte.
    #[error("column count {0} does not fit in one byte row (expected 1..=8)")]
    WidthOutOfRange(usize),

    /// Row count is zero.
    #[error("row count must be positive")]
    ZeroHeight,
}

/// A glyph packed into one byte per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    rows: Vec<u8>,
    width: usize,
    clip: ClipInfo,
}

impl PackedBitmap {
    /// Packed rows, top to bottom.
    pub fn rows(&self) -> &[u8] {
        &self.rows
    }

    /// Number of columns in the box.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows in the box.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// How much of the source grid fell outside the box.
    pub fn clip(&self) -> ClipInfo {
        self.clip
    }

    /// Whether the pixel at `(row, col)` is set. Out-of-box pixels are unset.
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        col < self.width && self.rows.get(row).is_some_and(|r| r & (1 << col) != 0)
    }

    /// Clears interior pixels that have fewer than two set neighbours.
    ///
    /// Neighbours are counted on the original bitmap, so clearing one pixel
    /// never affects the decision for another. Pixels on the outer border of
    /// the box are left alone.
    pub fn despeckle(&self) -> PackedBitmap {
        let height = self.height();
        let mut rows = self.rows.clone();

        for row in 1..height.saturating_sub(1) {
            for col in 1..self.width.saturating_sub(1) {
                if !self.is_set(row, col) {
                    continue;
                }
                let neighbours = self.count_neighbours(row, col);
                if neighbours < DESPECKLE_MIN_NEIGHBOURS {
                    rows[row] &= !(1 << col);
                }
            }
        }

        PackedBitmap {
            rows,
            width: self.width,
            clip: self.clip,
        }
    }

    fn count_neighbours(&self, row: usize, col: usize) -> usize {
        let mut count = 0;
        for r in row - 1..=row + 1 {
            for c in col - 1..=col + 1 {
                if (r, c) != (row, col) && self.is_set(r, c) {
                    count += 1;
                }
            }
        }
        count
    }
}

/// Packs coverage grids into a fixed `max_rows` x `max_cols` box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    max_rows: usize,
    max_cols: usize,
    threshold: u8,
}

impl Encoder {
    /// Creates an encoder for the given box.
    ///
    /// Fails if `max_cols` is not in `1..=8` or `max_rows` is zero.
    pub fn new(max_rows: usize, max_cols: usize) -> Result<Self, EncodeError> {
        if max_cols == 0 || max_cols > ROW_BITS {
            return Err(EncodeError::WidthOutOfRange(max_cols));
        }
        if max_rows == 0 {
            return Err(EncodeError::ZeroHeight);
        }
        Ok(Self {
            max_rows,
            max_cols,
            threshold: 0,
        })
    }

    /// Sets the coverage a pixel must exceed to be set. Defaults to 0.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn max_cols(&self) -> usize {
        self.max_cols
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Encodes a grid. The result always has exactly `max_rows` rows.
    pub fn encode(&self, grid: &CoverageGrid<'_>) -> PackedBitmap {
        PackedBitmap {
            rows: self.pack(|row, col| grid.get(row, col)),
            width: self.max_cols,
            clip: self.clip_of(grid),
        }
    }

    /// Resamples the whole grid to the box, then encodes it.
    ///
    /// Nothing falls outside the box, so the clip info is always empty.
    pub fn encode_scaled(&self, grid: &CoverageGrid<'_>) -> PackedBitmap {
        let scaled = scale_coverage(grid, saturate(self.max_cols), saturate(self.max_rows));
        PackedBitmap {
            rows: self.pack(|row, col| scaled.get(row * self.max_cols + col).copied()),
            width: self.max_cols,
            clip: ClipInfo::default(),
        }
    }

    /// Encodes a grid using the given fit mode.
    pub fn encode_fitted(&self, grid: &CoverageGrid<'_>, fit: FitMode) -> PackedBitmap {
        match fit {
            FitMode::Clip => self.encode(grid),
            FitMode::Scale => self.encode_scaled(grid),
        }
    }

    fn pack(&self, coverage: impl Fn(usize, usize) -> Option<u8>) -> Vec<u8> {
        (0..self.max_rows)
            .map(|row| {
                (0..self.max_cols)
                    .filter(|&col| coverage(row, col).is_some_and(|v| v > self.threshold))
                    .fold(0u8, |acc, col| acc | (1 << col))
            })
            .collect()
    }

    fn clip_of(&self, grid: &CoverageGrid<'_>) -> ClipInfo {
        let dropped_rows = grid.height().saturating_sub(self.max_rows);
        let dropped_columns = grid.width().saturating_sub(self.max_cols);

        let lost_coverage = (dropped_rows > 0 || dropped_columns > 0)
            && (0..grid.height()).any(|row| {
                (0..grid.width()).any(|col| {
                    (row >= self.max_rows || col >= self.max_cols)
                        && grid.get(row, col).is_some_and(|v| v > self.threshold)
                })
            });

        ClipInfo {
            dropped_rows: saturate(dropped_rows),
            dropped_columns: saturate(dropped_columns),
            lost_coverage,
        }
    }
}

fn saturate(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Encodes `grid` into `max_rows` bytes of `max_cols` bits each.
///
/// A bit is set when the pixel's coverage is above zero.
pub fn encode(
    grid: &CoverageGrid<'_>,
    max_rows: usize,
    max_cols: usize,
) -> Result<PackedBitmap, EncodeError> {
    Ok(Encoder::new(max_rows, max_cols)?.encode(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid_from(width: usize, height: usize, set: &[(usize, usize)]) -> Vec<u8> {
        let mut buffer = vec![0u8; width * height];
        for &(row, col) in set {
            buffer[row * width + col] = 255;
        }
        buffer
    }

    #[test]
    fn test_single_pixel_at_origin() {
        let buffer = grid_from(7, 13, &[(0, 0)]);
        let grid = CoverageGrid::packed(7, 13, &buffer).unwrap();
        let bitmap = encode(&grid, 13, 7).unwrap();

        let mut expected = vec![0u8; 13];
        expected[0] = 0x01;
        assert_eq!(bitmap.rows(), expected.as_slice());
    }

    #[test]
    fn test_full_row_coverage() {
        let set: Vec<_> = (0..7).map(|c| (5, c)).collect();
        let buffer = grid_from(7, 13, &set);
        let grid = CoverageGrid::packed(7, 13, &buffer).unwrap();
        let bitmap = encode(&grid, 13, 7).unwrap();

        for (row, &byte) in bitmap.rows().iter().enumerate() {
            assert_eq!(byte, if row == 5 { 0x7f } else { 0x00 }, "row {}", row);
        }
    }

    #[test]
    fn test_small_grid_is_padded() {
        let buffer = vec![255u8; 2 * 3];
        let grid = CoverageGrid::packed(2, 3, &buffer).unwrap();
        let bitmap = encode(&grid, 13, 7).unwrap();

        assert_eq!(bitmap.height(), 13);
        assert_eq!(&bitmap.rows()[..3], &[0x03, 0x03, 0x03]);
        assert!(bitmap.rows()[3..].iter().all(|&b| b == 0));
        assert!(!bitmap.clip().is_clipped());
    }

    #[test]
    fn test_stride_padding_is_ignored() {
        // 1-pixel-wide glyph with a 4-byte pitch; padding is "covered".
        let buffer = [255, 255, 255, 255, 0, 255, 255, 255];
        let grid = CoverageGrid::new(1, 2, 4, &buffer).unwrap();
        let bitmap = encode(&grid, 2, 7).unwrap();
        assert_eq!(bitmap.rows(), &[0x01, 0x00]);
    }

    #[test]
    fn test_threshold() {
        let buffer = [0, 64, 128, 200];
        let grid = CoverageGrid::packed(4, 1, &buffer).unwrap();

        let any = Encoder::new(1, 4).unwrap().encode(&grid);
        assert_eq!(any.rows(), &[0b1110]);

        let strict = Encoder::new(1, 4).unwrap().with_threshold(128).encode(&grid);
        assert_eq!(strict.rows(), &[0b1000]);
    }

    #[test]
    fn test_wide_glyph_is_clipped() {
        let buffer = grid_from(10, 2, &[(0, 0), (1, 9)]);
        let grid = CoverageGrid::packed(10, 2, &buffer).unwrap();
        let bitmap = encode(&grid, 2, 7).unwrap();

        assert_eq!(bitmap.rows(), &[0x01, 0x00]);
        let clip = bitmap.clip();
        assert_eq!(clip.dropped_columns, 3);
        assert_eq!(clip.dropped_rows, 0);
        assert!(clip.lost_coverage);
    }

    #[test]
    fn test_clip_without_lost_coverage() {
        let buffer = grid_from(7, 15, &[(3, 3)]);
        let grid = CoverageGrid::packed(7, 15, &buffer).unwrap();
        let bitmap = encode(&grid, 13, 7).unwrap();

        let clip = bitmap.clip();
        assert_eq!(clip.dropped_rows, 2);
        assert!(clip.is_clipped());
        assert!(!clip.lost_coverage);
    }

    #[test]
    fn test_rejects_out_of_range_width() {
        let grid = CoverageGrid::packed(0, 0, &[]).unwrap();
        assert_eq!(
            encode(&grid, 13, 9).unwrap_err(),
            EncodeError::WidthOutOfRange(9)
        );
        assert_eq!(
            encode(&grid, 13, 0).unwrap_err(),
            EncodeError::WidthOutOfRange(0)
        );
        assert_eq!(encode(&grid, 0, 7).unwrap_err(), EncodeError::ZeroHeight);
    }

    #[test]
    fn test_full_byte_width() {
        let buffer = vec![1u8; 8];
        let grid = CoverageGrid::packed(8, 1, &buffer).unwrap();
        assert_eq!(encode(&grid, 1, 8).unwrap().rows(), &[0xff]);
    }

    #[test]
    fn test_despeckle_removes_isolated_pixel() {
        // Isolated pixel at (2,2) and a 3x2 stroke in columns 4..=5.
        let stroke = [(1, 4), (1, 5), (2, 4), (2, 5), (3, 4), (3, 5)];
        let mut set = vec![(2, 2)];
        set.extend_from_slice(&stroke);
        let buffer = grid_from(7, 5, &set);
        let grid = CoverageGrid::packed(7, 5, &buffer).unwrap();
        let bitmap = encode(&grid, 5, 7).unwrap();
        assert!(bitmap.is_set(2, 2));

        let cleaned = bitmap.despeckle();
        assert!(!cleaned.is_set(2, 2));
        for (row, col) in stroke {
            assert!(cleaned.is_set(row, col), "({}, {}) should survive", row, col);
        }
    }

    #[test]
    fn test_despeckle_keeps_border_pixels() {
        let buffer = grid_from(7, 5, &[(0, 3), (4, 0), (2, 6)]);
        let grid = CoverageGrid::packed(7, 5, &buffer).unwrap();
        let bitmap = encode(&grid, 5, 7).unwrap();
        assert_eq!(bitmap.despeckle(), bitmap);
    }

    #[test]
    fn test_is_set_out_of_box() {
        let buffer = vec![255u8; 7];
        let grid = CoverageGrid::packed(7, 1, &buffer).unwrap();
        let bitmap = encode(&grid, 1, 7).unwrap();
        assert!(bitmap.is_set(0, 6));
        assert!(!bitmap.is_set(0, 7));
        assert!(!bitmap.is_set(1, 0));
    }

    #[test]
    fn test_scaled_wide_glyph_keeps_its_shape() {
        // 16x13 glyph, left half covered; twice as wide as an 8-column box.
        let set: Vec<_> = (0..13)
            .flat_map(|r| (0..8).map(move |c| (r, c)))
            .collect();
        let buffer = grid_from(16, 13, &set);
        let grid = CoverageGrid::packed(16, 13, &buffer).unwrap();
        let encoder = Encoder::new(13, 8).unwrap().with_threshold(128);

        let clipped = encoder.encode_fitted(&grid, FitMode::Clip);
        assert!(clipped.rows().iter().all(|&b| b == 0xff));
        assert_eq!(clipped.clip().dropped_columns, 8);

        let scaled = encoder.encode_fitted(&grid, FitMode::Scale);
        assert_eq!(scaled.height(), 13);
        for (row, &byte) in scaled.rows().iter().enumerate() {
            assert_eq!(byte & 0x07, 0x07, "row {} left columns", row);
            assert_eq!(byte & 0xe0, 0x00, "row {} right columns", row);
        }
        assert!(!scaled.clip().is_clipped());
    }

    #[test]
    fn test_scaled_empty_grid_is_blank() {
        let grid = CoverageGrid::packed(0, 0, &[]).unwrap();
        let bitmap = Encoder::new(13, 7).unwrap().encode_scaled(&grid);
        assert_eq!(bitmap.rows(), &[0u8; 13]);
    }
}

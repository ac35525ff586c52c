//! Resampling oversized glyphs into the target box.
//!
//! In [`FitMode::Scale`](bitglyph_spec::FitMode::Scale) the whole coverage
//! grid is resized to the box with a Lanczos filter before encoding, so a
//! wide glyph is narrowed instead of cut off. A threshold around 128 usually
//! gives cleaner strokes than the default of 0 after resampling.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};

use crate::grid::CoverageGrid;

/// Resamples `grid` to exactly `width` x `height` pixels.
///
/// Returns `width * height` coverage bytes in row-major order. An empty grid
/// yields an all-zero buffer.
pub fn scale_coverage(grid: &CoverageGrid<'_>, width: u32, height: u32) -> Vec<u8> {
    let len = width as usize * height as usize;
    if len == 0 || grid.width() == 0 || grid.height() == 0 {
        return vec![0; len];
    }

    let source = GrayImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
        Luma([grid.get(y as usize, x as usize).unwrap_or(0)])
    });
    imageops::resize(&source, width, height, FilterType::Lanczos3).into_raw()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_length_matches_box() {
        let buffer = vec![255u8; 20 * 15];
        let grid = CoverageGrid::packed(20, 15, &buffer).unwrap();
        let scaled = scale_coverage(&grid, 7, 13);
        assert_eq!(scaled.len(), 7 * 13);
        assert!(scaled.iter().all(|&v| v > 128));
    }

    #[test]
    fn test_empty_grid_scales_to_blank() {
        let grid = CoverageGrid::packed(0, 0, &[]).unwrap();
        assert_eq!(scale_coverage(&grid, 7, 13), vec![0u8; 91]);
    }

    #[test]
    fn test_blank_grid_stays_blank() {
        let buffer = vec![0u8; 12 * 4];
        let grid = CoverageGrid::packed(12, 4, &buffer).unwrap();
        assert!(scale_coverage(&grid, 5, 4).iter().all(|&v| v == 0));
    }
}

//! Read-only views over rasterized coverage data.

use thiserror::Error;

/// Errors raised when a buffer cannot back a coverage grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Row pitch is narrower than the grid.
    #[error("stride {stride} is smaller than width {width}")]
    StrideTooSmall { stride: usize, width: usize },

    /// Buffer does not cover the last row.
    #[error("buffer holds {actual} bytes, grid needs {needed}")]
    BufferTooShort { needed: usize, actual: usize },
}

/// A borrowed grid of 8-bit coverage values, one per pixel.
///
/// Row `r` starts at byte `r * stride`; only the first `width` bytes of each
/// row belong to the glyph. The stride may exceed the width when the
/// producer pads rows for alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageGrid<'a> {
    width: usize,
    height: usize,
    stride: usize,
    buffer: &'a [u8],
}

impl<'a> CoverageGrid<'a> {
    /// Creates a grid view, checking that the buffer covers every row.
    pub fn new(
        width: usize,
        height: usize,
        stride: usize,
        buffer: &'a [u8],
    ) -> Result<Self, GridError> {
        if stride < width {
            return Err(GridError::StrideTooSmall { stride, width });
        }
        let needed = required_len(width, height, stride);
        if buffer.len() < needed {
            return Err(GridError::BufferTooShort {
                needed,
                actual: buffer.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            buffer,
        })
    }

    /// Builds a view over a buffer whose length was already checked.
    pub(crate) fn from_validated(
        width: usize,
        height: usize,
        stride: usize,
        buffer: &'a [u8],
    ) -> Self {
        debug_assert!(buffer.len() >= required_len(width, height, stride));
        Self {
            width,
            height,
            stride,
            buffer,
        }
    }

    /// Creates a grid whose rows are stored back to back (`stride == width`).
    pub fn packed(width: usize, height: usize, buffer: &'a [u8]) -> Result<Self, GridError> {
        Self::new(width, height, width, buffer)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Coverage at `(row, col)`, or `None` outside the grid extent.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.height && col < self.width {
            self.buffer.get(row * self.stride + col).copied()
        } else {
            None
        }
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> usize {
    if width == 0 || height == 0 {
        0
    } else {
        (height - 1) * stride + width
    }
}

//! bitglyph Backend
//!
//! This crate turns rasterized glyphs into XBM bitmaps with one byte per
//! row. The pieces are usable on their own:
//!
//! - [`grid`]: borrowed coverage grids as produced by a rasterizer
//! - [`encode`]: packing a grid into a fixed box of bit rows
//! - [`fit`]: resampling oversized glyphs to the box
//! - [`xbm`]: serializing packed rows as an XBM literal, and parsing it back
//! - [`raster`]: the rasterizer seam and its `fontdue` implementation
//! - [`generate`]: the per-character conversion pipeline
//! - [`preview`]: text rendering for terminals
//!
//! # Example
//!
//! ```
//! use bitglyph_backend::encode::encode;
//! use bitglyph_backend::grid::CoverageGrid;
//! use bitglyph_backend::xbm::serialize_bitmap;
//! use bitglyph_spec::GlyphId;
//!
//! // A 2x2 glyph with its top-left pixel covered.
//! let coverage = [255, 0, 0, 0];
//! let grid = CoverageGrid::packed(2, 2, &coverage).unwrap();
//!
//! let bitmap = encode(&grid, 13, 7).unwrap();
//! assert_eq!(bitmap.rows()[0], 0x01);
//!
//! let text = serialize_bitmap(&GlyphId::new('X'), &bitmap);
//! assert!(text.starts_with("#define X_width 7\n"));
//! ```
//!
//! # Determinism
//!
//! Encoding and serialization are pure: the same grid and bounds always
//! produce byte-identical text.

pub mod encode;
pub mod fit;
pub mod generate;
pub mod grid;
pub mod preview;
pub mod raster;
pub mod xbm;

pub use encode::{encode, EncodeError, Encoder, PackedBitmap, ROW_BITS};
pub use generate::{
    convert, convert_with, render_glyph, write_artifact, ConvertError, GlyphArtifact,
};
pub use fit::scale_coverage;
pub use grid::{CoverageGrid, GridError};
pub use raster::{FontdueRasterizer, GlyphRasterizer, RasterError, RasterizedGlyph};
pub use xbm::{parse, serialize, serialize_bitmap, XbmImage, XbmParseError, ITEMS_PER_LINE};

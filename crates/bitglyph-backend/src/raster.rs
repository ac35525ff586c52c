//! Glyph rasterization.
//!
//! The encoder only needs a coverage grid per character. [`GlyphRasterizer`]
//! is the seam between the conversion pipeline and whatever produces those
//! grids; [`FontdueRasterizer`] is the implementation backed by `fontdue`.

use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use log::debug;
use thiserror::Error;

use crate::grid::{CoverageGrid, GridError};

/// Errors that can occur while loading a font or rendering a glyph.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The font file could not be read.
    #[error("could not read font {path}: {source}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The font data could not be parsed.
    #[error("could not parse font {path}: {message}")]
    FontParse { path: PathBuf, message: String },

    /// The font has no glyph for the character.
    #[error("font has no glyph for {0:?}")]
    MissingGlyph(char),

    /// The rasterizer produced a buffer that does not match its dimensions.
    #[error("malformed bitmap for {character:?}: {source}")]
    MalformedGlyph {
        character: char,
        #[source]
        source: GridError,
    },
}

/// Coverage data for one rendered glyph, owned by the rasterizer output.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizedGlyph {
    character: char,
    width: usize,
    height: usize,
    coverage: Vec<u8>,
}

impl RasterizedGlyph {
    /// Wraps a row-major coverage buffer of `width * height` bytes.
    pub fn new(
        character: char,
        width: usize,
        height: usize,
        coverage: Vec<u8>,
    ) -> Result<Self, RasterError> {
        CoverageGrid::packed(width, height, &coverage)
            .map_err(|source| RasterError::MalformedGlyph { character, source })?;
        Ok(Self {
            character,
            width,
            height,
            coverage,
        })
    }

    pub fn character(&self) -> char {
        self.character
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrowed view for the encoder.
    pub fn grid(&self) -> CoverageGrid<'_> {
        CoverageGrid::from_validated(self.width, self.height, self.width, &self.coverage)
    }
}

/// Produces coverage grids for characters.
pub trait GlyphRasterizer {
    /// Renders one character.
    fn rasterize(&self, character: char) -> Result<RasterizedGlyph, RasterError>;
}

/// Rasterizer backed by a `fontdue` font at a fixed pixel height.
pub struct FontdueRasterizer {
    font: Font,
    pixel_height: f32,
}

impl FontdueRasterizer {
    /// Loads the font at `path`.
    ///
    /// `pixel_height` is the em size in pixels; glyph widths follow from the
    /// font's own proportions.
    pub fn load(path: &Path, face_index: u32, pixel_height: u32) -> Result<Self, RasterError> {
        let data = std::fs::read(path).map_err(|source| RasterError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data, face_index, pixel_height).map_err(|e| match e {
            RasterError::FontParse { message, .. } => RasterError::FontParse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Loads a font from memory.
    pub fn from_bytes(
        data: Vec<u8>,
        face_index: u32,
        pixel_height: u32,
    ) -> Result<Self, RasterError> {
        let settings = FontSettings {
            collection_index: face_index,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(data, settings).map_err(|message| RasterError::FontParse {
            path: PathBuf::from("<memory>"),
            message: message.to_string(),
        })?;
        debug!(
            "loaded font with {} glyphs at {}px",
            font.glyph_count(),
            pixel_height
        );
        Ok(Self {
            font,
            pixel_height: pixel_height as f32,
        })
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn rasterize(&self, character: char) -> Result<RasterizedGlyph, RasterError> {
        if self.font.lookup_glyph_index(character) == 0 {
            return Err(RasterError::MissingGlyph(character));
        }

        let (metrics, coverage) = self.font.rasterize(character, self.pixel_height);
        debug!(
            "rasterized {:?}: {}x{} xmin={} ymin={} advance={:.2}",
            character,
            metrics.width,
            metrics.height,
            metrics.xmin,
            metrics.ymin,
            metrics.advance_width
        );

        RasterizedGlyph::new(character, metrics.width, metrics.height, coverage)
    }
}

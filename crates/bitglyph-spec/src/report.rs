//! Report types for conversion runs.
//!
//! A report lists every file written and every character that could not be
//! converted. Per-character failures never abort a run, so a report with
//! failures can still be `ok` for the written files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How much of a rasterized glyph fell outside the target box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipInfo {
    /// Grid rows beyond the box height.
    pub dropped_rows: u32,
    /// Grid columns beyond the box width.
    pub dropped_columns: u32,
    /// Whether any dropped pixel had coverage.
    pub lost_coverage: bool,
}

impl ClipInfo {
    /// Returns true if the glyph extended past the box.
    pub fn is_clipped(&self) -> bool {
        self.dropped_rows > 0 || self.dropped_columns > 0
    }
}

/// A successfully written glyph file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphOutput {
    /// Converted character.
    pub character: char,
    /// Identifier used in the declarations and file name.
    pub identifier: String,
    /// Path of the written file.
    pub path: PathBuf,
    /// Hex-encoded BLAKE3 hash of the file contents.
    pub hash: String,
    /// Clipping information for the glyph.
    pub clip: ClipInfo,
}

/// Category of a per-character failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The font has no glyph for the character.
    GlyphLoad,
    /// The output file could not be written.
    FileWrite,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::GlyphLoad => "glyph_load",
            FailureKind::FileWrite => "file_write",
        };
        f.write_str(s)
    }
}

/// A character that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphFailure {
    /// Character that failed.
    pub character: char,
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable error message.
    pub message: String,
}

/// Result of one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// True when no character failed.
    pub ok: bool,
    /// Font the glyphs were rasterized from.
    pub font_path: PathBuf,
    /// Rows per glyph.
    pub pixel_height: u32,
    /// Columns per glyph.
    pub bit_width: u32,
    /// Files written, in charset order.
    pub outputs: Vec<GlyphOutput>,
    /// Characters skipped, in charset order.
    pub failures: Vec<GlyphFailure>,
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    /// Backend identifier and version (e.g., "bitglyph-backend v0.1.0").
    pub backend_version: String,
}

impl ConversionReport {
    /// Creates an empty report for a run.
    pub fn new(
        font_path: impl Into<PathBuf>,
        pixel_height: u32,
        bit_width: u32,
        backend_version: impl Into<String>,
    ) -> Self {
        Self {
            ok: true,
            font_path: font_path.into(),
            pixel_height,
            bit_width,
            outputs: Vec::new(),
            failures: Vec::new(),
            duration_ms: 0,
            backend_version: backend_version.into(),
        }
    }

    /// Records a written file.
    pub fn push_output(&mut self, output: GlyphOutput) {
        self.outputs.push(output);
    }

    /// Records a skipped character.
    pub fn push_failure(&mut self, failure: GlyphFailure) {
        self.failures.push(failure);
        self.ok = false;
    }

    /// Number of written glyphs that were clipped.
    pub fn clipped_count(&self) -> usize {
        self.outputs.iter().filter(|o| o.clip.is_clipped()).count()
    }

    /// Serializes the report to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the report to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

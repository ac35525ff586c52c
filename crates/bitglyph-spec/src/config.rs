//! Conversion configuration.
//!
//! A [`ConversionConfig`] names the font to load, the characters to convert,
//! the target glyph box, and where the `.xbm` files go. It is usually read
//! from a JSON file and then adjusted by command-line flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default pixel height glyphs are rasterized at (and number of output rows).
pub const DEFAULT_PIXEL_HEIGHT: u32 = 13;

/// Default number of columns packed into each output row.
pub const DEFAULT_BIT_WIDTH: u32 = 7;

/// Each output row is a single byte.
pub const MAX_BIT_WIDTH: u32 = 8;

/// Upper bound on pixel height accepted by validation.
pub const MAX_PIXEL_HEIGHT: u32 = 255;

/// How a glyph larger than the target box is brought into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Keep the top-left of the glyph and drop whatever lies outside the box.
    #[default]
    Clip,
    /// Resample the whole glyph to exactly the box size before encoding.
    Scale,
}

impl FitMode {
    /// Returns the mode name as used in configs and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            FitMode::Clip => "clip",
            FitMode::Scale => "scale",
        }
    }
}

impl std::fmt::Display for FitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clip" => Ok(FitMode::Clip),
            "scale" => Ok(FitMode::Scale),
            other => Err(format!(
                "unknown fit mode '{}' (expected clip or scale)",
                other
            )),
        }
    }
}

/// Parameters for a font-to-XBM conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionConfig {
    /// Path to the TrueType/OpenType font file.
    #[serde(default)]
    pub font_path: PathBuf,

    /// Face index inside a font collection (0 for single-face files).
    #[serde(default)]
    pub face_index: u32,

    /// Characters to convert, one output file each.
    #[serde(default)]
    pub charset: String,

    /// Pixel height glyphs are rasterized at. Also the number of rows emitted.
    #[serde(default = "default_pixel_height")]
    pub pixel_height: u32,

    /// Number of glyph columns packed into each row (1..=8).
    #[serde(default = "default_bit_width")]
    pub bit_width: u32,

    /// Directory the `.xbm` files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// A pixel is set when its coverage is strictly greater than this value.
    #[serde(default)]
    pub threshold: u8,

    /// How glyphs larger than the box are handled.
    #[serde(default)]
    pub fit: FitMode,

    /// Remove isolated pixels after encoding.
    #[serde(default)]
    pub despeckle: bool,
}

fn default_pixel_height() -> u32 {
    DEFAULT_PIXEL_HEIGHT
}

fn default_bit_width() -> u32 {
    DEFAULT_BIT_WIDTH
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            font_path: PathBuf::new(),
            face_index: 0,
            charset: String::new(),
            pixel_height: default_pixel_height(),
            bit_width: default_bit_width(),
            output_dir: default_output_dir(),
            threshold: 0,
            fit: FitMode::Clip,
            despeckle: false,
        }
    }
}

impl ConversionConfig {
    /// Creates a config for the given font and characters with 7x13 defaults.
    pub fn new(font_path: impl Into<PathBuf>, charset: impl Into<String>) -> Self {
        Self {
            font_path: font_path.into(),
            charset: charset.into(),
            ..Self::default()
        }
    }

    /// Sets the face index.
    pub fn with_face_index(mut self, face_index: u32) -> Self {
        self.face_index = face_index;
        self
    }

    /// Sets the pixel height.
    pub fn with_pixel_height(mut self, pixel_height: u32) -> Self {
        self.pixel_height = pixel_height;
        self
    }

    /// Sets the packed bit width.
    pub fn with_bit_width(mut self, bit_width: u32) -> Self {
        self.bit_width = bit_width;
        self
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Sets the coverage threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets how oversized glyphs are fitted into the box.
    pub fn with_fit(mut self, fit: FitMode) -> Self {
        self.fit = fit;
        self
    }

    /// Enables or disables isolated-pixel removal.
    pub fn with_despeckle(mut self, despeckle: bool) -> Self {
        self.despeckle = despeckle;
        self
    }

    /// Returns the characters to convert in charset order, without repeats.
    pub fn characters(&self) -> Vec<char> {
        let mut seen = Vec::new();
        for c in self.charset.chars() {
            if !seen.contains(&c) {
                seen.push(c);
            }
        }
        seen
    }

    /// Parses a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serializes the config to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_defaults() {
        let config = ConversionConfig::new("font.ttf", "I");
        assert_eq!(config.font_path, PathBuf::from("font.ttf"));
        assert_eq!(config.charset, "I");
        assert_eq!(config.face_index, 0);
        assert_eq!(config.pixel_height, 13);
        assert_eq!(config.bit_width, 7);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.threshold, 0);
        assert_eq!(config.fit, FitMode::Clip);
        assert!(!config.despeckle);
    }

    #[test]
    fn test_config_builder() {
        let config = ConversionConfig::new("font.ttf", "AB")
            .with_face_index(2)
            .with_pixel_height(16)
            .with_bit_width(8)
            .with_output_dir("out")
            .with_threshold(128)
            .with_despeckle(true);

        assert_eq!(config.face_index, 2);
        assert_eq!(config.pixel_height, 16);
        assert_eq!(config.bit_width, 8);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.threshold, 128);
        assert!(config.despeckle);
    }

    #[test]
    fn test_config_from_json_fills_defaults() {
        let config =
            ConversionConfig::from_json(r#"{ "font_path": "Courier.ttf", "charset": "J" }"#)
                .unwrap();
        assert_eq!(config, ConversionConfig::new("Courier.ttf", "J"));
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let result = ConversionConfig::from_json(r#"{ "font": "Courier.ttf" }"#);
        assert!(matches!(result, Err(ConfigError::JsonParse(_))));
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = ConversionConfig::new("a.ttf", "xyz").with_threshold(10);
        let json = config.to_json_pretty().unwrap();
        assert_eq!(ConversionConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bitglyph.json");
        std::fs::write(&path, r#"{ "font_path": "f.ttf", "charset": "Q", "bit_width": 5 }"#)
            .unwrap();

        let config = ConversionConfig::from_file(&path).unwrap();
        assert_eq!(config.bit_width, 5);

        let missing = ConversionConfig::from_file(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_fit_mode_from_json_and_str() {
        let config = ConversionConfig::from_json(
            r#"{ "font_path": "f.ttf", "charset": "W", "fit": "scale" }"#,
        )
        .unwrap();
        assert_eq!(config.fit, FitMode::Scale);

        assert_eq!("clip".parse::<FitMode>(), Ok(FitMode::Clip));
        assert_eq!(FitMode::Scale.to_string(), "scale");
        assert!("stretch".parse::<FitMode>().unwrap_err().contains("stretch"));
    }

    #[test]
    fn test_characters_deduplicates_in_order() {
        let config = ConversionConfig::new("f.ttf", "ABAC");
        assert_eq!(config.characters(), vec!['A', 'B', 'C']);
    }
}

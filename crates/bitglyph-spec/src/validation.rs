//! Configuration validation logic.

use crate::config::{ConversionConfig, MAX_BIT_WIDTH, MAX_PIXEL_HEIGHT};
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::glyph_id::GlyphId;

/// Validates a conversion config.
///
/// # Returns
/// * `ValidationResult` with `ok=true` if validation passed, with any warnings.
/// * `ValidationResult` with `ok=false` and errors if validation failed.
///
/// # Example
/// ```
/// use bitglyph_spec::{ConversionConfig, validate_config};
///
/// let config = ConversionConfig::new("font.ttf", "A").with_bit_width(9);
/// let result = validate_config(&config);
/// assert!(!result.is_ok());
/// ```
pub fn validate_config(config: &ConversionConfig) -> ValidationResult {
    let mut result = ValidationResult::success();

    if config.font_path.as_os_str().is_empty() {
        result.add_error(ValidationError::with_field(
            ErrorCode::MissingFontPath,
            "font_path is required",
            "font_path",
        ));
    }

    if config.charset.is_empty() {
        result.add_error(ValidationError::with_field(
            ErrorCode::EmptyCharset,
            "charset must contain at least one character",
            "charset",
        ));
    }

    if config.bit_width == 0 || config.bit_width > MAX_BIT_WIDTH {
        result.add_error(ValidationError::with_field(
            ErrorCode::BitWidthOutOfRange,
            format!(
                "bit_width must be between 1 and {}, got {}",
                MAX_BIT_WIDTH, config.bit_width
            ),
            "bit_width",
        ));
    }

    if config.pixel_height == 0 {
        result.add_error(ValidationError::with_field(
            ErrorCode::ZeroPixelHeight,
            "pixel_height must be positive",
            "pixel_height",
        ));
    } else if config.pixel_height > MAX_PIXEL_HEIGHT {
        result.add_error(ValidationError::with_field(
            ErrorCode::PixelHeightTooLarge,
            format!(
                "pixel_height must be at most {}, got {}",
                MAX_PIXEL_HEIGHT, config.pixel_height
            ),
            "pixel_height",
        ));
    }

    let mut seen = Vec::new();
    let mut file_stems: Vec<(String, char)> = Vec::new();
    for c in config.charset.chars() {
        if seen.contains(&c) {
            result.add_warning(ValidationWarning::with_field(
                WarningCode::DuplicateCharacter,
                format!("character {:?} appears more than once and is converted once", c),
                "charset",
            ));
            continue;
        }
        seen.push(c);

        let stem = GlyphId::new(c).as_str().to_ascii_lowercase();
        if let Some(&(_, other)) = file_stems.iter().find(|(s, _)| *s == stem) {
            result.add_warning(ValidationWarning::with_field(
                WarningCode::CaseInsensitiveCollision,
                format!(
                    "characters {:?} and {:?} write file names that differ only by case",
                    other, c
                ),
                "charset",
            ));
        } else {
            file_stems.push((stem, c));
        }

        if c.is_control() || c.is_whitespace() {
            result.add_warning(ValidationWarning::with_field(
                WarningCode::NonPrintableCharacter,
                format!("character {:?} has no visible glyph", c),
                "charset",
            ));
        }
    }

    result
}

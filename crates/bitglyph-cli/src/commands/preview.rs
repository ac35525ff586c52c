//! Preview command implementation
//!
//! Renders one character to the terminal without writing any files.

use anyhow::{anyhow, Result};
use bitglyph_backend::preview::render_rows;
use bitglyph_backend::{render_glyph, ConvertError, Encoder, FontdueRasterizer, GlyphArtifact};
use bitglyph_spec::{validate_config, ConversionConfig, FitMode};
use colored::Colorize;
use std::process::ExitCode;

/// Run the preview command
///
/// # Arguments
/// * `font` - Path to the font file
/// * `character` - Character to render
/// * `height` - Pixel height (rows)
/// * `width` - Bit width (columns)
/// * `threshold` - Coverage cut-off
/// * `fit` - How an oversized glyph is fitted into the box
/// * `despeckle` - Remove isolated pixels
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(
    font: &str,
    character: char,
    height: u32,
    width: u32,
    threshold: u8,
    fit: FitMode,
    despeckle: bool,
) -> Result<ExitCode> {
    let config = ConversionConfig::new(font, character.to_string())
        .with_pixel_height(height)
        .with_bit_width(width)
        .with_threshold(threshold)
        .with_fit(fit)
        .with_despeckle(despeckle);
    validate_config(&config)
        .into_result()
        .map_err(ConvertError::InvalidConfig)?;

    let rasterizer = FontdueRasterizer::load(&config.font_path, config.face_index, height)
        .map_err(|e| anyhow!("Failed to load font: {}", e))?;
    let encoder = Encoder::new(height as usize, width as usize)?.with_threshold(threshold);
    let artifact = render_glyph(&rasterizer, character, &encoder, fit, despeckle)?;

    println!(
        "{} {:?} as {} ({}x{})",
        "Preview:".cyan().bold(),
        character,
        artifact.id,
        width,
        height
    );
    let clip = artifact.bitmap.clip();
    if clip.lost_coverage {
        println!(
            "  {} clipped {} row(s) and {} column(s) with covered pixels",
            "!".yellow(),
            clip.dropped_rows,
            clip.dropped_columns
        );
    }
    print!("{}", render(&artifact));

    Ok(ExitCode::SUCCESS)
}

/// Pixel preview followed by the XBM text.
fn render(artifact: &GlyphArtifact) -> String {
    format!(
        "\n{}\n{}",
        render_rows(artifact.bitmap.rows(), artifact.bitmap.width()),
        artifact.text
    )
}

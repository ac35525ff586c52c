//! Inspect command implementation
//!
//! Parses an existing XBM file and prints its metadata and pixels.

use anyhow::{anyhow, Context, Result};
use bitglyph_backend::parse;
use bitglyph_backend::preview::render_rows;
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::process::ExitCode;

/// Metadata of an inspected XBM file.
#[derive(Debug, Clone, Serialize)]
pub struct InspectOutput {
    pub file: String,
    pub identifier: String,
    pub width: usize,
    pub height: usize,
    /// Row bytes as `0x..` literals.
    pub rows: Vec<String>,
    /// Number of set pixels.
    pub set_pixels: u32,
    /// Hex-encoded BLAKE3 hash of the file contents.
    pub hash: String,
    /// Pixel rows rendered with `#` and `.`.
    pub preview: Vec<String>,
}

/// Run the inspect command
///
/// # Arguments
/// * `file` - Path to the XBM file
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(file: &str, json_output: bool) -> Result<ExitCode> {
    let output = inspect_file(file)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize output")?
        );
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Inspecting:".cyan().bold(), output.file);
    println!("  {} {}", "Identifier:".dimmed(), output.identifier);
    println!("  {} {}x{}", "Size:".dimmed(), output.width, output.height);
    println!("  {} {}", "Set pixels:".dimmed(), output.set_pixels);
    println!("  {} {}", "Hash:".dimmed(), &output.hash[..16]);
    println!();
    for line in &output.preview {
        println!("  {}", line);
    }

    Ok(ExitCode::SUCCESS)
}

/// Reads and parses an XBM file.
pub fn inspect_file(file: &str) -> Result<InspectOutput> {
    let content = fs::read_to_string(file)
        .map_err(|e| anyhow!("Failed to read XBM file {}: {}", file, e))?;
    let image = parse(&content).map_err(|e| anyhow!("Failed to parse XBM file {}: {}", file, e))?;

    let preview = render_rows(&image.rows, image.width)
        .lines()
        .map(str::to_string)
        .collect();

    Ok(InspectOutput {
        file: file.to_string(),
        rows: image.rows.iter().map(|b| format!("0x{:02x}", b)).collect(),
        set_pixels: image.rows.iter().map(|b| b.count_ones()).sum(),
        hash: blake3::hash(content.as_bytes()).to_hex().to_string(),
        identifier: image.identifier,
        width: image.width,
        height: image.height,
        preview,
    })
}

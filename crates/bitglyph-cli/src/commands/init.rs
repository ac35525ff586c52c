//! Init command implementation
//!
//! Writes a starter conversion config.

use anyhow::{bail, Context, Result};
use bitglyph_spec::ConversionConfig;
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

/// Config file written when no output path is given.
pub const DEFAULT_CONFIG_FILE: &str = "bitglyph.json";

/// Run the init command
///
/// # Arguments
/// * `output` - Config file path (default: `bitglyph.json`)
/// * `force` - Overwrite an existing file
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(output: Option<&str>, force: bool) -> Result<ExitCode> {
    let path = output.unwrap_or(DEFAULT_CONFIG_FILE);
    write_config(Path::new(path), force)?;

    println!("{} Config written to: {}", "SUCCESS".green().bold(), path);
    println!(
        "  {} set font_path, then run: bitglyph convert --config {}",
        "Next:".dimmed(),
        path
    );
    Ok(ExitCode::SUCCESS)
}

/// Starter config: uppercase letters and digits in a 7x13 box.
pub fn starter_config() -> ConversionConfig {
    ConversionConfig::new(
        "fonts/Courier.ttf",
        "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
    )
    .with_output_dir("xbm")
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let json = starter_config()
        .to_json_pretty()
        .context("Failed to serialize config")?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

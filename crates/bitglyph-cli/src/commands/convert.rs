//! Convert command implementation
//!
//! Converts every configured character to an XBM file and prints a report.

use anyhow::{anyhow, Context, Result};
use bitglyph_backend::{convert, ConvertError};
use bitglyph_spec::{
    validate_config, ConversionConfig, ConversionReport, FitMode, ValidationResult,
};
use colored::Colorize;
use log::debug;
use serde_json::json;
use std::path::Path;
use std::process::ExitCode;

/// Options collected from the command line.
///
/// Every `Some` value overrides the matching field of the config file.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub config: Option<String>,
    pub font: Option<String>,
    pub chars: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub out: Option<String>,
    pub threshold: Option<u8>,
    pub fit: Option<FitMode>,
    pub despeckle: bool,
    pub json: bool,
    pub strict: bool,
}

/// Run the convert command
///
/// # Returns
/// Exit code: 0 on success, 1 with `--strict` if any character was skipped.
/// An invalid config or a font that cannot be loaded is returned as an error.
pub fn run(options: &ConvertOptions) -> Result<ExitCode> {
    let config = resolve_config(options)?;
    debug!("effective config: {:?}", config);

    if options.json {
        run_json(&config, options.strict)
    } else {
        run_human(&config, options.strict)
    }
}

/// Builds the effective config from the optional file and the flags.
pub fn resolve_config(options: &ConvertOptions) -> Result<ConversionConfig> {
    let mut config = match &options.config {
        Some(path) => ConversionConfig::from_file(Path::new(path))
            .map_err(|e| anyhow!("Failed to load config file {}: {}", path, e))?,
        None => ConversionConfig::default(),
    };

    if let Some(font) = &options.font {
        config.font_path = font.into();
    }
    if let Some(chars) = &options.chars {
        config.charset = chars.clone();
    }
    if let Some(height) = options.height {
        config.pixel_height = height;
    }
    if let Some(width) = options.width {
        config.bit_width = width;
    }
    if let Some(out) = &options.out {
        config.output_dir = out.into();
    }
    if let Some(threshold) = options.threshold {
        config.threshold = threshold;
    }
    if let Some(fit) = options.fit {
        config.fit = fit;
    }
    if options.despeckle {
        config.despeckle = true;
    }

    Ok(config)
}

/// Run convert with human-readable (colored) output
fn run_human(config: &ConversionConfig, strict: bool) -> Result<ExitCode> {
    println!(
        "{} {} ({}x{})",
        "Converting:".cyan().bold(),
        config.font_path.display(),
        config.bit_width,
        config.pixel_height
    );

    let validation = validate_config(config);
    for warning in &validation.warnings {
        println!("  {} {}", "!".yellow(), warning);
    }
    reject_invalid(validation)?;

    let report = convert(config)?;

    for output in &report.outputs {
        println!(
            "{} XBM file for '{}' saved as {}",
            "SUCCESS".green().bold(),
            output.character,
            output.path.display()
        );
        if output.clip.lost_coverage {
            println!(
                "  {} clipped {} row(s) and {} column(s) with covered pixels",
                "!".yellow(),
                output.clip.dropped_rows,
                output.clip.dropped_columns
            );
        }
    }

    for failure in &report.failures {
        println!(
            "{} {:?} skipped [{}]: {}",
            "WARNING".yellow().bold(),
            failure.character,
            failure.kind,
            failure.message
        );
    }

    println!(
        "\n{} {} written, {} skipped, {} clipped ({}ms)",
        "Done:".dimmed(),
        report.outputs.len(),
        report.failures.len(),
        report.clipped_count(),
        report.duration_ms
    );

    Ok(exit_code(&report, strict))
}

/// Run convert with machine-readable JSON output
fn run_json(config: &ConversionConfig, strict: bool) -> Result<ExitCode> {
    let validation = validate_config(config);
    if !validation.is_ok() {
        let output = validation_to_json(&validation);
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize output")?
        );
    }
    reject_invalid(validation)?;

    let report = convert(config)?;
    println!(
        "{}",
        report
            .to_json_pretty()
            .context("Failed to serialize report")?
    );

    Ok(exit_code(&report, strict))
}

/// Turns validation errors into the fatal `InvalidConfig` error.
fn reject_invalid(validation: ValidationResult) -> Result<()> {
    validation
        .into_result()
        .map(|_| ())
        .map_err(|errors| ConvertError::InvalidConfig(errors).into())
}

fn validation_to_json(validation: &ValidationResult) -> serde_json::Value {
    let errors: Vec<_> = validation
        .errors
        .iter()
        .map(|e| json!({ "code": e.code.code(), "message": e.message, "field": e.field }))
        .collect();
    let warnings: Vec<_> = validation
        .warnings
        .iter()
        .map(|w| json!({ "code": w.code.code(), "message": w.message, "field": w.field }))
        .collect();
    json!({ "ok": false, "errors": errors, "warnings": warnings })
}

/// Whether skipped characters should fail the run.
fn fails_run(report: &ConversionReport, strict: bool) -> bool {
    strict && !report.failures.is_empty()
}

fn exit_code(report: &ConversionReport, strict: bool) -> ExitCode {
    if fails_run(report, strict) {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitglyph_spec::{FailureKind, GlyphFailure};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_flags_without_config_file() {
        let options = ConvertOptions {
            font: Some("Courier.ttf".to_string()),
            chars: Some("AB".to_string()),
            width: Some(5),
            ..ConvertOptions::default()
        };
        let config = resolve_config(&options).unwrap();
        assert_eq!(config.font_path, PathBuf::from("Courier.ttf"));
        assert_eq!(config.charset, "AB");
        assert_eq!(config.bit_width, 5);
        assert_eq!(config.pixel_height, 13);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bitglyph.json");
        std::fs::write(
            &path,
            r#"{"font_path": "a.ttf", "charset": "XYZ", "pixel_height": 16, "threshold": 64}"#,
        )
        .unwrap();

        let options = ConvertOptions {
            config: Some(path.to_string_lossy().into_owned()),
            chars: Some("Q".to_string()),
            despeckle: true,
            ..ConvertOptions::default()
        };
        let config = resolve_config(&options).unwrap();
        assert_eq!(config.font_path, PathBuf::from("a.ttf"));
        assert_eq!(config.charset, "Q");
        assert_eq!(config.pixel_height, 16);
        assert_eq!(config.threshold, 64);
        assert!(config.despeckle);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConvertOptions {
            config: Some(dir.path().join("nope.json").to_string_lossy().into_owned()),
            ..ConvertOptions::default()
        };
        let err = resolve_config(&options).unwrap_err();
        assert!(err.to_string().contains("Failed to load config file"));
    }

    #[test]
    fn test_invalid_config_exits_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let options = ConvertOptions {
            font: Some("a.ttf".to_string()),
            chars: Some("A".to_string()),
            width: Some(9),
            out: Some(out.to_string_lossy().into_owned()),
            ..ConvertOptions::default()
        };
        let err = run(&options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::InvalidConfig(errors)) if errors.len() == 1
        ));
        assert!(err.to_string().contains("E003"));
        assert!(!out.exists());
    }

    #[test]
    fn test_invalid_config_is_fatal_in_json_mode() {
        let options = ConvertOptions {
            font: Some("a.ttf".to_string()),
            chars: Some(String::new()),
            json: true,
            ..ConvertOptions::default()
        };
        let err = run(&options).unwrap_err();
        assert!(err.to_string().contains("E002"));
    }

    #[test]
    fn test_fit_flag_overrides_config() {
        let options = ConvertOptions {
            font: Some("a.ttf".to_string()),
            chars: Some("W".to_string()),
            fit: Some(FitMode::Scale),
            ..ConvertOptions::default()
        };
        assert_eq!(resolve_config(&options).unwrap().fit, FitMode::Scale);
    }

    #[test]
    fn test_missing_font_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConvertOptions {
            font: Some(dir.path().join("missing.ttf").to_string_lossy().into_owned()),
            chars: Some("A".to_string()),
            out: Some(dir.path().to_string_lossy().into_owned()),
            json: true,
            ..ConvertOptions::default()
        };
        let err = run(&options).unwrap_err();
        assert!(err.to_string().contains("could not load font"));
    }

    #[test]
    fn test_strict_fails_on_skipped_characters() {
        let mut report = ConversionReport::new("f.ttf", 13, 7, "v");
        assert!(!fails_run(&report, true));

        report.push_failure(GlyphFailure {
            character: 'Q',
            kind: FailureKind::GlyphLoad,
            message: "missing".to_string(),
        });
        assert!(!fails_run(&report, false));
        assert!(fails_run(&report, true));
    }

    #[test]
    fn test_validation_to_json() {
        let config = ConversionConfig::new("", "");
        let value = validation_to_json(&validate_config(&config));
        assert_eq!(value["ok"], false);
        let codes: Vec<&str> = value["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["E001", "E002"]);
    }
}

//! bitglyph CLI - Command-line interface for font-to-XBM conversion
//!
//! This binary rasterizes characters from a TrueType/OpenType font and
//! writes each one as a fixed-size monochrome XBM bitmap.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use bitglyph_cli::commands;
use bitglyph_cli::commands::convert::ConvertOptions;
use bitglyph_spec::FitMode;

/// bitglyph - Font to XBM bitmap converter
#[derive(Parser)]
#[command(name = "bitglyph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert characters of a font to XBM files
    Convert {
        /// Path to a JSON config file
        #[arg(short, long)]
        config: Option<String>,

        /// Path to the font file
        #[arg(short, long)]
        font: Option<String>,

        /// Characters to convert
        #[arg(long)]
        chars: Option<String>,

        /// Pixel height (rows per glyph)
        #[arg(long)]
        height: Option<u32>,

        /// Bit width (columns per glyph, 1-8)
        #[arg(short, long)]
        width: Option<u32>,

        /// Output directory (created if missing)
        #[arg(short, long)]
        out: Option<String>,

        /// Coverage cut-off; a pixel is set when coverage exceeds it
        #[arg(long)]
        threshold: Option<u8>,

        /// How glyphs larger than the box are fitted (clip or scale)
        #[arg(long)]
        fit: Option<FitMode>,

        /// Remove isolated pixels after encoding
        #[arg(long)]
        despeckle: bool,

        /// Output the conversion report as JSON (no colored output)
        #[arg(long)]
        json: bool,

        /// Exit with an error if any character is skipped
        #[arg(long)]
        strict: bool,
    },

    /// Render one character to the terminal without writing files
    Preview {
        /// Path to the font file
        #[arg(short, long)]
        font: String,

        /// Character to render
        #[arg(long = "char")]
        character: char,

        /// Pixel height (rows)
        #[arg(long, default_value_t = bitglyph_spec::DEFAULT_PIXEL_HEIGHT)]
        height: u32,

        /// Bit width (columns, 1-8)
        #[arg(short, long, default_value_t = bitglyph_spec::DEFAULT_BIT_WIDTH)]
        width: u32,

        /// Coverage cut-off; a pixel is set when coverage exceeds it
        #[arg(long, default_value_t = 0)]
        threshold: u8,

        /// How a glyph larger than the box is fitted (clip or scale)
        #[arg(long, default_value_t = FitMode::Clip)]
        fit: FitMode,

        /// Remove isolated pixels after encoding
        #[arg(long)]
        despeckle: bool,
    },

    /// Show the metadata and pixels of an XBM file
    Inspect {
        /// Path to the XBM file
        #[arg(long)]
        file: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Write a starter config file
    Init {
        /// Config file path (default: bitglyph.json)
        #[arg(short, long)]
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            config,
            font,
            chars,
            height,
            width,
            out,
            threshold,
            fit,
            despeckle,
            json,
            strict,
        } => commands::convert::run(&ConvertOptions {
            config,
            font,
            chars,
            height,
            width,
            out,
            threshold,
            fit,
            despeckle,
            json,
            strict,
        }),
        Commands::Preview {
            font,
            character,
            height,
            width,
            threshold,
            fit,
            despeckle,
        } => commands::preview::run(&font, character, height, width, threshold, fit, despeckle),
        Commands::Inspect { file, json } => commands::inspect::run(&file, json),
        Commands::Init { output, force } => commands::init::run(output.as_deref(), force),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_convert_flags() {
        let cli = Cli::try_parse_from([
            "bitglyph",
            "convert",
            "--font",
            "Courier.ttf",
            "--chars",
            "ABC",
            "--height",
            "16",
            "--width",
            "8",
            "--out",
            "xbm",
            "--threshold",
            "128",
            "--fit",
            "scale",
            "--despeckle",
            "--strict",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert {
                config,
                font,
                chars,
                height,
                width,
                out,
                threshold,
                fit,
                despeckle,
                json,
                strict,
            } => {
                assert_eq!(config, None);
                assert_eq!(font.as_deref(), Some("Courier.ttf"));
                assert_eq!(chars.as_deref(), Some("ABC"));
                assert_eq!(height, Some(16));
                assert_eq!(width, Some(8));
                assert_eq!(out.as_deref(), Some("xbm"));
                assert_eq!(threshold, Some(128));
                assert_eq!(fit, Some(FitMode::Scale));
                assert!(despeckle);
                assert!(!json);
                assert!(strict);
            }
            _ => panic!("expected convert command"),
        }
    }

    #[test]
    fn test_cli_parses_convert_with_config_only() {
        let cli = Cli::try_parse_from(["bitglyph", "convert", "--config", "bitglyph.json", "--json"])
            .unwrap();
        match cli.command {
            Commands::Convert {
                config, font, json, ..
            } => {
                assert_eq!(config.as_deref(), Some("bitglyph.json"));
                assert_eq!(font, None);
                assert!(json);
            }
            _ => panic!("expected convert command"),
        }
    }

    #[test]
    fn test_cli_rejects_threshold_out_of_range() {
        assert!(Cli::try_parse_from(["bitglyph", "convert", "--threshold", "256"]).is_err());
    }

    #[test]
    fn test_cli_parses_preview_defaults() {
        let cli = Cli::try_parse_from(["bitglyph", "preview", "--font", "f.ttf", "--char", "g"])
            .unwrap();
        match cli.command {
            Commands::Preview {
                font,
                character,
                height,
                width,
                threshold,
                fit,
                despeckle,
            } => {
                assert_eq!(font, "f.ttf");
                assert_eq!(character, 'g');
                assert_eq!(height, 13);
                assert_eq!(width, 7);
                assert_eq!(threshold, 0);
                assert_eq!(fit, FitMode::Clip);
                assert!(!despeckle);
            }
            _ => panic!("expected preview command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_fit_mode() {
        let err = Cli::try_parse_from(["bitglyph", "convert", "--fit", "stretch"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("--fit"));
    }

    #[test]
    fn test_cli_preview_requires_single_char() {
        let err = Cli::try_parse_from(["bitglyph", "preview", "--font", "f.ttf", "--char", "ab"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("--char"));
    }

    #[test]
    fn test_cli_parses_inspect() {
        let cli = Cli::try_parse_from(["bitglyph", "inspect", "--file", "A.xbm", "--json"]).unwrap();
        match cli.command {
            Commands::Inspect { file, json } => {
                assert_eq!(file, "A.xbm");
                assert!(json);
            }
            _ => panic!("expected inspect command"),
        }
    }

    #[test]
    fn test_cli_parses_init() {
        let cli = Cli::try_parse_from(["bitglyph", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Init { output, force } => {
                assert_eq!(output, None);
                assert!(force);
            }
            _ => panic!("expected init command"),
        }
    }

    #[test]
    fn test_cli_verbose_is_global() {
        let cli = Cli::try_parse_from(["bitglyph", "init", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}

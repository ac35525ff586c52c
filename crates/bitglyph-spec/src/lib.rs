//! bitglyph Configuration Library
//!
//! This crate provides the types shared by the bitglyph backend and CLI:
//! the conversion configuration, its validation, glyph identifiers, and the
//! report produced by a conversion run.
//!
//! # Example
//!
//! ```
//! use bitglyph_spec::{ConversionConfig, validate_config};
//!
//! let config = ConversionConfig::new("fonts/Courier.ttf", "ABC")
//!     .with_pixel_height(13)
//!     .with_bit_width(7)
//!     .with_output_dir("out");
//!
//! let result = validate_config(&config);
//! assert!(result.is_ok());
//! ```
//!
//! # Modules
//!
//! - [`config`]: Conversion configuration and JSON loading
//! - [`error`]: Error and warning types for validation
//! - [`glyph_id`]: Identifier and file name derivation for characters
//! - [`report`]: Report types for conversion results
//! - [`validation`]: Configuration validation

pub mod config;
pub mod error;
pub mod glyph_id;
pub mod report;
pub mod validation;

pub use config::{
    ConversionConfig, FitMode, DEFAULT_BIT_WIDTH, DEFAULT_PIXEL_HEIGHT, MAX_BIT_WIDTH, MAX_PIXEL_HEIGHT,
};
pub use error::{
    ConfigError, ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use glyph_id::{GlyphId, XBM_EXTENSION};
pub use report::{ClipInfo, ConversionReport, FailureKind, GlyphFailure, GlyphOutput};
pub use validation::validate_config;

//! Font-to-XBM conversion pipeline.
//!
//! For each character in the config: rasterize, encode into the target box,
//! serialize, and persist as `<output_dir>/<id>.xbm`. A character that
//! fails is recorded in the report and skipped; only configuration and font
//! loading errors abort the run.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use bitglyph_spec::{
    validate_config, ConversionConfig, ConversionReport, FailureKind, FitMode, GlyphFailure,
    GlyphId, GlyphOutput, ValidationError,
};
use log::{debug, warn};
use thiserror::Error;

use crate::encode::{EncodeError, Encoder, PackedBitmap};
use crate::raster::{FontdueRasterizer, GlyphRasterizer, RasterError};
use crate::xbm::serialize_bitmap;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The configuration failed validation.
    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// The font could not be loaded.
    #[error("could not load font: {0}")]
    FontLoad(#[source] RasterError),

    /// The output directory could not be created.
    #[error("could not create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A glyph could not be rendered.
    #[error("could not load glyph: {0}")]
    GlyphLoad(#[source] RasterError),

    /// The encoder rejected the target box.
    #[error("could not encode glyph: {0}")]
    Encode(#[from] EncodeError),

    /// A glyph file could not be written.
    #[error("could not write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Per-character failure category, or `None` for errors that abort the run.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ConvertError::GlyphLoad(_) => Some(FailureKind::GlyphLoad),
            ConvertError::FileWrite { .. } => Some(FailureKind::FileWrite),
            ConvertError::InvalidConfig(_)
            | ConvertError::FontLoad(_)
            | ConvertError::OutputDir { .. }
            | ConvertError::Encode(_) => None,
        }
    }

    /// Whether this error aborts the whole run.
    pub fn is_fatal(&self) -> bool {
        self.failure_kind().is_none()
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One encoded and serialized glyph, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphArtifact {
    /// Identifier used for declarations and the file name.
    pub id: GlyphId,
    /// Packed rows.
    pub bitmap: PackedBitmap,
    /// XBM text.
    pub text: String,
}

impl GlyphArtifact {
    /// Hex-encoded BLAKE3 hash of the XBM text.
    pub fn hash(&self) -> String {
        blake3::hash(self.text.as_bytes()).to_hex().to_string()
    }
}

/// Rasterizes, encodes and serializes one character.
pub fn render_glyph<R: GlyphRasterizer + ?Sized>(
    rasterizer: &R,
    character: char,
    encoder: &Encoder,
    fit: FitMode,
    despeckle: bool,
) -> Result<GlyphArtifact, ConvertError> {
    let glyph = rasterizer
        .rasterize(character)
        .map_err(ConvertError::GlyphLoad)?;

    if fit == FitMode::Scale {
        debug!(
            "scaling {:?} from {}x{} to {}x{}",
            character,
            glyph.width(),
            glyph.height(),
            encoder.max_cols(),
            encoder.max_rows()
        );
    }
    let mut bitmap = encoder.encode_fitted(&glyph.grid(), fit);
    if despeckle {
        bitmap = bitmap.despeckle();
    }

    let clip = bitmap.clip();
    if clip.lost_coverage {
        warn!(
            "glyph {:?} is {}x{} and was clipped to {}x{}; covered pixels were dropped",
            character,
            glyph.width(),
            glyph.height(),
            encoder.max_cols(),
            encoder.max_rows()
        );
    } else if clip.is_clipped() {
        debug!(
            "glyph {:?} extends past the {}x{} box without covered pixels",
            character,
            encoder.max_cols(),
            encoder.max_rows()
        );
    }

    let id = GlyphId::new(character);
    let text = serialize_bitmap(&id, &bitmap);
    Ok(GlyphArtifact { id, bitmap, text })
}

/// Writes an artifact to `<dir>/<id>.xbm`.
///
/// Nothing is written until the file is open. If the write itself fails the
/// partial file is removed.
pub fn write_artifact(dir: &Path, artifact: &GlyphArtifact) -> Result<PathBuf, ConvertError> {
    let path = dir.join(artifact.id.file_name());

    let mut file = File::create(&path).map_err(|source| ConvertError::FileWrite {
        path: path.clone(),
        source,
    })?;

    if let Err(source) = file.write_all(artifact.text.as_bytes()) {
        drop(file);
        remove_partial(&path);
        return Err(ConvertError::FileWrite { path, source });
    }

    Ok(path)
}

/// Removes a partially written file. Returns false if it could not be removed.
fn remove_partial(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("could not remove partial file {}: {}", path.display(), e);
            false
        }
    }
}

/// Converts every configured character using the given rasterizer.
pub fn convert_with<R: GlyphRasterizer + ?Sized>(
    config: &ConversionConfig,
    rasterizer: &R,
) -> Result<ConversionReport, ConvertError> {
    let start = Instant::now();

    validate_config(config)
        .into_result()
        .map_err(ConvertError::InvalidConfig)?;

    let encoder = Encoder::new(config.pixel_height as usize, config.bit_width as usize)?
        .with_threshold(config.threshold);

    std::fs::create_dir_all(&config.output_dir).map_err(|source| ConvertError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;

    let mut report = ConversionReport::new(
        &config.font_path,
        config.pixel_height,
        config.bit_width,
        format!("bitglyph-backend v{}", env!("CARGO_PKG_VERSION")),
    );

    for character in config.characters() {
        let outcome = render_glyph(
            rasterizer,
            character,
            &encoder,
            config.fit,
            config.despeckle,
        )
        .and_then(|artifact| {
            let path = write_artifact(&config.output_dir, &artifact)?;
            Ok((artifact, path))
        });

        match outcome {
            Ok((artifact, path)) => {
                debug!("wrote {:?} to {}", character, path.display());
                report.push_output(GlyphOutput {
                    character,
                    identifier: artifact.id.to_string(),
                    hash: artifact.hash(),
                    clip: artifact.bitmap.clip(),
                    path,
                });
            }
            Err(e) => {
                let kind = match e.failure_kind() {
                    Some(kind) => kind,
                    None => return Err(e),
                };
                warn!("skipping {:?}: {}", character, e);
                report.push_failure(GlyphFailure {
                    character,
                    kind,
                    message: e.to_string(),
                });
            }
        }
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    Ok(report)
}

/// Loads the configured font and converts every configured character.
pub fn convert(config: &ConversionConfig) -> Result<ConversionReport, ConvertError> {
    validate_config(config)
        .into_result()
        .map_err(ConvertError::InvalidConfig)?;

    let rasterizer =
        FontdueRasterizer::load(&config.font_path, config.face_index, config.pixel_height)
            .map_err(ConvertError::FontLoad)?;

    convert_with(config, &rasterizer)
}

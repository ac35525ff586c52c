//! XBM array literal serialization and parsing.
//!
//! Output layout for an identifier `I`, width 7 and 13 rows:
//!
//! ```text
//! #define I_width 7
//! #define I_height 13
//! static unsigned char I_bits[] = {
//!   0x00, 0x1c, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x1c, 0x00, 0x00,
//!   0x00
//! };
//! ```
//!
//! Each row is `0x` plus two lowercase hex digits and lines break after
//! every twelfth element.

use std::sync::OnceLock;

use bitglyph_spec::GlyphId;
use regex::Regex;
use thiserror::Error;

use crate::encode::{PackedBitmap, ROW_BITS};

/// Number of array elements per output line.
pub const ITEMS_PER_LINE: usize = 12;

/// Renders packed rows as an XBM array literal.
///
/// `rows.len()` is expected to equal `height`; the rows are written as given.
pub fn serialize(id: &GlyphId, rows: &[u8], width: usize, height: usize) -> String {
    debug_assert_eq!(rows.len(), height, "row count must match declared height");

    let mut out = String::with_capacity(96 + rows.len() * 6);
    out.push_str(&format!("#define {}_width {}\n", id, width));
    out.push_str(&format!("#define {}_height {}\n", id, height));
    out.push_str(&format!("static unsigned char {}_bits[] = {{\n", id));

    for (i, byte) in rows.iter().enumerate() {
        let count = i + 1;
        if i % ITEMS_PER_LINE == 0 {
            out.push_str("  ");
        }
        out.push_str(&format!("0x{:02x}", byte));
        if count < rows.len() {
            out.push(',');
        }
        if count % ITEMS_PER_LINE == 0 || count == rows.len() {
            out.push('\n');
        } else {
            out.push(' ');
        }
    }

    out.push_str("};\n");
    out
}

/// Renders a packed bitmap using its own width and height.
pub fn serialize_bitmap(id: &GlyphId, bitmap: &PackedBitmap) -> String {
    serialize(id, bitmap.rows(), bitmap.width(), bitmap.height())
}

/// Errors that can occur when reading XBM text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XbmParseError {
    /// A `#define <id>_width` or `#define <id>_height` line is missing.
    #[error("missing #define for {0}")]
    MissingDefine(&'static str),

    /// The `<id>_bits` array is missing or unterminated.
    #[error("missing bits array")]
    MissingArray,

    /// The three declarations use different identifiers.
    #[error("identifier mismatch: width uses '{width}', height uses '{height}', bits uses '{bits}'")]
    IdentifierMismatch {
        width: String,
        height: String,
        bits: String,
    },

    /// A number in a `#define` does not fit.
    #[error("invalid {name} value '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    /// Width does not fit in one byte per row.
    #[error("width {0} is not supported (expected 1..=8)")]
    UnsupportedWidth(usize),

    /// An array element is not a one-byte hex literal.
    #[error("invalid array element '{0}'")]
    InvalidElement(String),

    /// Element count differs from the declared height.
    #[error("declared height {declared} but found {found} elements")]
    CountMismatch { declared: usize, found: usize },
}

/// A parsed single-byte-per-row XBM image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XbmImage {
    /// Identifier prefix of the declarations.
    pub identifier: String,
    /// Declared width in pixels.
    pub width: usize,
    /// Declared height in pixels.
    pub height: usize,
    /// One byte per row, LSB = leftmost pixel.
    pub rows: Vec<u8>,
}

static WIDTH_REGEX: OnceLock<Regex> = OnceLock::new();
static HEIGHT_REGEX: OnceLock<Regex> = OnceLock::new();
static BITS_REGEX: OnceLock<Regex> = OnceLock::new();
static ELEMENT_REGEX: OnceLock<Regex> = OnceLock::new();

fn width_regex() -> &'static Regex {
    WIDTH_REGEX.get_or_init(|| {
        Regex::new(r"#define\s+(\w+)_width\s+(\S+)").expect("invalid regex pattern")
    })
}

fn height_regex() -> &'static Regex {
    HEIGHT_REGEX.get_or_init(|| {
        Regex::new(r"#define\s+(\w+)_height\s+(\S+)").expect("invalid regex pattern")
    })
}

fn bits_regex() -> &'static Regex {
    BITS_REGEX.get_or_init(|| {
        Regex::new(r"static\s+(?:unsigned\s+)?char\s+(\w+)_bits\s*\[\s*\]\s*=\s*\{([^}]*)\}")
            .expect("invalid regex pattern")
    })
}

fn element_regex() -> &'static Regex {
    ELEMENT_REGEX
        .get_or_init(|| Regex::new(r"^0[xX]([0-9a-fA-F]{1,2})$").expect("invalid regex pattern"))
}

/// Parses XBM text with one byte per row.
///
/// Accepts `static char` as well as `static unsigned char`, arbitrary
/// whitespace, and a trailing comma after the last element.
pub fn parse(text: &str) -> Result<XbmImage, XbmParseError> {
    let width_caps = width_regex()
        .captures(text)
        .ok_or(XbmParseError::MissingDefine("width"))?;
    let height_caps = height_regex()
        .captures(text)
        .ok_or(XbmParseError::MissingDefine("height"))?;
    let bits_caps = bits_regex()
        .captures(text)
        .ok_or(XbmParseError::MissingArray)?;

    let width_id = &width_caps[1];
    let height_id = &height_caps[1];
    let bits_id = &bits_caps[1];
    if width_id != height_id || width_id != bits_id {
        return Err(XbmParseError::IdentifierMismatch {
            width: width_id.to_string(),
            height: height_id.to_string(),
            bits: bits_id.to_string(),
        });
    }

    let width = parse_number("width", &width_caps[2])?;
    let height = parse_number("height", &height_caps[2])?;
    if width == 0 || width > ROW_BITS {
        return Err(XbmParseError::UnsupportedWidth(width));
    }

    let rows = bits_caps[2]
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_element)
        .collect::<Result<Vec<u8>, _>>()?;

    if rows.len() != height {
        return Err(XbmParseError::CountMismatch {
            declared: height,
            found: rows.len(),
        });
    }

    Ok(XbmImage {
        identifier: width_id.to_string(),
        width,
        height,
        rows,
    })
}

fn parse_number(name: &'static str, value: &str) -> Result<usize, XbmParseError> {
    value.parse().map_err(|_| XbmParseError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}

fn parse_element(token: &str) -> Result<u8, XbmParseError> {
    element_regex()
        .captures(token)
        .and_then(|caps| u8::from_str_radix(&caps[1], 16).ok())
        .ok_or_else(|| XbmParseError::InvalidElement(token.to_string()))
}

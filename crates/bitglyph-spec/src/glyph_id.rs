//! Identifiers for converted glyphs.
//!
//! Every converted character gets one identifier, used both as the prefix of
//! the XBM declarations (`<id>_width`, `<id>_height`, `<id>_bits`) and as the
//! output file stem (`<id>.xbm`).

use serde::{Deserialize, Serialize};

/// File extension of generated bitmaps.
pub const XBM_EXTENSION: &str = "xbm";

/// Identifier derived from a single character.
///
/// ASCII letters, digits and `_` are used literally. Any other character is
/// written as `u` followed by its code point in uppercase hex, zero-padded to
/// four digits, so it stays a valid identifier and file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlyphId {
    character: char,
    ident: String,
}

impl GlyphId {
    /// Derives the identifier for a character.
    pub fn new(character: char) -> Self {
        let ident = if character.is_ascii_alphanumeric() || character == '_' {
            character.to_string()
        } else {
            format!("u{:04X}", character as u32)
        };
        Self { character, ident }
    }

    /// Returns the character this identifier was derived from.
    pub fn character(&self) -> char {
        self.character
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.ident
    }

    /// Returns the output file name, e.g. `I.xbm`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.ident, XBM_EXTENSION)
    }
}

impl std::fmt::Display for GlyphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.ident)
    }
}

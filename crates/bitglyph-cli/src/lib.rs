//! bitglyph CLI library.
//!
//! This crate provides the command implementations behind the `bitglyph`
//! binary: converting a font's characters to XBM files, previewing a single
//! glyph, inspecting existing XBM files, and writing a starter config.

pub mod commands;

//! Backend-independent data types for PDF text-placement extraction.
//!
//! This crate has no dependency on any concrete PDF object model: it
//! provides the geometric primitives, generic PDF object model, font
//! metadata, placement records, and error/warning/config types shared by
//! `pdf-text-parse`'s content-stream interpreter, font decoder, and
//! collector.
//!
//! # Modules
//!
//! - [`geometry`] — [`Point`], [`Matrix`], [`Box`]
//! - [`object`] — [`PdfObject`], [`PdfDictionary`], [`ObjectId`]
//! - [`placement`] — [`FontId`], [`FontDescription`], [`WidthTable`],
//!   [`PlacedText`], [`TextPlacement`]
//! - [`encoding`] — [`FontEncoding`], [`EncodingResolver`], [`StandardEncoding`]
//! - [`error`] — [`PdfError`], [`ExtractWarning`], [`ExtractOptions`]

#![deny(missing_docs)]

/// Font encoding mapping (Standard, WinAnsi, MacRoman, MacExpert, custom Differences).
pub mod encoding;
/// Error and warning types for PDF text-placement extraction.
pub mod error;
/// Geometric primitives: Point, Matrix, Box.
pub mod geometry;
/// Backend-independent PDF object model (PdfObject, PdfDictionary).
pub mod object;
/// Font metadata and text-placement records.
pub mod placement;

pub use encoding::{EncodingResolver, FontEncoding, StandardEncoding, glyph_name_to_char};
pub use error::{ExtractOptions, ExtractWarning, ExtractWarningCode, PdfError};
pub use geometry::{Box, Matrix, Point};
pub use object::{ObjectId, PdfDictionary, PdfObject};
pub use placement::{FontDescription, FontId, PlacedText, TextPlacement, WidthTable};

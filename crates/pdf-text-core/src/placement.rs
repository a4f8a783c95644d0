//! Font descriptions and text-placement records.
//!
//! [`FontDescription`] is the immutable, per-font data produced once by the
//! font decoder and interned by font object ID. [`PlacedText`] is the
//! interpreter-level record emitted by the collector for each text-showing
//! primitive, still in text space. [`TextPlacement`] is the external,
//! page-coordinate record produced at page boundaries.

use std::collections::HashMap;

use crate::geometry::{Box, Matrix, Point};

/// Stable identity of a font dictionary within a document.
///
/// Wraps the PDF indirect-object identity `(object number, generation)`
/// packed into a single value, so it is cheap to copy and usable as a hash
/// map key for the font cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(u64);

impl FontId {
    /// Build a font ID from an indirect object's `(number, generation)`.
    pub fn new(object_number: u32, generation: u16) -> Self {
        Self(((object_number as u64) << 16) | generation as u64)
    }

    /// The indirect object number this ID was built from.
    pub fn object_number(&self) -> u32 {
        (self.0 >> 16) as u32
    }

    /// The indirect object generation this ID was built from.
    pub fn generation(&self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }
}

/// Per-code glyph advance widths, in 1/1000 text-space units.
#[derive(Debug, Clone, PartialEq)]
pub enum WidthTable {
    /// Every code has the same advance width.
    Monospace(f64),
    /// A sparse code-to-width map with a fallback for absent codes.
    Sparse {
        widths: HashMap<u32, f64>,
        default_width: f64,
    },
}

impl WidthTable {
    /// Look up the advance width for `code`, in 1/1000 text-space units.
    ///
    /// Follows `ComputeDisplacements`'s lookup order: monospace
    /// short-circuit, then explicit per-code entry, then `defaultWidth`,
    /// then `0`.
    pub fn width_for(&self, code: u32) -> f64 {
        match self {
            WidthTable::Monospace(w) => *w,
            WidthTable::Sparse {
                widths,
                default_width,
            } => widths.get(&code).copied().unwrap_or(*default_width),
        }
    }
}

/// Immutable, per-font metadata and metrics, interned by [`FontId`].
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescription {
    pub font_id: FontId,
    /// Ascent in 1/1000 text-space units.
    pub ascent: f64,
    /// Descent in 1/1000 text-space units (typically negative).
    pub descent: f64,
    /// Width of the space glyph, in 1/1000 text-space units.
    pub space_width: f64,
    pub family_name: String,
    pub font_name: String,
    pub font_stretch: String,
    pub font_weight: f64,
    pub font_flags: u32,
    /// `true` for single-byte fonts (Type1/TrueType/Type3/MMType1); `false`
    /// for multi-byte CID (Type0) fonts.
    pub is_simple_font: bool,
    pub widths: WidthTable,
}

impl FontDescription {
    /// `true` if every width is identical, making [`WidthTable::width_for`]
    /// a constant-time short-circuit regardless of code.
    pub fn is_monospaced(&self) -> bool {
        matches!(self.widths, WidthTable::Monospace(_))
    }
}

/// One emitted record per text-showing primitive (`Tj`/`TJ`/`'`/`"`), still
/// in text space.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    /// The decoded UTF-8 string for the whole shown operand.
    pub text: String,
    pub font_id: FontId,
    /// `Trm × ctm` at the start of the string.
    pub matrix: Matrix,
    /// `[0, descent×fontSize/1000, Σtx_i, ascent×fontSize/1000]` in text
    /// space, pre-matrix.
    pub local_bbox: Box,
    /// `spaceWidth×fontSize/1000 + charSpace + wordSpace`, in text-space
    /// units (a scalar advance, not yet a vector).
    pub space_width: f64,
    /// `space_width` transformed as a vector through `matrix` (x, y
    /// components separately), used by downstream consumers for gap
    /// detection.
    pub global_space_width: (f64, f64),
}

impl PlacedText {
    /// Axis-aligned bounding box of `local_bbox`'s four corners transformed
    /// by `matrix`, in page (default user-space) coordinates.
    pub fn global_bbox(&self) -> Box {
        let corners = [
            Point::new(self.local_bbox.x_min, self.local_bbox.y_min),
            Point::new(self.local_bbox.x_max, self.local_bbox.y_min),
            Point::new(self.local_bbox.x_max, self.local_bbox.y_max),
            Point::new(self.local_bbox.x_min, self.local_bbox.y_max),
        ]
        .map(|p| self.matrix.transform_point(p));
        Box::bounding(&corners)
    }
}

/// External, page-coordinate text-placement record: `(pageNumber, fontID,
/// globalBbox, text)`.
///
/// Serialized field names (stable): `{page, font_id, x, y, width, height,
/// text}`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    pub page: usize,
    pub font_id: FontId,
    pub global_bbox: Box,
    pub text: String,
}

impl TextPlacement {
    /// Build a `TextPlacement` from an interpreter-level [`PlacedText`] at
    /// page boundary time, axis-aligning its bbox into page coordinates.
    pub fn from_placed(placed: &PlacedText, page: usize) -> Self {
        Self {
            page,
            font_id: placed.font_id,
            global_bbox: placed.global_bbox().normalized(),
            text: placed.text.clone(),
        }
    }

    pub fn x(&self) -> f64 {
        self.global_bbox.x_min
    }

    pub fn y(&self) -> f64 {
        self.global_bbox.y_min
    }

    pub fn width(&self) -> f64 {
        self.global_bbox.width()
    }

    pub fn height(&self) -> f64 {
        self.global_bbox.height()
    }
}

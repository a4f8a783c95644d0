//! Font metrics extraction from simple-font PDF font dictionaries.
//!
//! Parses /Widths, /FirstChar, /LastChar, and /FontDescriptor to provide
//! glyph widths, ascent, and descent for text placement bounding boxes.

use pdf_text_core::PdfDictionary;

use crate::provider::{ObjectProvider, resolve};

/// Default ascent when not specified (750/1000 of text space).
const DEFAULT_ASCENT: f64 = 750.0;

/// Default descent when not specified (-250/1000 of text space).
const DEFAULT_DESCENT: f64 = -250.0;

/// Default character width when not specified (600/1000 of text space).
const DEFAULT_WIDTH: f64 = 600.0;

/// Font metrics extracted from a simple-font PDF font dictionary.
///
/// Stores glyph widths and font descriptor information (ascent, descent,
/// bounding box) needed to compute text placement bounding boxes.
///
/// Width values are in glyph space units (1/1000 of text space).
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Glyph widths indexed by (char_code - first_char).
    widths: Vec<f64>,
    /// First character code in the widths array.
    first_char: u32,
    /// Last character code in the widths array.
    last_char: u32,
    /// Default width for characters outside [first_char, last_char].
    missing_width: f64,
    /// Font ascent in glyph space units (positive, above baseline).
    ascent: f64,
    /// Font descent in glyph space units (negative, below baseline).
    descent: f64,
    /// Font bounding box [llx, lly, urx, ury] in glyph space units.
    font_bbox: Option<[f64; 4]>,
}

impl FontMetrics {
    /// Create FontMetrics from parsed PDF font dictionary values.
    pub fn new(
        widths: Vec<f64>,
        first_char: u32,
        last_char: u32,
        missing_width: f64,
        ascent: f64,
        descent: f64,
        font_bbox: Option<[f64; 4]>,
    ) -> Self {
        Self {
            widths,
            first_char,
            last_char,
            missing_width,
            ascent,
            descent,
            font_bbox,
        }
    }

    /// Create default FontMetrics for when font info is unavailable.
    pub fn default_metrics() -> Self {
        Self {
            widths: Vec::new(),
            first_char: 0,
            last_char: 0,
            missing_width: DEFAULT_WIDTH,
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
            font_bbox: None,
        }
    }

    /// Get the width for a character code in glyph space (1/1000 of text space).
    pub fn get_width(&self, char_code: u32) -> f64 {
        if char_code >= self.first_char && char_code <= self.last_char {
            let index = (char_code - self.first_char) as usize;
            if index < self.widths.len() {
                return self.widths[index];
            }
        }
        self.missing_width
    }

    /// Font ascent in glyph space units (positive, above baseline).
    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    /// Font descent in glyph space units (negative, below baseline).
    pub fn descent(&self) -> f64 {
        self.descent
    }

    /// Font bounding box [llx, lly, urx, ury] in glyph space units.
    pub fn font_bbox(&self) -> Option<[f64; 4]> {
        self.font_bbox
    }

    /// Missing width used for characters outside the widths range.
    pub fn missing_width(&self) -> f64 {
        self.missing_width
    }

    /// First character code in the widths array.
    pub fn first_char(&self) -> u32 {
        self.first_char
    }

    /// Last character code in the widths array.
    pub fn last_char(&self) -> u32 {
        self.last_char
    }

    /// All widths, for monospace detection by the font decoder.
    pub fn widths(&self) -> &[f64] {
        &self.widths
    }
}

/// Extract [`FontMetrics`] from a simple-font dictionary.
///
/// Reads /Widths, /FirstChar, /LastChar from the font dictionary,
/// and /Ascent, /Descent, /FontBBox, /MissingWidth from the /FontDescriptor.
///
/// Returns default metrics if essential fields are missing.
pub fn extract_font_metrics<P: ObjectProvider>(
    provider: &P,
    font_dict: &PdfDictionary,
) -> FontMetrics {
    let first_char = font_dict
        .get("FirstChar")
        .map(|o| resolve(provider, o))
        .and_then(|o| o.as_i64())
        .map(|v| v as u32)
        .unwrap_or(0);

    let last_char = font_dict
        .get("LastChar")
        .map(|o| resolve(provider, o))
        .and_then(|o| o.as_i64())
        .map(|v| v as u32)
        .unwrap_or(0);

    let widths = font_dict
        .get("Widths")
        .map(|o| resolve(provider, o))
        .and_then(|o| o.as_array().map(|a| a.to_vec()))
        .map(|arr| {
            arr.iter()
                .map(|o| resolve(provider, o).as_f64().unwrap_or(0.0))
                .collect()
        })
        .unwrap_or_default();

    let desc_info = parse_font_descriptor(provider, font_dict);

    FontMetrics::new(
        widths,
        first_char,
        last_char,
        desc_info.missing_width,
        desc_info.ascent,
        desc_info.descent,
        desc_info.font_bbox,
    )
}

/// Parsed font descriptor values.
struct FontDescriptorInfo {
    ascent: f64,
    descent: f64,
    font_bbox: Option<[f64; 4]>,
    missing_width: f64,
}

/// Parse /FontDescriptor dictionary for ascent, descent, bbox, and missing width.
fn parse_font_descriptor<P: ObjectProvider>(
    provider: &P,
    font_dict: &PdfDictionary,
) -> FontDescriptorInfo {
    let descriptor_dict = font_dict
        .get("FontDescriptor")
        .map(|o| resolve(provider, o))
        .and_then(|o| o.as_dict().cloned());

    let Some(desc) = descriptor_dict else {
        return FontDescriptorInfo {
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
            font_bbox: None,
            missing_width: DEFAULT_WIDTH,
        };
    };

    let ascent = desc.get_f64("Ascent").unwrap_or(DEFAULT_ASCENT);
    let descent = desc.get_f64("Descent").unwrap_or(DEFAULT_DESCENT);
    let missing_width = desc.get_f64("MissingWidth").unwrap_or(DEFAULT_WIDTH);

    let font_bbox = desc
        .get("FontBBox")
        .map(|o| resolve(provider, o))
        .and_then(|o| o.as_array().map(|a| a.to_vec()))
        .and_then(|arr| {
            if arr.len() == 4 {
                let vals: Vec<f64> = arr.iter().filter_map(|o| o.as_f64()).collect();
                if vals.len() == 4 {
                    Some([vals[0], vals[1], vals[2], vals[3]])
                } else {
                    None
                }
            } else {
                None
            }
        });

    FontDescriptorInfo {
        ascent,
        descent,
        font_bbox,
        missing_width,
    }
}

//! Document-level extraction driver.
//!
//! Ties the [`crate::interpreter`], [`crate::collector::Collector`], and
//! [`ObjectProvider`] together: walks a document's pages in order, drives
//! each page's content stream through a fresh collector (sharing one font
//! cache across the whole document), converts [`PlacedText`] to
//! page-coordinate [`TextPlacement`], and aggregates the result per §6.2's
//! output surface.

use std::collections::HashMap;
use std::rc::Rc;

use pdf_text_core::{
    ExtractOptions, ExtractWarning, ExtractWarningCode, FontDescription, FontId, PdfError,
    TextPlacement,
};

use crate::collector::Collector;
use crate::font::Font;
use crate::interpreter;
use crate::provider::ObjectProvider;

/// Record a non-fatal warning, escalating it to a hard error when
/// `options.strict_mode` is set (per `ExtractOptions::strict_mode`'s
/// "escalates warnings to hard errors" contract).
fn push_warning(
    warnings: &mut Vec<ExtractWarning>,
    options: &ExtractOptions,
    code: ExtractWarningCode,
    description: String,
    page: usize,
) -> Result<(), PdfError> {
    #[cfg(feature = "tracing")]
    tracing::warn!(page, code = %code, "{description}");
    let warning = ExtractWarning::with_code(code, description).on(page);
    if options.strict_mode {
        return Err(warning.to_error());
    }
    warnings.push(warning);
    Ok(())
}

/// Aggregate result of extracting text placements from a whole document (or
/// a page-range slice of one).
#[derive(Debug, Clone)]
pub struct ExtractResult {
    /// Total number of pages in the document (independent of any page-range
    /// filter applied).
    pub page_count: usize,
    /// Number of placements in [`ExtractResult::placements`].
    pub placement_count: usize,
    /// Every font encountered, keyed by its [`FontId`].
    pub fonts_by_id: HashMap<FontId, FontDescription>,
    /// Placements in document order, already page-range filtered.
    pub placements: Vec<TextPlacement>,
    /// Non-fatal issues encountered along the way.
    pub warnings: Vec<ExtractWarning>,
}

/// Extract every page of `provider`'s document.
///
/// Equivalent to [`extract_page_range`] with `start_page = 0` and
/// `end_page = -1` (end of document).
pub fn extract<P: ObjectProvider>(
    provider: &P,
    options: &ExtractOptions,
) -> Result<ExtractResult, PdfError> {
    extract_page_range(provider, options, 0, -1)
}

/// Extract pages `[start_page, end_page)`. `end_page < 0` means end of
/// document, per §6.2.
///
/// `IOError` from the Object Provider is fatal and aborts extraction
/// entirely. `MalformedPDF`/`ParseError`/`RecursionLimit` are per-page
/// recoverable: the offending page is skipped (or, for `RecursionLimit`,
/// yields the prefix of placements gathered before the limit was hit) and
/// extraction continues with the next page.
pub fn extract_page_range<P: ObjectProvider>(
    provider: &P,
    options: &ExtractOptions,
    start_page: usize,
    end_page: i64,
) -> Result<ExtractResult, PdfError> {
    let pages = provider.pages().map_err(Into::into)?;
    let page_count = pages.len();
    let end = if end_page < 0 {
        page_count
    } else {
        (end_page as usize).min(page_count)
    };
    let last_page = options
        .max_pages
        .map_or(end, |max| end.min(start_page.saturating_add(max)));

    let mut placements = Vec::new();
    let mut fonts_by_id: HashMap<FontId, FontDescription> = HashMap::new();
    let mut warnings = Vec::new();
    let mut font_cache: HashMap<FontId, Rc<Font>> = HashMap::new();

    for (index, page) in pages.iter().enumerate() {
        if index < start_page || index >= last_page {
            continue;
        }

        let content = match provider.page_contents(page) {
            Ok(bytes) => bytes,
            Err(e) => {
                let err: PdfError = e.into();
                if matches!(err, PdfError::IOError(_)) {
                    return Err(err);
                }
                push_warning(&mut warnings, options, ExtractWarningCode::MalformedObject, err.to_string(), index)?;
                continue;
            }
        };

        let resources = match provider.page_resources(page) {
            Ok(dict) => dict,
            Err(e) => {
                let err: PdfError = e.into();
                if matches!(err, PdfError::IOError(_)) {
                    return Err(err);
                }
                push_warning(&mut warnings, options, ExtractWarningCode::MalformedObject, err.to_string(), index)?;
                continue;
            }
        };

        let mut collector = Collector::with_font_cache(provider, options.clone(), font_cache);
        match interpreter::interpret(provider, &content, &resources, &mut collector, options) {
            Ok(()) => {}
            Err(err) => {
                let pdf_err: PdfError = err.into();
                if let PdfError::IOError(_) = pdf_err {
                    return Err(pdf_err);
                }
                push_warning(
                    &mut warnings,
                    options,
                    ExtractWarningCode::Other(pdf_err.to_string()),
                    pdf_err.to_string(),
                    index,
                )?;
                // Fall through: the collector keeps whatever placements it
                // gathered before the error (e.g. RecursionLimit yields the
                // prefix gathered before the limit was hit).
            }
        }

        warnings.extend(collector.warnings().iter().cloned());
        let page_placements = collector.on_done();
        font_cache = collector.into_font_cache();

        for placed in &page_placements {
            fonts_by_id
                .entry(placed.font_id)
                .or_insert_with(|| font_cache[&placed.font_id].description.clone());
            placements.push(TextPlacement::from_placed(placed, index));
        }
    }

    let placement_count = placements.len();
    Ok(ExtractResult {
        page_count,
        placement_count,
        fonts_by_id,
        placements,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::{MockPage, MockProvider};
    use pdf_text_core::{PdfDictionary, PdfObject};

    fn helvetica_resources() -> PdfDictionary {
        let mut font_dict = PdfDictionary::new();
        font_dict.insert("Subtype", PdfObject::Name("Type1".into()));
        font_dict.insert("BaseFont", PdfObject::Name("Helvetica".into()));
        let mut font_map = PdfDictionary::new();
        font_map.insert("F1", PdfObject::Dictionary(font_dict));
        let mut resources = PdfDictionary::new();
        resources.insert("Font", PdfObject::Dictionary(font_map));
        resources
    }

    fn page(contents: &[u8]) -> MockPage {
        MockPage {
            contents: contents.to_vec(),
            resources: helvetica_resources(),
            media_box: [0.0, 0.0, 612.0, 792.0],
        }
    }

    #[test]
    fn extracts_every_page_in_order() {
        let provider = MockProvider::new()
            .with_page(page(b"BT /F1 12 Tf 72 720 Td (One) Tj ET"))
            .with_page(page(b"BT /F1 12 Tf 72 720 Td (Two) Tj ET"));
        let result = extract(&provider, &ExtractOptions::default()).unwrap();
        assert_eq!(result.page_count, 2);
        assert_eq!(result.placement_count, 2);
        assert_eq!(result.placements[0].page, 0);
        assert_eq!(result.placements[0].text, "One");
        assert_eq!(result.placements[1].page, 1);
        assert_eq!(result.placements[1].text, "Two");
    }

    #[test]
    fn page_range_filters_by_start_and_end() {
        let provider = MockProvider::new()
            .with_page(page(b"BT /F1 12 Tf (A) Tj ET"))
            .with_page(page(b"BT /F1 12 Tf (B) Tj ET"))
            .with_page(page(b"BT /F1 12 Tf (C) Tj ET"));
        let result = extract_page_range(&provider, &ExtractOptions::default(), 1, 2).unwrap();
        assert_eq!(result.page_count, 3);
        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.placements[0].text, "B");
        assert_eq!(result.placements[0].page, 1);
    }

    #[test]
    fn negative_end_page_means_end_of_document() {
        let provider = MockProvider::new()
            .with_page(page(b"BT /F1 12 Tf (A) Tj ET"))
            .with_page(page(b"BT /F1 12 Tf (B) Tj ET"));
        let result = extract_page_range(&provider, &ExtractOptions::default(), 0, -1).unwrap();
        assert_eq!(result.placements.len(), 2);
    }

    #[test]
    fn fonts_by_id_has_one_entry_per_distinct_font() {
        let provider = MockProvider::new()
            .with_page(page(b"BT /F1 12 Tf (A) Tj ET"))
            .with_page(page(b"BT /F1 12 Tf (B) Tj ET"));
        let result = extract(&provider, &ExtractOptions::default()).unwrap();
        assert_eq!(result.fonts_by_id.len(), 1);
        let (_, desc) = result.fonts_by_id.iter().next().unwrap();
        assert_eq!(desc.family_name, "Helvetica");
    }

    #[test]
    fn malformed_page_is_skipped_not_fatal() {
        let provider = MockProvider::new()
            .with_page(MockPage {
                contents: b"(unterminated".to_vec(),
                resources: helvetica_resources(),
                media_box: [0.0, 0.0, 612.0, 792.0],
            })
            .with_page(page(b"BT /F1 12 Tf (ok) Tj ET"));
        let result = extract(&provider, &ExtractOptions::default()).unwrap();
        assert_eq!(result.page_count, 2);
        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.placements[0].text, "ok");
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn recursion_limit_keeps_placements_gathered_before_the_limit() {
        let form_id = pdf_text_core::ObjectId::new(50, 0);
        let mut form_dict = PdfDictionary::new();
        form_dict.insert("Subtype", PdfObject::Name("Form".into()));
        // Self-referential: recurses into itself forever.
        let form_stream = PdfObject::Stream(form_dict, b"BT /F1 12 Tf (x) Tj ET /Fm0 Do".to_vec());

        let mut xobject_map = PdfDictionary::new();
        xobject_map.insert("Fm0", PdfObject::Reference(form_id));
        let mut resources = helvetica_resources();
        resources.insert("XObject", PdfObject::Dictionary(xobject_map));

        let provider = MockProvider::new()
            .with_object(form_id, form_stream)
            .with_page(MockPage {
                contents: b"/Fm0 Do".to_vec(),
                resources,
                media_box: [0.0, 0.0, 612.0, 792.0],
            });
        let options = ExtractOptions {
            max_recursion_depth: 3,
            ..ExtractOptions::default()
        };
        let result = extract(&provider, &options).unwrap();
        assert_eq!(result.page_count, 1);
        assert!(!result.placements.is_empty());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.description.contains("recursion")));
    }

    #[test]
    fn strict_mode_escalates_malformed_page_to_a_hard_error() {
        let provider = MockProvider::new().with_page(MockPage {
            contents: b"(unterminated".to_vec(),
            resources: helvetica_resources(),
            media_box: [0.0, 0.0, 612.0, 792.0],
        });
        let options = ExtractOptions {
            strict_mode: true,
            ..ExtractOptions::default()
        };
        let err = extract(&provider, &options).unwrap_err();
        assert!(!matches!(err, PdfError::IOError(_)));
    }

    #[test]
    fn non_strict_mode_tolerates_the_same_malformed_page() {
        let provider = MockProvider::new().with_page(MockPage {
            contents: b"(unterminated".to_vec(),
            resources: helvetica_resources(),
            media_box: [0.0, 0.0, 612.0, 792.0],
        });
        let result = extract(&provider, &ExtractOptions::default()).unwrap();
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn empty_document_yields_empty_result() {
        let provider = MockProvider::new();
        let result = extract(&provider, &ExtractOptions::default()).unwrap();
        assert_eq!(result.page_count, 0);
        assert_eq!(result.placement_count, 0);
        assert!(result.placements.is_empty());
    }
}

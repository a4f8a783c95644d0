//! Text Placement Collector: the [`ContentHandler`] implementation that owns
//! the graphics-state machine and turns interpreter events into
//! [`PlacedText`] records.
//!
//! Maintains the `q`/`Q` graphics-state stack, the `BT…ET` text object
//! state, a stack of resource scopes mirroring Form XObject recursion, and a
//! font cache keyed by [`FontId`] so a font dictionary is decoded at most
//! once per document. Font/ExtGState resource lookups walk the scope stack
//! innermost-first, falling back to outer scopes, per spec §3's Resource
//! Scope description.

use std::collections::HashMap;
use std::rc::Rc;

use pdf_text_core::{
    ExtractOptions, ExtractWarning, ExtractWarningCode, FontId, ObjectId, PdfDictionary, PdfObject,
    PlacedText,
};

use crate::font::{self, Font};
use crate::graphics_state::{GraphicsStateStack, TextRenderMode};
use crate::handler::ContentHandler;
use crate::provider::{resolve, ObjectProvider};
use crate::text_renderer;
use crate::text_state::TextState;
use crate::tokenizer::Operand;

fn as_number(operand: &Operand) -> Option<f64> {
    match operand {
        Operand::Integer(i) => Some(*i as f64),
        Operand::Real(r) => Some(*r),
        _ => None,
    }
}

fn as_name(operand: &Operand) -> Option<&str> {
    match operand {
        Operand::Name(n) => Some(n),
        _ => None,
    }
}

fn as_bytes(operand: &Operand) -> Option<&[u8]> {
    match operand {
        Operand::LiteralString(b) | Operand::HexString(b) => Some(b),
        _ => None,
    }
}

/// Deterministic stand-in [`FontId`] for a font dictionary reached without
/// going through an indirect reference. Real documents essentially always
/// reference fonts indirectly; this exists only so an inline font
/// dictionary doesn't panic the cache lookup.
fn synthetic_font_id(dict: &PdfDictionary) -> FontId {
    let mut entries: Vec<_> = dict.iter().map(|(k, v)| format!("{k}:{v:?}")).collect();
    entries.sort();
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in entries.join("|").bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    FontId::new((hash >> 16) as u32, (hash & 0xFFFF) as u16)
}

fn font_id_for(entry: &PdfObject, resolved_dict: &PdfDictionary) -> FontId {
    match entry.as_reference() {
        Some(id) => FontId::new(id.number(), id.generation()),
        None => synthetic_font_id(resolved_dict),
    }
}

/// Owns the graphics-state machine and accumulates [`PlacedText`] for one
/// page (or one content stream, for callers not driving a full page).
///
/// Construct one per page: font cache interning is document-scoped in spirit
/// (callers wishing to share it across pages can lift `font_cache` out and
/// pass it back in between pages), but nothing here prevents reuse.
pub struct Collector<'p, P: ObjectProvider> {
    provider: &'p P,
    options: ExtractOptions,
    resource_stack: Vec<PdfDictionary>,
    gs_stack: GraphicsStateStack,
    text_state: TextState,
    font_cache: HashMap<FontId, Rc<Font>>,
    placements: Vec<PlacedText>,
    warnings: Vec<ExtractWarning>,
}

impl<'p, P: ObjectProvider> Collector<'p, P> {
    /// Create a collector for a fresh page (or content stream), with an
    /// empty font cache.
    pub fn new(provider: &'p P, options: ExtractOptions) -> Self {
        Self::with_font_cache(provider, options, HashMap::new())
    }

    /// Create a collector seeded with a font cache carried over from a
    /// previous page, so a font dictionary shared across pages is decoded
    /// at most once per document.
    pub fn with_font_cache(
        provider: &'p P,
        options: ExtractOptions,
        font_cache: HashMap<FontId, Rc<Font>>,
    ) -> Self {
        Self {
            provider,
            options,
            resource_stack: Vec::new(),
            gs_stack: GraphicsStateStack::new(),
            text_state: TextState::new(),
            font_cache,
            placements: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Warnings collected so far (cleared by [`ContentHandler::on_done`]).
    pub fn warnings(&self) -> &[ExtractWarning] {
        &self.warnings
    }

    /// Reclaim the font cache, to carry it forward into the next page's
    /// collector via [`Collector::with_font_cache`].
    pub fn into_font_cache(self) -> HashMap<FontId, Rc<Font>> {
        self.font_cache
    }

    fn warn(&mut self, code: ExtractWarningCode, description: impl Into<String>) {
        let description = description.into();
        #[cfg(feature = "tracing")]
        tracing::warn!(code = %code, "{description}");
        if self.options.collect_warnings {
            self.warnings.push(ExtractWarning::with_code(code, description));
        }
    }

    fn find_resource_entry(&self, category: &str, name: &str) -> Option<PdfObject> {
        self.resource_stack
            .iter()
            .rev()
            .find_map(|scope| scope.get_dict(category).and_then(|d| d.get(name)).cloned())
    }

    fn resolve_font(&mut self, name: &str) -> Option<Rc<Font>> {
        let entry = self.find_resource_entry("Font", name)?;
        let resolved = resolve(self.provider, &entry);
        let Some(dict) = resolved.as_dict() else {
            self.warn(
                ExtractWarningCode::MissingFont,
                format!("resource /Font /{name} did not resolve to a dictionary"),
            );
            return None;
        };
        let font_id = font_id_for(&entry, dict);
        if let Some(font) = self.font_cache.get(&font_id) {
            return Some(Rc::clone(font));
        }
        let font = Rc::new(font::decode_font(self.provider, font_id, dict));
        self.font_cache.insert(font_id, Rc::clone(&font));
        Some(font)
    }

    fn current_font(&self) -> Option<Rc<Font>> {
        let id = self.gs_stack.current().font?;
        self.font_cache.get(&id).cloned()
    }

    /// `gs name`: if the named ExtGState has a `/Font [ref size]` entry, set
    /// the current font and size from it.
    fn apply_ext_gstate(&mut self, name: &str) {
        let Some(entry) = self.find_resource_entry("ExtGState", name) else {
            self.warn(
                ExtractWarningCode::UnknownExtGStateKey,
                format!("/ExtGState /{name} not found in resources"),
            );
            return;
        };
        let resolved = resolve(self.provider, &entry);
        let Some(dict) = resolved.as_dict() else {
            return;
        };
        let Some(font_entry) = dict.get("Font").map(|o| resolve(self.provider, o)) else {
            return;
        };
        let Some(arr) = font_entry.as_array() else {
            return;
        };
        if arr.len() != 2 {
            return;
        }
        let Some(size) = arr[1].as_f64() else {
            return;
        };
        let font_ref = &arr[0];
        let resolved_font = resolve(self.provider, font_ref);
        let Some(font_dict) = resolved_font.as_dict() else {
            return;
        };
        let font_id = font_id_for(font_ref, font_dict);
        let font = self
            .font_cache
            .get(&font_id)
            .cloned()
            .unwrap_or_else(|| Rc::new(font::decode_font(self.provider, font_id, font_dict)));
        self.font_cache.insert(font_id, Rc::clone(&font));
        self.gs_stack.current_mut().set_font(font_id, size);
    }

    fn show_text(&mut self, bytes: &[u8]) {
        if !self.text_state.in_text_object() {
            return;
        }
        let gs = self.gs_stack.current();
        if !gs.has_font() {
            return;
        }
        let Some(font) = self.current_font() else {
            self.warn(ExtractWarningCode::MissingFont, "Tf set a font not present in resources");
            return;
        };
        if self.options.max_objects_per_page != 0
            && self.placements.len() >= self.options.max_objects_per_page
        {
            self.warn(
                ExtractWarningCode::ResourceLimitReached,
                "max_objects_per_page reached",
            );
            return;
        }
        let placed = text_renderer::show_string(bytes, &font, gs, &mut self.text_state);
        self.placements.push(placed);
    }

    fn show_tj_array(&mut self, elements: &[Operand]) {
        for element in elements {
            match element {
                Operand::LiteralString(_) | Operand::HexString(_) => {
                    self.show_text(as_bytes(element).unwrap_or(&[]));
                }
                Operand::Integer(_) | Operand::Real(_) => {
                    let n = as_number(element).unwrap_or(0.0);
                    let gs = self.gs_stack.current();
                    text_renderer::apply_tj_adjustment(n, gs, &mut self.text_state);
                }
                _ => {}
            }
        }
    }

    fn dispatch(&mut self, op: &str, operands: &[Operand]) {
        match op {
            "q" => self.gs_stack.save(),
            "Q" => {
                self.gs_stack.restore();
            }
            "cm" => {
                if let [a, b, c, d, e, f] = operands {
                    if let (Some(a), Some(b), Some(c), Some(d), Some(e), Some(f)) = (
                        as_number(a),
                        as_number(b),
                        as_number(c),
                        as_number(d),
                        as_number(e),
                        as_number(f),
                    ) {
                        self.gs_stack.current_mut().concat_matrix(a, b, c, d, e, f);
                    }
                }
            }
            "gs" => {
                if let [Operand::Name(name)] = operands {
                    self.apply_ext_gstate(name);
                }
            }
            "Tf" => {
                if let [name_op, size_op] = operands {
                    if let (Some(name), Some(size)) = (as_name(name_op), as_number(size_op)) {
                        let name = name.to_string();
                        if let Some(font) = self.resolve_font(&name) {
                            self.gs_stack
                                .current_mut()
                                .set_font(font.description.font_id, size);
                        } else {
                            self.warn(
                                ExtractWarningCode::MissingFont,
                                format!("/Font /{name} not found in resources"),
                            );
                        }
                    }
                }
            }
            "Tc" => self.set_scalar(operands, |gs, v| gs.set_char_space(v)),
            "Tw" => self.set_scalar(operands, |gs, v| gs.set_word_space(v)),
            "TL" => self.set_scalar(operands, |gs, v| gs.set_leading(v)),
            "Tz" => self.set_scalar(operands, |gs, v| gs.set_horiz_scale_percent(v)),
            "Ts" => self.set_scalar(operands, |gs, v| gs.set_text_rise(v)),
            "Tr" => {
                if let [op] = operands {
                    if let Some(n) = as_number(op) {
                        if let Some(mode) = TextRenderMode::from_i64(n as i64) {
                            self.gs_stack.current_mut().set_text_rendering_mode(mode);
                        }
                    }
                }
            }
            "BT" => self.text_state.begin_text(),
            "ET" => self.text_state.end_text(),
            "Td" => {
                if let [tx, ty] = operands {
                    if let (Some(tx), Some(ty)) = (as_number(tx), as_number(ty)) {
                        if self.text_state.in_text_object() {
                            self.text_state.move_text_position(tx, ty);
                        }
                    }
                }
            }
            "TD" => {
                if let [tx, ty] = operands {
                    if let (Some(tx), Some(ty)) = (as_number(tx), as_number(ty)) {
                        if self.text_state.in_text_object() {
                            self.gs_stack.current_mut().set_leading(-ty);
                            self.text_state.move_text_position(tx, ty);
                        }
                    }
                }
            }
            "Tm" => {
                if let [a, b, c, d, e, f] = operands {
                    if let (Some(a), Some(b), Some(c), Some(d), Some(e), Some(f)) = (
                        as_number(a),
                        as_number(b),
                        as_number(c),
                        as_number(d),
                        as_number(e),
                        as_number(f),
                    ) {
                        if self.text_state.in_text_object() {
                            self.text_state.set_text_matrix(a, b, c, d, e, f);
                        }
                    }
                }
            }
            "T*" => {
                if self.text_state.in_text_object() {
                    let leading = self.gs_stack.current().leading;
                    self.text_state.move_to_next_line(leading);
                }
            }
            "Tj" => {
                if let [s] = operands {
                    if let Some(bytes) = as_bytes(s) {
                        let bytes = bytes.to_vec();
                        self.show_text(&bytes);
                    }
                }
            }
            "TJ" => {
                if let [Operand::Array(elements)] = operands {
                    let elements = elements.clone();
                    self.show_tj_array(&elements);
                }
            }
            "'" => {
                if let [s] = operands {
                    if let Some(bytes) = as_bytes(s) {
                        let bytes = bytes.to_vec();
                        if self.text_state.in_text_object() {
                            let leading = self.gs_stack.current().leading;
                            self.text_state.move_to_next_line(leading);
                        }
                        self.show_text(&bytes);
                    }
                }
            }
            "\"" => {
                if let [aw, ac, s] = operands {
                    if let (Some(aw), Some(ac), Some(bytes)) =
                        (as_number(aw), as_number(ac), as_bytes(s))
                    {
                        let bytes = bytes.to_vec();
                        self.gs_stack.current_mut().set_word_space(aw);
                        self.gs_stack.current_mut().set_char_space(ac);
                        if self.text_state.in_text_object() {
                            let leading = self.gs_stack.current().leading;
                            self.text_state.move_to_next_line(leading);
                        }
                        self.show_text(&bytes);
                    }
                }
            }
            "Do" => {
                // Resolved and recursed into by the interpreter itself;
                // nothing to do here.
            }
            _ => {
                // Unknown/unhandled operator (color, path, clipping,
                // marked-content, compatibility operators, ...): ignored.
            }
        }
    }

    fn set_scalar(&mut self, operands: &[Operand], apply: impl FnOnce(&mut crate::graphics_state::GraphicsState, f64)) {
        if let [op] = operands {
            if let Some(v) = as_number(op) {
                apply(self.gs_stack.current_mut(), v);
            }
        }
    }

    /// Cache-eligible reference to the current resource scope, for tests
    /// that want to assert on scope depth.
    #[cfg(test)]
    fn scope_depth(&self) -> usize {
        self.resource_stack.len()
    }
}

impl<P: ObjectProvider> ContentHandler for Collector<'_, P> {
    fn on_operation(&mut self, op: &str, operands: &[Operand]) -> bool {
        self.dispatch(op, operands);
        true
    }

    fn on_resources_read(&mut self, resources: &PdfDictionary) {
        self.resource_stack.push(resources.clone());
    }

    fn on_xobject_do_end(&mut self, _name: &str) {
        self.resource_stack.pop();
        // BT…ET cannot cross a stream boundary; an unterminated text object
        // left open inside the XObject is implicitly closed.
        self.text_state.end_text();
    }

    fn on_done(&mut self) -> Vec<PlacedText> {
        std::mem::take(&mut self.placements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::interpret;
    use crate::provider::mock::MockProvider;
    use pdf_text_core::{FontDescription, WidthTable};

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

    fn run(content: &[u8], resources: &PdfDictionary) -> Vec<PlacedText> {
        let provider = MockProvider::new();
        let mut collector = Collector::new(&provider, ExtractOptions::default());
        interpret(&provider, content, resources, &mut collector, &ExtractOptions::default()).unwrap();
        collector.on_done()
    }

    #[test]
    fn simple_single_line_placement() {
        let resources = helvetica_resources();
        let placed = run(b"BT /F1 12 Tf 72 720 Td (Hi) Tj ET", &resources);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].text, "Hi");
        let bbox = placed[0].global_bbox();
        assert!((bbox.x_min - 72.0).abs() < 1e-6);
        // Helvetica ascent=718, descent=-207: y = 720 + (-207*12/1000),
        // height = (718-(-207))*12/1000 = 11.1.
        assert!((bbox.y_min - 717.516).abs() < 1e-6);
        assert!((bbox.height() - 11.1).abs() < 1e-6);
    }

    #[test]
    fn word_spacing_applies_only_to_space_code() {
        let resources = helvetica_resources();
        let placed = run(b"BT /F1 12 Tf 10 Tw 0 0 Td (a b) Tj ET", &resources);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].text, "a b");
    }

    #[test]
    fn ctm_composition_scales_placement() {
        let resources = helvetica_resources();
        let placed = run(
            b"q 2 0 0 2 0 0 cm BT /F1 12 Tf 10 10 Td (X) Tj ET Q",
            &resources,
        );
        assert_eq!(placed.len(), 1);
        let bbox = placed[0].global_bbox();
        assert!((bbox.x_min - 20.0).abs() < 1e-6);
    }

    #[test]
    fn form_xobject_recursion_emits_inner_placement() {
        let form_id = ObjectId::new(10, 0);
        let mut form_dict = PdfDictionary::new();
        form_dict.insert("Subtype", PdfObject::Name("Form".into()));
        let form_stream = PdfObject::Stream(form_dict, b"BT /F1 12 Tf 5 5 Td (inner) Tj ET".to_vec());

        let mut xobject_map = PdfDictionary::new();
        xobject_map.insert("Fm1", PdfObject::Reference(form_id));
        let mut resources = helvetica_resources();
        resources.insert("XObject", PdfObject::Dictionary(xobject_map));

        let provider = MockProvider::new().with_object(form_id, form_stream);
        let mut collector = Collector::new(&provider, ExtractOptions::default());
        interpret(
            &provider,
            b"q 1 0 0 1 100 200 cm /Fm1 Do Q",
            &resources,
            &mut collector,
            &ExtractOptions::default(),
        )
        .unwrap();
        let placed = collector.on_done();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].text, "inner");
        let bbox = placed[0].global_bbox();
        assert!((bbox.x_min - 105.0).abs() < 1e-6);
        assert!((bbox.y_min - 205.0).abs() < 1e-6);
    }

    #[test]
    fn unmatched_q_is_a_noop() {
        let resources = helvetica_resources();
        let placed = run(b"Q BT /F1 12 Tf (z) Tj ET", &resources);
        assert_eq!(placed.len(), 1);
    }

    #[test]
    fn text_showing_without_font_is_skipped() {
        let resources = helvetica_resources();
        let placed = run(b"BT (no font set) Tj ET", &resources);
        assert!(placed.is_empty());
    }

    #[test]
    fn text_showing_outside_bt_et_is_ignored() {
        let resources = helvetica_resources();
        let placed = run(b"/F1 12 Tf (nope) Tj", &resources);
        assert!(placed.is_empty());
    }

    #[test]
    fn empty_tj_array_emits_nothing_and_does_not_move() {
        let resources = helvetica_resources();
        let placed = run(b"BT /F1 12 Tf 72 720 Td [] TJ ET", &resources);
        assert!(placed.is_empty());
    }

    #[test]
    fn zero_length_tj_string_is_not_an_error() {
        let resources = helvetica_resources();
        let placed = run(b"BT /F1 12 Tf () Tj ET", &resources);
        assert!(placed.is_empty());
    }

    #[test]
    fn font_is_cached_across_multiple_tf_calls() {
        let resources = helvetica_resources();
        let provider = MockProvider::new();
        let mut collector = Collector::new(&provider, ExtractOptions::default());
        interpret(
            &provider,
            b"BT /F1 12 Tf (a) Tj /F1 14 Tf (b) Tj ET",
            &resources,
            &mut collector,
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(collector.font_cache.len(), 1);
    }

    #[test]
    fn gs_operator_sets_font_and_size_from_extgstate() {
        let mut font_dict = PdfDictionary::new();
        font_dict.insert("Subtype", PdfObject::Name("Type1".into()));
        font_dict.insert("BaseFont", PdfObject::Name("Helvetica".into()));
        let font_id = ObjectId::new(5, 0);

        let mut gstate_dict = PdfDictionary::new();
        gstate_dict.insert(
            "Font",
            PdfObject::Array(vec![PdfObject::Reference(font_id), PdfObject::Integer(18)]),
        );
        let mut gstate_map = PdfDictionary::new();
        gstate_map.insert("GS1", PdfObject::Dictionary(gstate_dict));

        let mut resources = PdfDictionary::new();
        resources.insert("ExtGState", PdfObject::Dictionary(gstate_map));

        let provider = MockProvider::new().with_object(font_id, PdfObject::Dictionary(font_dict));
        let mut collector = Collector::new(&provider, ExtractOptions::default());
        interpret(
            &provider,
            b"BT /GS1 gs (hi) Tj ET",
            &resources,
            &mut collector,
            &ExtractOptions::default(),
        )
        .unwrap();
        let placed = collector.on_done();
        assert_eq!(placed.len(), 1);
    }

    #[test]
    fn resource_scope_falls_back_to_outer_scope() {
        let resources = helvetica_resources();
        let form_id = ObjectId::new(11, 0);
        let mut form_dict = PdfDictionary::new();
        form_dict.insert("Subtype", PdfObject::Name("Form".into()));
        // The form's own Resources has no /Font entry; /F1 must resolve
        // through the outer (page) scope.
        let form_stream = PdfObject::Stream(
            {
                let mut d = form_dict.clone();
                d.insert("Resources", PdfObject::Dictionary(PdfDictionary::new()));
                d
            },
            b"BT /F1 12 Tf (fallback) Tj ET".to_vec(),
        );
        let mut xobject_map = PdfDictionary::new();
        xobject_map.insert("Fm1", PdfObject::Reference(form_id));
        let mut page_resources = resources;
        page_resources.insert("XObject", PdfObject::Dictionary(xobject_map));

        let provider = MockProvider::new().with_object(form_id, form_stream);
        let mut collector = Collector::new(&provider, ExtractOptions::default());
        interpret(
            &provider,
            b"/Fm1 Do",
            &page_resources,
            &mut collector,
            &ExtractOptions::default(),
        )
        .unwrap();
        let placed = collector.on_done();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].text, "fallback");
    }

    #[test]
    fn invisible_rendering_mode_still_emits_placement() {
        let resources = helvetica_resources();
        let placed = run(b"BT /F1 12 Tf 3 Tr (hidden) Tj ET", &resources);
        assert_eq!(placed.len(), 1);
    }

    #[test]
    fn font_description_accessible_after_decode() {
        let resources = helvetica_resources();
        let provider = MockProvider::new();
        let mut collector = Collector::new(&provider, ExtractOptions::default());
        interpret(
            &provider,
            b"BT /F1 12 Tf (Hi) Tj ET",
            &resources,
            &mut collector,
            &ExtractOptions::default(),
        )
        .unwrap();
        let placed = collector.on_done();
        let font_id = placed[0].font_id;
        let font = collector.font_cache.get(&font_id).unwrap();
        let _desc: &FontDescription = &font.description;
        assert!(matches!(font.description.widths, WidthTable::Sparse { .. } | WidthTable::Monospace(_)));
    }
}

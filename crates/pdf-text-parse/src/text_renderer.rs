//! String-showing algorithm for text rendering operators (`Tj`/`TJ`/`'`/`"`).
//!
//! Turns a shown PDF string into a [`PlacedText`] record, using the current
//! [`GraphicsState`] for font/size/spacing parameters and the current
//! [`TextState`] for the text matrix — then advances the text matrix by the
//! string's total displacement, per the PDF spec's text-showing algorithm.

use pdf_text_core::{Box as TextBox, Matrix, PlacedText};

use crate::font::Font;
use crate::graphics_state::GraphicsState;
use crate::text_state::TextState;

/// Show string `bytes` under `font`, using `gs` for sizing/spacing and `ts`
/// for the text matrix. Advances `ts`'s text matrix by the string's total
/// displacement and returns the resulting [`PlacedText`].
///
/// Per-code advance: `tx_i = ((width_i/1000) × fontSize + charSpace +
/// (code_i is space ? wordSpace : 0)) × horizScale`.
pub fn show_string(bytes: &[u8], font: &Font, gs: &GraphicsState, ts: &mut TextState) -> PlacedText {
    let font_size = gs.font_size.unwrap_or(0.0);
    let horiz_scale = gs.horiz_scale;
    let ctm = *gs.ctm();
    let tm = *ts.text_matrix();

    let trm = Matrix::new(font_size * horiz_scale, 0.0, 0.0, font_size, 0.0, gs.text_rise).concat(&tm);
    let matrix = trm.concat(&ctm);

    let space_code = font.space_code();
    let total_tx: f64 = font
        .compute_displacements(bytes)
        .into_iter()
        .map(|(code, width)| {
            let word = if Some(code) == space_code { gs.word_space } else { 0.0 };
            ((width / 1000.0) * font_size + gs.char_space + word) * horiz_scale
        })
        .sum();

    let (text, _method) = font.translate(bytes);

    let local_bbox = TextBox::new(
        0.0,
        font.description.descent * font_size / 1000.0,
        total_tx,
        font.description.ascent * font_size / 1000.0,
    );

    let space_width = font.description.space_width / 1000.0 * font_size + gs.char_space + gs.word_space;
    let global_space_width = (space_width * matrix.a, space_width * matrix.b);

    ts.advance_text_position(total_tx);

    PlacedText {
        text,
        font_id: font.description.font_id,
        matrix,
        local_bbox,
        space_width,
        global_space_width,
    }
}

/// `'` operator: move to the start of the next line using the current
/// leading, then show `bytes`. Equivalent to `T*` followed by `Tj`.
pub fn quote_show_string(
    bytes: &[u8],
    font: &Font,
    gs: &GraphicsState,
    ts: &mut TextState,
) -> PlacedText {
    ts.move_to_next_line(gs.leading);
    show_string(bytes, font, gs, ts)
}

/// `"` operator: set word spacing and character spacing, then perform the
/// `'` behavior.
pub fn double_quote_show_string(
    bytes: &[u8],
    word_space: f64,
    char_space: f64,
    font: &Font,
    gs: &mut GraphicsState,
    ts: &mut TextState,
) -> PlacedText {
    gs.set_word_space(word_space);
    gs.set_char_space(char_space);
    quote_show_string(bytes, font, gs, ts)
}

/// `TJ` adjustment: a bare number between shown strings in a `TJ` array
/// moves the text position without producing a placement:
/// `tm := [1 0 0 1 -n/1000×fontSize×horizScale 0] × tm`.
pub fn apply_tj_adjustment(n: f64, gs: &GraphicsState, ts: &mut TextState) {
    let font_size = gs.font_size.unwrap_or(0.0);
    let dx = -n / 1000.0 * font_size * gs.horiz_scale;
    ts.advance_text_position(dx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockProvider;
    use pdf_text_core::{FontId, PdfDictionary, PdfObject};

    fn helvetica_font() -> Font {
        let provider = MockProvider::new();
        let mut dict = PdfDictionary::new();
        dict.insert("Subtype", PdfObject::Name("Type1".into()));
        dict.insert("BaseFont", PdfObject::Name("Helvetica".into()));
        crate::font::decode_font(&provider, FontId::new(1, 0), &dict)
    }

    #[test]
    fn show_string_advances_text_matrix_by_total_displacement() {
        let font = helvetica_font();
        let mut gs = GraphicsState::new();
        gs.set_font(FontId::new(1, 0), 12.0);
        let mut ts = TextState::new();
        ts.begin_text();

        let placed = show_string(b"A", &font, &gs, &mut ts);
        let expected_tx = (font.width_for_code(b'A' as u32) / 1000.0) * 12.0;
        assert!((ts.text_matrix().e - expected_tx).abs() < 1e-9);
        assert_eq!(placed.text, "A");
    }

    #[test]
    fn show_string_local_bbox_uses_ascent_descent_and_total_tx() {
        let font = helvetica_font();
        let mut gs = GraphicsState::new();
        gs.set_font(FontId::new(1, 0), 10.0);
        let mut ts = TextState::new();
        ts.begin_text();

        let placed = show_string(b"A", &font, &gs, &mut ts);
        assert_eq!(placed.local_bbox.x_min, 0.0);
        assert!((placed.local_bbox.y_min - font.description.descent * 10.0 / 1000.0).abs() < 1e-9);
        assert!((placed.local_bbox.y_max - font.description.ascent * 10.0 / 1000.0).abs() < 1e-9);
        assert!(placed.local_bbox.x_max > 0.0);
    }

    #[test]
    fn show_string_word_space_applies_only_to_space_code() {
        let font = helvetica_font();
        let mut gs = GraphicsState::new();
        gs.set_font(FontId::new(1, 0), 10.0);
        gs.set_word_space(5.0);
        let mut ts_with_space = TextState::new();
        ts_with_space.begin_text();
        let mut ts_without_space = TextState::new();
        ts_without_space.begin_text();

        show_string(b" ", &font, &gs, &mut ts_with_space);
        let with_word_space_tx = ts_with_space.text_matrix().e;

        gs.set_word_space(0.0);
        show_string(b" ", &font, &gs, &mut ts_without_space);
        let without_word_space_tx = ts_without_space.text_matrix().e;

        assert!(with_word_space_tx > without_word_space_tx);
    }

    #[test]
    fn show_string_horiz_scale_scales_displacement() {
        let font = helvetica_font();
        let mut gs = GraphicsState::new();
        gs.set_font(FontId::new(1, 0), 10.0);
        gs.set_horiz_scale_percent(50.0);
        let mut ts = TextState::new();
        ts.begin_text();

        let placed = show_string(b"A", &font, &gs, &mut ts);
        let full_scale_tx = (font.width_for_code(b'A' as u32) / 1000.0) * 10.0;
        assert!((ts.text_matrix().e - full_scale_tx * 0.5).abs() < 1e-9);
        assert!((placed.local_bbox.x_max - full_scale_tx * 0.5).abs() < 1e-9);
    }

    #[test]
    fn quote_show_string_moves_to_next_line_first() {
        let font = helvetica_font();
        let mut gs = GraphicsState::new();
        gs.set_font(FontId::new(1, 0), 12.0);
        gs.set_leading(14.0);
        let mut ts = TextState::new();
        ts.begin_text();
        ts.move_text_position(72.0, 700.0);

        quote_show_string(b"A", &font, &gs, &mut ts);
        assert!((ts.line_matrix().f - 686.0).abs() < 1e-9);
    }

    #[test]
    fn double_quote_show_string_sets_spacing_then_shows() {
        let font = helvetica_font();
        let mut gs = GraphicsState::new();
        gs.set_font(FontId::new(1, 0), 12.0);
        let mut ts = TextState::new();
        ts.begin_text();

        double_quote_show_string(b"A", 3.0, 1.5, &font, &mut gs, &mut ts);
        assert_eq!(gs.word_space, 3.0);
        assert_eq!(gs.char_space, 1.5);
    }

    #[test]
    fn apply_tj_adjustment_moves_text_position_negatively_scaled() {
        let mut gs = GraphicsState::new();
        gs.set_font(FontId::new(1, 0), 10.0);
        let mut ts = TextState::new();
        ts.begin_text();

        apply_tj_adjustment(250.0, &gs, &mut ts);
        assert!((ts.text_matrix().e - (-2.5)).abs() < 1e-9);
    }

    #[test]
    fn global_space_width_is_space_width_as_vector_through_matrix() {
        let font = helvetica_font();
        let mut gs = GraphicsState::new();
        gs.set_font(FontId::new(1, 0), 12.0);
        let mut ts = TextState::new();
        ts.begin_text();

        let placed = show_string(b"A", &font, &gs, &mut ts);
        let expected_space_width = font.description.space_width / 1000.0 * 12.0;
        assert!((placed.space_width - expected_space_width).abs() < 1e-9);
        assert!((placed.global_space_width.0 - expected_space_width * placed.matrix.a).abs() < 1e-9);
        assert!((placed.global_space_width.1 - expected_space_width * placed.matrix.b).abs() < 1e-9);
    }
}

//! Graphics state stack for the content stream interpreter.
//!
//! Implements the PDF graphics state model relevant to text placement: a
//! stack of states managed by `q` (save) and `Q` (restore), CTM management
//! via `cm`, and the text parameters that are part of the graphics state
//! (`Tc`/`Tw`/`Tz`/`TL`/`Ts`/`Tr`/`Tf`). Colors, line width, dash pattern,
//! and clipping are outside this system's scope and are not tracked.

use pdf_text_core::{FontId, Matrix};

/// Text rendering mode values (`Tr` operator).
///
/// Only `Invisible` changes text-placement behavior (the collector still
/// emits a placement; rendering mode does not gate extraction). Kept as a
/// distinct type so callers can inspect it without re-deriving from `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRenderMode {
    /// Fill character glyphs (default).
    #[default]
    Fill = 0,
    /// Stroke (outline) character glyphs.
    Stroke = 1,
    /// Fill and stroke character glyphs.
    FillStroke = 2,
    /// Neither fill nor stroke (invisible text).
    Invisible = 3,
    /// Fill and add to clipping path.
    FillClip = 4,
    /// Stroke and add to clipping path.
    StrokeClip = 5,
    /// Fill, stroke, and add to clipping path.
    FillStrokeClip = 6,
    /// Add to clipping path only.
    Clip = 7,
}

impl TextRenderMode {
    /// Build a `TextRenderMode` from an integer operand (0-7).
    ///
    /// Returns `None` for out-of-range values; callers should treat that as
    /// a malformed operand and leave the mode unchanged.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Fill),
            1 => Some(Self::Stroke),
            2 => Some(Self::FillStroke),
            3 => Some(Self::Invisible),
            4 => Some(Self::FillClip),
            5 => Some(Self::StrokeClip),
            6 => Some(Self::FillStrokeClip),
            7 => Some(Self::Clip),
            _ => None,
        }
    }
}

/// The PDF Graphics State Frame, pushed by `q` and popped by `Q`.
///
/// Holds the CTM and the text parameters that the PDF spec places in the
/// graphics state (as opposed to the Text Object State, which holds only
/// `tm`/`tlm` and is reset at every `BT`, independent of `q`/`Q`).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    ctm: Matrix,
    /// The current font, set by `Tf`. `None` until the first `Tf`.
    pub font: Option<FontId>,
    /// The current font size, set by `Tf`. `None` until the first `Tf`.
    pub font_size: Option<f64>,
    /// Character spacing (`Tc`).
    pub char_space: f64,
    /// Word spacing (`Tw`).
    pub word_space: f64,
    /// Text leading (`TL`), the baseline-to-baseline distance used by `T*`/`TD`.
    pub leading: f64,
    /// Horizontal scaling (`Tz`), as a fraction where `1.0` is 100%.
    pub horiz_scale: f64,
    /// Text rise (`Ts`), a vertical baseline offset in text space.
    pub text_rise: f64,
    /// Text rendering mode (`Tr`).
    pub text_rendering_mode: TextRenderMode,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::identity(),
            font: None,
            font_size: None,
            char_space: 0.0,
            word_space: 0.0,
            leading: 0.0,
            horiz_scale: 1.0,
            text_rise: 0.0,
            text_rendering_mode: TextRenderMode::default(),
        }
    }
}

impl GraphicsState {
    /// Create a new graphics state frame with PDF-spec default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current transformation matrix.
    pub fn ctm(&self) -> &Matrix {
        &self.ctm
    }

    /// `true` when both `font` and `font_size` are set, i.e. text-showing
    /// operators are valid in this state.
    pub fn has_font(&self) -> bool {
        self.font.is_some() && self.font_size.is_some()
    }

    // --- cm operator ---

    /// `cm` operator: concatenate a matrix with the current CTM.
    ///
    /// `CTM' = new_matrix × CTM_current` — the operand matrix is
    /// pre-multiplied, per PDF spec 8.3.4.
    pub fn concat_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        let new_matrix = Matrix::new(a, b, c, d, e, f);
        self.ctm = new_matrix.concat(&self.ctm);
    }

    // --- Tf operator ---

    /// `Tf` operator: set the current font and size.
    pub fn set_font(&mut self, font: FontId, size: f64) {
        self.font = Some(font);
        self.font_size = Some(size);
    }

    // --- Tc/Tw/TL/Tz/Ts/Tr operators ---

    /// `Tc` operator: set character spacing.
    pub fn set_char_space(&mut self, value: f64) {
        self.char_space = value;
    }

    /// `Tw` operator: set word spacing.
    pub fn set_word_space(&mut self, value: f64) {
        self.word_space = value;
    }

    /// `TL` operator: set text leading.
    pub fn set_leading(&mut self, value: f64) {
        self.leading = value;
    }

    /// `Tz` operator: set horizontal scaling from a percentage operand
    /// (`100` is normal).
    pub fn set_horiz_scale_percent(&mut self, percent: f64) {
        self.horiz_scale = percent / 100.0;
    }

    /// `Ts` operator: set text rise.
    pub fn set_text_rise(&mut self, value: f64) {
        self.text_rise = value;
    }

    /// `Tr` operator: set text rendering mode.
    pub fn set_text_rendering_mode(&mut self, mode: TextRenderMode) {
        self.text_rendering_mode = mode;
    }
}

/// A stack of [`GraphicsState`] frames, managed by `q`/`Q`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsStateStack {
    current: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl Default for GraphicsStateStack {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsStateStack {
    /// Create a stack with a single default-valued frame and an empty
    /// save stack.
    pub fn new() -> Self {
        Self {
            current: GraphicsState::new(),
            saved: Vec::new(),
        }
    }

    /// The current (topmost) graphics state.
    pub fn current(&self) -> &GraphicsState {
        &self.current
    }

    /// Mutable access to the current graphics state.
    pub fn current_mut(&mut self) -> &mut GraphicsState {
        &mut self.current
    }

    /// Number of saved frames below the current one.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// `q` operator: push a copy of the current state onto the stack.
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// `Q` operator: pop and restore the most recently saved state.
    ///
    /// Returns `false` for an unbalanced `Q` (empty stack); per spec, this
    /// is a non-fatal condition and the current state is left unchanged.
    pub fn restore(&mut self) -> bool {
        if let Some(previous) = self.saved.pop() {
            self.current = previous;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-10,
            "expected {expected}, got {actual}"
        );
    }

    // --- TextRenderMode ---

    #[test]
    fn render_mode_from_i64_valid() {
        assert_eq!(TextRenderMode::from_i64(0), Some(TextRenderMode::Fill));
        assert_eq!(TextRenderMode::from_i64(3), Some(TextRenderMode::Invisible));
        assert_eq!(TextRenderMode::from_i64(7), Some(TextRenderMode::Clip));
    }

    #[test]
    fn render_mode_from_i64_out_of_range_is_none() {
        assert_eq!(TextRenderMode::from_i64(-1), None);
        assert_eq!(TextRenderMode::from_i64(8), None);
    }

    #[test]
    fn render_mode_default_is_fill() {
        assert_eq!(TextRenderMode::default(), TextRenderMode::Fill);
    }

    // --- GraphicsState defaults ---

    #[test]
    fn new_has_identity_ctm() {
        let gs = GraphicsState::new();
        assert_eq!(*gs.ctm(), Matrix::identity());
    }

    #[test]
    fn new_has_spec_default_text_parameters() {
        let gs = GraphicsState::new();
        assert_eq!(gs.font, None);
        assert_eq!(gs.font_size, None);
        assert_eq!(gs.char_space, 0.0);
        assert_eq!(gs.word_space, 0.0);
        assert_eq!(gs.leading, 0.0);
        assert_eq!(gs.horiz_scale, 1.0);
        assert_eq!(gs.text_rise, 0.0);
        assert_eq!(gs.text_rendering_mode, TextRenderMode::Fill);
    }

    #[test]
    fn has_font_false_until_tf() {
        let mut gs = GraphicsState::new();
        assert!(!gs.has_font());
        gs.set_font(FontId::new(1, 0), 12.0);
        assert!(gs.has_font());
    }

    // --- cm operator ---

    #[test]
    fn concat_matrix_translation() {
        let mut gs = GraphicsState::new();
        gs.concat_matrix(1.0, 0.0, 0.0, 1.0, 100.0, 200.0);
        let p = gs.ctm().transform_point(pdf_text_core::Point::new(0.0, 0.0));
        assert_approx(p.x, 100.0);
        assert_approx(p.y, 200.0);
    }

    #[test]
    fn concat_matrix_cumulative() {
        let mut gs = GraphicsState::new();
        gs.concat_matrix(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        gs.concat_matrix(1.0, 0.0, 0.0, 1.0, 10.0, 20.0);
        let p = gs.ctm().transform_point(pdf_text_core::Point::new(0.0, 0.0));
        assert_approx(p.x, 20.0);
        assert_approx(p.y, 40.0);
    }

    // --- Text parameter operators ---

    #[test]
    fn set_horiz_scale_percent_converts_to_fraction() {
        let mut gs = GraphicsState::new();
        gs.set_horiz_scale_percent(50.0);
        assert_approx(gs.horiz_scale, 0.5);
        gs.set_horiz_scale_percent(100.0);
        assert_approx(gs.horiz_scale, 1.0);
    }

    #[test]
    fn set_text_parameters() {
        let mut gs = GraphicsState::new();
        gs.set_char_space(0.5);
        gs.set_word_space(2.0);
        gs.set_leading(14.0);
        gs.set_text_rise(-3.0);
        gs.set_text_rendering_mode(TextRenderMode::Invisible);

        assert_eq!(gs.char_space, 0.5);
        assert_eq!(gs.word_space, 2.0);
        assert_eq!(gs.leading, 14.0);
        assert_eq!(gs.text_rise, -3.0);
        assert_eq!(gs.text_rendering_mode, TextRenderMode::Invisible);
    }

    // --- q/Q stack ---

    #[test]
    fn save_increments_depth() {
        let mut stack = GraphicsStateStack::new();
        stack.save();
        assert_eq!(stack.depth(), 1);
        stack.save();
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn restore_on_empty_stack_returns_false() {
        let mut stack = GraphicsStateStack::new();
        assert!(!stack.restore());
    }

    #[test]
    fn save_restore_preserves_ctm_and_text_parameters() {
        let mut stack = GraphicsStateStack::new();
        stack.save();

        stack.current_mut().concat_matrix(2.0, 0.0, 0.0, 2.0, 10.0, 20.0);
        stack.current_mut().set_font(FontId::new(3, 0), 24.0);
        stack.current_mut().set_char_space(1.5);

        assert!(stack.current().has_font());
        assert_eq!(stack.current().font_size, Some(24.0));

        assert!(stack.restore());
        assert_eq!(*stack.current().ctm(), Matrix::identity());
        assert!(!stack.current().has_font());
        assert_eq!(stack.current().char_space, 0.0);
    }

    #[test]
    fn nested_save_restore() {
        let mut stack = GraphicsStateStack::new();
        stack.current_mut().set_char_space(1.0);

        stack.save();
        stack.current_mut().set_char_space(2.0);

        stack.save();
        stack.current_mut().set_char_space(3.0);
        assert_eq!(stack.current().char_space, 3.0);

        stack.restore();
        assert_eq!(stack.current().char_space, 2.0);

        stack.restore();
        assert_eq!(stack.current().char_space, 1.0);
    }

    #[test]
    fn multiple_unbalanced_restores_return_false() {
        let mut stack = GraphicsStateStack::new();
        stack.save();
        assert!(stack.restore());
        assert!(!stack.restore());
        assert!(!stack.restore());
    }

    #[test]
    fn font_is_saved_and_restored_independently_of_font_size() {
        let mut stack = GraphicsStateStack::new();
        stack.current_mut().set_font(FontId::new(5, 0), 10.0);
        stack.save();
        stack.current_mut().set_font(FontId::new(6, 0), 20.0);

        assert_eq!(stack.current().font, Some(FontId::new(6, 0)));
        stack.restore();
        assert_eq!(stack.current().font, Some(FontId::new(5, 0)));
        assert_eq!(stack.current().font_size, Some(10.0));
    }
}

//! Text Object State for the content stream interpreter.
//!
//! Implements the PDF spec's Text Object State: it exists only between `BT`
//! and `ET`, is reset at every `BT`, and is independent of the `q`/`Q`
//! graphics-state stack (text parameters like `Tc`/`Tw`/`Tf` live in
//! [`crate::graphics_state::GraphicsState`] instead, since the PDF spec
//! places them in the graphics state).

use pdf_text_core::Matrix;

/// The text matrix and line matrix, plus whether a `BT…ET` block is open.
///
/// Text-positioning operators (`Td`/`TD`/`Tm`/`T*`) and the per-glyph
/// advance after `Tj`/`TJ` are ignored outside `BT…ET` by the interpreter
/// that owns this state; `TextState` itself just tracks the matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextState {
    in_text_object: bool,
    text_matrix: Matrix,
    line_matrix: Matrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self::new()
    }
}

impl TextState {
    /// Create a new `TextState` with default values per PDF spec.
    pub fn new() -> Self {
        Self {
            in_text_object: false,
            text_matrix: Matrix::identity(),
            line_matrix: Matrix::identity(),
        }
    }

    /// Whether we are currently inside a `BT`/`ET` text object.
    pub fn in_text_object(&self) -> bool {
        self.in_text_object
    }

    /// The current text matrix.
    pub fn text_matrix(&self) -> &Matrix {
        &self.text_matrix
    }

    /// The current line matrix.
    pub fn line_matrix(&self) -> &Matrix {
        &self.line_matrix
    }

    // --- BT operator ---

    /// `BT` operator: begin a text object, resetting both matrices to
    /// identity.
    pub fn begin_text(&mut self) {
        self.text_matrix = Matrix::identity();
        self.line_matrix = Matrix::identity();
        self.in_text_object = true;
    }

    // --- ET operator ---

    /// `ET` operator: end the text object. The matrices become undefined
    /// per spec but are left unchanged here for inspection.
    pub fn end_text(&mut self) {
        self.in_text_object = false;
    }

    // --- Tm operator ---

    /// `Tm` operator: set the text matrix and line matrix directly,
    /// replacing (not concatenating with) the current text matrix.
    pub fn set_text_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        let m = Matrix::new(a, b, c, d, e, f);
        self.text_matrix = m;
        self.line_matrix = m;
    }

    // --- Td/TD operators ---

    /// `Td` operator: move to the start of the next line, offset `(tx, ty)`
    /// from the start of the current line. `TD` is `Td` plus a caller-side
    /// `TL tx ty` (see [`crate::graphics_state::GraphicsState::set_leading`]).
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        let translation = Matrix::new(1.0, 0.0, 0.0, 1.0, tx, ty);
        self.line_matrix = translation.concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    // --- T* operator ---

    /// `T*` operator: move to the start of the next line, using the
    /// graphics state's current leading value. Equivalent to `0 -leading Td`.
    pub fn move_to_next_line(&mut self, leading: f64) {
        self.move_text_position(0.0, -leading);
    }

    // --- Advance after Tj/TJ ---

    /// Advance the text matrix by a horizontal displacement already in text
    /// space (i.e. already scaled by font size, char/word spacing, and
    /// horizontal scaling). Does not touch the line matrix.
    pub fn advance_text_position(&mut self, tx: f64) {
        let translation = Matrix::new(1.0, 0.0, 0.0, 1.0, tx, 0.0);
        self.text_matrix = translation.concat(&self.text_matrix);
    }
}

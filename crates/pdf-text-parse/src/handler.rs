//! Content handler callback trait bridging the interpreter and the collector.
//!
//! The interpreter drives a content stream and calls [`ContentHandler`]
//! methods as it tokenizes operators; the handler owns the graphics-state
//! machine and accumulates [`PlacedText`] records. The interpreter itself
//! holds no text-placement state.

use pdf_text_core::{PdfDictionary, PlacedText};

use crate::tokenizer::Operand;

/// Callback interface the content stream interpreter drives.
///
/// All operator dispatch, resource-scope management, and recursion
/// bookkeeping funnels through these four methods.
pub trait ContentHandler {
    /// Route one operator and its operands to the graphics-state machine.
    ///
    /// Unknown operators, and operators whose operand arity or types don't
    /// match what's expected, must return `true` (continue) — a malformed
    /// content stream does not abort extraction. Returning `false` aborts
    /// interpretation of the current stream only.
    fn on_operation(&mut self, op: &str, operands: &[Operand]) -> bool;

    /// Called exactly once before a stream is handed to the interpreter
    /// (the top-level page stream, and each Form XObject's stream), so the
    /// handler can push a new resource scope.
    fn on_resources_read(&mut self, resources: &PdfDictionary);

    /// Called after a Form XObject's content has been fully interpreted, so
    /// the handler can pop the resource scope it pushed for that XObject.
    /// Any pending text object is implicitly closed (`BT…ET` cannot cross
    /// stream boundaries).
    fn on_xobject_do_end(&mut self, name: &str);

    /// Drain the accumulated placements for the current page and clear
    /// internal state, ready for the next page.
    fn on_done(&mut self) -> Vec<PlacedText>;
}

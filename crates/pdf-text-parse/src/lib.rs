//! PDF content-stream interpretation and text-placement extraction.
//!
//! This crate implements the text-placement pipeline: a content-stream
//! interpreter driving a graphics-state machine, a font decoder mapping raw
//! byte strings to Unicode, and a placement collector that folds
//! interpreter events into page-coordinate `TextPlacement` records. It is
//! backend-independent — it never touches a concrete PDF object model
//! directly, consuming an [`ObjectProvider`] implementation instead.
//!
//! # Key types
//!
//! - [`ObjectProvider`] — capability interface the core consumes to resolve
//!   indirect references, enumerate pages, and read content streams
//! - [`ContentHandler`] — callback interface the interpreter drives
//! - [`Collector`] — the `ContentHandler` implementation that accumulates
//!   `PlacedText`
//! - [`CMap`] / [`CidCMap`] — ToUnicode and CID encoding CMap parsing
//! - [`Font`] / [`decode_font`] — font dictionary decoding
//! - [`extract`] / [`extract_page_range`] — whole-document extraction

#![deny(missing_docs)]

pub mod cid_font;
pub mod cmap;
pub mod collector;
pub mod error;
pub mod extract;
pub mod font;
pub mod font_metrics;
pub mod graphics_state;
pub mod handler;
pub mod interpreter;
pub mod provider;
pub mod standard_fonts;
pub mod text_renderer;
pub mod text_state;
pub mod tokenizer;

pub use cid_font::{
    CidFontMetrics, CidFontType, CidSystemInfo, CidToGidMap, PredefinedCMapInfo,
    extract_cid_font_metrics, get_descendant_font, is_type0_font, parse_predefined_cmap_name,
    parse_w_array,
};
pub use cmap::{CMap, CidCMap};
pub use collector::Collector;
pub use error::BackendError;
pub use extract::{ExtractResult, extract, extract_page_range};
pub use font::{Font, TranslateMethod, decode_font};
pub use font_metrics::{FontMetrics, extract_font_metrics};
pub use graphics_state::{GraphicsState, GraphicsStateStack, TextRenderMode};
pub use handler::ContentHandler;
pub use interpreter::{interpret, invoke};
pub use provider::{ObjectProvider, resolve};
pub use text_renderer::{apply_tj_adjustment, double_quote_show_string, quote_show_string, show_string};
pub use text_state::TextState;
pub use tokenizer::{Operand, Operator, tokenize};

//! Error types for the tokenizer and interpreter layers.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`BackendError`]
//! that wraps tokenizer/interpreter-specific errors and converts them to
//! [`PdfError`].

use pdf_text_core::PdfError;
use thiserror::Error;

/// Error type for content-stream tokenization and interpretation.
///
/// Wraps parse-layer-specific errors and provides conversion to [`PdfError`]
/// for unified error handling across the crates.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Content-stream tokenization failure.
    #[error("content stream parse error: {0}")]
    Parse(String),

    /// Error reading source data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Font subtype or encoding not handled.
    #[error("unsupported font: {0}")]
    Font(String),

    /// Form XObject recursion exceeded the configured depth limit.
    #[error("Form XObject recursion depth {depth} exceeds limit {limit}")]
    RecursionLimit {
        /// The depth at which the limit was exceeded.
        depth: usize,
        /// The configured limit.
        limit: usize,
    },

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IOError(e.to_string()),
            BackendError::Font(msg) => PdfError::UnsupportedFont(msg),
            BackendError::RecursionLimit { depth, limit } => {
                PdfError::RecursionLimit { depth, limit }
            }
            BackendError::Core(e) => e,
        }
    }
}

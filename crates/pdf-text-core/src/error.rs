//! Error and warning types for PDF text-placement extraction.
//!
//! Provides [`PdfError`] for the fatal/per-page error kinds fixed by the
//! design (`IOError`, `MalformedPDF`, `ParseError`, `UnsupportedFont`,
//! `RecursionLimit`), [`ExtractWarning`] for non-fatal issues that allow
//! best-effort continuation, and [`ExtractOptions`] for configuring
//! resource limits and warning behavior.

use std::fmt;

/// Error kinds for PDF text-placement extraction.
///
/// - `IOError`: the Object Provider's source is unreadable; fatal, extraction
///   aborts.
/// - `MalformedPDF`: a structural parser failure surfaced by the Object
///   Provider, below the content-stream interpreter; per-page recoverable.
/// - `ParseError`: content-stream tokenization failure; abort the current
///   stream, continue with the next page.
/// - `UnsupportedFont`: font subtype or encoding not handled; placements for
///   that font fall back to raw bytes decoded as Latin-1.
/// - `RecursionLimit`: Form XObject nesting exceeded the configured limit;
///   abort the current page.
/// - `ResourceLimitExceeded`: a configured ambient limit (object count,
///   stream size, page count) was exceeded.
/// - `Other`: any error not covered by the above.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Source data could not be read at all.
    IOError(String),
    /// Structural PDF failure below the content-stream interpreter.
    MalformedPDF(String),
    /// Content-stream tokenization failure.
    ParseError(String),
    /// A font's subtype or encoding is not supported.
    UnsupportedFont(String),
    /// Form XObject recursion exceeded the configured depth limit.
    RecursionLimit {
        /// The depth at which the limit was exceeded.
        depth: usize,
        /// The configured limit.
        limit: usize,
    },
    /// A configured ambient resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_stream_bytes").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The actual value that exceeded the limit.
        actual_value: usize,
    },
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::IOError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::MalformedPDF(msg) => write!(f, "malformed PDF: {msg}"),
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::UnsupportedFont(msg) => write!(f, "unsupported font: {msg}"),
            PdfError::RecursionLimit { depth, limit } => write!(
                f,
                "Form XObject recursion depth {depth} exceeds limit {limit}"
            ),
            PdfError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            PdfError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IOError(err.to_string())
    }
}

/// Machine-readable warning code for categorizing extraction issues.
///
/// Each variant corresponds to one of the "logged and skipped, never fatal"
/// categories: malformed operators, out-of-range operand counts, missing
/// fonts, unresolvable XObject names, and unknown ExtGState keys. Use
/// [`Other`](ExtractWarningCode::Other) for anything else.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractWarningCode {
    /// A referenced font was not found in page resources.
    MissingFont,
    /// An unsupported or malformed-operand content stream operator.
    UnsupportedOperator,
    /// A PDF object is malformed or has unexpected structure.
    MalformedObject,
    /// A named XObject could not be resolved.
    UnresolvableXObject,
    /// A named ExtGState key was not recognized.
    UnknownExtGStateKey,
    /// A configured resource limit was reached during extraction.
    ResourceLimitReached,
    /// Character encoding fell back to a weaker translation strategy.
    EncodingFallback,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl ExtractWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::MissingFont => "MISSING_FONT",
            ExtractWarningCode::UnsupportedOperator => "UNSUPPORTED_OPERATOR",
            ExtractWarningCode::MalformedObject => "MALFORMED_OBJECT",
            ExtractWarningCode::UnresolvableXObject => "UNRESOLVABLE_XOBJECT",
            ExtractWarningCode::UnknownExtGStateKey => "UNKNOWN_EXTGSTATE_KEY",
            ExtractWarningCode::ResourceLimitReached => "RESOURCE_LIMIT_REACHED",
            ExtractWarningCode::EncodingFallback => "ENCODING_FALLBACK",
            ExtractWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered during extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractWarning {
    /// Machine-readable warning code.
    pub code: ExtractWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Page number where the warning occurred (0-indexed), if applicable.
    pub page: Option<usize>,
    /// Element context (e.g., "char at offset 42").
    pub element: Option<String>,
    /// Index of the operator in the content stream where the warning occurred.
    pub operator_index: Option<usize>,
    /// Font name associated with the warning, if applicable.
    pub font_name: Option<String>,
}

impl ExtractWarning {
    /// Create a warning with just a description.
    pub fn new(description: impl Into<String>) -> Self {
        let desc = description.into();
        Self {
            code: ExtractWarningCode::Other(desc.clone()),
            description: desc,
            page: None,
            element: None,
            operator_index: None,
            font_name: None,
        }
    }

    /// Create a warning with a specific code and description.
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            element: None,
            operator_index: None,
            font_name: None,
        }
    }

    /// Create a warning with page context.
    pub fn on_page(description: impl Into<String>, page: usize) -> Self {
        let desc = description.into();
        Self {
            code: ExtractWarningCode::Other(desc.clone()),
            description: desc,
            page: Some(page),
            element: None,
            operator_index: None,
            font_name: None,
        }
    }

    /// Create a warning with operator and font context.
    pub fn with_operator_context(
        description: impl Into<String>,
        operator_index: usize,
        font_name: impl Into<String>,
    ) -> Self {
        let desc = description.into();
        Self {
            code: ExtractWarningCode::Other(desc.clone()),
            description: desc,
            page: None,
            element: None,
            operator_index: Some(operator_index),
            font_name: Some(font_name.into()),
        }
    }

    /// Set the page, returning the modified warning (builder pattern).
    pub fn on(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the warning code, returning the modified warning (builder pattern).
    pub fn set_code(mut self, code: ExtractWarningCode) -> Self {
        self.code = code;
        self
    }

    /// Convert this warning into a [`PdfError`], for `strict_mode` escalation.
    pub fn to_error(&self) -> PdfError {
        PdfError::Other(self.to_string())
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        if let Some(index) = self.operator_index {
            write!(f, " [operator #{index}]")?;
        }
        if let Some(ref element) = self.element {
            write!(f, " [{element}]")?;
        }
        Ok(())
    }
}

/// Options controlling extraction behavior and resource limits.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum recursion depth for nested Form XObjects.
    ///
    /// Defaults to 32, the limit recommended by the design to defeat
    /// adversarial self-referential documents while allowing legitimately
    /// deep form nesting.
    pub max_recursion_depth: usize,
    /// Maximum number of objects (placements) extracted per page.
    pub max_objects_per_page: usize,
    /// Maximum content stream bytes to process per stream.
    pub max_stream_bytes: usize,
    /// Whether to collect warnings during extraction (default: true).
    pub collect_warnings: bool,
    /// When true, any warning is escalated to an error (default: false).
    pub strict_mode: bool,
    /// Maximum number of pages to process (default: None = no limit).
    pub max_pages: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 32,
            max_objects_per_page: 100_000,
            max_stream_bytes: 100 * 1024 * 1024,
            collect_warnings: true,
            strict_mode: false,
            max_pages: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_error_io_error_creation() {
        let err = PdfError::IOError("file not found".to_string());
        assert_eq!(err.to_string(), "I/O error: file not found");
    }

    #[test]
    fn pdf_error_malformed_pdf() {
        let err = PdfError::MalformedPDF("bad xref".to_string());
        assert_eq!(err.to_string(), "malformed PDF: bad xref");
    }

    #[test]
    fn pdf_error_parse_error_creation() {
        let err = PdfError::ParseError("unterminated string".to_string());
        assert_eq!(err.to_string(), "parse error: unterminated string");
    }

    #[test]
    fn pdf_error_unsupported_font() {
        let err = PdfError::UnsupportedFont("unknown subtype".to_string());
        assert_eq!(err.to_string(), "unsupported font: unknown subtype");
    }

    #[test]
    fn pdf_error_recursion_limit() {
        let err = PdfError::RecursionLimit { depth: 33, limit: 32 };
        assert_eq!(
            err.to_string(),
            "Form XObject recursion depth 33 exceeds limit 32"
        );
    }

    #[test]
    fn pdf_error_resource_limit_exceeded() {
        let err = PdfError::ResourceLimitExceeded {
            limit_name: "max_stream_bytes".to_string(),
            limit_value: 1024,
            actual_value: 2048,
        };
        assert_eq!(
            err.to_string(),
            "resource limit exceeded: max_stream_bytes (limit: 1024, actual: 2048)"
        );
    }

    #[test]
    fn pdf_error_other() {
        let err = PdfError::Other("something went wrong".to_string());
        assert_eq!(err.to_string(), "something went wrong");
    }

    #[test]
    fn pdf_error_implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(PdfError::ParseError("test".to_string()));
        assert_eq!(err.to_string(), "parse error: test");
    }

    #[test]
    fn pdf_error_clone_and_eq() {
        let err1 = PdfError::ParseError("test".to_string());
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }

    #[test]
    fn pdf_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let pdf_err: PdfError = io_err.into();
        assert!(matches!(pdf_err, PdfError::IOError(_)));
        assert!(pdf_err.to_string().contains("missing file"));
    }

    // --- ExtractWarning tests ---

    #[test]
    fn warning_new_with_description_only() {
        let w = ExtractWarning::new("missing font metrics");
        assert_eq!(w.description, "missing font metrics");
        assert!(matches!(w.code, ExtractWarningCode::Other(_)));
        assert_eq!(w.to_string(), "[OTHER] missing font metrics");
    }

    #[test]
    fn warning_on_page() {
        let w = ExtractWarning::on_page("unknown operator", 3);
        assert_eq!(w.page, Some(3));
        assert_eq!(w.to_string(), "[OTHER] unknown operator (page 3)");
    }

    #[test]
    fn warning_with_operator_context() {
        let w = ExtractWarning::with_operator_context("font not found", 5, "Helvetica");
        assert_eq!(w.operator_index, Some(5));
        assert_eq!(w.font_name, Some("Helvetica".to_string()));
        assert_eq!(
            w.to_string(),
            "[OTHER] font not found [font Helvetica] [operator #5]"
        );
    }

    #[test]
    fn warning_with_code_and_page_builder() {
        let w = ExtractWarning::with_code(ExtractWarningCode::MissingFont, "no /F1").on(2);
        assert_eq!(w.code, ExtractWarningCode::MissingFont);
        assert_eq!(w.page, Some(2));
        assert_eq!(w.to_string(), "[MISSING_FONT] no /F1 (page 2)");
    }

    #[test]
    fn warning_code_strings() {
        assert_eq!(ExtractWarningCode::MissingFont.as_str(), "MISSING_FONT");
        assert_eq!(
            ExtractWarningCode::UnsupportedOperator.as_str(),
            "UNSUPPORTED_OPERATOR"
        );
        assert_eq!(
            ExtractWarningCode::UnresolvableXObject.as_str(),
            "UNRESOLVABLE_XOBJECT"
        );
        assert_eq!(
            ExtractWarningCode::UnknownExtGStateKey.as_str(),
            "UNKNOWN_EXTGSTATE_KEY"
        );
        assert_eq!(
            ExtractWarningCode::ResourceLimitReached.as_str(),
            "RESOURCE_LIMIT_REACHED"
        );
        assert_eq!(
            ExtractWarningCode::EncodingFallback.as_str(),
            "ENCODING_FALLBACK"
        );
        assert_eq!(ExtractWarningCode::Other("x".into()).as_str(), "OTHER");
    }

    #[test]
    fn strict_mode_converts_warning_to_error() {
        let warning = ExtractWarning::with_code(ExtractWarningCode::MissingFont, "font not found");
        let err: PdfError = warning.to_error();
        assert!(matches!(err, PdfError::Other(_)));
        assert!(err.to_string().contains("font not found"));
    }

    // --- ExtractOptions tests ---

    #[test]
    fn extract_options_default_values() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.max_recursion_depth, 32);
        assert_eq!(opts.max_objects_per_page, 100_000);
        assert_eq!(opts.max_stream_bytes, 100 * 1024 * 1024);
        assert!(opts.collect_warnings);
        assert!(!opts.strict_mode);
        assert!(opts.max_pages.is_none());
    }

    #[test]
    fn extract_options_custom_values() {
        let opts = ExtractOptions {
            max_recursion_depth: 5,
            max_objects_per_page: 50_000,
            max_stream_bytes: 10 * 1024 * 1024,
            collect_warnings: false,
            strict_mode: true,
            max_pages: Some(10),
        };
        assert_eq!(opts.max_recursion_depth, 5);
        assert!(!opts.collect_warnings);
        assert!(opts.strict_mode);
        assert_eq!(opts.max_pages, Some(10));
    }

    #[test]
    fn extract_options_clone() {
        let opts1 = ExtractOptions::default();
        let opts2 = opts1.clone();
        assert_eq!(opts2.max_recursion_depth, opts1.max_recursion_depth);
    }
}

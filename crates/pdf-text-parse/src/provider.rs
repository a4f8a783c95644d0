//! The Object Provider capability interface.
//!
//! The core never touches a concrete PDF object model (tokenizer,
//! indirect-object table, xref parser, stream decompressor) directly. It
//! consumes an [`ObjectProvider`] implementation instead — an external
//! collaborator that resolves indirect references, enumerates pages, and
//! hands back filter-decoded byte sources. An application wiring this crate
//! to a concrete library (e.g. `lopdf`) implements this trait once; the
//! interpreter, font decoder, and collector are written against the trait
//! and never against that library.

use pdf_text_core::{ObjectId, PdfDictionary, PdfObject};

/// Dereference `obj` through `provider` if it is a [`PdfObject::Reference`],
/// otherwise return a clone of `obj` itself.
///
/// Resolution failures (dangling references, I/O errors surfaced by the
/// provider) collapse to [`PdfObject::Null`] — callers treat a `Null` the
/// same way they treat an absent dictionary entry, per the "malformed
/// objects are logged and skipped" policy.
pub fn resolve<P: ObjectProvider>(provider: &P, obj: &PdfObject) -> PdfObject {
    match obj {
        PdfObject::Reference(id) => provider.resolve(*id).unwrap_or(PdfObject::Null),
        other => other.clone(),
    }
}

/// External collaborator resolving PDF objects, pages, and content streams.
///
/// The Object Provider may fail with [`pdf_text_core::PdfError::IOError`]
/// (surfaced as fatal) or [`pdf_text_core::PdfError::MalformedPDF`]
/// (per-page recoverable); `Self::Error` converts into
/// [`pdf_text_core::PdfError`] accordingly.
pub trait ObjectProvider {
    /// Opaque handle to a page, as returned by [`ObjectProvider::pages`].
    type Page;
    /// Provider-specific error type.
    type Error: std::error::Error + Into<pdf_text_core::PdfError>;

    /// Dereference an indirect reference.
    fn resolve(&self, id: ObjectId) -> Result<PdfObject, Self::Error>;

    /// Enumerate pages in document order.
    fn pages(&self) -> Result<Vec<Self::Page>, Self::Error>;

    /// The concatenated content streams for a page, with filters decoded.
    fn page_contents(&self, page: &Self::Page) -> Result<Vec<u8>, Self::Error>;

    /// The inherited Resources dictionary for a page.
    fn page_resources(&self, page: &Self::Page) -> Result<PdfDictionary, Self::Error>;

    /// Filter-decoded byte source for an XObject stream.
    fn stream_contents(&self, stream: &PdfObject) -> Result<Vec<u8>, Self::Error>;

    /// The page's MediaBox `[x1, y1, x2, y2]`.
    ///
    /// Used only to note the page extent; content is not clipped against it.
    fn page_box(&self, page: &Self::Page) -> Result<[f64; 4], Self::Error>;
}

#[cfg(test)]
pub(crate) mod mock {
    //! A minimal in-memory [`ObjectProvider`] for unit tests, following the
    //! usual `MockDocument`/`MockPage`/`MockBackend` pattern for testing a
    //! small capability trait without a real backing PDF library.

    use super::ObjectProvider;
    use pdf_text_core::{ObjectId, PdfDictionary, PdfError, PdfObject};
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    pub struct MockPage {
        pub contents: Vec<u8>,
        pub resources: PdfDictionary,
        pub media_box: [f64; 4],
    }

    #[derive(Default)]
    pub struct MockProvider {
        pub objects: HashMap<ObjectId, PdfObject>,
        pub pages: Vec<MockPage>,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_object(mut self, id: ObjectId, object: PdfObject) -> Self {
            self.objects.insert(id, object);
            self
        }

        pub fn with_page(mut self, page: MockPage) -> Self {
            self.pages.push(page);
            self
        }
    }

    impl ObjectProvider for MockProvider {
        type Page = usize;
        type Error = PdfError;

        fn resolve(&self, id: ObjectId) -> Result<PdfObject, Self::Error> {
            self.objects
                .get(&id)
                .cloned()
                .ok_or_else(|| PdfError::MalformedPDF(format!("unresolved reference {id:?}")))
        }

        fn pages(&self) -> Result<Vec<Self::Page>, Self::Error> {
            Ok((0..self.pages.len()).collect())
        }

        fn page_contents(&self, page: &Self::Page) -> Result<Vec<u8>, Self::Error> {
            Ok(self.pages[*page].contents.clone())
        }

        fn page_resources(&self, page: &Self::Page) -> Result<PdfDictionary, Self::Error> {
            Ok(self.pages[*page].resources.clone())
        }

        fn stream_contents(&self, stream: &PdfObject) -> Result<Vec<u8>, Self::Error> {
            match stream {
                PdfObject::Stream(_, bytes) => Ok(bytes.clone()),
                _ => Err(PdfError::MalformedPDF("not a stream object".to_string())),
            }
        }

        fn page_box(&self, page: &Self::Page) -> Result<[f64; 4], Self::Error> {
            Ok(self.pages[*page].media_box)
        }
    }
}

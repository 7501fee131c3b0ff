//! Reading the vendor's session PDF.

mod extractor;

pub use extractor::SessionPdf;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A loaded PDF whose text can be read.
pub trait PdfTextSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Text of all pages, in page order, as one string.
    fn extract_text(&self) -> Result<String>;
}

//! Session PDF loading with lopdf, text extraction with pdf-extract.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, trace};

use super::{PdfTextSource, Result};
use crate::error::PdfError;

/// A session PDF held in memory.
///
/// The document is parsed once on load to validate it and count pages;
/// text extraction then runs over the (decrypted) bytes.
pub struct SessionPdf {
    bytes: Vec<u8>,
    pages: usize,
}

impl SessionPdf {
    /// Read and validate a PDF file.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| PdfError::Parse(format!("{}: {}", path.display(), e)))?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(bytes)
    }

    /// Validate a PDF held in memory.
    ///
    /// Documents encrypted with an empty user password are decrypted and
    /// re-serialized; any other encryption is rejected.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mut doc = Document::load_mem(&bytes).map_err(|e| PdfError::Parse(e.to_string()))?;

        let pages = doc.get_pages().len();
        if pages == 0 {
            return Err(PdfError::NoPages);
        }

        let bytes = if doc.is_encrypted() {
            doc.decrypt("").map_err(|_| PdfError::Encrypted)?;
            trace!("Decrypted PDF with empty password");
            let mut plain = Vec::new();
            doc.save_to(&mut plain)
                .map_err(|e| PdfError::Parse(format!("re-saving decrypted PDF: {}", e)))?;
            plain
        } else {
            bytes
        };

        debug!("Loaded PDF with {} pages", pages);
        Ok(Self { bytes, pages })
    }
}

impl PdfTextSource for SessionPdf {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn extract_text(&self) -> Result<String> {
        let text = pdf_extract::extract_text_from_mem(&self.bytes)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        debug!("Extracted {} chars of text", text.len());
        Ok(text)
    }
}

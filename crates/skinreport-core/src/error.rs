//! Error types for the skinreport-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the skinreport library.
#[derive(Error, Debug)]
pub enum SkinError {
    /// The input directory does not hold enough files to build a report.
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// Report value extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Photo classification error.
    #[error("classification error: {0}")]
    Classify(#[from] ClassifyError),

    /// Report rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Image decode or encode error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SkinError {
    /// True for failures caused by the input folder or the vendor PDF
    /// contents, as opposed to I/O, decoding or rendering failures.
    pub fn is_input_error(&self) -> bool {
        matches!(self, SkinError::Precondition(_) | SkinError::Extraction(_))
    }
}

/// Errors raised before any processing starts.
#[derive(Error, Debug)]
pub enum PreconditionError {
    /// The input directory is missing or not a directory.
    #[error("input folder not found: {}", .0.display())]
    MissingInputDir(PathBuf),

    /// Not enough photos or PDF reports in the input directory.
    #[error(
        "folder does not contain at least {min_images} JPG files and one PDF file \
         (found {images} images, {pdfs} PDFs)"
    )]
    InsufficientInputs {
        images: usize,
        pdfs: usize,
        min_images: usize,
    },
}

/// Errors related to PDF loading and text extraction.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to report value extraction.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    /// A required field has no match in the report text.
    #[error("field not found: {field}")]
    NotFound { field: String },

    /// A required field matched more than once.
    #[error("ambiguous result: {count} matches for {field}")]
    Ambiguous { field: String, count: usize },
}

/// Errors related to photo classification.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The configured sample pixel lies outside the image.
    #[error("sample point ({x}, {y}) outside {width}x{height} image")]
    SampleOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Errors related to report rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A template references an asset that is not in the asset folder.
    #[error("missing asset: {}", .0.display())]
    MissingAsset(PathBuf),

    /// A template references a grid tile that was never produced.
    #[error("missing overview tile {column}_{row}")]
    MissingTile { column: u32, row: u32 },

    /// A font file could not be parsed.
    #[error("invalid font {name}: {reason}")]
    Font { name: String, reason: String },

    /// Low-level PDF writer failure.
    #[error("PDF writer: {0}")]
    Writer(#[from] lopdf::Error),

    /// The finished document could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialize(String),
}

/// Result type for the skinreport library.
pub type Result<T> = std::result::Result<T, SkinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_class() {
        let err: SkinError = ExtractionError::NotFound {
            field: "Spots".to_string(),
        }
        .into();
        assert!(err.is_input_error());

        let err: SkinError = std::io::Error::other("disk full").into();
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_extraction_messages() {
        let missing = ExtractionError::NotFound {
            field: "Pores".to_string(),
        };
        assert_eq!(missing.to_string(), "field not found: Pores");

        let ambiguous = ExtractionError::Ambiguous {
            field: "date".to_string(),
            count: 2,
        };
        assert_eq!(ambiguous.to_string(), "ambiguous result: 2 matches for date");
    }
}

//! Report value extraction module.

mod parser;
pub mod rules;

pub use parser::{normalize_text, ExtractionResult, ReportParser, SessionReportParser};

use std::path::Path;

use crate::error::ExtractionError;
use crate::models::report::ReportData;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for report value extractors.
pub trait ReportExtractor {
    /// Extract report values from plain text.
    fn extract_from_text(&self, text: &str) -> Result<ReportData>;

    /// Load a PDF and extract report values from its text.
    fn extract_from_pdf(&self, path: &Path) -> crate::Result<ReportData>;
}

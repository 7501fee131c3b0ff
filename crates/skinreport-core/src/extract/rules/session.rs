//! Session date and patient name extraction.

use super::patterns::{PATIENT_NAME, SESSION_DATE};
use super::{capture_all, ExtractionMatch, FieldExtractor};

/// Session date extractor (`session: 12/03/2024`).
#[derive(Default)]
pub struct SessionDateExtractor;

impl FieldExtractor for SessionDateExtractor {
    fn field(&self) -> &str {
        "date"
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        capture_all(&SESSION_DATE, text)
    }
}

/// Patient name extractor (`face.<name> .`).
#[derive(Default)]
pub struct PatientNameExtractor;

impl FieldExtractor for PatientNameExtractor {
    fn field(&self) -> &str {
        "name"
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        capture_all(&PATIENT_NAME, text)
    }
}

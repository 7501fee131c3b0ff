//! Rule-based field extractors for the vendor skin analysis report.

pub mod metrics;
pub mod patterns;
pub mod session;

pub use metrics::MetricExtractor;
pub use patterns::*;
pub use session::{PatientNameExtractor, SessionDateExtractor};

use crate::error::ExtractionError;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// Name of the field, used in error messages.
    fn field(&self) -> &str;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch<String>>;

    /// Extract the field, requiring exactly one occurrence.
    fn extract_single(&self, text: &str) -> Result<ExtractionMatch<String>, ExtractionError> {
        require_single(self.field(), self.extract_all(text))
    }
}

/// A matched field value with its location in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Reduce a list of matches to the single required one.
pub fn require_single<T>(
    field: &str,
    mut matches: Vec<ExtractionMatch<T>>,
) -> Result<ExtractionMatch<T>, ExtractionError> {
    match matches.len() {
        0 => Err(ExtractionError::NotFound {
            field: field.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(ExtractionError::Ambiguous {
            field: field.to_string(),
            count,
        }),
    }
}

/// Collect the first capture group of every match of `re` in `text`.
pub(crate) fn capture_all(re: &regex::Regex, text: &str) -> Vec<ExtractionMatch<String>> {
    re.captures_iter(text)
        .filter_map(|caps| {
            let full_match = caps.get(0)?;
            let value = caps.get(1)?.as_str().to_string();
            Some(
                ExtractionMatch::new(value, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            )
        })
        .collect()
}

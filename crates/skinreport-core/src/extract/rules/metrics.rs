//! Metric value extraction: `<Label> (<number>)` lines.

use super::patterns::pattern_for;
use super::{capture_all, ExtractionMatch, FieldExtractor};
use crate::models::report::Metric;

/// Extractor for one of the eight measurement labels.
pub struct MetricExtractor {
    metric: Metric,
}

impl MetricExtractor {
    pub fn new(metric: Metric) -> Self {
        Self { metric }
    }
}

impl FieldExtractor for MetricExtractor {
    fn field(&self) -> &str {
        self.metric.label()
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        capture_all(pattern_for(self.metric), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;

    #[test]
    fn test_extract_metric() {
        let extractor = MetricExtractor::new(Metric::RedAreas);
        let found = extractor.extract_single("Texture (3)\nRed Areas (17)\n").unwrap();
        assert_eq!(found.value, "17");
        assert_eq!(found.source, "Red Areas (17)");
        assert_eq!(found.position, Some((12, 26)));
    }

    #[test]
    fn test_indented_label_not_matched() {
        // The parser strips indentation before extraction; raw text does not match.
        let extractor = MetricExtractor::new(Metric::Wrinkles);
        assert!(extractor.extract_all("   Wrinkles (8)").is_empty());
    }

    #[test]
    fn test_duplicate_metric_is_ambiguous() {
        let extractor = MetricExtractor::new(Metric::Pores);
        let err = extractor.extract_single("Pores (1)\nPores (2)\n").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::Ambiguous { field: "Pores".to_string(), count: 2 }
        );
    }
}

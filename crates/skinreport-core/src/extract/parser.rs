//! Report parser combining the fixed field rules.

use std::borrow::Cow;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::models::report::{Metric, ReportData};
use crate::pdf::{PdfTextSource, SessionPdf};

use super::rules::{
    FieldExtractor, LEADING_WHITESPACE, MetricExtractor, PatientNameExtractor,
    SessionDateExtractor,
};
use super::{ReportExtractor, Result};

/// Result of report extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted report values.
    pub data: ReportData,
    /// Normalized text the values were read from.
    pub raw_text: String,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for report parsing.
pub trait ReportParser {
    /// Parse report values from extracted PDF text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Parser for the vendor's fixed report layout.
#[derive(Default)]
pub struct SessionReportParser;

impl SessionReportParser {
    pub fn new() -> Self {
        Self
    }
}

/// Strip leading whitespace from every line.
pub fn normalize_text(text: &str) -> Cow<'_, str> {
    LEADING_WHITESPACE.replace_all(text, "")
}

impl ReportParser for SessionReportParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();
        let cleaned = normalize_text(text);

        let mut values: [String; 8] = Default::default();
        for (slot, metric) in values.iter_mut().zip(Metric::ALL) {
            let found = MetricExtractor::new(metric).extract_single(&cleaned)?;
            debug!("{} = {}", metric, found.value);
            *slot = found.value;
        }

        let date = SessionDateExtractor.extract_single(&cleaned)?.value;
        let name = PatientNameExtractor.extract_single(&cleaned)?.value;
        debug!("Session {} for {}", date, name);

        Ok(ExtractionResult {
            data: ReportData::from_values(values, date, name),
            raw_text: cleaned.into_owned(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl ReportExtractor for SessionReportParser {
    fn extract_from_text(&self, text: &str) -> Result<ReportData> {
        self.parse(text).map(|result| result.data)
    }

    fn extract_from_pdf(&self, path: &Path) -> crate::Result<ReportData> {
        info!("Processing PDF: {}", path.display());
        let pdf = SessionPdf::open(path)?;
        debug!("{} has {} pages", path.display(), pdf.page_count());
        let text = pdf.extract_text()?;
        Ok(self.extract_from_text(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::models::report::Field;
    use pretty_assertions::assert_eq;

    const REPORT_TEXT: &str = "\
        VISIA Skin Analysis\n\
        Imaging session: 12/03/2024 \n\
        This report describes the condition of the face.Jane Doe .\n\
        \x20\x20Spots (12)\n\
        \x20\x20Wrinkles (5)\n\
        \tTexture (7.5)\n\
        Pores (40)\n\
        UV Spots (21)\n\
        Brown Spots (9)\n\
        Red Areas (14)\n\
        Porphyrins (3.25)\n";

    #[test]
    fn test_parse_complete_report() {
        let result = SessionReportParser::new().parse(REPORT_TEXT).unwrap();
        let data = result.data;

        assert_eq!(data.spots, "12");
        assert_eq!(data.wrinkles, "5");
        assert_eq!(data.texture, "7.5");
        assert_eq!(data.pores, "40");
        assert_eq!(data.uv_spots, "21");
        assert_eq!(data.brown_spots, "9");
        assert_eq!(data.red_areas, "14");
        assert_eq!(data.porphyrins, "3.25");
        assert_eq!(data.get(Field::Date), "12/03/2024");
        assert_eq!(data.get(Field::Name), "Jane Doe");
        assert!(result.raw_text.contains("\nSpots (12)\n"));
    }

    #[test]
    fn test_missing_metric() {
        let text = REPORT_TEXT.replace("Brown Spots (9)\n", "");
        let err = SessionReportParser::new().parse(&text).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::NotFound { field: "Brown Spots".to_string() }
        );
    }

    #[test]
    fn test_missing_session_date() {
        let text = REPORT_TEXT.replace("Imaging session: 12/03/2024 \n", "");
        let err = SessionReportParser::new().parse(&text).unwrap_err();
        assert_eq!(err, ExtractionError::NotFound { field: "date".to_string() });
    }

    #[test]
    fn test_duplicate_metric() {
        let text = format!("{}Wrinkles (6)\n", REPORT_TEXT);
        let err = SessionReportParser::new().parse(&text).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::Ambiguous { field: "Wrinkles".to_string(), count: 2 }
        );
    }

    #[test]
    fn test_duplicate_name() {
        let text = format!("{}and again the face.John Roe .\n", REPORT_TEXT);
        assert!(matches!(
            SessionReportParser::new().parse(&text),
            Err(ExtractionError::Ambiguous { count: 2, .. })
        ));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  a\n\n   b\n"), "a\nb\n");
    }
}

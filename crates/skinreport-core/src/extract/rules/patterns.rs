//! Regex patterns for the vendor skin analysis report.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::report::Metric;

lazy_static! {
    // Indentation noise left by PDF text extraction
    pub static ref LEADING_WHITESPACE: Regex = Regex::new(r"(?m)^\s+").unwrap();

    // "session: 12/03/2024 "
    pub static ref SESSION_DATE: Regex = Regex::new(r"(?m)session:\s+([\d/]+)\s+").unwrap();

    // "... of your face.Jane Doe ."
    pub static ref PATIENT_NAME: Regex = Regex::new(r"(?m)face\.(.+?)\s+\.").unwrap();

    // One line-anchored pattern per metric, in Metric::ALL order
    pub static ref METRIC_PATTERNS: Vec<(Metric, Regex)> = Metric::ALL
        .iter()
        .map(|&metric| (metric, metric_pattern(metric.label())))
        .collect();
}

/// Build the pattern for `<Label> (<number>)` at the start of a line.
pub fn metric_pattern(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?m)^{}\s*\((\d+(?:\.\d*)?)\)",
        regex::escape(label)
    ))
    .unwrap()
}

/// Look up the compiled pattern for a metric.
pub fn pattern_for(metric: Metric) -> &'static Regex {
    // The table is built in declaration order
    &METRIC_PATTERNS[metric as usize].1
}

//! Data models shared across the pipeline.

pub mod config;
pub mod report;

pub use config::SkinConfig;
pub use report::{Field, Metric, ReportData};

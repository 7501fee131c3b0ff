//! Core library for skin analysis report generation.
//!
//! This crate provides:
//! - Value extraction from vendor skin analysis PDFs
//! - Full-face photo normalization and overview grid splitting
//! - UV/standard photo classification by background colour
//! - A template-driven PDF report layout engine
//! - The pipeline tying these together for one input folder

pub mod classify;
pub mod error;
pub mod extract;
pub mod imaging;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod report;

pub use classify::{BackgroundClassifier, ClassifiedPhoto, PhotoKind};
pub use error::{Result, SkinError};
pub use extract::{ExtractionResult, ReportExtractor, ReportParser, SessionReportParser};
pub use imaging::{CropRect, GridTile, ImagePreprocessor};
pub use models::{Field, Metric, ReportData, SkinConfig};
pub use pdf::{PdfTextSource, SessionPdf};
pub use pipeline::{InputSet, OutputLayout, Pipeline, PhotoAsset, PhotoRole, RunSummary, Stage};
pub use report::{Edition, ReportRenderer};

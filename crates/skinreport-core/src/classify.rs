//! Background classification for full-face photos.
//!
//! The capture rig photographs UV shots against a dark backdrop and standard
//! shots against a light one. A single pixel on the chin rest is compared
//! against pure black and pure white; the nearer reference wins.

use std::fmt;
use std::path::PathBuf;

use image::{DynamicImage, GenericImageView, Rgb};
use serde::Serialize;
use tracing::debug;

use crate::error::ClassifyError;
use crate::models::config::ClassifyConfig;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Lighting under which a photo was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoKind {
    /// Ultraviolet capture, dark background.
    Uv,
    /// Standard capture, light background.
    Standard,
}

impl PhotoKind {
    pub fn is_uv(self) -> bool {
        self == PhotoKind::Uv
    }
}

impl fmt::Display for PhotoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoKind::Uv => f.write_str("UV photo"),
            PhotoKind::Standard => f.write_str("standard photo"),
        }
    }
}

/// A processed full-face photo and its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPhoto {
    pub path: PathBuf,
    pub kind: PhotoKind,
}

/// Euclidean distance between two colours in RGB space.
pub fn euclidean_distance(a: Rgb<u8>, b: Rgb<u8>) -> f64 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Nearest-reference classification of a single sample colour.
///
/// Ties go to [`PhotoKind::Standard`].
pub fn classify_colour(sample: Rgb<u8>) -> PhotoKind {
    let to_black = euclidean_distance(sample, BLACK);
    let to_white = euclidean_distance(sample, WHITE);

    if to_black < to_white {
        PhotoKind::Uv
    } else {
        PhotoKind::Standard
    }
}

/// Classifier sampling one fixed pixel per photo.
pub struct BackgroundClassifier {
    sample_point: (u32, u32),
}

impl BackgroundClassifier {
    /// Create a classifier sampling the capture rig's chin rest.
    pub fn new() -> Self {
        Self::from_config(&ClassifyConfig::default())
    }

    pub fn from_config(config: &ClassifyConfig) -> Self {
        Self {
            sample_point: (config.sample_x, config.sample_y),
        }
    }

    /// Set the sampled pixel.
    pub fn with_sample_point(mut self, x: u32, y: u32) -> Self {
        self.sample_point = (x, y);
        self
    }

    /// Classify a processed full-face photo.
    pub fn classify(&self, image: &DynamicImage) -> Result<PhotoKind, ClassifyError> {
        let (x, y) = self.sample_point;
        let (width, height) = image.dimensions();
        if x >= width || y >= height {
            return Err(ClassifyError::SampleOutOfBounds { x, y, width, height });
        }

        let pixel = image.get_pixel(x, y);
        let sample = Rgb([pixel[0], pixel[1], pixel[2]]);
        let kind = classify_colour(sample);

        debug!("Sample {:?} at ({}, {}) -> {}", sample.0, x, y, kind);
        Ok(kind)
    }
}

impl Default for BackgroundClassifier {
    fn default() -> Self {
        Self::new()
    }
}

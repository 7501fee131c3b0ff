//! Configuration structures for the report pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::imaging::CropRect;
use crate::report::Edition;

/// Main configuration for the skinreport pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinConfig {
    /// Input, export and asset locations.
    pub paths: PathsConfig,

    /// Photo preprocessing configuration.
    pub imaging: ImagingConfig,

    /// Photo classification configuration.
    pub classify: ClassifyConfig,

    /// Report layout configuration.
    pub report: ReportConfig,
}

/// File system locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Folder holding the vendor PDF and the photos of one session.
    pub input_dir: PathBuf,

    /// Root under which `<name>/<date>/` folders are created.
    pub export_root: PathBuf,

    /// Fonts, logo and marketing images. Defaults to `<export_root>/Assets`.
    pub asset_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            export_root: PathBuf::from("export"),
            asset_dir: None,
        }
    }
}

impl PathsConfig {
    /// Resolved asset folder.
    pub fn assets(&self) -> PathBuf {
        self.asset_dir
            .clone()
            .unwrap_or_else(|| self.export_root.join("Assets"))
    }
}

/// Photo preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagingConfig {
    /// Width every full-face photo is resized to before cropping.
    pub target_width: u32,

    /// Height every full-face photo is resized to before cropping.
    pub target_height: u32,

    /// Rectangle kept after the resize.
    pub crop: CropRect,

    /// File name fragment identifying the overview composite.
    pub overview_marker: String,

    /// JPEG quality for processed photos and grid tiles.
    pub jpeg_quality: u8,
}

impl Default for ImagingConfig {
    fn default() -> Self {
        Self {
            target_width: 2719,
            target_height: 3508,
            crop: CropRect::default(),
            overview_marker: "overview".to_string(),
            jpeg_quality: 75,
        }
    }
}

/// Photo classification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// X coordinate of the sampled pixel (the chin rest).
    pub sample_x: u32,

    /// Y coordinate of the sampled pixel.
    pub sample_y: u32,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            sample_x: 1240,
            sample_y: 3507,
        }
    }
}

/// Report layout configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Which page table to render.
    pub edition: Edition,
}

impl SkinConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_capture_rig() {
        let config = SkinConfig::default();
        assert_eq!((config.imaging.target_width, config.imaging.target_height), (2719, 3508));
        assert_eq!(config.imaging.crop, CropRect { left: 155, top: 0, right: 2564, bottom: 3508 });
        assert_eq!((config.classify.sample_x, config.classify.sample_y), (1240, 3507));
        assert_eq!(config.report.edition, Edition::Complete);
    }

    #[test]
    fn test_asset_dir_defaults_under_export_root() {
        let mut paths = PathsConfig {
            export_root: PathBuf::from("/srv/reports"),
            ..PathsConfig::default()
        };
        assert_eq!(paths.assets(), PathBuf::from("/srv/reports/Assets"));

        paths.asset_dir = Some(PathBuf::from("/opt/assets"));
        assert_eq!(paths.assets(), PathBuf::from("/opt/assets"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SkinConfig =
            serde_json::from_str(r#"{ "report": { "edition": "classic" }, "classify": { "sample_x": 10 } }"#)
                .unwrap();
        assert_eq!(config.report.edition, Edition::Classic);
        assert_eq!(config.classify.sample_x, 10);
        assert_eq!(config.classify.sample_y, 3507);
        assert_eq!(config.imaging.overview_marker, "overview");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = SkinConfig::default();
        config.imaging.jpeg_quality = 90;
        config.save(&path).unwrap();

        let loaded = SkinConfig::from_file(&path).unwrap();
        assert_eq!(loaded.imaging.jpeg_quality, 90);
    }
}

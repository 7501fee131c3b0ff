//! Read-only asset folder: fonts, logo and marketing images.

use std::path::{Path, PathBuf};

use crate::error::RenderError;

use super::style::FontFace;
use super::Edition;

/// Locates files in the asset folder.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    root: PathBuf,
}

impl AssetLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a named asset image, which must exist.
    pub fn image(&self, name: &str) -> Result<PathBuf, RenderError> {
        let path = self.root.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(RenderError::MissingAsset(path))
        }
    }

    /// Expected location of a font face; may not exist.
    pub fn font_path(&self, face: FontFace) -> PathBuf {
        self.root.join(face.file_name())
    }

    /// Images `edition` needs that are absent from the folder.
    pub fn missing_images(&self, edition: Edition) -> Vec<PathBuf> {
        edition
            .required_assets()
            .iter()
            .map(|name| self.root.join(name))
            .filter(|path| !path.is_file())
            .collect()
    }

    /// Font faces without a TrueType file in the folder.
    pub fn missing_fonts(&self) -> Vec<FontFace> {
        FontFace::ALL
            .into_iter()
            .filter(|&face| !self.font_path(face).is_file())
            .collect()
    }
}

//! Image preprocessing for report photos.

use std::io::Write;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::{debug, trace};

use super::{tile_file_name, CropRect};
use crate::models::config::ImagingConfig;

/// Columns of the overview composite.
pub const GRID_COLUMNS: u32 = 4;
/// Rows of the overview composite.
pub const GRID_ROWS: u32 = 2;

/// One cell of a split overview composite.
#[derive(Debug, Clone)]
pub struct GridTile {
    pub column: u32,
    pub row: u32,
    pub image: DynamicImage,
}

impl GridTile {
    pub fn file_name(&self) -> String {
        tile_file_name(self.column, self.row)
    }
}

/// Image preprocessor for full-face and overview photos.
pub struct ImagePreprocessor {
    /// Exact size every full-face photo is resized to.
    target_size: (u32, u32),
    /// Region kept after the resize.
    crop: CropRect,
    /// JPEG quality used when saving.
    jpeg_quality: u8,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with the capture rig defaults.
    pub fn new() -> Self {
        Self::from_config(&ImagingConfig::default())
    }

    /// Create a preprocessor from configuration.
    pub fn from_config(config: &ImagingConfig) -> Self {
        Self {
            target_size: (config.target_width, config.target_height),
            crop: config.crop,
            jpeg_quality: config.jpeg_quality,
        }
    }

    /// Set the resize target.
    pub fn with_target_size(mut self, width: u32, height: u32) -> Self {
        self.target_size = (width, height);
        self
    }

    /// Set the crop rectangle.
    pub fn with_crop(mut self, crop: CropRect) -> Self {
        self.crop = crop;
        self
    }

    /// Resize to the exact target size, then crop to the fixed rectangle.
    pub fn resize_and_crop(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = self.target_size;
        debug!(
            "Resizing {}x{} -> {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );

        let resized = image.resize_exact(width, height, FilterType::CatmullRom);
        let rect = self.crop.clamp_to(resized.width(), resized.height());
        trace!("Cropping to {:?}", rect);

        resized.crop_imm(rect.left, rect.top, rect.width(), rect.height())
    }

    /// Split an overview composite into a 4x2 grid.
    ///
    /// Cells are `width / 4` by `height / 2` pixels; remainder pixels on the
    /// right and bottom edges are dropped. Tiles are returned column by
    /// column: (0,0), (0,1), (1,0), (1,1), ...
    pub fn split_grid(&self, image: &DynamicImage) -> Vec<GridTile> {
        let (width, height) = image.dimensions();
        let cell_width = width / GRID_COLUMNS;
        let cell_height = height / GRID_ROWS;
        debug!(
            "Splitting {}x{} overview into {}x{} cells",
            width, height, cell_width, cell_height
        );

        let mut tiles = Vec::with_capacity((GRID_COLUMNS * GRID_ROWS) as usize);
        for column in 0..GRID_COLUMNS {
            for row in 0..GRID_ROWS {
                let tile = image.crop_imm(
                    column * cell_width,
                    row * cell_height,
                    cell_width,
                    cell_height,
                );
                tiles.push(GridTile { column, row, image: tile });
            }
        }
        tiles
    }

    /// Load, resize and crop a full-face photo, writing it as JPEG.
    pub fn process_photo(&self, input: &Path, output: &Path) -> crate::Result<DynamicImage> {
        let image = image::open(input)?;
        let processed = self.resize_and_crop(&image);
        self.save_jpeg(&processed, output)?;
        debug!("Resized image {} -> {}", input.display(), output.display());
        Ok(processed)
    }

    /// Load an overview composite and write its tiles into `output_dir`.
    pub fn process_overview(&self, input: &Path, output_dir: &Path) -> crate::Result<Vec<GridTile>> {
        let image = image::open(input)?;
        let tiles = self.split_grid(&image);
        for tile in &tiles {
            self.save_jpeg(&tile.image, &output_dir.join(tile.file_name()))?;
        }
        debug!("Split overview {} into {} tiles", input.display(), tiles.len());
        Ok(tiles)
    }

    /// Save an image as baseline RGB JPEG, overwriting any existing file.
    pub fn save_jpeg(&self, image: &DynamicImage, path: &Path) -> crate::Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        let encoder = JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality);
        DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use pretty_assertions::assert_eq;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 0])
        }))
    }

    #[test]
    fn test_split_grid_drops_remainder() {
        let preprocessor = ImagePreprocessor::new();
        let image = gradient(103, 51);
        let tiles = preprocessor.split_grid(&image);

        assert_eq!(tiles.len(), 8);
        let covered: u32 = tiles.iter().map(|t| t.image.width() * t.image.height()).sum();
        assert_eq!(covered, (103 - 103 % 4) * (51 - 51 % 2));
        assert!(tiles.iter().all(|t| t.image.dimensions() == (25, 25)));
    }

    #[test]
    fn test_split_grid_order_and_origin() {
        let preprocessor = ImagePreprocessor::new();
        let image = gradient(80, 40);
        let tiles = preprocessor.split_grid(&image);

        let order: Vec<(u32, u32)> = tiles.iter().map(|t| (t.column, t.row)).collect();
        assert_eq!(
            order,
            vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1), (3, 0), (3, 1)]
        );

        // Tile (2,1) starts at x=40, y=20 of the source
        let tile = &tiles[5];
        assert_eq!(&tile.image.get_pixel(0, 0).0[..2], &[40u8, 20]);
        assert_eq!(tile.file_name(), "overview_2_1.jpg");
    }

    #[test]
    fn test_resize_and_crop_custom_geometry() {
        let preprocessor = ImagePreprocessor::new()
            .with_target_size(100, 60)
            .with_crop(CropRect { left: 10, top: 5, right: 90, bottom: 60 });
        let processed = preprocessor.resize_and_crop(&gradient(300, 200));
        assert_eq!(processed.dimensions(), (80, 55));
    }

    #[test]
    fn test_process_overview_writes_tiles() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("face_overview.png");
        gradient(64, 32).save(&input).unwrap();

        let tiles = ImagePreprocessor::new()
            .process_overview(&input, dir.path())
            .unwrap();
        assert_eq!(tiles.len(), 8);
        for column in 0..GRID_COLUMNS {
            for row in 0..GRID_ROWS {
                assert!(dir.path().join(tile_file_name(column, row)).exists());
            }
        }
    }

    #[test]
    fn test_process_photo_rejects_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.jpg");
        std::fs::write(&input, b"definitely not a jpeg").unwrap();

        let result = ImagePreprocessor::new().process_photo(&input, &dir.path().join("out.jpg"));
        assert!(matches!(result, Err(crate::SkinError::Image(_))));
    }

    #[test]
    fn test_default_geometry_and_sample_point() {
        use crate::classify::{BackgroundClassifier, PhotoKind};

        let preprocessor = ImagePreprocessor::new();
        let classifier = BackgroundClassifier::new();

        for (background, expected) in [([12u8, 10, 14], PhotoKind::Uv), ([235, 236, 240], PhotoKind::Standard)] {
            let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 52, Rgb(background)));
            let processed = preprocessor.resize_and_crop(&source);
            assert_eq!(processed.dimensions(), (2409, 3508));
            assert_eq!(classifier.classify(&processed).unwrap(), expected);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_save_jpeg_reports_full_disk() {
        let image = gradient(16, 16);
        let result = ImagePreprocessor::new().save_jpeg(&image, Path::new("/dev/full"));
        assert!(matches!(
            result,
            Err(crate::SkinError::Io(_) | crate::SkinError::Image(_))
        ));
    }
}

//! Photo preprocessing: full-face normalization and overview splitting.

mod preprocessing;

pub use preprocessing::{GridTile, ImagePreprocessor, GRID_COLUMNS, GRID_ROWS};

use serde::{Deserialize, Serialize};

/// Pixel rectangle given by its edges, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Intersect with an image of the given size.
    pub fn clamp_to(&self, width: u32, height: u32) -> CropRect {
        let left = self.left.min(width);
        let top = self.top.min(height);
        CropRect {
            left,
            top,
            right: self.right.clamp(left, width),
            bottom: self.bottom.clamp(top, height),
        }
    }
}

impl Default for CropRect {
    // Removes the side margins the resize to 2719x3508 introduces.
    fn default() -> Self {
        Self {
            left: 155,
            top: 0,
            right: 2564,
            bottom: 3508,
        }
    }
}

/// File name of a processed full-face photo (1-based index).
pub fn photo_file_name(index: usize) -> String {
    format!("Image_{}.jpg", index)
}

/// File name of an overview grid tile.
pub fn tile_file_name(column: u32, row: u32) -> String {
    format!("overview_{}_{}.jpg", column, row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_rect_size() {
        let rect = CropRect::default();
        assert_eq!((rect.width(), rect.height()), (2409, 3508));
    }

    #[test]
    fn test_clamp_to_smaller_image() {
        let rect = CropRect::default().clamp_to(1000, 500);
        assert_eq!(rect, CropRect { left: 155, top: 0, right: 1000, bottom: 500 });

        let rect = CropRect::default().clamp_to(100, 100);
        assert_eq!((rect.width(), rect.height()), (0, 100));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(photo_file_name(3), "Image_3.jpg");
        assert_eq!(tile_file_name(2, 1), "overview_2_1.jpg");
    }
}

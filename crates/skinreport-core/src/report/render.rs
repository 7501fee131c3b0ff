//! Report renderer: lays out photo and content pages on a [`PdfCanvas`].

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::{ClassifiedPhoto, PhotoKind};
use crate::error::RenderError;
use crate::imaging::tile_file_name;
use crate::models::report::ReportData;

use super::assets::AssetLibrary;
use super::canvas::PdfCanvas;
use super::edition::PageCounter;
use super::style::StyleSheet;
use super::template::{DrawCommand, ImageSource, PageTemplate};
use super::Edition;

/// Page counts of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub photo_pages: usize,
    pub uv_pages: usize,
    pub content_pages: usize,
}

impl RenderSummary {
    pub fn total_pages(&self) -> usize {
        self.photo_pages + self.content_pages
    }
}

/// Renders one edition of the report.
pub struct ReportRenderer {
    edition: Edition,
    styles: StyleSheet,
    assets: AssetLibrary,
}

impl ReportRenderer {
    pub fn new(edition: Edition, assets: AssetLibrary) -> Self {
        Self {
            edition,
            styles: StyleSheet::for_edition(edition),
            assets,
        }
    }

    /// Every page in print order: one per photo, then the numbered content
    /// pages with header and footer.
    pub fn layout(&self, photos: &[ClassifiedPhoto]) -> Vec<PageTemplate> {
        let mut pages: Vec<PageTemplate> = photos
            .iter()
            .map(|photo| self.edition.photo_page(&photo.path, photo.kind))
            .collect();

        let mut counter = PageCounter::new();
        for content in self.edition.content_pages() {
            let number = counter.advance();
            pages.push(self.edition.header_footer(number).extend(content));
        }
        pages
    }

    /// Render the report to `output`, reading grid tiles from `tiles_dir`.
    pub fn render(
        &self,
        data: &ReportData,
        photos: &[ClassifiedPhoto],
        tiles_dir: &Path,
        output: &Path,
    ) -> crate::Result<RenderSummary> {
        self.check_assets()?;

        let pages = self.layout(photos);
        let mut canvas = PdfCanvas::new(self.assets.clone());

        for (index, page) in pages.iter().enumerate() {
            canvas.begin_page()?;
            self.draw(&mut canvas, page, data, tiles_dir)?;
            debug!("Laid out page {} ({} commands)", index + 1, page.commands.len());
        }
        canvas.save(output)?;

        let summary = RenderSummary {
            photo_pages: photos.len(),
            uv_pages: photos.iter().filter(|p| p.kind == PhotoKind::Uv).count(),
            content_pages: pages.len() - photos.len(),
        };
        info!(
            "Rendered {} report: {} pages ({} photo, {} content)",
            self.edition,
            summary.total_pages(),
            summary.photo_pages,
            summary.content_pages
        );
        Ok(summary)
    }

    /// Fail before any page is drawn if a branding image is absent.
    fn check_assets(&self) -> Result<(), RenderError> {
        let missing = self.assets.missing_images(self.edition);
        for path in &missing {
            warn!("Missing asset {}", path.display());
        }
        match missing.into_iter().next() {
            Some(path) => Err(RenderError::MissingAsset(path)),
            None => Ok(()),
        }
    }

    fn draw(
        &self,
        canvas: &mut PdfCanvas,
        page: &PageTemplate,
        data: &ReportData,
        tiles_dir: &Path,
    ) -> crate::Result<()> {
        for command in &page.commands {
            match command {
                DrawCommand::Text { x, y, text, style } => {
                    canvas.draw_text(*x, *y, &text.resolve(data), self.styles.get(*style))?;
                }
                DrawCommand::Paragraph {
                    x,
                    y,
                    width,
                    height,
                    text,
                    style,
                } => {
                    canvas.draw_paragraph(
                        (*x, *y, *width, *height),
                        &text.resolve(data),
                        self.styles.get(*style),
                    )?;
                }
                DrawCommand::Image {
                    x,
                    y,
                    width,
                    height,
                    source,
                } => {
                    let path = self.image_path(source, tiles_dir)?;
                    canvas.draw_image((*x, *y, *width, *height), &path)?;
                }
                DrawCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                    color,
                    opacity,
                } => canvas.draw_rect((*x, *y, *width, *height), *color, *opacity),
                DrawCommand::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    width,
                    color,
                } => canvas.draw_line((*x1, *y1), (*x2, *y2), *width, *color),
            }
        }
        Ok(())
    }

    fn image_path(&self, source: &ImageSource, tiles_dir: &Path) -> crate::Result<PathBuf> {
        match source {
            ImageSource::Photo(path) => Ok(path.clone()),
            ImageSource::Tile { column, row } => {
                let path = tiles_dir.join(tile_file_name(*column, *row));
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(RenderError::MissingTile {
                        column: *column,
                        row: *row,
                    }
                    .into())
                }
            }
            ImageSource::Asset(name) => Ok(self.assets.image(name)?),
        }
    }
}

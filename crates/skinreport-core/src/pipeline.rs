//! End-to-end run: scan the input folder, extract values, prepare photos and
//! render the report.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::{BackgroundClassifier, ClassifiedPhoto, PhotoKind};
use crate::error::PreconditionError;
use crate::extract::{ReportExtractor, SessionReportParser};
use crate::imaging::{photo_file_name, ImagePreprocessor};
use crate::models::config::SkinConfig;
use crate::models::report::ReportData;
use crate::report::{AssetLibrary, Edition, RenderSummary, ReportRenderer};

/// Minimum number of images (full-face plus overview) in the input folder.
pub const MIN_IMAGES: usize = 2;

/// What an input image is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoRole {
    /// Single capture, resized and cropped into a photo page.
    FullFace,
    /// 4x2 composite, split into grid tiles.
    Overview,
}

/// An input image and its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoAsset {
    pub path: PathBuf,
    pub role: PhotoRole,
}

impl PhotoAsset {
    /// Assign the role from the file name: names containing `overview_marker`
    /// are overview composites.
    pub fn from_path(path: PathBuf, overview_marker: &str) -> Self {
        let is_overview = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.contains(overview_marker));
        let role = if is_overview {
            PhotoRole::Overview
        } else {
            PhotoRole::FullFace
        };
        Self { path, role }
    }
}

/// Files found at the top level of an input folder.
#[derive(Debug, Clone, Default)]
pub struct InputSet {
    /// JPEG files, sorted by file name.
    pub images: Vec<PathBuf>,
    /// PDF files, sorted by file name.
    pub pdfs: Vec<PathBuf>,
}

impl InputSet {
    /// Scan `dir` (not recursively) and check that it holds enough inputs.
    pub fn scan(dir: &Path) -> crate::Result<Self> {
        if !dir.is_dir() {
            return Err(PreconditionError::MissingInputDir(dir.to_path_buf()).into());
        }

        let mut inputs = InputSet::default();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase());
            match extension.as_deref() {
                Some("jpg" | "jpeg") => inputs.images.push(path),
                Some("pdf") => inputs.pdfs.push(path),
                _ => debug!("Ignoring {}", path.display()),
            }
        }
        inputs.images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        inputs.pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        if inputs.images.len() < MIN_IMAGES || inputs.pdfs.is_empty() {
            return Err(PreconditionError::InsufficientInputs {
                images: inputs.images.len(),
                pdfs: inputs.pdfs.len(),
                min_images: MIN_IMAGES,
            }
            .into());
        }

        debug!(
            "Found {} images and {} PDFs in {}",
            inputs.images.len(),
            inputs.pdfs.len(),
            dir.display()
        );
        Ok(inputs)
    }

    /// Images with their roles, in discovery order.
    pub fn photos(&self, overview_marker: &str) -> Vec<PhotoAsset> {
        self.images
            .iter()
            .map(|path| PhotoAsset::from_path(path.clone(), overview_marker))
            .collect()
    }
}

/// Replace `/` and spaces so a value can be used as a folder name.
pub fn sanitize_component(value: &str) -> String {
    value.replace(['/', ' '], "_")
}

/// Output locations for one patient session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// `<export_root>/<name>/<date>`
    pub session_dir: PathBuf,
    /// Processed photos and grid tiles.
    pub files_dir: PathBuf,
    /// The generated report PDF.
    pub report_path: PathBuf,
}

impl OutputLayout {
    pub fn new(export_root: &Path, data: &ReportData) -> Self {
        let name = sanitize_component(&data.name);
        let session_dir = export_root.join(&name).join(sanitize_component(&data.date));
        Self {
            files_dir: session_dir.join("files"),
            report_path: session_dir.join(format!("{}_Report.pdf", name)),
            session_dir,
        }
    }

    /// Create the session and files folders if they do not exist yet.
    pub fn create(&self) -> std::io::Result<()> {
        if self.files_dir.is_dir() {
            debug!("Folder {} already exists", self.files_dir.display());
        } else {
            fs::create_dir_all(&self.files_dir)?;
            info!("Created folder {}", self.files_dir.display());
        }
        Ok(())
    }
}

/// Processed photos ready for layout.
#[derive(Debug, Clone, Default)]
pub struct PreparedPhotos {
    /// Full-face photos in discovery order.
    pub photos: Vec<ClassifiedPhoto>,
    /// Grid tiles written.
    pub tiles: usize,
}

/// Outcome of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub report_path: PathBuf,
    pub edition: Edition,
    pub data: ReportData,
    pub photo_pages: usize,
    pub uv_photos: usize,
    pub content_pages: usize,
    pub tiles: usize,
}

/// Steps of a run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scan,
    Extract,
    PreparePhotos,
    Render,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Scan => "Scanning input folder",
            Stage::Extract => "Extracting values",
            Stage::PreparePhotos => "Preparing photos",
            Stage::Render => "Rendering report",
        })
    }
}

/// Report generation for one input folder.
pub struct Pipeline {
    config: SkinConfig,
    extractor: SessionReportParser,
    preprocessor: ImagePreprocessor,
    classifier: BackgroundClassifier,
}

impl Pipeline {
    pub fn new(config: SkinConfig) -> Self {
        Self {
            extractor: SessionReportParser::new(),
            preprocessor: ImagePreprocessor::from_config(&config.imaging),
            classifier: BackgroundClassifier::from_config(&config.classify),
            config,
        }
    }

    pub fn config(&self) -> &SkinConfig {
        &self.config
    }

    /// Run every stage against the configured folders.
    pub fn run(&self) -> crate::Result<RunSummary> {
        self.run_with(|_| {})
    }

    /// Like [`Pipeline::run`], calling `on_stage` as each stage starts.
    pub fn run_with(&self, mut on_stage: impl FnMut(Stage)) -> crate::Result<RunSummary> {
        on_stage(Stage::Scan);
        let inputs = InputSet::scan(&self.config.paths.input_dir)?;

        on_stage(Stage::Extract);
        let data = self.extract(&inputs)?;

        let layout = OutputLayout::new(&self.config.paths.export_root, &data);
        layout.create()?;

        on_stage(Stage::PreparePhotos);
        let prepared = self.prepare_photos(&inputs, &layout)?;

        on_stage(Stage::Render);
        let rendered = self.render(&data, &prepared, &layout)?;

        Ok(RunSummary {
            report_path: layout.report_path,
            edition: self.config.report.edition,
            data,
            photo_pages: rendered.photo_pages,
            uv_photos: rendered.uv_pages,
            content_pages: rendered.content_pages,
            tiles: prepared.tiles,
        })
    }

    /// Extract values from every PDF; the last one wins.
    pub fn extract(&self, inputs: &InputSet) -> crate::Result<ReportData> {
        if inputs.pdfs.len() > 1 {
            warn!(
                "Found {} PDF reports, using values from the last one ({})",
                inputs.pdfs.len(),
                inputs.pdfs[inputs.pdfs.len() - 1].display()
            );
        }

        let mut data = None;
        for pdf in &inputs.pdfs {
            data = Some(self.extractor.extract_from_pdf(pdf)?);
        }
        // scan() guarantees at least one PDF
        data.ok_or_else(|| {
            PreconditionError::InsufficientInputs {
                images: inputs.images.len(),
                pdfs: 0,
                min_images: MIN_IMAGES,
            }
            .into()
        })
    }

    /// Split overview composites and resize, crop and classify full-face
    /// photos into `layout.files_dir`.
    pub fn prepare_photos(&self, inputs: &InputSet, layout: &OutputLayout) -> crate::Result<PreparedPhotos> {
        let mut prepared = PreparedPhotos::default();
        let mut overviews = 0;

        for asset in inputs.photos(&self.config.imaging.overview_marker) {
            match asset.role {
                PhotoRole::Overview => {
                    overviews += 1;
                    if overviews > 1 {
                        warn!("Multiple overview images, {} replaces earlier tiles", asset.path.display());
                    }
                    let tiles = self.preprocessor.process_overview(&asset.path, &layout.files_dir)?;
                    prepared.tiles = tiles.len();
                }
                PhotoRole::FullFace => {
                    let output = layout.files_dir.join(photo_file_name(prepared.photos.len() + 1));
                    let processed = self.preprocessor.process_photo(&asset.path, &output)?;
                    let kind = self.classifier.classify(&processed)?;
                    info!("Resized image {} ({})", asset.path.display(), kind);
                    prepared.photos.push(ClassifiedPhoto { path: output, kind });
                }
            }
        }

        if overviews == 0 {
            warn!("No image name contains '{}'", self.config.imaging.overview_marker);
        }
        debug!(
            "{} photos prepared, {} UV",
            prepared.photos.len(),
            prepared.photos.iter().filter(|p| p.kind == PhotoKind::Uv).count()
        );
        Ok(prepared)
    }

    /// Render the configured edition to `layout.report_path`.
    pub fn render(&self, data: &ReportData, prepared: &PreparedPhotos, layout: &OutputLayout) -> crate::Result<RenderSummary> {
        let assets = AssetLibrary::new(self.config.paths.assets());
        for missing in assets.missing_fonts() {
            debug!("No TrueType file for {}", missing.postscript_name());
        }

        ReportRenderer::new(self.config.report.edition, assets).render(
            data,
            &prepared.photos,
            &layout.files_dir,
            &layout.report_path,
        )
    }
}

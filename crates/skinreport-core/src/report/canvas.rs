//! Minimal PDF canvas on top of lopdf.
//!
//! Coordinates passed in are millimetres from the bottom-left page corner.
//! Output carries no timestamps or document IDs, so identical drawing calls
//! produce identical bytes.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::{debug, trace};

use crate::error::RenderError;

use super::assets::AssetLibrary;
use super::font::{encode_win_ansi, LoadedFont};
use super::style::{Color, FontFace, TextStyle};

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;
/// A4 width in points.
pub const A4_WIDTH_PT: f32 = 595.2756;
/// A4 height in points.
pub const A4_HEIGHT_PT: f32 = 841.8898;

pub fn mm(value: f32) -> f32 {
    value * PT_PER_MM
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

/// Greedy word wrap: break before the first word that would overflow
/// `max_width`. A single word wider than the line gets a line of its own.
pub fn wrap_words(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Resources and operations of the page being drawn.
#[derive(Default)]
struct PageState {
    operations: Vec<Operation>,
    fonts: BTreeMap<String, ObjectId>,
    images: BTreeMap<String, ObjectId>,
    graphics_states: BTreeMap<String, ObjectId>,
}

/// A4 PDF document built page by page.
pub struct PdfCanvas {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    assets: AssetLibrary,
    fonts: BTreeMap<FontFace, LoadedFont>,
    images: HashMap<PathBuf, (String, ObjectId)>,
    opacity_states: BTreeMap<u32, (String, ObjectId)>,
    page: Option<PageState>,
}

impl PdfCanvas {
    /// Create an empty document; fonts are looked up in `assets`.
    pub fn new(assets: AssetLibrary) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            assets,
            fonts: BTreeMap::new(),
            images: HashMap::new(),
            opacity_states: BTreeMap::new(),
            page: None,
        }
    }

    /// Finished pages plus the open one, if any.
    pub fn page_count(&self) -> usize {
        self.page_ids.len() + usize::from(self.page.is_some())
    }

    /// Close the current page (if any) and open a blank one.
    pub fn begin_page(&mut self) -> crate::Result<()> {
        self.end_page()?;
        self.page = Some(PageState::default());
        Ok(())
    }

    /// Close the current page. Does nothing when no page is open.
    pub fn end_page(&mut self) -> crate::Result<()> {
        let Some(page) = self.page.take() else {
            return Ok(());
        };

        let content = Content {
            operations: page.operations,
        }
        .encode()
        .map_err(RenderError::from)?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

        let mut resources = Dictionary::new();
        for (key, entries) in [
            ("Font", page.fonts),
            ("XObject", page.images),
            ("ExtGState", page.graphics_states),
        ] {
            if entries.is_empty() {
                continue;
            }
            let mut dict = Dictionary::new();
            for (resource, id) in entries {
                dict.set(resource, id);
            }
            resources.set(key, dict);
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), real(A4_WIDTH_PT), real(A4_HEIGHT_PT)],
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
        trace!("Finished page {}", self.page_ids.len());
        Ok(())
    }

    fn load_font(&mut self, face: FontFace) -> crate::Result<()> {
        if !self.fonts.contains_key(&face) {
            let resource = format!("F{}", self.fonts.len() + 1);
            let font = LoadedFont::register(&mut self.doc, face, &self.assets.font_path(face), resource)?;
            self.fonts.insert(face, font);
        }
        Ok(())
    }

    fn load_image(&mut self, path: &Path) -> crate::Result<(String, ObjectId)> {
        if let Some(image) = self.images.get(path) {
            return Ok(image.clone());
        }
        if !path.is_file() {
            return Err(RenderError::MissingAsset(path.to_path_buf()).into());
        }

        let id = self.doc.add_object(image_stream(path)?);
        let image = (format!("Im{}", self.images.len() + 1), id);
        self.images.insert(path.to_path_buf(), image.clone());
        Ok(image)
    }

    fn fill_alpha_state(&mut self, opacity: f32) -> (String, ObjectId) {
        let opacity = opacity.clamp(0.0, 1.0);
        let key = (opacity * 1000.0).round() as u32;
        if let Some(state) = self.opacity_states.get(&key) {
            return state.clone();
        }

        let id = self.doc.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => real(opacity),
        });
        let state = (format!("GS{}", self.opacity_states.len() + 1), id);
        self.opacity_states.insert(key, state.clone());
        state
    }

    /// Draw one line of text with its baseline at (`x`, `y`).
    pub fn draw_text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle) -> crate::Result<()> {
        self.load_font(style.face)?;
        let font = &self.fonts[&style.face];
        let page = self.page.get_or_insert_with(PageState::default);

        page.fonts.insert(font.resource.clone(), font.id);
        page.operations
            .extend(text_operations(font, style, mm(x), mm(y), encode_win_ansi(text)));
        Ok(())
    }

    /// Word-wrap `text` to `width` and draw it with the block's bottom edge
    /// at `y`. Returns the number of lines drawn.
    pub fn draw_paragraph(
        &mut self,
        (x, y, width, height): (f32, f32, f32, f32),
        text: &str,
        style: &TextStyle,
    ) -> crate::Result<usize> {
        self.load_font(style.face)?;
        let font = &self.fonts[&style.face];

        let lines = wrap_words(text, mm(width), |line| {
            font.text_width(&encode_win_ansi(line), style.size, style.char_spacing)
        });
        let block_height = lines.len() as f32 * style.leading;
        if block_height > mm(height) {
            debug!(
                "Paragraph at ({}, {}) needs {:.1}pt, box is {:.1}pt",
                x,
                y,
                block_height,
                mm(height)
            );
        }

        let page = self.page.get_or_insert_with(PageState::default);
        page.fonts.insert(font.resource.clone(), font.id);
        for (index, line) in lines.iter().enumerate() {
            let baseline = mm(y) + block_height - style.size - index as f32 * style.leading;
            page.operations
                .extend(text_operations(font, style, mm(x), baseline, encode_win_ansi(line)));
        }
        Ok(lines.len())
    }

    /// Draw an image file scaled into the given box.
    pub fn draw_image(&mut self, (x, y, width, height): (f32, f32, f32, f32), path: &Path) -> crate::Result<()> {
        let (resource, id) = self.load_image(path)?;
        let page = self.page.get_or_insert_with(PageState::default);

        page.images.insert(resource.clone(), id);
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(mm(width)),
                    real(0.0),
                    real(0.0),
                    real(mm(height)),
                    real(mm(x)),
                    real(mm(y)),
                ],
            ),
            Operation::new("Do", vec![name(&resource)]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    /// Fill a rectangle, optionally translucent.
    ///
    /// A translucent fill alpha stays in effect for everything filled later
    /// on the same page, text included.
    pub fn draw_rect(&mut self, (x, y, width, height): (f32, f32, f32, f32), color: Color, opacity: f32) {
        let state = (opacity < 1.0).then(|| self.fill_alpha_state(opacity));
        let page = self.page.get_or_insert_with(PageState::default);

        if let Some((resource, id)) = state {
            page.graphics_states.insert(resource.clone(), id);
            page.operations.push(Operation::new("gs", vec![name(&resource)]));
        }
        page.operations.push(Operation::new("q", vec![]));
        page.operations.extend([
            Operation::new("rg", vec![real(color.r), real(color.g), real(color.b)]),
            Operation::new(
                "re",
                vec![real(mm(x)), real(mm(y)), real(mm(width)), real(mm(height))],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Stroke a straight line; `width` is in points.
    pub fn draw_line(&mut self, (x1, y1): (f32, f32), (x2, y2): (f32, f32), width: f32, color: Color) {
        let page = self.page.get_or_insert_with(PageState::default);
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("w", vec![real(width)]),
            Operation::new("RG", vec![real(color.r), real(color.g), real(color.b)]),
            Operation::new("m", vec![real(mm(x1)), real(mm(y1))]),
            Operation::new("l", vec![real(mm(x2)), real(mm(y2))]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Close the last page and write the document, replacing `path`.
    pub fn save(mut self, path: &Path) -> crate::Result<()> {
        self.end_page()?;

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| Object::Reference(id)).collect();
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.page_ids.len() as i64,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| RenderError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &buffer)?;
        debug!(
            "Wrote {} pages ({} bytes) to {}",
            self.page_ids.len(),
            buffer.len(),
            path.display()
        );
        Ok(())
    }
}

fn text_operations(font: &LoadedFont, style: &TextStyle, x: f32, y: f32, encoded: Vec<u8>) -> Vec<Operation> {
    let color = style.color;
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![name(&font.resource), real(style.size)]),
        Operation::new("Tc", vec![real(style.char_spacing)]),
        Operation::new("rg", vec![real(color.r), real(color.g), real(color.b)]),
        Operation::new("Td", vec![real(x), real(y)]),
        Operation::new("Tj", vec![Object::String(encoded, StringFormat::Literal)]),
        Operation::new("ET", vec![]),
    ]
}

/// Image XObject for `path`. Baseline JPEGs are embedded as-is; anything
/// else is decoded and stored as raw RGB.
fn image_stream(path: &Path) -> crate::Result<Stream> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;

    if reader.format() == Some(ImageFormat::Jpeg) {
        let decoder = reader.into_decoder()?;
        let (width, height) = decoder.dimensions();
        let color_space = match decoder.color_type() {
            ColorType::L8 => Some("DeviceGray"),
            ColorType::Rgb8 => Some("DeviceRGB"),
            _ => None,
        };

        if let Some(color_space) = color_space {
            trace!("Embedding JPEG {} ({}x{})", path.display(), width, height);
            let mut stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => color_space,
                    "BitsPerComponent" => 8_i64,
                    "Filter" => "DCTDecode",
                },
                std::fs::read(path)?,
            );
            stream.allows_compression = false;
            return Ok(stream);
        }
    }

    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    trace!("Embedding {} as raw RGB ({}x{})", path.display(), width, height);
    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        },
        rgb.into_raw(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::style::StyleSheet;
    use crate::report::style::StyleName;
    use image::{Rgb, RgbImage};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wrap_words() {
        // One unit per character, spaces included
        let measure = |line: &str| line.len() as f32;
        assert_eq!(
            wrap_words("the quick brown fox jumps", 10.0, measure),
            vec!["the quick", "brown fox", "jumps"]
        );
        assert_eq!(wrap_words("extraordinarily long", 5.0, measure), vec!["extraordinarily", "long"]);
        assert!(wrap_words("   ", 10.0, measure).is_empty());
    }

    #[test]
    fn test_mm_conversion() {
        assert!((mm(210.0) - A4_WIDTH_PT).abs() < 0.01);
        assert!((mm(297.0) - A4_HEIGHT_PT).abs() < 0.01);
    }

    #[test]
    fn test_canvas_writes_pages_and_dedups_images() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("photo.jpg");
        RgbImage::from_pixel(8, 8, Rgb([200, 10, 10])).save(&photo).unwrap();

        let styles = StyleSheet::default();
        let mut canvas = PdfCanvas::new(AssetLibrary::new(dir.path()));

        canvas.begin_page().unwrap();
        canvas.draw_image((0.0, 0.0, 210.0, 297.0), &photo).unwrap();
        canvas.draw_rect((0.0, 0.0, 45.0, 6.0), Color::WHITE, 0.5);
        canvas.draw_text(8.0, 1.5, "Feature Count: 21", styles.get(StyleName::Caption)).unwrap();

        canvas.begin_page().unwrap();
        canvas.draw_image((20.0, 129.0, 63.677, 82.0), &photo).unwrap();
        canvas.draw_line((20.0, 270.0), (190.0, 270.0), 0.5, Color::PURPLE);
        let lines = canvas
            .draw_paragraph(
                (90.0, 170.0, 90.0, 30.0),
                "Spots are small areas of concentrated pigment visible on the surface of the skin.",
                styles.get(StyleName::Body),
            )
            .unwrap();
        assert!(lines >= 1);
        assert_eq!(canvas.page_count(), 2);
        assert_eq!(canvas.images.len(), 1);

        let output = dir.path().join("out").join("report.pdf");
        canvas.save(&output).unwrap();

        let doc = Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = PdfCanvas::new(AssetLibrary::new(dir.path()));
        let result = canvas.draw_image((0.0, 0.0, 1.0, 1.0), &dir.path().join("nope.jpg"));
        assert!(matches!(
            result,
            Err(crate::SkinError::Render(RenderError::MissingAsset(_)))
        ));
    }

    #[test]
    fn test_fill_alpha_outlives_rect() {
        let dir = tempfile::tempdir().unwrap();
        let styles = StyleSheet::default();
        let mut canvas = PdfCanvas::new(AssetLibrary::new(dir.path()));

        canvas.begin_page().unwrap();
        canvas.draw_rect((0.0, 0.0, 45.0, 6.0), Color::WHITE, 0.5);
        canvas.draw_text(8.0, 1.5, "Feature Count: 21", styles.get(StyleName::Caption)).unwrap();

        let operators: Vec<&str> = canvas
            .page
            .as_ref()
            .unwrap()
            .operations
            .iter()
            .map(|op| op.operator.as_str())
            .collect();
        let gs = operators.iter().position(|&op| op == "gs").unwrap();
        let bt = operators.iter().position(|&op| op == "BT").unwrap();
        assert!(gs < bt);

        // No save/restore encloses the alpha change
        let depth = operators[..gs].iter().fold(0i32, |depth, &op| match op {
            "q" => depth + 1,
            "Q" => depth - 1,
            _ => depth,
        });
        assert_eq!(depth, 0);

        // A new page starts opaque
        canvas.begin_page().unwrap();
        assert!(canvas.page.as_ref().unwrap().operations.is_empty());
    }
}

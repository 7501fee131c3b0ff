//! Font metrics and PDF font objects.
//!
//! Text is written with `WinAnsiEncoding`, one byte per character. TrueType
//! faces are embedded whole (`FontFile2`); when a face's file is missing the
//! matching standard 14 Helvetica is referenced instead.

use std::path::Path;

use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};
use ttf_parser::Face;

use crate::error::RenderError;

use super::style::FontFace;

/// First code with a width entry.
pub const FIRST_CHAR: u8 = 32;
/// Last code with a width entry.
pub const LAST_CHAR: u8 = 255;

/// WinAnsi code 0x80..=0x9F to Unicode. Zero marks an unused code.
const WIN_ANSI_HIGH: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0, 0x017D, 0, 0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, 0x02DC,
    0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

/// Helvetica advance widths for codes 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // A..Z
    278, 278, 278, 469, 556, 333, // [..`
    500, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // a..z
    334, 260, 334, 584, // {..~
];

const HELVETICA_DEFAULT_WIDTH: u16 = 556;

/// Map a WinAnsi code to the character it draws.
pub fn win_ansi_char(code: u8) -> Option<char> {
    match code {
        0x80..=0x9F => match WIN_ANSI_HIGH[(code - 0x80) as usize] {
            0 => None,
            scalar => char::from_u32(scalar),
        },
        _ => Some(code as char),
    }
}

/// Encode text as WinAnsi bytes; characters outside the code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch as u32 {
            0x20..=0x7E | 0xA0..=0xFF => ch as u8,
            scalar => WIN_ANSI_HIGH
                .iter()
                .position(|&mapped| mapped != 0 && mapped == scalar)
                .map(|index| 0x80 + index as u8)
                .unwrap_or(b'?'),
        })
        .collect()
}

/// A font registered in the output document.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    /// Resource name used in content streams (`F1`, `F2`, ...).
    pub resource: String,
    pub id: ObjectId,
    /// Advance widths for codes `FIRST_CHAR..=LAST_CHAR`, in 1/1000 em.
    widths: Vec<f32>,
}

impl LoadedFont {
    /// Width of WinAnsi-encoded text in points.
    pub fn text_width(&self, encoded: &[u8], size: f32, char_spacing: f32) -> f32 {
        encoded
            .iter()
            .map(|&code| self.code_width(code) * size / 1000.0 + char_spacing)
            .sum()
    }

    fn code_width(&self, code: u8) -> f32 {
        code.checked_sub(FIRST_CHAR)
            .and_then(|index| self.widths.get(index as usize))
            .copied()
            .unwrap_or(0.0)
    }

    /// Add `face` to `doc`, embedding the TrueType file at `path` when it
    /// exists.
    pub fn register(
        doc: &mut Document,
        face: FontFace,
        path: &Path,
        resource: String,
    ) -> Result<Self, RenderError> {
        if !path.is_file() {
            warn!(
                "Font {} not found, falling back to {}",
                path.display(),
                face.builtin_fallback()
            );
            return Ok(Self::register_builtin(doc, face, resource));
        }

        let data = std::fs::read(path).map_err(|e| RenderError::Font {
            name: face.postscript_name().to_string(),
            reason: e.to_string(),
        })?;
        Self::register_truetype(doc, face, data, resource)
    }

    fn register_builtin(doc: &mut Document, face: FontFace, resource: String) -> Self {
        let widths = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| {
                let width = match code {
                    32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
                    _ => HELVETICA_DEFAULT_WIDTH,
                };
                width as f32
            })
            .collect();

        let id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.builtin_fallback(),
            "Encoding" => "WinAnsiEncoding",
        });

        Self {
            resource,
            id,
            widths,
        }
    }

    fn register_truetype(
        doc: &mut Document,
        face: FontFace,
        data: Vec<u8>,
        resource: String,
    ) -> Result<Self, RenderError> {
        let name = face.postscript_name();
        let parsed = Face::parse(&data, 0).map_err(|e| RenderError::Font {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        let units = parsed.units_per_em() as f32;
        let scale = |value: f32| (value * 1000.0 / units).round();

        let widths: Vec<f32> = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| {
                win_ansi_char(code)
                    .and_then(|ch| parsed.glyph_index(ch))
                    .and_then(|glyph| parsed.glyph_hor_advance(glyph))
                    .map(|advance| scale(advance as f32))
                    .unwrap_or(0.0)
            })
            .collect();

        let bbox = parsed.global_bounding_box();
        let ascent = scale(parsed.ascender() as f32);
        let descent = scale(parsed.descender() as f32);
        let cap_height = parsed
            .capital_height()
            .map(|height| scale(height as f32))
            .unwrap_or(ascent);
        let (flags, italic_angle): (i64, i64) = if face.is_italic() { (32 + 64, -12) } else { (32, 0) };
        debug!("Embedding {} ({} bytes, {} units/em)", name, data.len(), units);

        let file_id = doc.add_object(Stream::new(
            dictionary! { "Length1" => data.len() as i64 },
            data,
        ));

        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(name.as_bytes().to_vec()),
            "Flags" => flags,
            "FontBBox" => vec![
                Object::Real(scale(bbox.x_min as f32)),
                Object::Real(scale(bbox.y_min as f32)),
                Object::Real(scale(bbox.x_max as f32)),
                Object::Real(scale(bbox.y_max as f32)),
            ],
            "ItalicAngle" => italic_angle,
            "Ascent" => Object::Real(ascent),
            "Descent" => Object::Real(descent),
            "CapHeight" => Object::Real(cap_height),
            "StemV" => 80_i64,
            "FontFile2" => file_id,
        });

        let id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => Object::Name(name.as_bytes().to_vec()),
            "FirstChar" => FIRST_CHAR as i64,
            "LastChar" => LAST_CHAR as i64,
            "Widths" => widths.iter().map(|&w| Object::Real(w)).collect::<Vec<Object>>(),
            "FontDescriptor" => descriptor_id,
            "Encoding" => "WinAnsiEncoding",
        });

        Ok(Self {
            resource,
            id,
            widths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Jane Doe"), b"Jane Doe".to_vec());
        assert_eq!(encode_win_ansi("Zo\u{eb}"), vec![b'Z', b'o', 0xEB]);
        assert_eq!(encode_win_ansi("\u{20ac}5 \u{2013}"), vec![0x80, b'5', b' ', 0x96]);
        assert_eq!(encode_win_ansi("\u{4e2d}"), b"?".to_vec());
    }

    #[test]
    fn test_win_ansi_char() {
        assert_eq!(win_ansi_char(b'A'), Some('A'));
        assert_eq!(win_ansi_char(0x92), Some('\u{2019}'));
        assert_eq!(win_ansi_char(0x81), None);
    }

    #[test]
    fn test_missing_font_falls_back_to_helvetica() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::with_version("1.5");
        let font = LoadedFont::register(&mut doc, FontFace::Bold, &dir.path().join("OpenSans-Bold.ttf"), "F1".into()).unwrap();

        let dict = doc.get_dictionary(font.id).unwrap();
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica-Bold");

        // "Hi" = 722 + 222 at 10pt, plus 1pt spacing per character
        let width = font.text_width(b"Hi", 10.0, 1.0);
        assert!((width - (9.44 + 2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_font_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("OpenSans-Regular.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        let mut doc = Document::with_version("1.5");
        let result = LoadedFont::register(&mut doc, FontFace::Regular, &path, "F1".into());
        assert!(matches!(result, Err(RenderError::Font { .. })));
    }
}

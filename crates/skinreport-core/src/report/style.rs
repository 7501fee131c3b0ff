//! Named text styles, colours and font faces.

use std::collections::BTreeMap;

use serde::Serialize;

use super::Edition;

/// RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const DARK_GREY: Color = Color::rgb(0.1, 0.1, 0.1);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    /// Brand blue.
    pub const BLUE: Color = Color::rgb(0.0, 0.539, 0.625);
    /// Brand purple.
    pub const PURPLE: Color = Color::rgb(0.34375, 0.296875, 0.4375);
}

/// OpenSans faces used by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FontFace {
    Regular,
    Italic,
    Light,
    Bold,
    BoldItalic,
    ExtraBold,
}

impl FontFace {
    pub const ALL: [FontFace; 6] = [
        FontFace::Regular,
        FontFace::Italic,
        FontFace::Light,
        FontFace::Bold,
        FontFace::BoldItalic,
        FontFace::ExtraBold,
    ];

    /// PostScript name, also used as the PDF `BaseFont`.
    pub fn postscript_name(self) -> &'static str {
        match self {
            FontFace::Regular => "OpenSans-Regular",
            FontFace::Italic => "OpenSans-Italic",
            FontFace::Light => "OpenSans-Light",
            FontFace::Bold => "OpenSans-Bold",
            FontFace::BoldItalic => "OpenSans-BoldItalic",
            FontFace::ExtraBold => "OpenSans-ExtraBold",
        }
    }

    /// TrueType file expected in the asset folder.
    pub fn file_name(self) -> String {
        format!("{}.ttf", self.postscript_name())
    }

    /// Standard 14 font substituted when the TrueType file is missing.
    pub fn builtin_fallback(self) -> &'static str {
        match self {
            FontFace::Regular | FontFace::Light => "Helvetica",
            FontFace::Italic => "Helvetica-Oblique",
            FontFace::Bold | FontFace::ExtraBold => "Helvetica-Bold",
            FontFace::BoldItalic => "Helvetica-BoldOblique",
        }
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontFace::Italic | FontFace::BoldItalic)
    }
}

/// Names of the report's text styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StyleName {
    Title,
    SubTitle,
    SubTitleItalic,
    Heading,
    SubHeading,
    ColouredHeading,
    AnalysisLabel,
    Remark,
    Body,
    Caption,
    FooterBlue,
    FooterPurple,
}

/// Font, size, colour and spacing of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub face: FontFace,
    /// Font size in points.
    pub size: f32,
    pub color: Color,
    /// Extra space after every character, in points.
    pub char_spacing: f32,
    /// Baseline distance for wrapped paragraphs, in points.
    pub leading: f32,
}

impl TextStyle {
    pub const fn new(face: FontFace, size: f32, color: Color) -> Self {
        Self {
            face,
            size,
            color,
            char_spacing: 0.0,
            leading: 12.0,
        }
    }

    pub const fn with_char_spacing(mut self, char_spacing: f32) -> Self {
        self.char_spacing = char_spacing;
        self
    }

    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Style table for one edition.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    styles: BTreeMap<StyleName, TextStyle>,
}

impl StyleSheet {
    /// Build the style table used by `edition`.
    pub fn for_edition(edition: Edition) -> Self {
        use StyleName::*;

        let footer = TextStyle::new(FontFace::Light, 10.5, Color::BLUE).with_char_spacing(1.0);
        let caption = TextStyle::new(FontFace::Bold, 9.0, Color::WHITE);

        let mut styles = BTreeMap::from([
            (Title, TextStyle::new(FontFace::ExtraBold, 32.0, Color::BLUE)),
            (SubTitle, TextStyle::new(FontFace::Bold, 15.0, Color::PURPLE)),
            (SubTitleItalic, TextStyle::new(FontFace::BoldItalic, 15.0, Color::PURPLE)),
            (Heading, TextStyle::new(FontFace::Bold, 13.75, Color::BLACK)),
            (SubHeading, TextStyle::new(FontFace::Regular, 11.0, Color::BLACK)),
            (ColouredHeading, TextStyle::new(FontFace::ExtraBold, 17.0, Color::BLUE)),
            (AnalysisLabel, TextStyle::new(FontFace::Bold, 12.0, Color::DARK_GREY)),
            (Remark, TextStyle::new(FontFace::Italic, 10.0, Color::DARK_GREY)),
            (Body, TextStyle::new(FontFace::Regular, 9.0, Color::DARK_GREY)),
            (Caption, caption),
            (FooterBlue, footer),
            (FooterPurple, footer.with_color(Color::PURPLE)),
        ]);

        // The classic photo caption sits on the white box in black.
        if edition == Edition::Classic {
            styles.insert(Caption, caption.with_color(Color::BLACK));
        }

        Self { styles }
    }

    pub fn get(&self, name: StyleName) -> &TextStyle {
        // Every StyleName is inserted by `for_edition`.
        &self.styles[&name]
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::for_edition(Edition::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_brand_styles() {
        let sheet = StyleSheet::default();

        let title = sheet.get(StyleName::Title);
        assert_eq!(title.face, FontFace::ExtraBold);
        assert_eq!(title.size, 32.0);
        assert_eq!(title.color, Color::BLUE);

        let footer = sheet.get(StyleName::FooterPurple);
        assert_eq!(footer.face, FontFace::Light);
        assert_eq!(footer.char_spacing, 1.0);
        assert_eq!(footer.color, Color::PURPLE);

        assert_eq!(sheet.get(StyleName::Body).leading, 12.0);
    }

    #[test]
    fn test_caption_colour_per_edition() {
        let complete = StyleSheet::for_edition(Edition::Complete);
        let classic = StyleSheet::for_edition(Edition::Classic);
        assert_eq!(complete.get(StyleName::Caption).color, Color::WHITE);
        assert_eq!(classic.get(StyleName::Caption).color, Color::BLACK);
    }

    #[test]
    fn test_font_files() {
        assert_eq!(FontFace::BoldItalic.file_name(), "OpenSans-BoldItalic.ttf");
        assert_eq!(FontFace::ExtraBold.builtin_fallback(), "Helvetica-Bold");
    }
}

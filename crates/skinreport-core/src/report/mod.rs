//! Report layout engine.
//!
//! Pages are described as [`PageTemplate`]s of typed draw commands and
//! rendered by [`ReportRenderer`] onto a deterministic lopdf [`PdfCanvas`].

pub mod assets;
pub mod canvas;
pub mod edition;
mod font;
mod render;
pub mod style;
pub mod template;

pub use assets::AssetLibrary;
pub use canvas::PdfCanvas;
pub use edition::PageCounter;
pub use render::{RenderSummary, ReportRenderer};
pub use style::{Color, FontFace, StyleName, StyleSheet, TextStyle};
pub use template::{DrawCommand, ImageSource, PageTemplate, TextSource};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A4 width in millimetres.
pub const PAGE_WIDTH_MM: f32 = 210.0;
/// A4 height in millimetres.
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Which set of content pages to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edition {
    /// Analysis, UV and SPF education, ingredients and recommendation pages.
    #[default]
    Complete,
    /// The original three-page layout.
    Classic,
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edition::Complete => f.write_str("complete"),
            Edition::Classic => f.write_str("classic"),
        }
    }
}

impl FromStr for Edition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "complete" => Ok(Edition::Complete),
            "classic" => Ok(Edition::Classic),
            other => Err(format!("unknown edition '{}' (expected complete or classic)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edition_parse() {
        assert_eq!("Classic".parse::<Edition>(), Ok(Edition::Classic));
        assert_eq!(Edition::default(), Edition::Complete);
        assert!("deluxe".parse::<Edition>().is_err());
        assert_eq!(serde_json::to_string(&Edition::Classic).unwrap(), "\"classic\"");
    }
}

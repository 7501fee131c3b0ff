//! Declarative page templates.
//!
//! A page is an ordered list of [`DrawCommand`]s. Positions and sizes are in
//! millimetres measured from the bottom-left corner of an A4 page.

use std::borrow::Cow;
use std::path::PathBuf;

use crate::models::report::{Field, ReportData};

use super::style::{Color, StyleName};

/// Text drawn by a command.
#[derive(Debug, Clone, PartialEq)]
pub enum TextSource {
    /// Fixed copy.
    Literal(Cow<'static, str>),
    /// A value from the extracted report data.
    Field(Field),
    /// Fixed prefix followed by a report value.
    Labelled(&'static str, Field),
}

impl TextSource {
    pub fn literal(text: impl Into<Cow<'static, str>>) -> Self {
        TextSource::Literal(text.into())
    }

    /// Resolve against the extracted values.
    pub fn resolve<'a>(&'a self, data: &'a ReportData) -> Cow<'a, str> {
        match self {
            TextSource::Literal(text) => Cow::Borrowed(text.as_ref()),
            TextSource::Field(field) => Cow::Borrowed(data.get(*field)),
            TextSource::Labelled(prefix, field) => {
                Cow::Owned(format!("{}{}", prefix, data.get(*field)))
            }
        }
    }
}

/// Image drawn by a command.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// A processed full-face photo.
    Photo(PathBuf),
    /// A tile of the split overview composite.
    Tile { column: u32, row: u32 },
    /// A file from the asset folder.
    Asset(&'static str),
}

/// A single drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// One line of text with its baseline at `y`.
    Text {
        x: f32,
        y: f32,
        text: TextSource,
        style: StyleName,
    },
    /// Word-wrapped text; `y` is the bottom of the wrapped block.
    Paragraph {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        text: TextSource,
        style: StyleName,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        source: ImageSource,
    },
    /// Filled rectangle without stroke.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        opacity: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        /// Stroke width in points.
        width: f32,
        color: Color,
    },
}

/// Ordered drawing commands for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageTemplate {
    pub commands: Vec<DrawCommand>,
}

impl PageTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, x: f32, y: f32, text: TextSource, style: StyleName) -> Self {
        self.commands.push(DrawCommand::Text { x, y, text, style });
        self
    }

    pub fn literal(self, x: f32, y: f32, text: &'static str, style: StyleName) -> Self {
        self.text(x, y, TextSource::literal(text), style)
    }

    pub fn field(self, x: f32, y: f32, field: impl Into<Field>, style: StyleName) -> Self {
        self.text(x, y, TextSource::Field(field.into()), style)
    }

    pub fn paragraph(
        mut self,
        (x, y, width, height): (f32, f32, f32, f32),
        text: &'static str,
        style: StyleName,
    ) -> Self {
        self.commands.push(DrawCommand::Paragraph {
            x,
            y,
            width,
            height,
            text: TextSource::literal(text),
            style,
        });
        self
    }

    pub fn image(mut self, (x, y, width, height): (f32, f32, f32, f32), source: ImageSource) -> Self {
        self.commands.push(DrawCommand::Image {
            x,
            y,
            width,
            height,
            source,
        });
        self
    }

    pub fn tile(self, rect: (f32, f32, f32, f32), column: u32, row: u32) -> Self {
        self.image(rect, ImageSource::Tile { column, row })
    }

    pub fn rect(mut self, (x, y, width, height): (f32, f32, f32, f32), color: Color, opacity: f32) -> Self {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            color,
            opacity,
        });
        self
    }

    pub fn line(mut self, (x1, y1): (f32, f32), (x2, y2): (f32, f32), width: f32, color: Color) -> Self {
        self.commands.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        });
        self
    }

    /// Append another template's commands after this one's.
    pub fn extend(mut self, other: PageTemplate) -> Self {
        self.commands.extend(other.commands);
        self
    }

    /// Tiles this page draws, in command order.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Image {
                source: ImageSource::Tile { column, row },
                ..
            } => Some((*column, *row)),
            _ => None,
        })
    }

    /// Fields this page interpolates, in command order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } | DrawCommand::Paragraph { text, .. } => match text {
                TextSource::Field(field) | TextSource::Labelled(_, field) => Some(*field),
                TextSource::Literal(_) => None,
            },
            _ => None,
        })
    }
}

//! Descriptive font and image records.
//!
//! These only describe resources for layout sizing and drawing; decoding and
//! loading belong to the graphics backend.

use std::path::PathBuf;

use glam::Vec2;

/// Font weight on the usual 100..=900 scale
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const THIN: Self = Self(100);
    pub const LIGHT: Self = Self(300);
    pub const REGULAR: Self = Self(400);
    pub const MEDIUM: Self = Self(500);
    pub const BOLD: Self = Self(700);
    pub const BLACK: Self = Self(900);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::REGULAR
    }
}

/// A single font face.
///
/// `family` names the family this face belongs to; the family table itself is
/// owned by the backend, the face only refers to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub family: String,
    pub path: Option<PathBuf>,
    /// Font size in pixels
    pub size: f32,
    pub weight: FontWeight,
    pub italic: bool,
    /// Extra horizontal space between glyphs, in pixels
    pub letter_spacing: f32,
    /// Line height as a multiplier of font size
    pub line_spacing: f32,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            path: None,
            size,
            weight: FontWeight::default(),
            italic: false,
            letter_spacing: 0.0,
            line_spacing: 1.2,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = spacing;
        self
    }

    pub fn with_line_spacing(mut self, multiplier: f32) -> Self {
        self.line_spacing = multiplier;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans-serif", 16.0)
    }
}

/// An image reference. `size` stays `None` until the backend inspects the file.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub path: PathBuf,
    pub size: Option<Vec2>,
}

impl Image {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: None,
        }
    }

    /// Image whose intrinsic size is already known
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Some(Vec2::new(width, height));
        self
    }
}

//! Text measurement used by the bounds pass.
//!
//! A label without an explicit size asks the renderer how much room its text
//! needs. Every [`Renderer`](crate::Renderer) is a [`ContentMeasurer`], so the
//! scene never talks to a text engine directly.

use crate::resource::Font;

/// A run of text to measure, optionally wrapped at `max_width`.
#[derive(Debug, Clone)]
pub struct MeasureTextRequest<'a> {
    pub text: &'a str,
    pub font: &'a Font,
    /// Wrap width; `None` measures a single line
    pub max_width: Option<f32>,
}

impl<'a> MeasureTextRequest<'a> {
    pub fn new(text: &'a str, font: &'a Font) -> Self {
        Self {
            text,
            font,
            max_width: None,
        }
    }

    pub fn with_max_width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

/// Intrinsic size measurement result.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntrinsicSize {
    pub width: f32,
    pub height: f32,
}

impl IntrinsicSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl From<IntrinsicSize> for glam::Vec2 {
    fn from(size: IntrinsicSize) -> Self {
        glam::Vec2::new(size.width, size.height)
    }
}

/// Backend-agnostic content measurement.
pub trait ContentMeasurer {
    /// Smallest box that holds the shaped text. Padding is added by the caller.
    fn measure_text(&mut self, request: MeasureTextRequest<'_>) -> IntrinsicSize;
}

//! Leaf drawables.
//!
//! A component knows how large its content is and how to draw it at the
//! origin of the current transform. Placement, transitions and caching are
//! handled by the owning layout.
//!
//! # Example
//!
//! ```ignore
//! use trellis::{Component, ComponentFrame, Renderer, Rect};
//!
//! #[derive(Debug)]
//! struct Divider;
//!
//! impl Component for Divider {
//!     fn render(&self, renderer: &mut dyn Renderer, frame: &ComponentFrame<'_>) {
//!         let rect = Rect::from_min_size(glam::Vec2::ZERO, frame.size);
//!         renderer.fill_rect(rect, frame.color, 0.0);
//!     }
//! }
//! ```

use std::fmt;

use glam::Vec2;

use crate::color::Color;
use crate::measure::MeasureTextRequest;
use crate::properties::Properties;
use crate::renderer::Renderer;
use crate::resource::{Font, Image};
use crate::scene::RenderContext;
use crate::vector::Rect;
use crate::NodeId;

/// Everything a component may read while drawing itself
pub struct ComponentFrame<'a> {
    pub id: NodeId,
    /// Resolved size of the component
    pub size: Vec2,
    /// Current (possibly animating) fill color
    pub color: Color,
    pub properties: &'a Properties,
    /// Queue for scene mutations, applied at the next tick
    pub context: &'a RenderContext,
}

impl ComponentFrame<'_> {
    /// Rectangle covering the component in local coordinates
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(Vec2::ZERO, self.size)
    }
}

/// A drawable leaf of the scene graph.
pub trait Component: fmt::Debug {
    /// Size of the content when no explicit size is given, including padding.
    ///
    /// Returning `None` makes an unsized component a configuration error.
    fn intrinsic_size(&mut self, renderer: &mut dyn Renderer, properties: &Properties) -> Option<Vec2> {
        let _ = (renderer, properties);
        None
    }

    /// Draw at the origin of the current transform
    fn render(&self, renderer: &mut dyn Renderer, frame: &ComponentFrame<'_>);
}

/// A filled, optionally rounded rectangle
#[derive(Clone, Copy, Debug, Default)]
pub struct Panel;

impl Panel {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Panel {
    fn render(&self, renderer: &mut dyn Renderer, frame: &ComponentFrame<'_>) {
        renderer.fill_rect(frame.rect(), frame.color, frame.properties.corner_radius);
    }
}

/// A run of text
#[derive(Clone, Debug)]
pub struct Label {
    pub text: String,
    pub font: Font,
    /// Wrap width for measurement (None = single line)
    pub max_width: Option<f32>,
}

impl Label {
    pub fn new(text: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into(),
            font,
            max_width: None,
        }
    }

    pub fn with_max_width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

impl Component for Label {
    fn intrinsic_size(&mut self, renderer: &mut dyn Renderer, properties: &Properties) -> Option<Vec2> {
        let mut request = MeasureTextRequest::new(&self.text, &self.font);
        if let Some(max_width) = self.max_width {
            request = request.with_max_width(max_width);
        }
        let measured: Vec2 = renderer.measure_text(request).into();
        Some(measured + properties.padding.total())
    }

    fn render(&self, renderer: &mut dyn Renderer, frame: &ComponentFrame<'_>) {
        if frame.color.a > 0.0 {
            renderer.fill_rect(frame.rect(), frame.color, frame.properties.corner_radius);
        }
        renderer.draw_text(
            &self.text,
            &self.font,
            frame.properties.padding.leading(),
            frame.properties.text_color,
        );
    }
}

/// An image drawn at its intrinsic size
#[derive(Clone, Debug)]
pub struct Picture {
    pub image: Image,
}

impl Picture {
    pub fn new(image: Image) -> Self {
        Self { image }
    }
}

impl Component for Picture {
    fn intrinsic_size(&mut self, renderer: &mut dyn Renderer, _properties: &Properties) -> Option<Vec2> {
        if self.image.size.is_none() {
            renderer.init_image(&mut self.image);
        }
        self.image.size
    }

    fn render(&self, renderer: &mut dyn Renderer, _frame: &ComponentFrame<'_>) {
        renderer.draw_image(&self.image, 0.0, 0.0);
    }
}

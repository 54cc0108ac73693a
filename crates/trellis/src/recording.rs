//! A headless [`Renderer`] that records every call.
//!
//! Useful for tests and for hosts that want to inspect what a frame would draw
//! without a graphics device. Text is measured with a fixed advance per glyph
//! and images report sizes registered up front.

use std::collections::HashMap;
use std::path::PathBuf;

use glam::Vec2;

use crate::color::Color;
use crate::measure::{ContentMeasurer, IntrinsicSize, MeasureTextRequest};
use crate::renderer::{Framebuffer, Renderer};
use crate::resource::{Font, Image};
use crate::vector::Rect;

/// Horizontal advance of one glyph as a multiple of the font size
const GLYPH_ADVANCE: f32 = 0.5;

/// One recorded renderer call
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Translate(Vec2),
    Scale(Vec2),
    Rotate(f32),
    SetGlobalAlpha(f32),
    Clear(Color),
    FillRect {
        rect: Rect,
        color: Color,
        corner_radius: f32,
        alpha: f32,
    },
    DrawText {
        text: String,
        origin: Vec2,
        color: Color,
    },
    DrawImage {
        path: PathBuf,
        position: Vec2,
    },
    InitImage(PathBuf),
    CreateFramebuffer(Framebuffer),
    ResizeFramebuffer(Framebuffer),
    BindFramebuffer(u64),
    UnbindFramebuffer(u64),
    DrawFramebuffer {
        id: u64,
        position: Vec2,
    },
    ReleaseFramebuffer(u64),
}

impl Command {
    /// Whether the command produces pixels
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Command::Clear(_)
                | Command::FillRect { .. }
                | Command::DrawText { .. }
                | Command::DrawImage { .. }
                | Command::DrawFramebuffer { .. }
        )
    }
}

#[derive(Debug)]
pub struct RecordingRenderer {
    commands: Vec<Command>,
    alpha: f32,
    translation: Vec2,
    scale: Vec2,
    rotation: f32,
    bound: Vec<u64>,
    next_framebuffer: u64,
    image_sizes: HashMap<PathBuf, Vec2>,
    fallback_image_size: Vec2,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            alpha: 1.0,
            translation: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            bound: Vec::new(),
            next_framebuffer: 1,
            image_sizes: HashMap::new(),
            fallback_image_size: Vec2::new(64.0, 64.0),
        }
    }

    /// Register the size `init_image` reports for `path`
    pub fn with_image_size(mut self, path: impl Into<PathBuf>, width: f32, height: f32) -> Self {
        self.image_sizes
            .insert(path.into(), Vec2::new(width, height));
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded calls that produced pixels
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_draw()).count()
    }

    /// Accumulated translation (scale and rotation are tracked separately)
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn scale_factor(&self) -> Vec2 {
        self.scale
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Innermost bound framebuffer, if any
    pub fn bound_framebuffer(&self) -> Option<u64> {
        self.bound.last().copied()
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentMeasurer for RecordingRenderer {
    fn measure_text(&mut self, request: MeasureTextRequest<'_>) -> IntrinsicSize {
        let font = request.font;
        let advance = font.size * GLYPH_ADVANCE + font.letter_spacing;
        let line_height = font.size * font.line_spacing;

        let mut width = 0.0f32;
        let mut lines = 0usize;
        for line in request.text.lines() {
            let line_width = line.chars().count() as f32 * advance;
            match request.max_width {
                Some(max) if max > 0.0 && line_width > max => {
                    width = width.max(max);
                    lines += (line_width / max).ceil() as usize;
                }
                _ => {
                    width = width.max(line_width);
                    lines += 1;
                }
            }
        }

        IntrinsicSize::new(width, lines.max(1) as f32 * line_height)
    }
}

impl Renderer for RecordingRenderer {
    fn translate(&mut self, dx: f32, dy: f32) {
        self.translation += Vec2::new(dx, dy);
        self.commands.push(Command::Translate(Vec2::new(dx, dy)));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.scale *= Vec2::new(sx, sy);
        self.commands.push(Command::Scale(Vec2::new(sx, sy)));
    }

    fn rotate(&mut self, angle: f32) {
        self.rotation += angle;
        self.commands.push(Command::Rotate(angle));
    }

    fn global_alpha(&self) -> f32 {
        self.alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
        self.commands.push(Command::SetGlobalAlpha(alpha));
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(Command::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, corner_radius: f32) {
        self.commands.push(Command::FillRect {
            rect,
            color,
            corner_radius,
            alpha: self.alpha,
        });
    }

    fn draw_text(&mut self, text: &str, _font: &Font, origin: Vec2, color: Color) {
        self.commands.push(Command::DrawText {
            text: text.to_string(),
            origin,
            color,
        });
    }

    fn draw_image(&mut self, image: &Image, x: f32, y: f32) {
        self.commands.push(Command::DrawImage {
            path: image.path.clone(),
            position: Vec2::new(x, y),
        });
    }

    fn init_image(&mut self, image: &mut Image) {
        let size = self
            .image_sizes
            .get(&image.path)
            .copied()
            .unwrap_or(self.fallback_image_size);
        image.size = Some(size);
        self.commands.push(Command::InitImage(image.path.clone()));
    }

    fn create_framebuffer(&mut self, width: u32, height: u32) -> Framebuffer {
        let framebuffer = Framebuffer::new(self.next_framebuffer, width, height);
        self.next_framebuffer += 1;
        self.commands.push(Command::CreateFramebuffer(framebuffer));
        framebuffer
    }

    fn resize_framebuffer(
        &mut self,
        framebuffer: Framebuffer,
        width: u32,
        height: u32,
    ) -> Framebuffer {
        let resized = Framebuffer::new(framebuffer.id(), width, height);
        self.commands.push(Command::ResizeFramebuffer(resized));
        resized
    }

    fn bind_framebuffer(&mut self, framebuffer: &Framebuffer) {
        self.bound.push(framebuffer.id());
        self.commands
            .push(Command::BindFramebuffer(framebuffer.id()));
    }

    fn unbind_framebuffer(&mut self, framebuffer: &Framebuffer) {
        if self.bound.last() == Some(&framebuffer.id()) {
            self.bound.pop();
        } else {
            log::warn!(
                "framebuffer {} unbound out of order (bound: {:?})",
                framebuffer.id(),
                self.bound
            );
        }
        self.commands
            .push(Command::UnbindFramebuffer(framebuffer.id()));
    }

    fn draw_framebuffer(&mut self, framebuffer: &Framebuffer, x: f32, y: f32) {
        self.commands.push(Command::DrawFramebuffer {
            id: framebuffer.id(),
            position: Vec2::new(x, y),
        });
    }

    fn release_framebuffer(&mut self, framebuffer: Framebuffer) {
        self.commands
            .push(Command::ReleaseFramebuffer(framebuffer.id()));
    }
}

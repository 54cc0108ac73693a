//! Backend contract for graphics integrations.
//!
//! The scene graph never rasterizes anything itself. A backend crate provides
//! a [`Renderer`] that executes drawing and transform operations in the order
//! they are issued, composing translations like a push/pop transform stack.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(delta: Duration) {
//!     // Deliver input, advance animations, recalculate bounds
//!     scene.update(delta, &mut renderer)?;
//!
//!     // Re-render dirty layouts into their cached framebuffers
//!     scene.render(&mut renderer);
//!
//!     // Composite the root layout onto the window surface
//!     scene.present(&mut renderer);
//! }
//! ```

use glam::Vec2;

use crate::color::Color;
use crate::measure::ContentMeasurer;
use crate::resource::{Font, Image};
use crate::vector::Rect;

/// Opaque handle to a backend render target.
///
/// The backend decides what backs it (texture, bitmap, ...). The scene only
/// binds, unbinds and composites it, and relies on its contents persisting
/// unchanged between an unbind and the next bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Framebuffer {
    id: u64,
    width: u32,
    height: u32,
}

impl Framebuffer {
    /// Called by backends when allocating a target
    pub const fn new(id: u64, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether this target can hold a bitmap of `size` pixels
    pub fn fits(&self, size: Vec2) -> bool {
        let (width, height) = pixel_extent(size);
        self.width == width && self.height == height
    }
}

/// Round a logical size up to whole pixels, at least 1x1
pub fn pixel_extent(size: Vec2) -> (u32, u32) {
    (
        (size.x.ceil() as u32).max(1),
        (size.y.ceil() as u32).max(1),
    )
}

/// Drawing capabilities consumed by the scene graph.
pub trait Renderer: ContentMeasurer {
    fn translate(&mut self, dx: f32, dy: f32);

    fn scale(&mut self, sx: f32, sy: f32);

    /// Rotate by `angle` radians, clockwise positive
    fn rotate(&mut self, angle: f32);

    fn global_alpha(&self) -> f32;

    fn set_global_alpha(&mut self, alpha: f32);

    /// Fill the currently bound target
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color, corner_radius: f32);

    fn draw_text(&mut self, text: &str, font: &Font, origin: Vec2, color: Color);

    fn draw_image(&mut self, image: &Image, x: f32, y: f32);

    /// Resolve the intrinsic size of an image whose dimensions are unknown
    fn init_image(&mut self, image: &mut Image);

    fn create_framebuffer(&mut self, width: u32, height: u32) -> Framebuffer;

    /// Reallocate `framebuffer` for a new size; contents are undefined afterwards
    fn resize_framebuffer(&mut self, framebuffer: Framebuffer, width: u32, height: u32)
        -> Framebuffer;

    fn bind_framebuffer(&mut self, framebuffer: &Framebuffer);

    fn unbind_framebuffer(&mut self, framebuffer: &Framebuffer);

    /// Composite a framebuffer's contents into the currently bound target
    fn draw_framebuffer(&mut self, framebuffer: &Framebuffer, x: f32, y: f32);

    /// Free a target that is no longer referenced by the scene
    fn release_framebuffer(&mut self, framebuffer: Framebuffer) {
        let _ = framebuffer;
    }
}

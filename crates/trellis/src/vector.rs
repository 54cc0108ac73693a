use glam::Vec2;

use crate::error::Result;
use crate::unit::{AxisContext, Unit};

/// An ordered pair, used as `(x, y)` for positions and `(width, height)` for sizes.
///
/// The components are independent: setting one never changes the other.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

impl<T> Vector2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn with_x(mut self, x: T) -> Self {
        self.x = x;
        self
    }

    pub fn with_y(mut self, y: T) -> Self {
        self.y = y;
        self
    }

    pub fn set_x(&mut self, x: T) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: T) {
        self.y = y;
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Vector2<U> {
        Vector2 {
            x: f(self.x),
            y: f(self.y),
        }
    }
}

impl Vector2<Unit> {
    /// Both components in pixels
    pub const fn px(x: f32, y: f32) -> Self {
        Self::new(Unit::Pixels(x), Unit::Pixels(y))
    }

    /// Both components as percentages of the parent
    pub const fn percent(x: f32, y: f32) -> Self {
        Self::new(Unit::Percent(x), Unit::Percent(y))
    }

    pub const fn zero() -> Self {
        Self::px(0.0, 0.0)
    }

    /// Resolve both components against their axis contexts
    pub fn resolve(&self, ctx: ResolveContext) -> Result<Vec2> {
        Ok(Vec2::new(self.x.resolve(ctx.x)?, self.y.resolve(ctx.y)?))
    }
}

impl From<(f32, f32)> for Vector2<Unit> {
    fn from((x, y): (f32, f32)) -> Self {
        Self::px(x, y)
    }
}

impl From<(Unit, Unit)> for Vector2<Unit> {
    fn from((x, y): (Unit, Unit)) -> Self {
        Self::new(x, y)
    }
}

/// Per-axis resolution context handed from a layout to its children.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResolveContext {
    pub x: AxisContext,
    pub y: AxisContext,
}

impl ResolveContext {
    /// No parent extent on either axis
    pub const NONE: Self = Self {
        x: AxisContext::NONE,
        y: AxisContext::NONE,
    };

    /// Parent extent known on both axes, no flex distribution
    pub fn parent(extent: Vec2) -> Self {
        Self {
            x: AxisContext::parent(extent.x),
            y: AxisContext::parent(extent.y),
        }
    }

    /// Parent extent when known, otherwise no context
    pub fn from_extent(extent: Option<Vec2>) -> Self {
        extent.map_or(Self::NONE, Self::parent)
    }
}

/// Resolved geometry of a node.
///
/// `position` is relative to the top-left corner of the owning layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub position: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub const fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Bottom-right corner (`position + size`)
    pub fn extent(&self) -> Vec2 {
        self.position + self.size
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            position: self.position + offset,
            size: self.size,
        }
    }
}

/// Axis-aligned rectangle defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if a point is inside this rectangle (max edge exclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }
}

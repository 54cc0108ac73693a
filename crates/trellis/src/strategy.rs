//! Layout strategies: how a layout turns its children's unit hints into
//! positions.
//!
//! The set is open. A strategy validates which unit kinds it can place,
//! optionally distributes free space to flex-sized children, and positions
//! children once their sizes are known. Sizes are aggregated by the layout
//! itself, independently of the strategy.

use std::fmt;

use glam::Vec2;

use crate::drawable::Geometry;
use crate::error::{Result, SceneError};
use crate::unit::{AxisContext, Unit};
use crate::vector::{ResolveContext, Vector2};

/// Layout axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left to right
    Horizontal,
    /// Top to bottom
    Vertical,
}

impl Axis {
    /// Component of `v` along this axis
    pub const fn main(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    /// Component of `v` across this axis
    pub const fn cross(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.y,
            Axis::Vertical => v.x,
        }
    }

    /// Vector with `value` along this axis and zero across it
    pub const fn along(self, value: f32) -> Vec2 {
        self.compose(value, 0.0)
    }

    pub const fn compose(self, main: f32, cross: f32) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::new(main, cross),
            Axis::Vertical => Vec2::new(cross, main),
        }
    }

    pub fn main_unit<T: Copy>(self, v: &Vector2<T>) -> T {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    pub fn cross_unit<T: Copy>(self, v: &Vector2<T>) -> T {
        match self {
            Axis::Horizontal => v.y,
            Axis::Vertical => v.x,
        }
    }
}

/// A child as seen by a strategy during placement
#[derive(Clone, Copy, Debug)]
pub struct Slot {
    /// Position hint from the child's geometry
    pub hint: Vector2<Unit>,
    /// Resolved size of the child
    pub size: Vec2,
    /// Output: position relative to the layout's content origin
    pub position: Vec2,
}

impl Slot {
    pub fn new(hint: Vector2<Unit>, size: Vec2) -> Self {
        Self {
            hint,
            size,
            position: Vec2::ZERO,
        }
    }
}

/// Placement strategy of a layout.
pub trait LayoutStrategy: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Reject geometries whose unit kinds this strategy cannot place.
    fn accepts(&self, geometry: &Geometry) -> Result<()>;

    /// Context for resolving children that are not flex-sized.
    ///
    /// `extent` is the layout's content extent, when it is already known.
    fn child_context(&self, extent: Option<Vec2>) -> ResolveContext {
        ResolveContext::from_extent(extent)
    }

    /// Context for resolving flex-sized children, once the fixed children
    /// are sized.
    fn flex_context(
        &self,
        extent: Option<Vec2>,
        fixed_sizes: &[Vec2],
        child_count: usize,
        total_weight: f32,
    ) -> Result<ResolveContext> {
        let _ = (extent, fixed_sizes, child_count, total_weight);
        Err(SceneError::FlexWithoutStrategy)
    }

    /// Position every slot. Sizes are already resolved.
    fn place(&self, extent: Option<Vec2>, slots: &mut [Slot]) -> Result<()>;
}

fn reject_flex(strategy: &'static str, unit: Unit, role: &'static str) -> Result<()> {
    if unit.is_flex() {
        Err(SceneError::IncompatibleUnit {
            strategy,
            unit: unit.kind(),
            role,
        })
    } else {
        Ok(())
    }
}

/// Children are placed at their own (resolved) positions.
///
/// Flex units have no meaning here and are rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct Absolute;

impl LayoutStrategy for Absolute {
    fn name(&self) -> &'static str {
        "absolute"
    }

    fn accepts(&self, geometry: &Geometry) -> Result<()> {
        reject_flex(self.name(), geometry.position.x, "position")?;
        reject_flex(self.name(), geometry.position.y, "position")?;
        if let Some(size) = &geometry.size {
            reject_flex(self.name(), size.x, "size")?;
            reject_flex(self.name(), size.y, "size")?;
        }
        Ok(())
    }

    fn place(&self, extent: Option<Vec2>, slots: &mut [Slot]) -> Result<()> {
        let ctx = ResolveContext::from_extent(extent);
        for slot in slots.iter_mut() {
            slot.position = slot.hint.resolve(ctx)?;
        }
        Ok(())
    }
}

/// Children are stacked along an axis with a fixed gap.
///
/// Child positions act as offsets from their slot. Flex sizes share the free
/// main-axis space by weight.
#[derive(Clone, Copy, Debug)]
pub struct Linear {
    pub axis: Axis,
    pub gap: f32,
}

impl Linear {
    pub const fn new(axis: Axis, gap: f32) -> Self {
        Self { axis, gap }
    }

    pub const fn horizontal(gap: f32) -> Self {
        Self::new(Axis::Horizontal, gap)
    }

    pub const fn vertical(gap: f32) -> Self {
        Self::new(Axis::Vertical, gap)
    }

    fn total_gap(&self, child_count: usize) -> f32 {
        self.gap * child_count.saturating_sub(1) as f32
    }
}

impl LayoutStrategy for Linear {
    fn name(&self) -> &'static str {
        match self.axis {
            Axis::Horizontal => "linear-horizontal",
            Axis::Vertical => "linear-vertical",
        }
    }

    fn accepts(&self, geometry: &Geometry) -> Result<()> {
        reject_flex(self.name(), geometry.position.x, "position")?;
        reject_flex(self.name(), geometry.position.y, "position")?;
        if let Some(size) = &geometry.size {
            reject_flex(self.name(), self.axis.cross_unit(size), "cross-axis size")?;
        }
        Ok(())
    }

    fn flex_context(
        &self,
        extent: Option<Vec2>,
        fixed_sizes: &[Vec2],
        child_count: usize,
        total_weight: f32,
    ) -> Result<ResolveContext> {
        let extent = extent.ok_or(SceneError::UnresolvableSize {
            type_name: self.name(),
            reason: "flex children need a definite main-axis extent",
        })?;

        let used: f32 = fixed_sizes.iter().map(|size| self.axis.main(*size)).sum();
        let free = (self.axis.main(extent) - used - self.total_gap(child_count)).max(0.0);
        let per_weight = if total_weight > 0.0 {
            free / total_weight
        } else {
            0.0
        };

        let main = AxisContext::parent(self.axis.main(extent)).with_flex(per_weight);
        let cross = AxisContext::parent(self.axis.cross(extent));
        Ok(match self.axis {
            Axis::Horizontal => ResolveContext { x: main, y: cross },
            Axis::Vertical => ResolveContext { x: cross, y: main },
        })
    }

    fn place(&self, extent: Option<Vec2>, slots: &mut [Slot]) -> Result<()> {
        let ctx = ResolveContext::from_extent(extent);
        let mut cursor = 0.0;
        for slot in slots.iter_mut() {
            let offset = slot.hint.resolve(ctx)?;
            slot.position = self.axis.compose(
                cursor + self.axis.main(offset),
                self.axis.cross(offset),
            );
            cursor += self.axis.main(slot.size) + self.gap;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(position: Vector2<Unit>, size: Vector2<Unit>) -> Geometry {
        Geometry {
            position,
            size: Some(size),
        }
    }

    #[test]
    fn test_absolute_rejects_flex() {
        let err = Absolute
            .accepts(&geometry(Vector2::zero(), Vector2::new(Unit::flex(1.0), Unit::px(5.0))))
            .unwrap_err();
        assert!(matches!(err, SceneError::IncompatibleUnit { role: "size", .. }));
    }

    #[test]
    fn test_absolute_places_at_hint() {
        let mut slots = [Slot::new(Vector2::percent(50.0, 0.0), Vec2::splat(10.0))];
        Absolute
            .place(Some(Vec2::new(200.0, 100.0)), &mut slots)
            .unwrap();
        assert_eq!(slots[0].position, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_linear_rejects_cross_axis_flex() {
        let linear = Linear::horizontal(0.0);
        assert!(linear
            .accepts(&geometry(Vector2::zero(), Vector2::new(Unit::flex(1.0), Unit::px(5.0))))
            .is_ok());
        assert!(linear
            .accepts(&geometry(Vector2::zero(), Vector2::new(Unit::px(5.0), Unit::flex(1.0))))
            .is_err());
    }

    #[test]
    fn test_linear_stacks_with_gap() {
        let mut slots = [
            Slot::new(Vector2::zero(), Vec2::new(30.0, 10.0)),
            Slot::new(Vector2::px(0.0, 5.0), Vec2::new(20.0, 10.0)),
            Slot::new(Vector2::zero(), Vec2::new(10.0, 10.0)),
        ];
        Linear::horizontal(4.0).place(None, &mut slots).unwrap();
        assert_eq!(slots[0].position, Vec2::new(0.0, 0.0));
        assert_eq!(slots[1].position, Vec2::new(34.0, 5.0));
        assert_eq!(slots[2].position, Vec2::new(58.0, 0.0));
    }

    #[test]
    fn test_linear_distributes_free_space_by_weight() {
        let linear = Linear::vertical(10.0);
        let ctx = linear
            .flex_context(Some(Vec2::new(100.0, 200.0)), &[Vec2::new(100.0, 50.0)], 3, 3.0)
            .unwrap();
        // 200 - 50 - 2 gaps of 10 = 130 free, over 3 weights
        let per_weight = ctx.y.flex.unwrap();
        assert!((per_weight - 130.0 / 3.0).abs() < 1e-4);
        assert_eq!(ctx.x.flex, None);
    }

    #[test]
    fn test_linear_flex_needs_extent() {
        let err = Linear::horizontal(0.0)
            .flex_context(None, &[], 1, 1.0)
            .unwrap_err();
        assert!(matches!(err, SceneError::UnresolvableSize { .. }));
    }
}

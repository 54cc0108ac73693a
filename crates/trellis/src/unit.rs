use crate::error::{Result, SceneError};

/// A length or coordinate in one of several coordinate spaces.
///
/// Only `Pixels` is meaningful on its own. `Percent` needs the parent's extent
/// and `Flex` needs a layout strategy that distributes free space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Unit {
    /// Absolute value in pixels
    Pixels(f32),
    /// Percentage of the parent's extent (0.0 to 100.0)
    Percent(f32),
    /// Weighted share of the free space along a layout's main axis
    Flex(f32),
}

/// The coordinate space of a [`Unit`], without its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Pixels,
    Percent,
    Flex,
}

/// Context for resolving a single axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisContext {
    /// Extent of the parent along this axis, if known
    pub parent: Option<f32>,
    /// Pixels per flex weight along this axis, if the strategy distributes space
    pub flex: Option<f32>,
}

impl AxisContext {
    pub const NONE: Self = Self {
        parent: None,
        flex: None,
    };

    pub const fn parent(extent: f32) -> Self {
        Self {
            parent: Some(extent),
            flex: None,
        }
    }

    pub const fn with_flex(mut self, per_weight: f32) -> Self {
        self.flex = Some(per_weight);
        self
    }
}

impl Unit {
    /// Create an absolute unit in pixels
    pub const fn px(pixels: f32) -> Self {
        Self::Pixels(pixels)
    }

    /// Create a percentage of the parent's extent (0.0 to 100.0)
    pub const fn percent(percent: f32) -> Self {
        Self::Percent(percent)
    }

    /// Create a flex weight
    pub const fn flex(weight: f32) -> Self {
        Self::Flex(weight)
    }

    pub const fn kind(&self) -> UnitKind {
        match self {
            Unit::Pixels(_) => UnitKind::Pixels,
            Unit::Percent(_) => UnitKind::Percent,
            Unit::Flex(_) => UnitKind::Flex,
        }
    }

    pub const fn is_flex(&self) -> bool {
        matches!(self, Unit::Flex(_))
    }

    /// Flex weight, or 0 for other kinds
    pub const fn flex_weight(&self) -> f32 {
        match self {
            Unit::Flex(weight) => *weight,
            _ => 0.0,
        }
    }

    /// Resolve to an absolute value.
    ///
    /// The result is never negative. Percent and flex units fail fast when the
    /// context does not carry what they need.
    pub fn resolve(&self, ctx: AxisContext) -> Result<f32> {
        let value = match self {
            Unit::Pixels(px) => *px,
            Unit::Percent(percent) => {
                let parent = ctx.parent.ok_or(SceneError::MissingParentExtent)?;
                parent * percent / 100.0
            }
            Unit::Flex(weight) => {
                let per_weight = ctx.flex.ok_or(SceneError::FlexWithoutStrategy)?;
                per_weight * weight
            }
        };
        Ok(value.max(0.0))
    }

    /// Resolve if possible without a context (only pixels can)
    pub fn try_resolve_absolute(&self) -> Option<f32> {
        match self {
            Unit::Pixels(px) => Some(px.max(0.0)),
            _ => None,
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::Pixels(0.0)
    }
}

impl From<f32> for Unit {
    fn from(pixels: f32) -> Self {
        Self::Pixels(pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixels_resolve_without_context() {
        assert_eq!(Unit::px(12.0).resolve(AxisContext::NONE), Ok(12.0));
    }

    #[test]
    fn test_percent_needs_parent() {
        assert_eq!(
            Unit::percent(50.0).resolve(AxisContext::NONE),
            Err(SceneError::MissingParentExtent)
        );
        assert_eq!(
            Unit::percent(50.0).resolve(AxisContext::parent(300.0)),
            Ok(150.0)
        );
    }

    #[test]
    fn test_flex_needs_strategy() {
        assert_eq!(
            Unit::flex(2.0).resolve(AxisContext::parent(300.0)),
            Err(SceneError::FlexWithoutStrategy)
        );
        let ctx = AxisContext::parent(300.0).with_flex(25.0);
        assert_eq!(Unit::flex(2.0).resolve(ctx), Ok(50.0));
    }

    #[test]
    fn test_resolved_value_is_never_negative() {
        assert_eq!(Unit::px(-5.0).resolve(AxisContext::NONE), Ok(0.0));
        assert_eq!(
            Unit::percent(-10.0).resolve(AxisContext::parent(100.0)),
            Ok(0.0)
        );
    }
}

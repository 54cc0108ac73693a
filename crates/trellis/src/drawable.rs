//! Host-side description of a subtree before it is inserted into a scene.
//!
//! ```ignore
//! let root = Layout::new([
//!     Drawable::component(Panel).at(0.0, 0.0).sized(100.0, 50.0),
//!     Drawable::component(Panel).at(50.0, 50.0).sized(100.0, 100.0),
//! ]);
//! ```

use std::fmt;
use std::rc::Rc;

use crate::component::Component;
use crate::strategy::{Absolute, LayoutStrategy};
use crate::style::DrawableType;
use crate::unit::Unit;
use crate::vector::Vector2;

/// Geometry hints of a drawable.
///
/// Both are resolved against the owning layout during the bounds pass. A
/// missing size is inferred (components measure their content, layouts
/// aggregate their children).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Geometry {
    pub position: Vector2<Unit>,
    pub size: Option<Vector2<Unit>>,
}

impl Geometry {
    /// Whether either size component is a flex weight
    pub fn is_flex_sized(&self) -> bool {
        self.size
            .is_some_and(|size| size.x.is_flex() || size.y.is_flex())
    }

    /// Sum of the flex weights of the size components
    pub fn flex_weight(&self) -> f32 {
        self.size
            .map_or(0.0, |size| size.x.flex_weight() + size.y.flex_weight())
    }
}

/// A component awaiting insertion
pub struct ComponentNode {
    pub(crate) component: Box<dyn Component>,
    pub(crate) drawable_type: DrawableType,
    pub(crate) geometry: Geometry,
}

impl fmt::Debug for ComponentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentNode")
            .field("type", &self.drawable_type.name())
            .field("component", &self.component)
            .field("geometry", &self.geometry)
            .finish()
    }
}

/// A composite drawable: an ordered list of children and a placement strategy.
///
/// Child order is render order; later children draw on top.
pub struct Layout {
    pub(crate) children: Vec<Drawable>,
    pub(crate) strategy: Rc<dyn LayoutStrategy>,
    pub(crate) drawable_type: DrawableType,
    pub(crate) geometry: Geometry,
}

impl Layout {
    pub fn new(items: impl IntoIterator<Item = Drawable>) -> Self {
        Self {
            children: items.into_iter().collect(),
            strategy: Rc::new(Absolute),
            drawable_type: DrawableType::of::<Layout>(),
            geometry: Geometry::default(),
        }
    }

    pub fn empty() -> Self {
        Self::new([])
    }

    pub fn with_strategy(mut self, strategy: impl LayoutStrategy + 'static) -> Self {
        self.strategy = Rc::new(strategy);
        self
    }

    pub fn with_child(mut self, child: impl Into<Drawable>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Drawable>) -> Self {
        self.children.extend(children);
        self
    }

    /// Resolve properties under a custom type instead of `Layout`
    pub fn with_drawable_type(mut self, drawable_type: DrawableType) -> Self {
        self.drawable_type = drawable_type;
        self
    }

    /// Position in pixels
    pub fn at(self, x: f32, y: f32) -> Self {
        self.with_position(Vector2::px(x, y))
    }

    /// Size in pixels
    pub fn sized(self, width: f32, height: f32) -> Self {
        self.with_size(Vector2::px(width, height))
    }

    pub fn with_position(mut self, position: Vector2<Unit>) -> Self {
        self.geometry.position = position;
        self
    }

    pub fn with_size(mut self, size: Vector2<Unit>) -> Self {
        self.geometry.size = Some(size);
        self
    }

    pub fn children(&self) -> &[Drawable] {
        &self.children
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("type", &self.drawable_type.name())
            .field("strategy", &self.strategy)
            .field("geometry", &self.geometry)
            .field("children", &self.children)
            .finish()
    }
}

/// A node description: either a leaf component or a layout.
#[derive(Debug)]
pub enum Drawable {
    Component(ComponentNode),
    Layout(Layout),
}

impl Drawable {
    /// Wrap a component, resolving its properties under its own type
    pub fn component<C: Component + 'static>(component: C) -> Self {
        Drawable::Component(ComponentNode {
            component: Box::new(component),
            drawable_type: DrawableType::of::<C>(),
            geometry: Geometry::default(),
        })
    }

    pub fn geometry(&self) -> &Geometry {
        match self {
            Drawable::Component(node) => &node.geometry,
            Drawable::Layout(layout) => &layout.geometry,
        }
    }

    fn geometry_mut(&mut self) -> &mut Geometry {
        match self {
            Drawable::Component(node) => &mut node.geometry,
            Drawable::Layout(layout) => &mut layout.geometry,
        }
    }

    pub fn drawable_type(&self) -> DrawableType {
        match self {
            Drawable::Component(node) => node.drawable_type,
            Drawable::Layout(layout) => layout.drawable_type,
        }
    }

    /// Position in pixels
    pub fn at(self, x: f32, y: f32) -> Self {
        self.with_position(Vector2::px(x, y))
    }

    /// Size in pixels
    pub fn sized(self, width: f32, height: f32) -> Self {
        self.with_size(Vector2::px(width, height))
    }

    pub fn with_position(mut self, position: Vector2<Unit>) -> Self {
        self.geometry_mut().position = position;
        self
    }

    pub fn with_size(mut self, size: Vector2<Unit>) -> Self {
        self.geometry_mut().size = Some(size);
        self
    }
}

impl From<Layout> for Drawable {
    fn from(layout: Layout) -> Self {
        Drawable::Layout(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Panel;

    #[test]
    fn test_builders_set_geometry() {
        let drawable = Drawable::component(Panel)
            .with_position(Vector2::new(Unit::px(10.0), Unit::percent(50.0)))
            .with_size(Vector2::new(Unit::flex(2.0), Unit::px(20.0)));
        let geometry = drawable.geometry();
        assert_eq!(geometry.position, Vector2::new(Unit::px(10.0), Unit::percent(50.0)));
        assert!(geometry.is_flex_sized());
        assert_eq!(geometry.flex_weight(), 2.0);
        assert_eq!(drawable.drawable_type(), DrawableType::of::<Panel>());
    }

    #[test]
    fn test_layout_collects_children_in_order() {
        let layout = Layout::new([Drawable::component(Panel)])
            .with_child(Layout::empty().sized(5.0, 5.0))
            .with_children([Drawable::component(Panel)]);
        assert_eq!(layout.children().len(), 3);
        assert!(matches!(layout.children()[1], Drawable::Layout(_)));
        assert_eq!(Drawable::from(layout).drawable_type().name(), "Layout");
    }
}

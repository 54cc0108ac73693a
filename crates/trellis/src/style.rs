//! Properties templates keyed by drawable type.
//!
//! The registry is an explicit object owned by the [`Scene`](crate::Scene).
//! Every drawable inserted into the scene resolves its [`Properties`] here;
//! a type without a template is a configuration error, never a silent
//! default.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::color::{palette, Color};
use crate::component::{Label, Panel, Picture};
use crate::drawable::Layout;
use crate::error::{Result, SceneError};
use crate::properties::{Properties, Spacing};

/// Runtime identity of a drawable type
#[derive(Clone, Copy, Debug)]
pub struct DrawableType {
    id: TypeId,
    name: &'static str,
}

impl DrawableType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(type_name::<T>()),
        }
    }

    /// Short type name, used in error messages and logs
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Last path segment of a type name, without generic arguments:
/// `app::widgets::Meter<f32>` becomes `Meter`
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl PartialEq for DrawableType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DrawableType {}

impl Hash for DrawableType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Default, Clone)]
pub struct StyleRegistry {
    templates: HashMap<DrawableType, Properties>,
}

impl StyleRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with templates for the built-in drawables
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<Layout>(Properties::new());
        registry.register::<Panel>(
            Properties::new()
                .with_color(palette::SURFACE)
                .with_corner_radius(4.0),
        );
        registry.register::<Label>(
            Properties::new()
                .with_color(Color::transparent())
                .with_text_color(palette::TEXT)
                .with_padding(Spacing::symmetric(4.0, 2.0)),
        );
        registry.register::<Picture>(Properties::new());
        registry
    }

    pub fn register<T: 'static>(&mut self, template: Properties) -> Option<Properties> {
        self.register_type(DrawableType::of::<T>(), template)
    }

    /// Register or override the template for `drawable_type`.
    ///
    /// Returns the template it replaced, if any.
    pub fn register_type(
        &mut self,
        drawable_type: DrawableType,
        template: Properties,
    ) -> Option<Properties> {
        log::debug!("registered properties for `{}`", drawable_type.name());
        self.templates.insert(drawable_type, template)
    }

    /// Clone of the template registered for `drawable_type`
    pub fn resolve(&self, drawable_type: DrawableType) -> Result<Properties> {
        self.templates
            .get(&drawable_type)
            .cloned()
            .ok_or(SceneError::UnregisteredType {
                type_name: drawable_type.name(),
            })
    }

    pub fn contains(&self, drawable_type: DrawableType) -> bool {
        self.templates.contains_key(&drawable_type)
    }
}

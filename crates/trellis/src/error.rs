//! Configuration errors raised by the scene graph.
//!
//! The engine performs no I/O, so every failure here is a programmer or
//! configuration error reported synchronously by the call that caused it.

use thiserror::Error;

use crate::unit::UnitKind;
use crate::NodeId;

/// Errors surfaced by scene construction, bounds inference and animation setup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No `Properties` template was registered for a drawable type.
    #[error("no properties registered for drawable type `{type_name}`")]
    UnregisteredType { type_name: &'static str },

    /// A layout without an explicit size has no children yielding a usable extent.
    #[error("cannot infer size of `{type_name}`: {reason}")]
    UnresolvableSize {
        type_name: &'static str,
        reason: &'static str,
    },

    /// A child uses a unit kind its containing layout strategy cannot place.
    #[error("layout strategy `{strategy}` cannot place a {unit:?} {role}")]
    IncompatibleUnit {
        strategy: &'static str,
        unit: UnitKind,
        role: &'static str,
    },

    /// Animations need a strictly positive duration.
    #[error("animation duration must be positive, got {0:?}")]
    InvalidDuration(std::time::Duration),

    /// A percentage was resolved without a known parent extent.
    #[error("percentage unit resolved without a parent extent")]
    MissingParentExtent,

    /// A flex weight was resolved outside a strategy that distributes space.
    #[error("flex unit resolved without a flex-distributing layout strategy")]
    FlexWithoutStrategy,

    /// The node handle does not refer to a live node in this scene.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// A layout-only operation was attempted on a component.
    #[error("node {0:?} is not a layout")]
    NotALayout(NodeId),

    /// The root layout is owned by the scene and cannot be removed.
    #[error("the root layout cannot be removed")]
    RootRemoval,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SceneError>;

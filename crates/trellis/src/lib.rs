//! # trellis
//!
//! Retained-mode scene graph for animated user interfaces.
//!
//! The crate owns the tree, layout, animation and event routing. Drawing is
//! delegated to a [`Renderer`] implementation supplied by the host, so the
//! core has no dependency on any graphics API.
//!
//! ## Core Types
//!
//! - [`Scene`] - Owns the node arena and drives the per-frame tick
//! - [`Drawable`] / [`Layout`] - Declarative description of a subtree
//! - [`Component`] - Trait for leaf widgets that draw themselves
//! - [`LayoutStrategy`] - Places the children of a layout
//!
//! ## Geometry
//!
//! - [`Unit`] - Pixel, percent or flex lengths
//! - [`Vector2`] - Pairs of units resolved against a [`ResolveContext`]
//! - [`Bounds`] - Resolved size and position of a node
//!
//! ## Animation
//!
//! - [`Animation`] - Eased interpolation between two values
//! - [`Transition`] - Fade and slide effects bracketing a draw
//! - [`Easing`] - Named easing curves
//!
//! ## Styling & Events
//!
//! - [`StyleRegistry`] - Default [`Properties`] per drawable type
//! - [`Event`] - Pointer and hover events routed to node reactions
//! - [`Effect`] - What a reaction asks the scene to do

mod animation;
mod bounds;
mod color;
mod component;
mod config;
mod drawable;
pub mod easing;
mod error;
mod events;
mod hit_test;
mod measure;
mod properties;
mod recolor;
mod recording;
mod render;
mod renderer;
mod resource;
mod scene;
mod strategy;
mod style;
pub mod transition;
mod unit;
mod vector;

// Core types
pub use component::*;
pub use config::*;
pub use drawable::*;
pub use error::{Result, SceneError};
pub use scene::{Mutation, NodeId, RenderContext, Scene};
pub use strategy::*;

// Geometry
pub use unit::*;
pub use vector::*;

// Animation
pub use animation::*;
pub use easing::Easing;
pub use recolor::*;
pub use transition::{SlideDirection, Transition, TransitionKind, TransitionRequest};

// Styling & Events
pub use color::*;
pub use events::*;
pub use properties::*;
pub use style::*;

// Rendering
pub use measure::*;
pub use recording::*;
pub use renderer::*;
pub use resource::*;

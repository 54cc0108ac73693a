//! Per-drawable style and event bindings.
//!
//! A [`Properties`] value is resolved from the [`StyleRegistry`](crate::StyleRegistry)
//! once per node and owned by that node afterwards, so per-instance changes
//! never leak back into the shared template.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use trellis_macros::WithBuilders;

use crate::color::{palette, Color};
use crate::easing::Easing;
use crate::events::{Event, EventKind};
use crate::transition::TransitionRequest;
use crate::NodeId;

/// Spacing/padding around content
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spacing {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Spacing {
    /// Same spacing on every side
    pub const fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub const fn zero() -> Self {
        Self::all(0.0)
    }

    /// Symmetric horizontal and vertical spacing (CSS-style)
    ///
    /// ```
    /// # use trellis::Spacing;
    /// let spacing = Spacing::symmetric(10.0, 20.0);
    /// assert_eq!(spacing.left, 10.0);
    /// assert_eq!(spacing.bottom, 20.0);
    /// ```
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Individual top, right, bottom, left values (CSS-style)
    pub const fn trbl(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Offset from the outer top-left corner to the content origin
    pub fn leading(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Space taken after the content on each axis
    pub fn trailing(&self) -> Vec2 {
        Vec2::new(self.right, self.bottom)
    }

    /// Total spacing on each axis
    pub fn total(&self) -> Vec2 {
        self.leading() + self.trailing()
    }
}

/// Follow-up work returned by a [`Reaction`], carried out by the scene
/// before the next event is delivered.
#[derive(Clone, Debug)]
pub enum Effect {
    /// Start a transition on the reacting node
    Transition(TransitionRequest),
    /// Animate the node's color towards `to`
    Recolor {
        to: Color,
        duration: Duration,
        easing: Easing,
    },
    /// Animate the node's color back to its resolved `Properties::color`
    RestoreColor { duration: Duration, easing: Easing },
    Batch(Vec<Effect>),
}

impl Effect {
    pub fn recolor(to: Color, duration: Duration) -> Self {
        Self::Recolor {
            to,
            duration,
            easing: Easing::default(),
        }
    }

    pub fn restore_color(duration: Duration) -> Self {
        Self::RestoreColor {
            duration,
            easing: Easing::default(),
        }
    }
}

/// Handler invoked with the delivered event and the node it was delivered to.
pub type Reaction = Rc<dyn Fn(&Event, NodeId) -> Option<Effect>>;

/// Event kind to reaction bindings
#[derive(Clone, Default)]
pub struct Reactions {
    handlers: HashMap<EventKind, Reaction>,
}

impl Reactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `reaction` to `kind`, replacing any previous binding
    pub fn insert(&mut self, kind: EventKind, reaction: Reaction) {
        self.handlers.insert(kind, reaction);
    }

    pub fn remove(&mut self, kind: EventKind) -> Option<Reaction> {
        self.handlers.remove(&kind)
    }

    pub fn get(&self, kind: EventKind) -> Option<&Reaction> {
        self.handlers.get(&kind)
    }

    pub fn contains(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Reactions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort_by_key(|kind| format!("{kind:?}"));
        f.debug_set().entries(kinds).finish()
    }
}

/// Resolved style and event bindings of one drawable.
#[derive(Clone, Debug, WithBuilders)]
pub struct Properties {
    /// Fill color of components; layouts ignore it
    pub color: Color,
    pub text_color: Color,
    pub padding: Spacing,
    pub corner_radius: f32,
    /// Multiplier applied to global alpha while the drawable is drawn
    pub opacity: f32,
    /// Background a layout clears its framebuffer to
    #[with_builders(into)]
    pub clear_color: Option<Color>,
    #[with_builders(skip)]
    pub reactions: Reactions,
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            color: Color::transparent(),
            text_color: palette::TEXT,
            padding: Spacing::zero(),
            corner_radius: 0.0,
            opacity: 1.0,
            clear_color: None,
            reactions: Reactions::default(),
        }
    }
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a reaction to an event kind
    pub fn on<F>(mut self, kind: EventKind, reaction: F) -> Self
    where
        F: Fn(&Event, NodeId) -> Option<Effect> + 'static,
    {
        self.reactions.insert(kind, Rc::new(reaction));
        self
    }

    /// Recolor to `color` on hover and back when the pointer leaves
    pub fn with_hover_color(self, color: Color, duration: Duration) -> Self {
        self.on(EventKind::PointerEntered, move |_, _| {
            Some(Effect::recolor(color, duration))
        })
        .on(EventKind::PointerExited, move |_, _| {
            Some(Effect::restore_color(duration))
        })
    }

    pub fn reaction(&self, kind: EventKind) -> Option<&Reaction> {
        self.reactions.get(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_totals() {
        let spacing = Spacing::trbl(1.0, 2.0, 3.0, 4.0);
        assert_eq!(spacing.leading(), Vec2::new(4.0, 1.0));
        assert_eq!(spacing.total(), Vec2::new(6.0, 4.0));
    }

    #[test]
    fn test_builders_and_reactions() {
        let props = Properties::new()
            .with_color(palette::ACCENT)
            .with_clear_color(palette::BASE)
            .with_hover_color(palette::ACCENT_MUTED, Duration::from_millis(100));

        assert_eq!(props.clear_color, Some(palette::BASE));
        assert!(props.reactions.contains(EventKind::PointerEntered));
        assert!(props.reactions.contains(EventKind::PointerExited));
        assert!(!props.reactions.contains(EventKind::Clicked));
    }

    #[test]
    fn test_clones_share_no_bindings() {
        let template = Properties::new();
        let instance = template
            .clone()
            .on(EventKind::Clicked, |_, _| None);
        assert!(template.reactions.is_empty());
        assert!(instance.reaction(EventKind::Clicked).is_some());
    }
}

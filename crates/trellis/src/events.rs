//! Event routing.
//!
//! Input is queued by the host and delivered at the start of each tick.
//! Pointer input is hit-tested against the scene to synthesize enter, exit,
//! press, release and click events. Each event runs the target's reaction
//! to completion, including the effect it returns, before the next event is
//! looked at.

use std::collections::VecDeque;

use glam::Vec2;

use crate::error::Result;
use crate::scene::Scene;
use crate::NodeId;

/// Kind of event a reaction can be bound to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer moved onto the node or one of its descendants
    PointerEntered,
    /// Pointer left the node and all of its descendants
    PointerExited,
    PointerPressed,
    PointerReleased,
    /// Press and release on the same node
    Clicked,
}

impl EventKind {
    /// Whether undelivered events travel up to the nearest ancestor that reacts
    pub const fn bubbles(&self) -> bool {
        matches!(
            self,
            EventKind::PointerPressed | EventKind::PointerReleased | EventKind::Clicked
        )
    }
}

/// An event as seen by a reaction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    /// Pointer position in viewport coordinates
    pub position: Vec2,
}

impl Event {
    pub const fn new(kind: EventKind, position: Vec2) -> Self {
        Self { kind, position }
    }
}

#[derive(Clone, Copy, Debug)]
enum Input {
    Moved(Vec2),
    Pressed(Vec2),
    Released(Vec2),
    Targeted(NodeId, Event),
}

/// Queued input plus the pointer state carried between ticks
#[derive(Debug, Default)]
pub(crate) struct EventRouter {
    queue: VecDeque<Input>,
    /// Nodes under the pointer, root first
    hovered: Vec<NodeId>,
    /// Deepest node under the last press
    pressed: Option<NodeId>,
}

impl EventRouter {
    /// Drop every reference to a removed node
    pub(crate) fn forget(&mut self, id: NodeId) {
        self.hovered.retain(|hovered| *hovered != id);
        if self.pressed == Some(id) {
            self.pressed = None;
        }
        self.queue
            .retain(|input| !matches!(input, Input::Targeted(target, _) if *target == id));
    }
}

impl Scene {
    /// Queue an event for `target`. It does not bubble.
    pub fn post_event(&mut self, target: NodeId, event: Event) {
        self.router.queue.push_back(Input::Targeted(target, event));
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.router.queue.push_back(Input::Moved(position));
    }

    pub fn pointer_pressed(&mut self, position: Vec2) {
        self.router.queue.push_back(Input::Pressed(position));
    }

    pub fn pointer_released(&mut self, position: Vec2) {
        self.router.queue.push_back(Input::Released(position));
    }

    pub fn pending_events(&self) -> usize {
        self.router.queue.len()
    }

    /// Nodes currently under the pointer, root first
    pub fn hovered(&self) -> &[NodeId] {
        &self.router.hovered
    }

    /// Deliver every queued event. Returns the number of reactions that ran.
    pub(crate) fn deliver_events(&mut self) -> Result<usize> {
        let mut reacted = 0;
        while let Some(input) = self.router.queue.pop_front() {
            reacted += match input {
                Input::Moved(position) => self.update_hover(position)?,
                Input::Pressed(position) => {
                    let mut count = self.update_hover(position)?;
                    let target = self.hit_test(position);
                    self.router.pressed = target;
                    if let Some(target) = target {
                        let event = Event::new(EventKind::PointerPressed, position);
                        count += self.bubble(target, event)?;
                    }
                    count
                }
                Input::Released(position) => {
                    let mut count = self.update_hover(position)?;
                    let target = self.hit_test(position);
                    let pressed = self.router.pressed.take();
                    if let Some(target) = target {
                        let event = Event::new(EventKind::PointerReleased, position);
                        count += self.bubble(target, event)?;
                        if pressed == Some(target) && self.contains(target) {
                            let event = Event::new(EventKind::Clicked, position);
                            count += self.bubble(target, event)?;
                        }
                    }
                    count
                }
                Input::Targeted(target, event) => usize::from(self.dispatch(target, event)?),
            };
        }
        Ok(reacted)
    }

    /// Diff the hovered path and emit exits (deepest first) then entries
    /// (root first).
    fn update_hover(&mut self, position: Vec2) -> Result<usize> {
        let path = self.hit_path(position);
        let previous = std::mem::replace(&mut self.router.hovered, path.clone());

        let mut count = 0;
        for id in previous.iter().rev().filter(|id| !path.contains(*id)) {
            count += usize::from(self.dispatch(*id, Event::new(EventKind::PointerExited, position))?);
        }
        for id in path.iter().filter(|id| !previous.contains(*id)) {
            count += usize::from(self.dispatch(*id, Event::new(EventKind::PointerEntered, position))?);
        }
        Ok(count)
    }

    /// Deliver to `target` or the nearest ancestor with a reaction
    fn bubble(&mut self, target: NodeId, event: Event) -> Result<usize> {
        let mut current = Some(target);
        while let Some(id) = current {
            if self.dispatch(id, event)? {
                return Ok(1);
            }
            if !event.kind.bubbles() {
                break;
            }
            current = self.parent(id);
        }
        Ok(0)
    }

    /// Run the reaction of `id` for `event`, if any, and apply its effect.
    ///
    /// Returns whether a reaction ran. Events for removed nodes are dropped.
    fn dispatch(&mut self, id: NodeId, event: Event) -> Result<bool> {
        let Some(properties) = self.properties(id) else {
            log::debug!("{:?} for removed node {id:?} dropped", event.kind);
            return Ok(false);
        };
        let Some(reaction) = properties.reaction(event.kind).cloned() else {
            return Ok(false);
        };

        log::trace!("{:?} delivered to {id:?}", event.kind);
        if let Some(effect) = reaction(&event, id) {
            self.apply_effect(id, effect)?;
        }
        Ok(true)
    }
}

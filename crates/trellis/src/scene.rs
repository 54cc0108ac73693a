//! The retained scene graph.
//!
//! Nodes live in a [`SlotMap`] arena keyed by [`NodeId`]. A layout owns the
//! ordered list of its children; the `parent` link is a plain key used to walk
//! upwards and never keeps a node alive. Nodes are destroyed only by removing
//! them from their layout.
//!
//! All mutation happens on the update thread between render passes. Work
//! requested while a render pass is running goes through
//! [`RenderContext::defer`] and is applied at the start of the next
//! [`Scene::update`].

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use slotmap::{new_key_type, SlotMap};

use crate::color::Color;
use crate::component::Component;
use crate::config::SceneConfig;
use crate::drawable::{Drawable, Geometry, Layout};
use crate::easing::Easing;
use crate::error::{Result, SceneError};
use crate::events::{Event, EventRouter};
use crate::properties::{Effect, Properties};
use crate::recolor::Recolor;
use crate::renderer::{Framebuffer, Renderer};
use crate::strategy::LayoutStrategy;
use crate::style::{DrawableType, StyleRegistry};
use crate::transition::{Transition, TransitionKind, TransitionRequest};
use crate::unit::Unit;
use crate::vector::{Bounds, ResolveContext, Vector2};

new_key_type! {
    /// Handle to a node of a [`Scene`]
    pub struct NodeId;
}

pub(crate) struct LayoutContent {
    pub(crate) strategy: Rc<dyn LayoutStrategy>,
    pub(crate) children: Vec<NodeId>,
    /// Cached render target, allocated on first render
    pub(crate) framebuffer: Option<Framebuffer>,
}

pub(crate) enum Content {
    Component(Box<dyn Component>),
    Layout(LayoutContent),
}

pub(crate) struct Node {
    pub(crate) drawable_type: DrawableType,
    pub(crate) geometry: Geometry,
    /// `None` until the first bounds pass that reaches this node
    pub(crate) bounds: Option<Bounds>,
    /// Context the current bounds were resolved against
    pub(crate) last_context: Option<ResolveContext>,
    pub(crate) needs_recalculation: bool,
    pub(crate) needs_redraw: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) properties: Properties,
    pub(crate) color: Color,
    pub(crate) recolor: Option<Recolor>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) content: Content,
}

impl Node {
    fn new(
        drawable_type: DrawableType,
        geometry: Geometry,
        parent: Option<NodeId>,
        properties: Properties,
        content: Content,
    ) -> Self {
        Self {
            drawable_type,
            geometry,
            bounds: None,
            last_context: None,
            needs_recalculation: true,
            needs_redraw: true,
            parent,
            color: properties.color,
            properties,
            recolor: None,
            transitions: Vec::new(),
            content,
        }
    }

    pub(crate) fn is_layout(&self) -> bool {
        matches!(self.content, Content::Layout(_))
    }

    pub(crate) fn layout(&self) -> Option<&LayoutContent> {
        match &self.content {
            Content::Layout(layout) => Some(layout),
            Content::Component(_) => None,
        }
    }

    pub(crate) fn layout_mut(&mut self) -> Option<&mut LayoutContent> {
        match &mut self.content {
            Content::Layout(layout) => Some(layout),
            Content::Component(_) => None,
        }
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        self.layout()
            .map(|layout| layout.children.as_slice())
            .unwrap_or_default()
    }
}

/// A scene mutation that can be queued and applied at a tick boundary.
#[derive(Debug)]
pub enum Mutation {
    AddChild { parent: NodeId, drawable: Drawable },
    Remove(NodeId),
    SetPosition(NodeId, Vector2<Unit>),
    SetSize(NodeId, Option<Vector2<Unit>>),
    SetColor(NodeId, Color),
    StartTransition(NodeId, TransitionRequest),
    Post(NodeId, Event),
}

impl Mutation {
    fn target(&self) -> NodeId {
        match self {
            Mutation::AddChild { parent, .. } => *parent,
            Mutation::Remove(id)
            | Mutation::SetPosition(id, _)
            | Mutation::SetSize(id, _)
            | Mutation::SetColor(id, _)
            | Mutation::StartTransition(id, _)
            | Mutation::Post(id, _) => *id,
        }
    }
}

/// Handed to components while they draw.
///
/// The scene is mid-traversal during a render pass, so anything a component
/// wants changed is queued here and applied at the next tick.
#[derive(Debug, Default)]
pub struct RenderContext {
    deferred: RefCell<Vec<Mutation>>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&self, mutation: Mutation) {
        self.deferred.borrow_mut().push(mutation);
    }

    pub fn len(&self) -> usize {
        self.deferred.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.deferred.borrow().is_empty()
    }

    pub(crate) fn into_mutations(self) -> Vec<Mutation> {
        self.deferred.into_inner()
    }
}

/// A retained tree of drawables with cached layout rendering.
pub struct Scene {
    pub(crate) nodes: SlotMap<NodeId, Node>,
    pub(crate) root: NodeId,
    pub(crate) registry: StyleRegistry,
    pub(crate) config: SceneConfig,
    pub(crate) router: EventRouter,
    deferred: Vec<Mutation>,
    /// Slides waiting for their target's first bounds
    pending_slides: Vec<(NodeId, TransitionRequest)>,
    /// Targets of removed layouts, freed at the next render pass
    pub(crate) released: Vec<Framebuffer>,
}

impl Scene {
    /// Build a scene around `root`.
    ///
    /// Fails without creating anything if any drawable in the tree has no
    /// registered properties.
    pub fn new(registry: StyleRegistry, config: SceneConfig, root: Layout) -> Result<Self> {
        let mut scene = Self {
            nodes: SlotMap::with_key(),
            root: NodeId::default(),
            registry,
            config,
            router: EventRouter::default(),
            deferred: Vec::new(),
            pending_slides: Vec::new(),
            released: Vec::new(),
        };
        scene.root = scene.insert_tree(Drawable::Layout(root), None)?;
        log::debug!("scene created with {} nodes", scene.nodes.len());
        Ok(scene)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn viewport(&self) -> Vec2 {
        self.config.viewport
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Registry used for drawables inserted from now on
    pub fn registry_mut(&mut self) -> &mut StyleRegistry {
        &mut self.registry
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(SceneError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(SceneError::UnknownNode(id))
    }

    // Insertion

    fn insert_tree(&mut self, drawable: Drawable, parent: Option<NodeId>) -> Result<NodeId> {
        let mut inserted = Vec::new();
        match self.insert_recursive(drawable, parent, &mut inserted) {
            Ok(id) => Ok(id),
            Err(err) => {
                for id in inserted {
                    self.nodes.remove(id);
                }
                Err(err)
            }
        }
    }

    fn insert_recursive(
        &mut self,
        drawable: Drawable,
        parent: Option<NodeId>,
        inserted: &mut Vec<NodeId>,
    ) -> Result<NodeId> {
        let drawable_type = drawable.drawable_type();
        let properties = self.registry.resolve(drawable_type)?;

        match drawable {
            Drawable::Component(node) => {
                let id = self.nodes.insert(Node::new(
                    drawable_type,
                    node.geometry,
                    parent,
                    properties,
                    Content::Component(node.component),
                ));
                inserted.push(id);
                Ok(id)
            }
            Drawable::Layout(layout) => {
                let content = Content::Layout(LayoutContent {
                    strategy: layout.strategy,
                    children: Vec::with_capacity(layout.children.len()),
                    framebuffer: None,
                });
                let id = self.nodes.insert(Node::new(
                    drawable_type,
                    layout.geometry,
                    parent,
                    properties,
                    content,
                ));
                inserted.push(id);

                for child in layout.children {
                    let child_id = self.insert_recursive(child, Some(id), inserted)?;
                    if let Some(content) = self.nodes[id].layout_mut() {
                        content.children.push(child_id);
                    }
                }
                Ok(id)
            }
        }
    }

    // Dirty tracking

    /// Flag `id` and its ancestors for a bounds pass
    pub(crate) fn mark_recalculation(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get_mut(node_id) else {
                break;
            };
            node.needs_recalculation = true;
            current = node.parent;
        }
    }

    /// Flag `id` and its ancestors for a render pass
    pub(crate) fn mark_redraw(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get_mut(node_id) else {
                break;
            };
            node.needs_redraw = true;
            current = node.parent;
        }
    }

    // Host mutations

    /// Insert `drawable` as the last (topmost) child of `parent`
    pub fn add_child(&mut self, parent: NodeId, drawable: impl Into<Drawable>) -> Result<NodeId> {
        if !self.node(parent)?.is_layout() {
            return Err(SceneError::NotALayout(parent));
        }
        let id = self.insert_tree(drawable.into(), Some(parent))?;
        if let Some(layout) = self.nodes[parent].layout_mut() {
            layout.children.push(id);
        }
        self.mark_recalculation(parent);
        self.mark_redraw(parent);
        Ok(id)
    }

    /// Remove `id` and its whole subtree from the scene.
    ///
    /// Active transitions of removed nodes are dropped. Render passes close
    /// every transition bracket before returning, so none can be open here.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(SceneError::RootRemoval);
        }
        let parent = self.node(id)?.parent;

        if let Some(parent) = parent {
            if let Some(layout) = self.nodes.get_mut(parent).and_then(Node::layout_mut) {
                layout.children.retain(|child| *child != id);
            }
        }

        let mut stack = vec![id];
        let mut removed = 0usize;
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.nodes.remove(node_id) else {
                continue;
            };
            removed += 1;
            for transition in &node.transitions {
                debug_assert!(!transition.is_applied());
            }
            if let Content::Layout(layout) = node.content {
                stack.extend(layout.children);
                self.released.extend(layout.framebuffer);
            }
            self.router.forget(node_id);
        }
        self.pending_slides.retain(|(target, _)| self.nodes.contains_key(*target));

        if let Some(parent) = parent {
            self.mark_recalculation(parent);
            self.mark_redraw(parent);
        }
        log::debug!("removed {removed} nodes");
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Vector2<Unit>) -> Result<()> {
        self.node_mut(id)?.geometry.position = position;
        self.mark_recalculation(id);
        self.mark_redraw(id);
        Ok(())
    }

    /// Set or clear the explicit size of `id`
    pub fn set_size(&mut self, id: NodeId, size: Option<Vector2<Unit>>) -> Result<()> {
        self.node_mut(id)?.geometry.size = size;
        self.mark_recalculation(id);
        self.mark_redraw(id);
        Ok(())
    }

    /// Set the current color immediately, cancelling any running recolor
    pub fn set_color(&mut self, id: NodeId, color: Color) -> Result<()> {
        let node = self.node_mut(id)?;
        node.color = color;
        node.recolor = None;
        self.mark_redraw(id);
        Ok(())
    }

    /// Animate the color of `id` from its current value to `to`
    pub fn recolor(&mut self, id: NodeId, to: Color, duration: Duration, easing: Easing) -> Result<()> {
        let node = self.node_mut(id)?;
        node.recolor = Some(Recolor::new(node.color, to, duration, easing)?);
        self.mark_redraw(id);
        Ok(())
    }

    /// Start a transition on `id`.
    ///
    /// Slides need the target's bounds; on a node that has not been through a
    /// bounds pass yet the slide starts right after the next one.
    pub fn start_transition(&mut self, id: NodeId, request: TransitionRequest) -> Result<()> {
        let target = match self.absolute_bounds(id) {
            Some(bounds) => bounds,
            None if matches!(request.kind, TransitionKind::Slide(_)) => {
                self.node(id)?;
                log::debug!("{:?} on {id:?} waits for bounds", request.kind);
                self.pending_slides.push((id, request));
                return Ok(());
            }
            None => {
                self.node(id)?;
                Bounds::default()
            }
        };

        let transition = request.build(target, self.config.viewport)?;
        log::trace!("{:?} started on {id:?}", request.kind);
        self.node_mut(id)?.transitions.push(transition);
        self.mark_redraw(id);
        Ok(())
    }

    /// Drop every active transition of `id`
    pub fn stop_transitions(&mut self, id: NodeId) -> Result<()> {
        let node = self.node_mut(id)?;
        let stopped = node.transitions.len();
        node.transitions.clear();
        self.pending_slides.retain(|(target, _)| *target != id);
        if stopped > 0 {
            self.mark_redraw(id);
        }
        Ok(())
    }

    /// Change the viewport the root resolves against
    pub fn resize(&mut self, viewport: impl Into<Vec2>) {
        self.config.viewport = viewport.into();
        let mut layouts = Vec::new();
        self.for_each_layout(|id| layouts.push(id));
        for id in layouts {
            let node = &mut self.nodes[id];
            node.needs_recalculation = true;
            node.needs_redraw = true;
        }
    }

    /// Queue a mutation for the next tick
    pub fn defer(&mut self, mutation: Mutation) {
        self.deferred.push(mutation);
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    pub(crate) fn extend_deferred(&mut self, mutations: Vec<Mutation>) {
        self.deferred.extend(mutations);
    }

    pub fn apply(&mut self, mutation: Mutation) -> Result<()> {
        match mutation {
            Mutation::AddChild { parent, drawable } => self.add_child(parent, drawable).map(|_| ()),
            Mutation::Remove(id) => self.remove(id),
            Mutation::SetPosition(id, position) => self.set_position(id, position),
            Mutation::SetSize(id, size) => self.set_size(id, size),
            Mutation::SetColor(id, color) => self.set_color(id, color),
            Mutation::StartTransition(id, request) => self.start_transition(id, request),
            Mutation::Post(id, event) => {
                self.post_event(id, event);
                Ok(())
            }
        }
    }

    /// Apply queued mutations in order.
    ///
    /// Mutations whose target was removed in the meantime are skipped. Any
    /// other failure drops the failing mutation and stops the batch; the
    /// mutations after it stay queued for the next tick.
    fn apply_deferred(&mut self) -> Result<usize> {
        let mut mutations = std::mem::take(&mut self.deferred).into_iter();
        let mut applied = 0;
        while let Some(mutation) = mutations.next() {
            let target = mutation.target();
            match self.apply(mutation) {
                Ok(()) => applied += 1,
                Err(SceneError::UnknownNode(id)) if id == target => {
                    log::debug!("deferred mutation for removed node {id:?} skipped");
                }
                Err(err) => {
                    let remaining: Vec<Mutation> = mutations.by_ref().collect();
                    log::debug!("deferred mutation failed, {} requeued", remaining.len());
                    // Mutations deferred while applying this batch go after the tail
                    let newer = std::mem::replace(&mut self.deferred, remaining);
                    self.deferred.extend(newer);
                    return Err(err);
                }
            }
        }
        Ok(applied)
    }

    pub(crate) fn apply_effect(&mut self, id: NodeId, effect: Effect) -> Result<()> {
        match effect {
            Effect::Transition(request) => self.start_transition(id, request),
            Effect::Recolor { to, duration, easing } => self.recolor(id, to, duration, easing),
            Effect::RestoreColor { duration, easing } => {
                let to = self.node(id)?.properties.color;
                self.recolor(id, to, duration, easing)
            }
            Effect::Batch(effects) => {
                for effect in effects {
                    self.apply_effect(id, effect)?;
                }
                Ok(())
            }
        }
    }

    // Traversal

    /// Visit every layout depth-first, parents before their children.
    /// Components are never visited.
    pub fn for_each_layout(&self, mut visit: impl FnMut(NodeId)) {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let Some(layout) = node.layout() else {
                continue;
            };
            visit(id);
            stack.extend(
                layout
                    .children
                    .iter()
                    .rev()
                    .filter(|child| self.nodes.get(**child).is_some_and(Node::is_layout)),
            );
        }
    }

    // Tick

    /// Run one update tick.
    ///
    /// In order: deferred mutations, queued events, animations (by `delta`
    /// clamped to `max_frame_delta`), then the bounds pass.
    pub fn update(&mut self, delta: Duration, renderer: &mut dyn Renderer) -> Result<()> {
        let applied = self.apply_deferred()?;
        let delivered = self.deliver_events()?;
        let animated = self.advance_animations(delta.min(self.config.max_frame_delta));
        let recalculated = self.calculate_bounds(renderer)?;
        if recalculated > 0 {
            self.retarget_slides();
        }
        self.start_pending_slides()?;

        log::debug!(
            "tick: {applied} mutations, {delivered} events, {animated} animated, {recalculated} recalculated"
        );
        Ok(())
    }

    /// Update, render dirty layouts, then present the root.
    pub fn frame(&mut self, delta: Duration, renderer: &mut dyn Renderer) -> Result<()> {
        self.update(delta, renderer)?;
        self.render(renderer);
        self.present(renderer);
        Ok(())
    }

    fn advance_animations(&mut self, delta: Duration) -> usize {
        let mut ids = Vec::new();
        self.for_each_layout(|id| ids.push(id));
        let components: Vec<NodeId> = ids
            .iter()
            .flat_map(|id| self.nodes[*id].children().iter().copied())
            .filter(|id| !self.nodes[*id].is_layout())
            .collect();
        ids.extend(components);

        let mut animated = 0;
        for id in ids {
            let node = &mut self.nodes[id];
            let mut changed = false;

            if let Some(recolor) = node.recolor.as_mut() {
                node.color = recolor.advance(delta);
                if recolor.is_finished() {
                    node.recolor = None;
                }
                changed = true;
            }

            for transition in node.transitions.iter_mut() {
                if !transition.is_finished() {
                    transition.advance(delta);
                    changed = true;
                }
            }
            node.transitions
                .retain(|t| !(t.is_finished() && t.rests_at_identity()));

            if changed {
                animated += 1;
                self.mark_redraw(id);
            }
        }
        animated
    }

    /// Point running slides at their node's current resting position
    fn retarget_slides(&mut self) {
        let sliding: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| {
                node.transitions
                    .iter()
                    .any(|t| matches!(t.kind(), TransitionKind::Slide(_)) && !t.is_finished())
            })
            .map(|(id, _)| id)
            .collect();

        for id in sliding {
            let Some(target) = self.absolute_bounds(id) else {
                continue;
            };
            for transition in self.nodes[id].transitions.iter_mut() {
                transition.retarget(target);
            }
            self.mark_redraw(id);
        }
    }

    fn start_pending_slides(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending_slides);
        for (id, request) in pending {
            if self.absolute_bounds(id).is_some() {
                self.start_transition(id, request)?;
            } else {
                self.pending_slides.push((id, request));
            }
        }
        Ok(())
    }

    // Queries

    /// Bounds relative to the owning layout
    pub fn bounds(&self, id: NodeId) -> Option<Bounds> {
        self.nodes.get(id)?.bounds
    }

    /// Bounds in viewport coordinates, ignoring active transitions
    pub fn absolute_bounds(&self, id: NodeId) -> Option<Bounds> {
        let mut bounds = self.nodes.get(id)?.bounds?;
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            let node = self.nodes.get(parent)?;
            bounds = bounds.translated(node.bounds?.position);
            current = node.parent;
        }
        Some(bounds)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(Node::children).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    pub fn is_layout(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_layout)
    }

    pub fn drawable_type(&self, id: NodeId) -> Option<DrawableType> {
        self.nodes.get(id).map(|node| node.drawable_type)
    }

    pub fn geometry(&self, id: NodeId) -> Option<&Geometry> {
        self.nodes.get(id).map(|node| &node.geometry)
    }

    pub fn properties(&self, id: NodeId) -> Option<&Properties> {
        self.nodes.get(id).map(|node| &node.properties)
    }

    /// Mutable properties of `id`.
    ///
    /// Padding feeds the bounds pass, so the node is flagged for both a
    /// bounds pass and a redraw.
    pub fn properties_mut(&mut self, id: NodeId) -> Option<&mut Properties> {
        self.mark_recalculation(id);
        self.mark_redraw(id);
        self.nodes.get_mut(id).map(|node| &mut node.properties)
    }

    pub fn color(&self, id: NodeId) -> Option<Color> {
        self.nodes.get(id).map(|node| node.color)
    }

    pub fn needs_redraw(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.needs_redraw)
    }

    pub fn needs_recalculation(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.needs_recalculation)
    }

    pub fn active_transitions(&self, id: NodeId) -> &[Transition] {
        self.nodes
            .get(id)
            .map(|node| node.transitions.as_slice())
            .unwrap_or_default()
    }

    pub fn is_recoloring(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.recolor.is_some())
    }

    /// Cached render target of a layout, once it has been rendered
    pub fn framebuffer(&self, id: NodeId) -> Option<Framebuffer> {
        self.nodes.get(id)?.layout()?.framebuffer
    }
}

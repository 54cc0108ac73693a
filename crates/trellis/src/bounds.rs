//! Bounds inference.
//!
//! Sizes are resolved top-down (a layout hands its content extent to its
//! children) and aggregated bottom-up (a layout without an explicit size is
//! as large as the furthest child extent plus trailing padding). Results are
//! staged and only written back once the whole pass has succeeded.

use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;

use crate::error::{Result, SceneError};
use crate::renderer::Renderer;
use crate::scene::{Content, Node, Scene};
use crate::strategy::Slot;
use crate::vector::{Bounds, ResolveContext};
use crate::NodeId;

#[derive(Clone, Copy, Debug)]
struct Staged {
    size: Vec2,
    position: Vec2,
    context: ResolveContext,
    /// Whether the node was measured this pass rather than reused
    fresh: bool,
}

type Stage = HashMap<NodeId, Staged>;

impl Scene {
    /// Recalculate bounds of every node whose geometry may have changed.
    ///
    /// Nodes that are clean and whose resolve context is unchanged keep their
    /// bounds without being visited. On error nothing is written back.
    ///
    /// Returns the number of nodes that were measured.
    pub fn calculate_bounds(&mut self, renderer: &mut dyn Renderer) -> Result<usize> {
        let root = self.root;
        let ctx = ResolveContext::parent(self.config.viewport);

        let mut stage = Stage::new();
        self.measure(root, ctx, renderer, &mut stage)?;
        let position = self.node(root)?.geometry.position.resolve(ctx)?;
        if let Some(entry) = stage.get_mut(&root) {
            entry.position = position;
        }

        Ok(self.commit(stage))
    }

    fn measure(
        &mut self,
        id: NodeId,
        ctx: ResolveContext,
        renderer: &mut dyn Renderer,
        stage: &mut Stage,
    ) -> Result<Vec2> {
        let node = self.node(id)?;
        if !node.needs_recalculation && node.last_context == Some(ctx) {
            if let Some(bounds) = node.bounds {
                stage.insert(
                    id,
                    Staged {
                        size: bounds.size,
                        position: bounds.position,
                        context: ctx,
                        fresh: false,
                    },
                );
                return Ok(bounds.size);
            }
        }

        let size = if node.is_layout() {
            self.measure_layout(id, ctx, renderer, stage)?
        } else {
            self.measure_component(id, ctx, renderer)?
        };
        log::trace!("measured {id:?}: {size}");

        stage.insert(
            id,
            Staged {
                size,
                position: Vec2::ZERO,
                context: ctx,
                fresh: true,
            },
        );
        Ok(size)
    }

    fn measure_component(
        &mut self,
        id: NodeId,
        ctx: ResolveContext,
        renderer: &mut dyn Renderer,
    ) -> Result<Vec2> {
        let Node {
            drawable_type,
            geometry,
            properties,
            content,
            ..
        } = self.node_mut(id)?;

        if let Some(size) = geometry.size {
            return size.resolve(ctx);
        }

        let intrinsic = match content {
            Content::Component(component) => component.intrinsic_size(renderer, properties),
            Content::Layout(_) => None,
        };
        intrinsic.ok_or(SceneError::UnresolvableSize {
            type_name: drawable_type.name(),
            reason: "component has neither an explicit nor an intrinsic size",
        })
    }

    fn measure_layout(
        &mut self,
        id: NodeId,
        ctx: ResolveContext,
        renderer: &mut dyn Renderer,
        stage: &mut Stage,
    ) -> Result<Vec2> {
        let node = self.node(id)?;
        let type_name = node.drawable_type.name();
        let padding = node.properties.padding;
        let explicit = node.geometry.size.map(|size| size.resolve(ctx)).transpose()?;
        let layout = node.layout().ok_or(SceneError::NotALayout(id))?;
        let strategy = Rc::clone(&layout.strategy);
        let children = layout.children.clone();

        let inner = explicit.map(|size| (size - padding.total()).max(Vec2::ZERO));

        for child in &children {
            strategy.accepts(&self.node(*child)?.geometry)?;
        }

        let mut sizes = vec![None; children.len()];
        let fixed_ctx = strategy.child_context(inner);
        self.measure_children(&children, &mut sizes, false, fixed_ctx, renderer, stage)?;

        let total_weight: f32 = children
            .iter()
            .map(|child| self.nodes[*child].geometry.flex_weight())
            .sum();
        if children
            .iter()
            .any(|child| self.nodes[*child].geometry.is_flex_sized())
        {
            let fixed: Vec<Vec2> = sizes.iter().flatten().copied().collect();
            let flex_ctx = strategy.flex_context(inner, &fixed, children.len(), total_weight)?;
            self.measure_children(&children, &mut sizes, true, flex_ctx, renderer, stage)?;
        }

        let mut slots: Vec<Slot> = children
            .iter()
            .zip(&sizes)
            .map(|(child, size)| {
                Slot::new(self.nodes[*child].geometry.position, size.unwrap_or_default())
            })
            .collect();
        strategy.place(inner, &mut slots)?;

        let mut extent = Vec2::ZERO;
        for (child, slot) in children.iter().zip(&slots) {
            let position = slot.position + padding.leading();
            if let Some(entry) = stage.get_mut(child) {
                entry.position = position;
            }
            extent = extent.max(position + slot.size);
        }

        if let Some(size) = explicit {
            return Ok(size);
        }
        if children.is_empty() {
            return Err(SceneError::UnresolvableSize {
                type_name,
                reason: "layout has no children and no explicit size",
            });
        }
        let size = extent + padding.trailing();
        if size.cmple(Vec2::ZERO).all() {
            return Err(SceneError::UnresolvableSize {
                type_name,
                reason: "children have no extent",
            });
        }
        Ok(size)
    }

    /// Measure the children whose flex-ness matches `flex`, child layouts first
    fn measure_children(
        &mut self,
        children: &[NodeId],
        sizes: &mut [Option<Vec2>],
        flex: bool,
        ctx: ResolveContext,
        renderer: &mut dyn Renderer,
        stage: &mut Stage,
    ) -> Result<()> {
        for layouts in [true, false] {
            for (index, child) in children.iter().enumerate() {
                let node = self.node(*child)?;
                if node.is_layout() != layouts || node.geometry.is_flex_sized() != flex {
                    continue;
                }
                sizes[index] = Some(self.measure(*child, ctx, renderer, stage)?);
            }
        }
        Ok(())
    }

    fn commit(&mut self, stage: Stage) -> usize {
        let mut measured = 0;
        let mut changed = Vec::new();
        for (id, entry) in stage {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            let bounds = Bounds::new(entry.position, entry.size);
            if node.bounds != Some(bounds) {
                node.bounds = Some(bounds);
                changed.push(id);
            }
            node.last_context = Some(entry.context);
            node.needs_recalculation = false;
            if entry.fresh {
                measured += 1;
            }
        }
        for id in changed {
            self.mark_redraw(id);
        }
        measured
    }
}

#[cfg(test)]
mod tests {
    use crate::component::{Label, Panel};
    use crate::config::SceneConfig;
    use crate::drawable::{Drawable, Layout};
    use crate::error::SceneError;
    use crate::properties::{Properties, Spacing};
    use crate::recording::RecordingRenderer;
    use crate::resource::Font;
    use crate::scene::Scene;
    use crate::strategy::Linear;
    use crate::style::StyleRegistry;
    use crate::unit::{Unit, UnitKind};
    use crate::vector::{Bounds, Vector2};
    use glam::Vec2;

    fn panel(x: f32, y: f32, w: f32, h: f32) -> Drawable {
        Drawable::component(Panel).at(x, y).sized(w, h)
    }

    fn scene_with(registry: StyleRegistry, root: Layout) -> Scene {
        Scene::new(registry, SceneConfig::default(), root).unwrap()
    }

    fn scene(root: Layout) -> Scene {
        scene_with(StyleRegistry::with_defaults(), root)
    }

    #[test]
    fn test_size_is_max_child_extent() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([
            panel(0.0, 0.0, 100.0, 50.0),
            panel(50.0, 50.0, 100.0, 100.0),
        ]));
        scene.calculate_bounds(&mut renderer).unwrap();

        let root = scene.root();
        assert_eq!(scene.bounds(root).unwrap().size, Vec2::new(150.0, 150.0));
        let second = scene.children(root)[1];
        assert_eq!(
            scene.bounds(second),
            Some(Bounds::new(Vec2::new(50.0, 50.0), Vec2::new(100.0, 100.0)))
        );
    }

    #[test]
    fn test_clean_recalculation_is_idempotent() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([
            panel(0.0, 0.0, 100.0, 50.0),
            Layout::new([panel(5.0, 5.0, 10.0, 10.0)]).at(100.0, 0.0).into(),
        ]));
        let first = scene.calculate_bounds(&mut renderer).unwrap();
        let size = scene.bounds(scene.root()).unwrap().size;
        assert_eq!(first, 4);

        let second = scene.calculate_bounds(&mut renderer).unwrap();
        assert_eq!(second, 0);
        assert_eq!(scene.bounds(scene.root()).unwrap().size, size);
    }

    #[test]
    fn test_nested_layout_aggregates_first() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([
            Layout::new([panel(0.0, 0.0, 30.0, 10.0), panel(0.0, 10.0, 10.0, 30.0)])
                .at(10.0, 10.0)
                .into(),
        ]));
        scene.calculate_bounds(&mut renderer).unwrap();
        let inner = scene.children(scene.root())[0];
        assert_eq!(scene.bounds(inner).unwrap().size, Vec2::new(30.0, 40.0));
        assert_eq!(scene.bounds(scene.root()).unwrap().size, Vec2::new(40.0, 50.0));
    }

    #[test]
    fn test_empty_layout_without_size_fails() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::empty());
        assert!(matches!(
            scene.calculate_bounds(&mut renderer),
            Err(SceneError::UnresolvableSize { type_name: "Layout", .. })
        ));

        let mut scene = self::scene(Layout::empty().sized(20.0, 20.0));
        scene.calculate_bounds(&mut renderer).unwrap();
        assert_eq!(scene.bounds(scene.root()).unwrap().size, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn test_zero_extent_children_fail() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([panel(0.0, 0.0, 0.0, 0.0)]));
        assert!(matches!(
            scene.calculate_bounds(&mut renderer),
            Err(SceneError::UnresolvableSize { .. })
        ));
    }

    #[test]
    fn test_padding_offsets_children() {
        let mut registry = StyleRegistry::with_defaults();
        registry.register::<Layout>(Properties::new().with_padding(Spacing::trbl(1.0, 2.0, 3.0, 4.0)));
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene_with(registry, Layout::new([panel(0.0, 0.0, 10.0, 10.0)]));
        scene.calculate_bounds(&mut renderer).unwrap();

        let child = scene.children(scene.root())[0];
        assert_eq!(scene.bounds(child).unwrap().position, Vec2::new(4.0, 1.0));
        assert_eq!(scene.bounds(scene.root()).unwrap().size, Vec2::new(16.0, 14.0));
    }

    #[test]
    fn test_percent_resolves_against_content_extent() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(
            Layout::new([Drawable::component(Panel)
                .with_position(Vector2::percent(50.0, 0.0))
                .with_size(Vector2::percent(25.0, 100.0))])
            .sized(200.0, 100.0),
        );
        scene.calculate_bounds(&mut renderer).unwrap();
        let child = scene.children(scene.root())[0];
        assert_eq!(
            scene.bounds(child),
            Some(Bounds::new(Vec2::new(100.0, 0.0), Vec2::new(50.0, 100.0)))
        );
    }

    #[test]
    fn test_root_percent_resolves_against_viewport() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::empty().with_size(Vector2::percent(100.0, 50.0)));
        scene.calculate_bounds(&mut renderer).unwrap();
        assert_eq!(scene.bounds(scene.root()).unwrap().size, Vec2::new(800.0, 300.0));
    }

    #[test]
    fn test_failed_pass_leaves_previous_bounds() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([panel(0.0, 0.0, 10.0, 10.0)]));
        let root = scene.root();
        scene.calculate_bounds(&mut renderer).unwrap();

        // Percent size inside a layout whose size is inferred
        let bad = scene
            .add_child(
                root,
                Drawable::component(Panel).with_size(Vector2::percent(10.0, 10.0)),
            )
            .unwrap();
        assert_eq!(
            scene.calculate_bounds(&mut renderer),
            Err(SceneError::MissingParentExtent)
        );
        assert_eq!(scene.bounds(root).unwrap().size, Vec2::new(10.0, 10.0));
        assert_eq!(scene.bounds(bad), None);
        assert!(scene.needs_recalculation(root));
    }

    #[test]
    fn test_changed_bounds_mark_redraw() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([panel(0.0, 0.0, 10.0, 10.0)]));
        let root = scene.root();
        let leaf = scene.children(root)[0];
        scene.calculate_bounds(&mut renderer).unwrap();
        scene.render(&mut renderer);
        assert!(!scene.needs_redraw(root));

        scene.set_position(leaf, Vector2::px(5.0, 0.0)).unwrap();
        scene.calculate_bounds(&mut renderer).unwrap();
        assert!(scene.needs_redraw(root));
        assert_eq!(scene.bounds(root).unwrap().size, Vec2::new(15.0, 10.0));
    }

    #[test]
    fn test_linear_distributes_flex() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(
            Layout::new([
                panel(0.0, 0.0, 50.0, 20.0),
                Drawable::component(Panel).with_size(Vector2::new(Unit::flex(1.0), Unit::px(20.0))),
                Drawable::component(Panel).with_size(Vector2::new(Unit::flex(3.0), Unit::px(20.0))),
            ])
            .with_strategy(Linear::horizontal(10.0))
            .sized(300.0, 20.0),
        );
        scene.calculate_bounds(&mut renderer).unwrap();

        let children = scene.children(scene.root()).to_vec();
        // 300 - 50 - 2 * 10 = 230 free over 4 weights
        let unit = 230.0 / 4.0;
        let second = scene.bounds(children[1]).unwrap();
        let third = scene.bounds(children[2]).unwrap();
        assert!((second.size.x - unit).abs() < 1e-4);
        assert!((third.size.x - 3.0 * unit).abs() < 1e-4);
        assert!((second.position.x - 60.0).abs() < 1e-4);
        assert!((third.position.x - (70.0 + unit)).abs() < 1e-4);
    }

    #[test]
    fn test_absolute_rejects_flex_child() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([Drawable::component(Panel)
            .with_size(Vector2::new(Unit::flex(1.0), Unit::px(10.0)))]));
        assert_eq!(
            scene.calculate_bounds(&mut renderer),
            Err(SceneError::IncompatibleUnit {
                strategy: "absolute",
                unit: UnitKind::Flex,
                role: "size",
            })
        );
    }

    #[test]
    fn test_intrinsic_sizes() {
        let mut renderer = RecordingRenderer::new().with_image_size("logo.png", 32.0, 16.0);
        let font = Font::new("mono", 10.0).with_line_spacing(1.0);
        let mut scene = scene(
            Layout::new([
                Drawable::component(Label::new("hi", font)),
                Drawable::component(crate::component::Picture::new(crate::resource::Image::new(
                    "logo.png",
                ))),
            ])
            .with_strategy(Linear::vertical(0.0)),
        );
        scene.calculate_bounds(&mut renderer).unwrap();

        let children = scene.children(scene.root()).to_vec();
        // Label padding defaults to 4 horizontal, 2 vertical
        assert_eq!(scene.bounds(children[0]).unwrap().size, Vec2::new(18.0, 14.0));
        assert_eq!(
            scene.bounds(children[1]),
            Some(Bounds::new(Vec2::new(0.0, 14.0), Vec2::new(32.0, 16.0)))
        );
        assert_eq!(scene.bounds(scene.root()).unwrap().size, Vec2::new(32.0, 30.0));
    }

    #[test]
    fn test_unsized_panel_fails() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([Drawable::component(Panel)]));
        assert!(matches!(
            scene.calculate_bounds(&mut renderer),
            Err(SceneError::UnresolvableSize { type_name: "Panel", .. })
        ));
    }
}

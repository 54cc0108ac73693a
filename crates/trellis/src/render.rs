//! Cached rendering.
//!
//! Every layout draws its children into its own framebuffer and is drawn by
//! its parent as a single bitmap. Only layouts flagged `needs_redraw` touch
//! the renderer; a clean layout costs nothing.

use crate::color::Color;
use crate::component::ComponentFrame;
use crate::renderer::{pixel_extent, Renderer};
use crate::scene::{Content, Node, RenderContext, Scene};
use crate::transition::{apply_all, unapply_all};
use crate::NodeId;

impl Scene {
    /// Re-render every dirty layout into its framebuffer.
    ///
    /// Mutations components request while drawing are queued for the next
    /// [`Scene::update`].
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        for framebuffer in self.released.drain(..) {
            renderer.release_framebuffer(framebuffer);
        }

        let root = self.root;
        if self.bounds(root).is_none() {
            log::warn!("render requested before the first bounds pass");
            return;
        }

        let context = RenderContext::new();
        let redrawn = self.render_layout(root, renderer, &context);
        if redrawn > 0 {
            log::debug!("redrew {redrawn} layouts");
        }
        self.extend_deferred(context.into_mutations());
    }

    /// Composite the root layout onto the currently bound target
    pub fn present(&self, renderer: &mut dyn Renderer) {
        let Some(node) = self.nodes.get(self.root) else {
            return;
        };
        if let (Some(bounds), Some(framebuffer)) = (node.bounds, self.framebuffer(self.root)) {
            renderer.draw_framebuffer(&framebuffer, bounds.position.x, bounds.position.y);
        }
    }

    fn render_layout(
        &mut self,
        id: NodeId,
        renderer: &mut dyn Renderer,
        context: &RenderContext,
    ) -> usize {
        let Some(node) = self.nodes.get(id) else {
            return 0;
        };
        if !node.needs_redraw {
            log::trace!("{id:?} clean, reusing framebuffer");
            return 0;
        }
        let Some(bounds) = node.bounds else {
            return 0;
        };
        let children = node.children().to_vec();
        let background = match node.properties.clear_color {
            Some(color) => color,
            None if id == self.root => self.config.clear_color,
            None => Color::transparent(),
        };

        let mut redrawn = 0;
        for child in &children {
            if self.is_layout(*child) {
                redrawn += self.render_layout(*child, renderer, context);
            }
        }

        let (width, height) = pixel_extent(bounds.size);
        let Some(layout) = self.nodes[id].layout_mut() else {
            return redrawn;
        };
        let framebuffer = match layout.framebuffer.take() {
            Some(framebuffer) if framebuffer.fits(bounds.size) => framebuffer,
            Some(framebuffer) => renderer.resize_framebuffer(framebuffer, width, height),
            None => renderer.create_framebuffer(width, height),
        };
        layout.framebuffer = Some(framebuffer);

        log::trace!("redrawing {id:?} into framebuffer {}", framebuffer.id());
        renderer.bind_framebuffer(&framebuffer);
        renderer.clear(background);
        for child in &children {
            self.draw_child(*child, renderer, context);
        }
        renderer.unbind_framebuffer(&framebuffer);

        self.nodes[id].needs_redraw = false;
        redrawn + 1
    }

    /// Draw one child at its position, bracketed by its transitions
    fn draw_child(&mut self, id: NodeId, renderer: &mut dyn Renderer, context: &RenderContext) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let Node {
            bounds,
            properties,
            color,
            transitions,
            content,
            needs_redraw,
            ..
        } = node;
        let Some(bounds) = *bounds else {
            return;
        };

        apply_all(transitions, renderer);
        let saved_alpha = (properties.opacity < 1.0).then(|| {
            let alpha = renderer.global_alpha();
            renderer.set_global_alpha(alpha * properties.opacity.max(0.0));
            alpha
        });
        renderer.translate(bounds.position.x, bounds.position.y);

        match content {
            Content::Component(component) => {
                let frame = ComponentFrame {
                    id,
                    size: bounds.size,
                    color: *color,
                    properties,
                    context,
                };
                component.render(renderer, &frame);
            }
            Content::Layout(layout) => {
                if let Some(framebuffer) = &layout.framebuffer {
                    renderer.draw_framebuffer(framebuffer, 0.0, 0.0);
                }
            }
        }

        renderer.translate(-bounds.position.x, -bounds.position.y);
        if let Some(alpha) = saved_alpha {
            renderer.set_global_alpha(alpha);
        }
        unapply_all(transitions, renderer);
        *needs_redraw = false;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec2;

    use crate::color::Color;
    use crate::component::{Component, ComponentFrame, Panel};
    use crate::config::SceneConfig;
    use crate::drawable::{Drawable, Layout};
    use crate::easing::Easing;
    use crate::properties::Properties;
    use crate::recording::{Command, RecordingRenderer};
    use crate::renderer::Renderer;
    use crate::scene::{Mutation, Scene};
    use crate::style::StyleRegistry;
    use crate::transition::TransitionKind;
    use crate::vector::Rect;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn panel(x: f32, y: f32, w: f32, h: f32) -> Drawable {
        Drawable::component(Panel).at(x, y).sized(w, h)
    }

    fn scene(root: Layout) -> Scene {
        Scene::new(StyleRegistry::with_defaults(), SceneConfig::default(), root).unwrap()
    }

    #[test]
    fn test_clean_layout_draws_nothing() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([panel(0.0, 0.0, 100.0, 50.0)]));
        scene.update(ms(16), &mut renderer).unwrap();
        scene.render(&mut renderer);
        assert!(renderer.draw_count() > 0);

        renderer.clear_commands();
        scene.update(ms(16), &mut renderer).unwrap();
        scene.render(&mut renderer);
        assert!(renderer.commands().is_empty());
    }

    #[test]
    fn test_render_order_and_framebuffer() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([panel(10.0, 20.0, 30.0, 40.0)]));
        scene.frame(ms(16), &mut renderer).unwrap();

        let root = scene.root();
        let framebuffer = scene.framebuffer(root).unwrap();
        assert_eq!((framebuffer.width(), framebuffer.height()), (40, 60));

        let fill = Command::FillRect {
            rect: Rect::from_min_size(Vec2::ZERO, Vec2::new(30.0, 40.0)),
            color: scene.color(scene.children(root)[0]).unwrap(),
            corner_radius: 4.0,
            alpha: 1.0,
        };
        assert_eq!(
            renderer.commands(),
            &[
                Command::CreateFramebuffer(framebuffer),
                Command::BindFramebuffer(framebuffer.id()),
                Command::Clear(SceneConfig::default().clear_color),
                Command::Translate(Vec2::new(10.0, 20.0)),
                fill,
                Command::Translate(Vec2::new(-10.0, -20.0)),
                Command::UnbindFramebuffer(framebuffer.id()),
                Command::DrawFramebuffer {
                    id: framebuffer.id(),
                    position: Vec2::ZERO,
                },
            ]
        );
    }

    #[test]
    fn test_only_dirty_layouts_rerender() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([
            Layout::new([panel(0.0, 0.0, 10.0, 10.0)]).into(),
            Layout::new([panel(0.0, 0.0, 10.0, 10.0)]).at(20.0, 0.0).into(),
        ]));
        scene.frame(ms(16), &mut renderer).unwrap();
        let root = scene.root();
        let (left, right) = (scene.children(root)[0], scene.children(root)[1]);
        let left_fb = scene.framebuffer(left).unwrap().id();
        let right_fb = scene.framebuffer(right).unwrap().id();

        renderer.clear_commands();
        let leaf = scene.children(right)[0];
        scene.set_color(leaf, Color::rgb(1.0, 0.0, 0.0)).unwrap();
        scene.update(ms(16), &mut renderer).unwrap();
        scene.render(&mut renderer);

        let bound: Vec<u64> = renderer
            .commands()
            .iter()
            .filter_map(|c| match c {
                Command::BindFramebuffer(id) => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(bound, vec![right_fb, scene.framebuffer(root).unwrap().id()]);
        assert!(!bound.contains(&left_fb));
        // The clean layout is still composited from its cache
        assert!(renderer
            .commands()
            .contains(&Command::DrawFramebuffer { id: left_fb, position: Vec2::ZERO }));
    }

    #[test]
    fn test_child_layouts_render_before_parent_binds() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([Layout::new([panel(0.0, 0.0, 10.0, 10.0)]).into()]));
        scene.update(ms(16), &mut renderer).unwrap();
        scene.render(&mut renderer);

        let root_fb = scene.framebuffer(scene.root()).unwrap().id();
        let child = scene.children(scene.root())[0];
        let child_fb = scene.framebuffer(child).unwrap().id();
        let position = |command: Command| renderer.commands().iter().position(|c| *c == command);
        assert!(
            position(Command::UnbindFramebuffer(child_fb)) < position(Command::BindFramebuffer(root_fb))
        );
    }

    #[test]
    fn test_resized_layout_resizes_framebuffer() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([panel(0.0, 0.0, 10.0, 10.0)]));
        scene.frame(ms(16), &mut renderer).unwrap();
        let leaf = scene.children(scene.root())[0];

        renderer.clear_commands();
        scene
            .set_size(leaf, Some(crate::vector::Vector2::px(20.5, 10.0)))
            .unwrap();
        scene.frame(ms(16), &mut renderer).unwrap();
        let framebuffer = scene.framebuffer(scene.root()).unwrap();
        assert_eq!((framebuffer.width(), framebuffer.height()), (21, 10));
        assert!(renderer
            .commands()
            .contains(&Command::ResizeFramebuffer(framebuffer)));
    }

    #[test]
    fn test_fade_in_brackets_child_alpha() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([panel(0.0, 0.0, 10.0, 10.0)]));
        let leaf = scene.children(scene.root())[0];
        scene.update(ms(0), &mut renderer).unwrap();
        scene
            .start_transition(
                leaf,
                TransitionKind::FadeIn.request(ms(1000)),
            )
            .unwrap();
        scene.update(ms(500), &mut renderer).unwrap();

        renderer.clear_commands();
        scene.render(&mut renderer);
        let alpha = renderer
            .commands()
            .iter()
            .find_map(|c| match c {
                Command::FillRect { alpha, .. } => Some(*alpha),
                _ => None,
            })
            .unwrap();
        assert!((alpha - 0.75).abs() < 1e-6);
        assert_eq!(renderer.global_alpha(), 1.0);
    }

    #[test]
    fn test_slide_translates_child_offscreen() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([panel(100.0, 0.0, 40.0, 10.0)]).sized(800.0, 100.0));
        let leaf = scene.children(scene.root())[0];
        scene.update(ms(0), &mut renderer).unwrap();
        scene
            .start_transition(
                leaf,
                TransitionKind::Slide(crate::transition::SlideDirection::FromLeft)
                    .request(ms(100))
                    .with_easing(Easing::Linear),
            )
            .unwrap();

        renderer.clear_commands();
        scene.render(&mut renderer);
        let translations: Vec<Vec2> = renderer
            .commands()
            .iter()
            .filter_map(|c| match c {
                Command::Translate(offset) => Some(*offset),
                _ => None,
            })
            .collect();
        // slide offset, child position, then both reversed
        assert_eq!(translations[0], Vec2::new(-141.0, 0.0));
        assert_eq!(translations[1], Vec2::new(100.0, 0.0));
        assert_eq!(translations[0].x + translations[1].x, -41.0);
        assert_eq!(renderer.translation(), Vec2::ZERO);
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let mut registry = StyleRegistry::with_defaults();
        registry.register::<Panel>(Properties::new().with_opacity(0.5));
        let mut renderer = RecordingRenderer::new();
        let mut scene = Scene::new(
            registry,
            SceneConfig::default(),
            Layout::new([panel(0.0, 0.0, 10.0, 10.0)]),
        )
        .unwrap();
        scene.frame(ms(16), &mut renderer).unwrap();
        assert!(renderer
            .commands()
            .iter()
            .any(|c| matches!(c, Command::FillRect { alpha, .. } if *alpha == 0.5)));
        assert_eq!(renderer.global_alpha(), 1.0);
    }

    #[derive(Debug)]
    struct Blinker {
        to: Color,
    }

    impl Component for Blinker {
        fn render(&self, renderer: &mut dyn Renderer, frame: &ComponentFrame<'_>) {
            renderer.fill_rect(frame.rect(), frame.color, 0.0);
            if frame.color != self.to {
                frame.context.defer(Mutation::SetColor(frame.id, self.to));
            }
        }
    }

    #[test]
    fn test_mutation_requested_mid_render_is_deferred() {
        let mut registry = StyleRegistry::with_defaults();
        registry.register::<Blinker>(Properties::new());
        let to = Color::rgb(0.0, 1.0, 0.0);
        let mut renderer = RecordingRenderer::new();
        let mut scene = Scene::new(
            registry,
            SceneConfig::default(),
            Layout::new([Drawable::component(Blinker { to }).sized(10.0, 10.0)]),
        )
        .unwrap();
        let leaf = scene.children(scene.root())[0];

        scene.update(ms(16), &mut renderer).unwrap();
        scene.render(&mut renderer);
        assert_ne!(scene.color(leaf), Some(to));
        assert_eq!(scene.deferred_len(), 1);
        assert!(!scene.needs_redraw(scene.root()));

        scene.update(ms(16), &mut renderer).unwrap();
        assert_eq!(scene.color(leaf), Some(to));
        assert!(scene.needs_redraw(scene.root()));
    }

    #[test]
    fn test_removed_layout_releases_framebuffer() {
        let mut renderer = RecordingRenderer::new();
        let mut scene = scene(Layout::new([
            panel(0.0, 0.0, 10.0, 10.0),
            Layout::new([panel(0.0, 0.0, 5.0, 5.0)]).into(),
        ]));
        scene.frame(ms(16), &mut renderer).unwrap();
        let inner = scene.children(scene.root())[1];
        let framebuffer = scene.framebuffer(inner).unwrap();

        scene.remove(inner).unwrap();
        renderer.clear_commands();
        scene.frame(ms(16), &mut renderer).unwrap();
        assert_eq!(
            renderer.commands().first(),
            Some(&Command::ReleaseFramebuffer(framebuffer.id()))
        );
    }
}

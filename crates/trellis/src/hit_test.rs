//! Finding the nodes under a point.
//!
//! Hit testing uses the resting bounds of each node in viewport coordinates;
//! transition offsets do not move the hit area. Among overlapping siblings the
//! one drawn last wins.

use glam::Vec2;

use crate::scene::Scene;
use crate::NodeId;

impl Scene {
    /// Nodes containing `point`, ordered from the root to the deepest hit.
    ///
    /// Empty when the point is outside the root or bounds are not known yet.
    pub fn hit_path(&self, point: Vec2) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.root;
        let mut origin = Vec2::ZERO;

        loop {
            let Some(bounds) = self.bounds(current) else {
                break;
            };
            let absolute = bounds.translated(origin);
            if !absolute.rect().contains(point) {
                break;
            }
            path.push(current);

            let next = self
                .children(current)
                .iter()
                .rev()
                .copied()
                .find(|child| {
                    self.bounds(*child)
                        .is_some_and(|b| b.translated(absolute.position).rect().contains(point))
                });
            match next {
                Some(child) => {
                    origin = absolute.position;
                    current = child;
                }
                None => break,
            }
        }
        path
    }

    /// The deepest node containing `point`
    pub fn hit_test(&self, point: Vec2) -> Option<NodeId> {
        self.hit_path(point).pop()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec2;

    use crate::component::Panel;
    use crate::config::SceneConfig;
    use crate::drawable::{Drawable, Layout};
    use crate::recording::RecordingRenderer;
    use crate::scene::Scene;
    use crate::style::StyleRegistry;

    fn panel(x: f32, y: f32, w: f32, h: f32) -> Drawable {
        Drawable::component(Panel).at(x, y).sized(w, h)
    }

    fn laid_out(root: Layout) -> Scene {
        let mut scene =
            Scene::new(StyleRegistry::with_defaults(), SceneConfig::default(), root).unwrap();
        scene
            .update(Duration::ZERO, &mut RecordingRenderer::new())
            .unwrap();
        scene
    }

    #[test]
    fn test_hit_path_descends_into_layouts() {
        let scene = laid_out(Layout::new([
            panel(0.0, 0.0, 10.0, 10.0),
            Layout::new([panel(5.0, 5.0, 10.0, 10.0)]).at(50.0, 50.0).into(),
        ]));
        let root = scene.root();
        let inner = scene.children(root)[1];
        let leaf = scene.children(inner)[0];

        assert_eq!(scene.hit_path(Vec2::new(60.0, 60.0)), vec![root, inner, leaf]);
        assert_eq!(scene.hit_test(Vec2::new(52.0, 52.0)), Some(inner));
        assert_eq!(scene.hit_test(Vec2::new(5.0, 5.0)), Some(scene.children(root)[0]));
        assert!(scene.hit_path(Vec2::new(500.0, 500.0)).is_empty());
    }

    #[test]
    fn test_last_child_is_on_top() {
        let scene = laid_out(Layout::new([
            panel(0.0, 0.0, 20.0, 20.0),
            panel(10.0, 10.0, 20.0, 20.0),
        ]));
        let children = scene.children(scene.root()).to_vec();
        assert_eq!(scene.hit_test(Vec2::new(15.0, 15.0)), Some(children[1]));
        assert_eq!(scene.hit_test(Vec2::new(5.0, 5.0)), Some(children[0]));
    }

    #[test]
    fn test_no_hits_before_bounds() {
        let scene = Scene::new(
            StyleRegistry::with_defaults(),
            SceneConfig::default(),
            Layout::new([panel(0.0, 0.0, 10.0, 10.0)]),
        )
        .unwrap();
        assert!(scene.hit_path(Vec2::new(1.0, 1.0)).is_empty());
    }
}

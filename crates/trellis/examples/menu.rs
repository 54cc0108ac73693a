//! Headless walkthrough: a vertical menu slides in, reacts to hover and
//! clicks, and only re-renders what changed.
//!
//! Run with `RUST_LOG=trellis=debug` to see the tick summaries.

use std::time::Duration;

use glam::Vec2;
use trellis::{
    palette, Drawable, Effect, EventKind, Font, Label, Layout, Linear, Panel, Properties,
    RecordingRenderer, Scene, SceneConfig, SlideDirection, Spacing, StyleRegistry,
    TransitionKind, TransitionRequest, Unit, Vector2,
};

const FRAME: Duration = Duration::from_millis(16);

fn main() -> trellis::Result<()> {
    env_logger::init();

    let mut registry = StyleRegistry::with_defaults();
    registry.register::<Label>(
        Properties::new()
            .with_color(palette::SURFACE)
            .with_padding(Spacing::symmetric(8.0, 4.0))
            .with_hover_color(palette::SURFACE_HIGHLIGHT, Duration::from_millis(120))
            .on(EventKind::Clicked, |_, id| {
                log::info!("clicked {id:?}");
                Some(Effect::Transition(TransitionRequest::quick(
                    TransitionKind::FadeIn,
                )))
            }),
    );

    let font = Font::new("Inter", 16.0);
    let menu = Layout::new(
        ["Open", "Save", "Quit"]
            .into_iter()
            .map(|text| Drawable::component(Label::new(text, font.clone()))),
    )
    .with_strategy(Linear::vertical(4.0))
    .at(40.0, 40.0);

    let root = Layout::new([
        Drawable::component(Panel)
            .at(0.0, 0.0)
            .with_size(Vector2::new(Unit::percent(100.0), Unit::px(32.0))),
        menu.into(),
    ]);

    let config = SceneConfig::default().with_viewport(Vec2::new(640.0, 480.0));
    let mut scene = Scene::new(registry, config, root)?;
    let mut renderer = RecordingRenderer::new();

    let menu = scene.children(scene.root())[1];
    scene.start_transition(
        menu,
        TransitionRequest::slow(TransitionKind::Slide(SlideDirection::FromLeft)),
    )?;

    for _ in 0..30 {
        scene.frame(FRAME, &mut renderer)?;
    }
    println!("slide finished after {} commands", renderer.take_commands().len());

    let first = scene.children(menu)[0];
    let center = scene
        .absolute_bounds(first)
        .map(|bounds| bounds.rect().min + bounds.size / 2.0)
        .unwrap_or_default();

    scene.pointer_moved(center);
    scene.pointer_pressed(center);
    scene.pointer_released(center);
    for _ in 0..10 {
        scene.frame(FRAME, &mut renderer)?;
    }
    println!(
        "after hover and click: {} draws, color {:?}",
        renderer.draw_count(),
        scene.color(first)
    );

    renderer.clear_commands();
    scene.frame(FRAME, &mut renderer)?;
    println!("idle frame: {} commands", renderer.commands().len());

    Ok(())
}

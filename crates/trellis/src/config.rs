use std::time::Duration;

use glam::Vec2;
use trellis_macros::WithBuilders;

use crate::color::{palette, Color};

/// Scene-wide settings.
///
/// ```
/// # use trellis::SceneConfig;
/// # use std::time::Duration;
/// let config = SceneConfig::default()
///     .with_viewport([1280.0, 720.0])
///     .with_max_frame_delta(Duration::from_millis(50));
/// assert_eq!(config.viewport.x, 1280.0);
/// ```
#[derive(Clone, Debug, WithBuilders)]
pub struct SceneConfig {
    /// Extent the root layout resolves against, in pixels
    #[with_builders(into)]
    pub viewport: Vec2,
    /// Background of the root layout when its properties carry none
    pub clear_color: Color,
    /// Upper bound on the delta a single tick advances animations by
    pub max_frame_delta: Duration,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(800.0, 600.0),
            clear_color: palette::BASE,
            max_frame_delta: Duration::from_millis(100),
        }
    }
}

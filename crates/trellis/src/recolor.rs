use std::time::Duration;

use crate::animation::Animation;
use crate::color::Color;
use crate::easing::Easing;
use crate::error::Result;

/// Color animation of a single node
#[derive(Clone, Debug)]
pub struct Recolor {
    from: Color,
    to: Color,
    animation: Animation,
}

impl Recolor {
    pub fn new(from: Color, to: Color, duration: Duration, easing: Easing) -> Result<Self> {
        Ok(Self {
            from,
            to,
            animation: Animation::unit(duration, easing)?,
        })
    }

    /// Advance and return the interpolated color
    pub fn advance(&mut self, delta: Duration) -> Color {
        self.animation.advance(delta);
        self.color()
    }

    pub fn color(&self) -> Color {
        if self.animation.is_finished() {
            self.to
        } else {
            self.from.lerp(self.to, self.animation.value())
        }
    }

    pub fn target(&self) -> Color {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.animation.is_finished()
    }
}

//! Time-to-value interpolation.

use std::time::Duration;

use crate::easing::Easing;
use crate::error::{Result, SceneError};

/// A stateful interpolator from `from` to `to` over a fixed duration.
///
/// The animation is driven by elapsed-time deltas rather than wall-clock
/// reads, so the same sequence of ticks always yields the same values.
#[derive(Debug, Clone)]
pub struct Animation {
    duration: Duration,
    elapsed: Duration,
    from: f32,
    to: f32,
    current: f32,
    easing: Easing,
    finished: bool,
}

impl Animation {
    /// Create a new animation. A zero duration is rejected.
    pub fn new(duration: Duration, from: f32, to: f32, easing: Easing) -> Result<Self> {
        if duration.is_zero() {
            return Err(SceneError::InvalidDuration(duration));
        }
        Ok(Self {
            duration,
            elapsed: Duration::ZERO,
            from,
            to,
            current: from,
            easing,
            finished: false,
        })
    }

    /// Animation from 0.0 to 1.0
    pub fn unit(duration: Duration, easing: Easing) -> Result<Self> {
        Self::new(duration, 0.0, 1.0, easing)
    }

    /// Advance by `delta` and return the current value.
    ///
    /// Progress saturates at the end of the duration: once reached, the value
    /// is exactly `to` and every further call returns `to`.
    pub fn advance(&mut self, delta: Duration) -> f32 {
        if self.finished {
            return self.to;
        }

        self.elapsed = self.elapsed.saturating_add(delta).min(self.duration);
        let t = self.progress();
        if t >= 1.0 {
            self.finish();
        } else {
            self.current = self.from + self.easing.apply(t) * (self.to - self.from);
        }
        self.current
    }

    /// Jump to the end value and latch `finished`
    pub fn finish(&mut self) {
        self.elapsed = self.duration;
        self.current = self.to;
        self.finished = true;
    }

    /// Move the end value without restarting. The current value follows the
    /// new curve at the same progress.
    pub fn retarget(&mut self, to: f32) {
        self.to = to;
        self.current = if self.finished {
            to
        } else {
            self.from + self.easing.apply(self.progress()) * (to - self.from)
        };
    }

    /// Rewind to the start value
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.current = self.from;
        self.finished = false;
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    pub fn from(&self) -> f32 {
        self.from
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fraction of the duration that has elapsed, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    /// How far the value has travelled from `from` towards `to`.
    ///
    /// Equal to `value / to` whenever `from` is 0. Overshooting easings can
    /// report values outside `[0, 1]` mid-flight.
    pub fn fraction_complete(&self) -> f32 {
        let span = self.to - self.from;
        if span == 0.0 {
            return if self.finished { 1.0 } else { self.progress() };
        }
        (self.current - self.from) / span
    }
}

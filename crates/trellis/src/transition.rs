use std::time::Duration;

use glam::Vec2;

use crate::animation::Animation;
use crate::easing::Easing;
use crate::error::Result;
use crate::renderer::Renderer;
use crate::strategy::Axis;
use crate::vector::Bounds;

/// Edge of the viewport a sliding drawable enters from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlideDirection {
    FromLeft,
    FromRight,
    FromTop,
    FromBottom,
}

impl SlideDirection {
    pub const fn axis(&self) -> Axis {
        match self {
            SlideDirection::FromLeft | SlideDirection::FromRight => Axis::Horizontal,
            SlideDirection::FromTop | SlideDirection::FromBottom => Axis::Vertical,
        }
    }

    /// Coordinate at which a drawable with `bounds` is fully outside the viewport
    fn offscreen_start(&self, bounds: &Bounds, viewport: Vec2) -> f32 {
        match self {
            SlideDirection::FromLeft => -1.0 - bounds.size.x,
            SlideDirection::FromRight => viewport.x + 1.0,
            SlideDirection::FromTop => -1.0 - bounds.size.y,
            SlideDirection::FromBottom => viewport.y + 1.0,
        }
    }
}

/// Symbolic transition kind.
///
/// Resolves into a configured [`Transition`] with the default easing, so
/// callers can ask for "fade in over 300ms" without building curves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    FadeIn,
    FadeOut,
    Slide(SlideDirection),
}

impl TransitionKind {
    pub const DEFAULT_EASING: Easing = Easing::EaseOutQuad;

    /// Build a transition with the default easing.
    ///
    /// `target` must be in the same coordinate space as `viewport`; only
    /// slides read either of them.
    pub fn build(self, duration: Duration, target: Bounds, viewport: Vec2) -> Result<Transition> {
        self.build_with(duration, Self::DEFAULT_EASING, target, viewport)
    }

    pub fn build_with(
        self,
        duration: Duration,
        easing: Easing,
        target: Bounds,
        viewport: Vec2,
    ) -> Result<Transition> {
        match self {
            TransitionKind::FadeIn => Transition::fade_in(duration, easing),
            TransitionKind::FadeOut => Transition::fade_out(duration, easing),
            TransitionKind::Slide(direction) => {
                Transition::slide(direction, duration, easing, target, viewport)
            }
        }
    }

    pub fn request(self, duration: Duration) -> TransitionRequest {
        TransitionRequest::new(self, duration)
    }
}

/// A transition asked for by kind and duration, resolved once the target's
/// bounds are known.
#[derive(Clone, Copy, Debug)]
pub struct TransitionRequest {
    pub kind: TransitionKind,
    pub duration: Duration,
    pub easing: Easing,
}

impl TransitionRequest {
    pub fn new(kind: TransitionKind, duration: Duration) -> Self {
        Self {
            kind,
            duration,
            easing: TransitionKind::DEFAULT_EASING,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Quick transition (150ms)
    ///
    /// Good for hover feedback
    pub fn quick(kind: TransitionKind) -> Self {
        Self::new(kind, Duration::from_millis(150))
    }

    /// Standard transition (250ms)
    pub fn standard(kind: TransitionKind) -> Self {
        Self::new(kind, Duration::from_millis(250))
    }

    /// Slow transition (400ms)
    ///
    /// Good for entrances and emphasized changes
    pub fn slow(kind: TransitionKind) -> Self {
        Self::new(kind, Duration::from_millis(400))
    }

    pub fn build(&self, target: Bounds, viewport: Vec2) -> Result<Transition> {
        self.kind
            .build_with(self.duration, self.easing, target, viewport)
    }
}

#[derive(Clone, Copy, Debug)]
enum Motion {
    Fade,
    /// `rest` is the drawable's resting coordinate along `axis`
    Slide { axis: Axis, rest: f32 },
}

/// Renderer state saved by `apply`, consumed by `unapply`
#[derive(Clone, Copy, Debug)]
enum Bracket {
    Alpha(f32),
    Offset(Vec2),
}

/// A time-bounded, reversible mutation of renderer state around a render call.
///
/// `apply` and `unapply` must bracket a single render call. Together they
/// always restore the renderer to the state it had before `apply`.
#[derive(Debug)]
pub struct Transition {
    kind: TransitionKind,
    motion: Motion,
    animation: Animation,
    bracket: Option<Bracket>,
}

impl Transition {
    /// Fade global alpha from 0 to 1
    pub fn fade_in(duration: Duration, easing: Easing) -> Result<Self> {
        Ok(Self {
            kind: TransitionKind::FadeIn,
            motion: Motion::Fade,
            animation: Animation::new(duration, 0.0, 1.0, easing)?,
            bracket: None,
        })
    }

    /// A fade-in running backwards: alpha from 1 to 0
    pub fn fade_out(duration: Duration, easing: Easing) -> Result<Self> {
        Ok(Self {
            kind: TransitionKind::FadeOut,
            motion: Motion::Fade,
            animation: Animation::new(duration, 1.0, 0.0, easing)?,
            bracket: None,
        })
    }

    /// Slide the drawable from just outside the viewport to where `target` rests
    pub fn slide(
        direction: SlideDirection,
        duration: Duration,
        easing: Easing,
        target: Bounds,
        viewport: Vec2,
    ) -> Result<Self> {
        let axis = direction.axis();
        let rest = axis.main(target.position);
        let start = direction.offscreen_start(&target, viewport);
        Ok(Self {
            kind: TransitionKind::Slide(direction),
            motion: Motion::Slide { axis, rest },
            animation: Animation::new(duration, start, rest, easing)?,
            bracket: None,
        })
    }

    /// Follow a target that moved while the transition runs.
    ///
    /// Only slides read the target; the start stays where it was, so the
    /// drawable keeps travelling from the same edge and lands on the new
    /// resting coordinate.
    pub fn retarget(&mut self, target: Bounds) {
        if let Motion::Slide { axis, rest } = &mut self.motion {
            let moved = axis.main(target.position);
            if moved != *rest {
                *rest = moved;
                self.animation.retarget(moved);
            }
        }
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn value(&self) -> f32 {
        self.animation.value()
    }

    pub fn advance(&mut self, delta: Duration) -> f32 {
        self.animation.advance(delta)
    }

    pub fn is_finished(&self) -> bool {
        self.animation.is_finished()
    }

    /// Whether an `apply` is waiting for its `unapply`
    pub fn is_applied(&self) -> bool {
        self.bracket.is_some()
    }

    /// Whether the finished transition leaves the renderer untouched, so it
    /// can be retired. A finished fade-out keeps the drawable hidden.
    pub fn rests_at_identity(&self) -> bool {
        !matches!(self.kind, TransitionKind::FadeOut)
    }

    /// Current translation relative to the resting position
    pub fn offset(&self) -> Vec2 {
        match self.motion {
            Motion::Fade => Vec2::ZERO,
            Motion::Slide { axis, rest } => axis.along(self.animation.value() - rest),
        }
    }

    /// Mutate renderer state according to the current animation value.
    pub fn apply(&mut self, renderer: &mut dyn Renderer) {
        if self.bracket.is_some() {
            log::warn!("{:?} applied twice without unapply; ignoring", self.kind);
            return;
        }

        let bracket = match self.motion {
            Motion::Fade => {
                let previous = renderer.global_alpha();
                let alpha = self.animation.value().clamp(0.0, 1.0);
                renderer.set_global_alpha(previous * alpha);
                Bracket::Alpha(previous)
            }
            Motion::Slide { .. } => {
                let offset = self.offset();
                renderer.translate(offset.x, offset.y);
                Bracket::Offset(offset)
            }
        };
        self.bracket = Some(bracket);
    }

    /// Reverse exactly what the matching `apply` did.
    pub fn unapply(&mut self, renderer: &mut dyn Renderer) {
        match self.bracket.take() {
            Some(Bracket::Alpha(previous)) => renderer.set_global_alpha(previous),
            Some(Bracket::Offset(offset)) => renderer.translate(-offset.x, -offset.y),
            None => log::warn!("{:?} unapplied without a matching apply", self.kind),
        }
    }

    /// Drop the transition, reversing an in-flight `apply` first.
    pub fn discard(mut self, renderer: &mut dyn Renderer) {
        if self.bracket.is_some() {
            self.unapply(renderer);
        }
    }
}

impl Clone for Transition {
    /// Independent copy with its own animation state and no open bracket
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            motion: self.motion,
            animation: self.animation.clone(),
            bracket: None,
        }
    }
}

impl Drop for Transition {
    fn drop(&mut self) {
        if self.bracket.is_some() {
            log::error!(
                "{:?} dropped between apply and unapply; renderer state is unbalanced",
                self.kind
            );
        }
    }
}

/// Apply a stack of transitions in order.
pub fn apply_all(transitions: &mut [Transition], renderer: &mut dyn Renderer) {
    for transition in transitions.iter_mut() {
        transition.apply(renderer);
    }
}

/// Unapply a stack of transitions in reverse order of application.
pub fn unapply_all(transitions: &mut [Transition], renderer: &mut dyn Renderer) {
    for transition in transitions.iter_mut().rev() {
        transition.unapply(renderer);
    }
}

//! Easing functions shaping linear time progress into interpolation fractions.
//!
//! Every function takes a progress fraction in `[0, 1]` and returns a shaped
//! fraction. Overshooting variants may leave `[0, 1]` mid-flight but always
//! land on exactly `1.0` at `t = 1`.

use std::f32::consts::PI;
use std::fmt;

/// Easing function type: takes progress (0.0 to 1.0) and returns the eased fraction
pub type EasingFn = fn(f32) -> f32;

const BACK_OVERSHOOT: f32 = 1.70158;
const BUMP_PULL: f32 = 1.7 * 1.2;

/// Linear interpolation (no easing)
pub fn linear(t: f32) -> f32 {
    t
}

/// Pull back below zero before accelerating to the target
pub fn ease_in_back(t: f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    (BACK_OVERSHOOT + 1.0) * t * t * t - BACK_OVERSHOOT * t * t
}

/// Shoot past the target and settle back onto it
pub fn ease_out_bump(t: f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    let u = t - 1.0;
    1.0 + (BUMP_PULL + 1.0) * u * u * u + BUMP_PULL * u * u
}

/// Quadratic deceleration
pub fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Exponential deceleration.
///
/// `1 - 2^(-10)` is not 1, so the end point is pinned explicitly.
pub fn ease_out_expo(t: f32) -> f32 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f32.powf(-10.0 * t)
    }
}

/// Damped spring oscillation, clamped to `[0, 1]`
pub fn ease_out_elastic(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let c4 = (2.0 * PI) / 3.0;
    let value = 2.0_f32.powf(-10.0 * t) * ((10.0 * t - 0.75) * c4).sin() + 1.0;
    value.clamp(0.0, 1.0)
}

/// Quadratic acceleration then deceleration
pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic acceleration then deceleration
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Quartic acceleration then deceleration
pub fn ease_in_out_quart(t: f32) -> f32 {
    if t < 0.5 {
        8.0 * t * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
    }
}

/// Symbolic easing selection.
///
/// `Custom` keeps the set open for curves the library does not ship.
#[derive(Clone, Copy, Default)]
pub enum Easing {
    Linear,
    EaseInBack,
    EaseOutBump,
    #[default]
    EaseOutQuad,
    EaseOutExpo,
    EaseOutElastic,
    EaseInOutCubic,
    EaseInOutQuad,
    EaseInOutQuart,
    Custom(EasingFn),
}

impl Easing {
    /// All built-in variants
    pub const BUILT_IN: [Easing; 9] = [
        Easing::Linear,
        Easing::EaseInBack,
        Easing::EaseOutBump,
        Easing::EaseOutQuad,
        Easing::EaseOutExpo,
        Easing::EaseOutElastic,
        Easing::EaseInOutCubic,
        Easing::EaseInOutQuad,
        Easing::EaseInOutQuart,
    ];

    /// The shaping function backing this variant
    pub fn function(&self) -> EasingFn {
        match self {
            Easing::Linear => linear,
            Easing::EaseInBack => ease_in_back,
            Easing::EaseOutBump => ease_out_bump,
            Easing::EaseOutQuad => ease_out_quad,
            Easing::EaseOutExpo => ease_out_expo,
            Easing::EaseOutElastic => ease_out_elastic,
            Easing::EaseInOutCubic => ease_in_out_cubic,
            Easing::EaseInOutQuad => ease_in_out_quad,
            Easing::EaseInOutQuart => ease_in_out_quart,
            Easing::Custom(f) => *f,
        }
    }

    /// Shape a progress fraction. Progress is clamped to `[0, 1]` first.
    pub fn apply(&self, t: f32) -> f32 {
        (self.function())(t.clamp(0.0, 1.0))
    }

    /// Whether the curve deliberately leaves `[0, 1]` (or starts off zero)
    pub fn overshoots(&self) -> bool {
        matches!(
            self,
            Easing::EaseInBack | Easing::EaseOutBump | Easing::EaseOutElastic
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInBack => "ease_in_back",
            Easing::EaseOutBump => "ease_out_bump",
            Easing::EaseOutQuad => "ease_out_quad",
            Easing::EaseOutExpo => "ease_out_expo",
            Easing::EaseOutElastic => "ease_out_elastic",
            Easing::EaseInOutCubic => "ease_in_out_cubic",
            Easing::EaseInOutQuad => "ease_in_out_quad",
            Easing::EaseInOutQuart => "ease_in_out_quart",
            Easing::Custom(_) => "custom",
        }
    }

    /// Parse a built-in easing from its name (`ease-out-quad`, `EaseOutQuad`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Self::BUILT_IN
            .into_iter()
            .find(|easing| easing.name().replace('_', "") == normalized)
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-4;

    #[test]
    fn test_every_variant_ends_at_one() {
        for easing in Easing::BUILT_IN {
            assert_eq!(easing.apply(1.0), 1.0, "{:?}", easing);
        }
    }

    #[test]
    fn test_every_variant_starts_at_zero() {
        for easing in Easing::BUILT_IN {
            assert!(easing.apply(0.0).abs() < TOLERANCE, "{:?}", easing);
        }
    }

    #[test]
    fn test_ease_out_quad_midpoint() {
        assert_eq!(ease_out_quad(0.5), 0.75);
    }

    #[test]
    fn test_in_out_variants_are_symmetric() {
        for easing in [
            Easing::EaseInOutQuad,
            Easing::EaseInOutCubic,
            Easing::EaseInOutQuart,
        ] {
            assert!((easing.apply(0.5) - 0.5).abs() < TOLERANCE, "{:?}", easing);
            let a = easing.apply(0.2);
            let b = easing.apply(0.8);
            assert!((a + b - 1.0).abs() < TOLERANCE, "{:?}", easing);
        }
    }

    #[test]
    fn test_overshooting_variants_leave_unit_range() {
        assert!(ease_in_back(0.2) < 0.0);
        assert!(ease_out_bump(0.8) > 1.0);
    }

    #[test]
    fn test_elastic_is_clamped() {
        for i in 0..=100 {
            let value = ease_out_elastic(i as f32 / 100.0);
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
    }

    #[test]
    fn test_from_name() {
        assert!(matches!(
            Easing::from_name("ease-out-expo"),
            Some(Easing::EaseOutExpo)
        ));
        assert!(matches!(
            Easing::from_name("EaseInOutQuart"),
            Some(Easing::EaseInOutQuart)
        ));
        assert!(Easing::from_name("bouncy").is_none());
    }

    #[test]
    fn test_custom_easing() {
        let square = Easing::Custom(|t| t * t);
        assert_eq!(square.apply(0.5), 0.25);
    }
}

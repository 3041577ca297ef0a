//! Easing curves
//!
//! All curves map `t` in `[0, 1]` onto `[0, 1]` with `f(0) = 0` and `f(1) = 1`.

use serde::{Deserialize, Serialize};

/// Easing function applied to normalized tween progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic ease-in (`power2.in`)
    EaseInQuad,
    /// Quadratic ease-out (`power2.out`)
    EaseOutQuad,
    EaseInOutQuad,
    /// Cubic ease-out (`power3.out`)
    EaseOutCubic,
}

impl Easing {
    /// Evaluate the curve; `t` is clamped to `[0, 1]`
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseOutCubic,
    ];

    #[test]
    fn test_endpoints_fixed() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn test_out_leads_in() {
        assert!(Easing::EaseOutQuad.apply(0.25) > Easing::Linear.apply(0.25));
        assert!(Easing::EaseInQuad.apply(0.25) < Easing::Linear.apply(0.25));
    }

    #[test]
    fn test_out_of_range_clamped() {
        assert_eq!(Easing::EaseInQuad.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseOutCubic.apply(3.0), 1.0);
    }
}

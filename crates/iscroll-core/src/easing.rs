//! Named easing curves for scroll settles
//!
//! Every curve maps normalized time in [0, 1] to normalized progress, with
//! `f(0) = 0` and `f(1) = 1`. Curves with a CSS equivalent expose it through
//! [`EasingId::css`] so the transition render policy can hand interpolation
//! to the host; the others force the frame-driven tween.

use std::f64::consts::PI;
use std::fmt;

/// Identifier of a built-in easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EasingId {
    /// `k * (2 - k)`, used when a fling lands outside the bounds
    Quadratic,
    /// Quarter circle; the default for programmatic scrolls and bounces
    #[default]
    Circular,
    /// Overshoots slightly past the destination before settling
    Back,
    /// Piecewise parabolas that hop at the end
    Bounce,
    /// Damped sine oscillation around the destination
    Elastic,
}

impl EasingId {
    pub const ALL: [EasingId; 5] = [
        EasingId::Quadratic,
        EasingId::Circular,
        EasingId::Back,
        EasingId::Bounce,
        EasingId::Elastic,
    ];

    /// Look up a curve by its configuration name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "quadratic" => Some(Self::Quadratic),
            "circular" => Some(Self::Circular),
            "back" => Some(Self::Back),
            "bounce" => Some(Self::Bounce),
            "elastic" => Some(Self::Elastic),
            _ => None,
        }
    }

    /// Like [`EasingId::from_name`], falling back to [`EasingId::Circular`]
    pub fn from_name_or_default(name: &str) -> Self {
        match Self::from_name(name) {
            Some(easing) => easing,
            None => {
                if !name.trim().is_empty() {
                    tracing::warn!(easing = name, "Unknown easing name, using circular");
                }
                Self::Circular
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Quadratic => "quadratic",
            Self::Circular => "circular",
            Self::Back => "back",
            Self::Bounce => "bounce",
            Self::Elastic => "elastic",
        }
    }

    /// CSS `transition-timing-function` equivalent, if one exists
    pub fn css(&self) -> Option<&'static str> {
        match self {
            Self::Quadratic => Some("cubic-bezier(0.25, 0.46, 0.45, 0.94)"),
            Self::Circular => Some("cubic-bezier(0.1, 0.57, 0.1, 1)"),
            Self::Back => Some("cubic-bezier(0.175, 0.885, 0.32, 1.275)"),
            Self::Bounce | Self::Elastic => None,
        }
    }

    /// Apply the curve to a progress value
    ///
    /// Input is clamped to [0, 1]. `Back` and `Elastic` may briefly leave
    /// [0, 1] in the middle of the curve; both endpoints are exact.
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let k = t.clamp(0.0, 1.0);
        match self {
            Self::Quadratic => k * (2.0 - k),
            Self::Circular => circular(k),
            Self::Back => back(k),
            Self::Bounce => bounce(k),
            Self::Elastic => elastic(k),
        }
    }
}

impl fmt::Display for EasingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
fn circular(k: f64) -> f64 {
    let k = k - 1.0;
    (1.0 - k * k).sqrt()
}

#[inline]
fn back(k: f64) -> f64 {
    let b = 4.0;
    let k = k - 1.0;
    k * k * ((b + 1.0) * k + b) + 1.0
}

fn bounce(k: f64) -> f64 {
    if k < 1.0 / 2.75 {
        7.5625 * k * k
    } else if k < 2.0 / 2.75 {
        let k = k - 1.5 / 2.75;
        7.5625 * k * k + 0.75
    } else if k < 2.5 / 2.75 {
        let k = k - 2.25 / 2.75;
        7.5625 * k * k + 0.9375
    } else {
        let k = k - 2.625 / 2.75;
        7.5625 * k * k + 0.984375
    }
}

fn elastic(k: f64) -> f64 {
    let f = 0.22;
    let e = 0.4;

    if k == 0.0 {
        return 0.0;
    }
    if k == 1.0 {
        return 1.0;
    }

    e * 2.0_f64.powf(-10.0 * k) * ((k - f / 4.0) * (2.0 * PI) / f).sin() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in EasingId::ALL {
            assert!(easing.apply(0.0).abs() < 1e-9, "{:?} at t=0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{:?} at t=1", easing);
        }
    }

    #[test]
    fn test_input_is_clamped() {
        for easing in EasingId::ALL {
            assert_eq!(easing.apply(-3.0), easing.apply(0.0));
            assert_eq!(easing.apply(7.0), easing.apply(1.0));
        }
    }

    #[test]
    fn test_monotonic_curves() {
        for easing in [EasingId::Quadratic, EasingId::Circular] {
            let mut prev = 0.0;
            for i in 0..=20 {
                let t = i as f64 / 20.0;
                let v = easing.apply(t);
                assert!(v + 1e-9 >= prev, "{:?} not monotonic at t={}", easing, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_back_overshoots() {
        let peak = (1..20)
            .map(|i| EasingId::Back.apply(i as f64 / 20.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_css_equivalents() {
        assert!(EasingId::Quadratic.css().is_some());
        assert!(EasingId::Circular.css().is_some());
        assert!(EasingId::Back.css().is_some());
        assert!(EasingId::Bounce.css().is_none());
        assert!(EasingId::Elastic.css().is_none());
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(EasingId::from_name("Elastic"), Some(EasingId::Elastic));
        assert_eq!(EasingId::from_name("cubic"), None);
        assert_eq!(EasingId::from_name_or_default("cubic"), EasingId::Circular);
        assert_eq!(EasingId::from_name_or_default(""), EasingId::Circular);
        for easing in EasingId::ALL {
            assert_eq!(EasingId::from_name(easing.name()), Some(easing));
        }
    }
}

//! Easing curves.

/// Tension of [`Easing::Overshoot`].
const OVERSHOOT_TENSION: f32 = 2.0;

/// Maps linear progress in `[0, 1]` to eased progress.
///
/// All curves start at 0 and end at 1. [`Easing::Overshoot`] exceeds 1 in
/// between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    /// Identity.
    Linear,
    /// General purpose cubic-bezier(0.25, 0.1, 0.25, 1).
    #[default]
    Standard,
    /// Decelerating cubic-bezier(0, 0, 0.58, 1).
    EaseOut,
    /// Accelerating cubic-bezier(0.42, 0, 1, 1).
    EaseIn,
    /// Symmetric cubic-bezier(0.42, 0, 0.58, 1).
    EaseInOut,
    /// Runs past the target and settles back.
    Overshoot,
    /// Quadratic acceleration, `t²`.
    Accelerate,
}

impl Easing {
    /// Applies the curve. Input outside `[0, 1]` is clamped.
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::Standard => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::Overshoot => {
                let s = t - 1.0;
                s * s * ((OVERSHOOT_TENSION + 1.0) * s + OVERSHOOT_TENSION) + 1.0
            }
            Self::Accelerate => t * t,
        }
    }
}

/// Evaluates a CSS-style cubic bezier with endpoints (0,0) and (1,1) at `x`.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let sample = |a1: f32, a2: f32, t: f32| {
        ((1.0 - 3.0 * a2 + 3.0 * a1) * t + (3.0 * a2 - 6.0 * a1)) * t * t + 3.0 * a1 * t
    };
    let slope = |a1: f32, a2: f32, t: f32| {
        3.0 * (1.0 - 3.0 * a2 + 3.0 * a1) * t * t + 2.0 * (3.0 * a2 - 6.0 * a1) * t + 3.0 * a1
    };

    // Newton first, bisection if the slope flattens out.
    let mut t = x;
    for _ in 0..8 {
        let err = sample(x1, x2, t) - x;
        if err.abs() < 1e-6 {
            return sample(y1, y2, t);
        }
        let d = slope(x1, x2, t);
        if d.abs() < 1e-6 {
            break;
        }
        t = (t - err / d).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    t = x;
    for _ in 0..32 {
        let v = sample(x1, x2, t);
        if (v - x).abs() < 1e-6 {
            break;
        }
        if v < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    sample(y1, y2, t)
}

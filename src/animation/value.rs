//! Time-driven interpolation primitive.
//!
//! An [`AnimatedValue`] does not own a timer. Callers pass the frame time on
//! every query and progress is recomputed as
//! `clamp((now - start) / duration, 0, 1)`.

use super::easing::Easing;

/// Values that can be blended.
pub trait Interpolate: Clone + PartialEq {
    /// Blends from `self` toward `to` by eased progress `t`.
    ///
    /// `t` may leave `[0, 1]` for overshooting curves.
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

/// Counter text animated as a whole.
///
/// Glyph-level compositing is done by [`DigitRoll`](super::DigitRoll); as a
/// value the text flips to the target at the midpoint, so a retarget that
/// lands past the midpoint continues from the text that is mostly visible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DigitText(pub String);

impl DigitText {
    /// Borrows the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DigitText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Interpolate for DigitText {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        if t < 0.5 {
            self.clone()
        } else {
            to.clone()
        }
    }
}

/// A value moving from `from` to `to` over `duration_ms` starting at
/// `start_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedValue<T> {
    current: T,
    from: T,
    to: T,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
}

impl<T: Interpolate> AnimatedValue<T> {
    /// A value at rest.
    pub fn settled(value: T) -> Self {
        Self {
            current: value.clone(),
            from: value.clone(),
            to: value,
            start_ms: 0,
            duration_ms: 0,
            easing: Easing::Linear,
        }
    }

    /// Starts moving toward `to`, beginning at the value sampled at `now`.
    ///
    /// A zero duration snaps immediately.
    pub fn retarget(&mut self, to: T, now_ms: u64, duration_ms: u64, easing: Easing) {
        let current = self.value_at(now_ms);
        if duration_ms == 0 {
            self.snap_to(to);
            return;
        }
        self.from = current.clone();
        self.current = current;
        self.to = to;
        self.start_ms = now_ms;
        self.duration_ms = duration_ms;
        self.easing = easing;
    }

    /// Jumps to `value` and stops.
    pub fn snap_to(&mut self, value: T) {
        self.current = value.clone();
        self.from = value.clone();
        self.to = value;
        self.duration_ms = 0;
    }

    /// Linear progress in `[0, 1]`.
    pub fn raw_progress(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms) as f32;
        (elapsed / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Eased progress.
    pub fn progress(&self, now_ms: u64) -> f32 {
        self.easing.apply(self.raw_progress(now_ms))
    }

    /// Value at `now` without updating [`AnimatedValue::current`].
    pub fn value_at(&self, now_ms: u64) -> T {
        let raw = self.raw_progress(now_ms);
        if raw >= 1.0 {
            self.to.clone()
        } else {
            self.from.interpolate(&self.to, self.easing.apply(raw))
        }
    }

    /// Advances to `now` and returns the new current value.
    pub fn tick(&mut self, now_ms: u64) -> &T {
        self.current = self.value_at(now_ms);
        &self.current
    }

    /// Returns `true` once `now >= start + duration`.
    pub fn is_idle(&self, now_ms: u64) -> bool {
        now_ms >= self.start_ms.saturating_add(self.duration_ms) || self.duration_ms == 0
    }

    /// Value cached by the last [`AnimatedValue::tick`].
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Start value of the running segment.
    pub fn from(&self) -> &T {
        &self.from
    }

    /// Target value.
    pub fn to(&self) -> &T {
        &self.to
    }

    /// Frame time the running segment started at.
    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    /// Length of the running segment.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Curve of the running segment.
    pub fn easing(&self) -> Easing {
        self.easing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped_linear_time() {
        let mut v = AnimatedValue::settled(0.0_f32);
        v.retarget(1.0, 100, 200, Easing::Linear);
        assert_eq!(v.raw_progress(50), 0.0);
        assert_eq!(v.raw_progress(200), 0.5);
        assert_eq!(v.raw_progress(10_000), 1.0);
        assert_eq!(v.value_at(200), 0.5);
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut v = AnimatedValue::settled(0.0_f32);
        v.retarget(1.0, 0, 100, Easing::Linear);
        v.retarget(0.0, 40, 100, Easing::Linear);
        assert!((v.from() - 0.4).abs() < 1e-6);
        assert!((v.value_at(40) - 0.4).abs() < 1e-6);
        assert_eq!(v.value_at(140), 0.0);
    }

    #[test]
    fn zero_duration_snaps() {
        let mut v = AnimatedValue::settled(0.0_f32);
        v.retarget(1.0, 10, 0, Easing::Overshoot);
        assert_eq!(v.value_at(10), 1.0);
        assert_eq!(*v.current(), 1.0);
        assert!(v.is_idle(10));
    }

    #[test]
    fn idle_once_duration_elapsed() {
        let mut v = AnimatedValue::settled(0.0_f32);
        v.retarget(1.0, 0, 150, Easing::EaseOut);
        assert!(!v.is_idle(149));
        assert!(v.is_idle(150));
        assert_eq!(*v.tick(150), 1.0);
    }

    #[test]
    fn digit_text_flips_at_midpoint() {
        let mut v = AnimatedValue::settled(DigitText::from("12".to_string()));
        v.retarget(DigitText::from("15".to_string()), 0, 100, Easing::Linear);
        assert_eq!(v.value_at(49).as_str(), "12");
        assert_eq!(v.value_at(50).as_str(), "15");
    }
}

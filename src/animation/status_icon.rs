//! Delivery icon state machine.
//!
//! The icon moves between [`StatusIcon`] states one transition at a time.
//! Reaching the double check from a state that did not show it uses a slide
//! morph: the first mark stays in place (fading in if it was not visible)
//! while the second mark slides in from a small offset. Every other change
//! is a cross-fade where both icons scale with their alpha.
//!
//! A new target that arrives mid-transition is queued and chained when the
//! running transition ends, except that asking for the state being left
//! reverses the running transition from where it is.

use super::easing::Easing;
use super::value::AnimatedValue;
use crate::model::StatusIcon;

/// How a transition is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMorph {
    /// Old icon fades and shrinks out, new icon fades and grows in.
    CrossFade,
    /// First mark in place, second mark slides in.
    Slide,
}

impl StatusMorph {
    /// Morph used between two states.
    pub fn between(from: StatusIcon, to: StatusIcon) -> Self {
        match (from, to) {
            (StatusIcon::None | StatusIcon::Clock | StatusIcon::SingleCheck, StatusIcon::DoubleCheck) => {
                Self::Slide
            }
            _ => Self::CrossFade,
        }
    }
}

/// Drawable part of a delivery icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusGlyph {
    /// Pending clock.
    Clock,
    /// First check mark.
    Check,
    /// Second check mark, offset toward the trailing edge.
    SecondCheck,
}

/// One glyph to draw with its animation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusLayer {
    /// Glyph.
    pub glyph: StatusGlyph,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Scale around the glyph center.
    pub scale: f32,
    /// Remaining fraction of the slide-in offset; 0 means in place.
    pub slide: f32,
}

impl StatusLayer {
    fn new(glyph: StatusGlyph, alpha: f32, scale: f32) -> Self {
        Self {
            glyph,
            alpha,
            scale,
            slide: 0.0,
        }
    }
}

/// Snapshot of the machine at one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusFrame {
    /// Not animating.
    Static(StatusIcon),
    /// Cross-fading between two icons.
    CrossFade {
        /// Icon leaving.
        from: StatusIcon,
        /// Icon arriving.
        to: StatusIcon,
        /// Shared progress.
        progress: f32,
    },
    /// Sliding in the double check.
    Slide {
        /// Icon that was shown before.
        from: StatusIcon,
        /// Shared progress.
        progress: f32,
    },
}

impl StatusFrame {
    /// Expands the frame into glyph layers, back to front.
    pub fn layers(&self) -> Vec<StatusLayer> {
        match *self {
            Self::Static(icon) => glyphs(icon)
                .iter()
                .map(|&g| StatusLayer::new(g, 1.0, 1.0))
                .collect(),
            Self::CrossFade { from, to, progress } => {
                let out_alpha = 1.0 - progress;
                let mut layers: Vec<StatusLayer> = glyphs(from)
                    .iter()
                    .map(|&g| StatusLayer::new(g, out_alpha, 0.5 + 0.5 * out_alpha))
                    .collect();
                layers.extend(
                    glyphs(to)
                        .iter()
                        .map(|&g| StatusLayer::new(g, progress, 0.5 + 0.5 * progress)),
                );
                layers
            }
            Self::Slide { from, progress } => {
                let mut layers = Vec::with_capacity(3);
                if from == StatusIcon::Clock {
                    let out_alpha = 1.0 - progress;
                    layers.push(StatusLayer::new(StatusGlyph::Clock, out_alpha, 0.5 + 0.5 * out_alpha));
                }
                let first_alpha = if from == StatusIcon::SingleCheck { 1.0 } else { progress };
                layers.push(StatusLayer::new(StatusGlyph::Check, first_alpha, 1.0));
                layers.push(StatusLayer {
                    glyph: StatusGlyph::SecondCheck,
                    alpha: progress,
                    scale: 1.0,
                    slide: 1.0 - progress,
                });
                layers
            }
        }
    }
}

fn glyphs(icon: StatusIcon) -> &'static [StatusGlyph] {
    match icon {
        StatusIcon::None => &[],
        StatusIcon::Clock => &[StatusGlyph::Clock],
        StatusIcon::SingleCheck => &[StatusGlyph::Check],
        StatusIcon::DoubleCheck => &[StatusGlyph::Check, StatusGlyph::SecondCheck],
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Transition {
    from: StatusIcon,
    to: StatusIcon,
    morph: StatusMorph,
    progress: AnimatedValue<f32>,
}

/// Drives the delivery icon between states.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusIconMachine {
    shown: StatusIcon,
    transition: Option<Transition>,
    pending: Option<StatusIcon>,
    duration_ms: u64,
    easing: Easing,
}

impl StatusIconMachine {
    /// Creates a machine at rest on `initial`.
    pub fn new(initial: StatusIcon, duration_ms: u64, easing: Easing) -> Self {
        Self {
            shown: initial,
            transition: None,
            pending: None,
            duration_ms,
            easing,
        }
    }

    /// Requests `target`. Returns `true` if a transition started now.
    pub fn set_target(&mut self, target: StatusIcon, now_ms: u64) -> bool {
        self.advance(now_ms);
        let Some(running) = self.transition.as_ref() else {
            if target == self.shown {
                return false;
            }
            self.start(self.shown, target, now_ms, 0.0);
            return true;
        };

        if target == running.to {
            self.pending = None;
            false
        } else if target == running.from {
            let done = running.progress.value_at(now_ms).clamp(0.0, 1.0);
            let (from, to) = (running.to, running.from);
            self.pending = None;
            self.start(from, to, now_ms, 1.0 - done);
            true
        } else {
            self.pending = Some(target);
            false
        }
    }

    /// Finishes elapsed transitions and starts queued ones.
    pub fn advance(&mut self, now_ms: u64) {
        while let Some(running) = self.transition.as_ref() {
            if !running.progress.is_idle(now_ms) {
                break;
            }
            let ended_at = running.progress.start_ms() + running.progress.duration_ms();
            self.shown = running.to;
            self.transition = None;
            match self.pending.take() {
                Some(next) if next != self.shown => self.start(self.shown, next, ended_at, 0.0),
                _ => break,
            }
        }
    }

    /// Frame at `now`. Call [`StatusIconMachine::advance`] first.
    pub fn frame(&self, now_ms: u64) -> StatusFrame {
        let Some(running) = self.transition.as_ref() else {
            return StatusFrame::Static(self.shown);
        };
        let progress = running.progress.value_at(now_ms).clamp(0.0, 1.0);
        match running.morph {
            StatusMorph::CrossFade => StatusFrame::CrossFade {
                from: running.from,
                to: running.to,
                progress,
            },
            StatusMorph::Slide => StatusFrame::Slide {
                from: running.from,
                progress,
            },
        }
    }

    /// Jumps to `icon`, dropping any transition.
    pub fn snap(&mut self, icon: StatusIcon) {
        self.shown = icon;
        self.transition = None;
        self.pending = None;
    }

    /// Returns `true` while a transition is running or queued.
    pub fn is_animating(&self, now_ms: u64) -> bool {
        self.pending.is_some()
            || self
                .transition
                .as_ref()
                .is_some_and(|t| !t.progress.is_idle(now_ms))
    }

    /// Icon the machine will rest on once everything finishes.
    pub fn target(&self) -> StatusIcon {
        self.pending
            .or_else(|| self.transition.as_ref().map(|t| t.to))
            .unwrap_or(self.shown)
    }

    /// Icon currently at rest (the source of a running transition).
    pub fn shown(&self) -> StatusIcon {
        self.shown
    }

    fn start(&mut self, from: StatusIcon, to: StatusIcon, at_ms: u64, initial: f32) {
        let mut progress = AnimatedValue::settled(initial);
        let remaining = ((1.0 - initial) * self.duration_ms as f32).round() as u64;
        progress.retarget(1.0, at_ms, remaining, self.easing);
        if self.transition.is_none() {
            self.shown = from;
        }
        self.transition = Some(Transition {
            from,
            to,
            morph: StatusMorph::between(from, to),
            progress,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> StatusIconMachine {
        StatusIconMachine::new(StatusIcon::None, 220, Easing::Linear)
    }

    #[test]
    fn morph_selection() {
        assert_eq!(
            StatusMorph::between(StatusIcon::SingleCheck, StatusIcon::DoubleCheck),
            StatusMorph::Slide
        );
        assert_eq!(
            StatusMorph::between(StatusIcon::Clock, StatusIcon::DoubleCheck),
            StatusMorph::Slide
        );
        assert_eq!(
            StatusMorph::between(StatusIcon::Clock, StatusIcon::SingleCheck),
            StatusMorph::CrossFade
        );
        assert_eq!(
            StatusMorph::between(StatusIcon::DoubleCheck, StatusIcon::None),
            StatusMorph::CrossFade
        );
    }

    #[test]
    fn cross_fade_shares_one_progress() {
        let mut m = machine();
        assert!(m.set_target(StatusIcon::Clock, 0));
        m.advance(110);
        let StatusFrame::CrossFade { from, to, progress } = m.frame(110) else {
            panic!("expected cross-fade, got {:?}", m.frame(110));
        };
        assert_eq!((from, to), (StatusIcon::None, StatusIcon::Clock));
        assert!((progress - 0.5).abs() < 1e-6);

        let layers = m.frame(110).layers();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].glyph, StatusGlyph::Clock);
        assert!((layers[0].scale - 0.75).abs() < 1e-6);
    }

    #[test]
    fn single_to_double_slides_second_mark() {
        let mut m = StatusIconMachine::new(StatusIcon::SingleCheck, 220, Easing::Linear);
        m.set_target(StatusIcon::DoubleCheck, 0);
        let layers = m.frame(55).layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].glyph, StatusGlyph::Check);
        assert_eq!(layers[0].alpha, 1.0);
        assert_eq!(layers[1].glyph, StatusGlyph::SecondCheck);
        assert!((layers[1].slide - 0.75).abs() < 1e-6);
    }

    #[test]
    fn target_change_mid_flight_is_chained() {
        let mut m = machine();
        m.set_target(StatusIcon::Clock, 0);
        assert!(!m.set_target(StatusIcon::SingleCheck, 100));
        assert_eq!(m.target(), StatusIcon::SingleCheck);

        m.advance(230);
        assert_eq!(m.shown(), StatusIcon::Clock);
        // Chained transition started when the first ended, at 220.
        let StatusFrame::CrossFade { from, to, progress } = m.frame(330) else {
            panic!("expected chained cross-fade");
        };
        assert_eq!((from, to), (StatusIcon::Clock, StatusIcon::SingleCheck));
        assert!((progress - 0.5).abs() < 1e-6);

        m.advance(440);
        assert_eq!(m.frame(440), StatusFrame::Static(StatusIcon::SingleCheck));
        assert!(!m.is_animating(440));
    }

    #[test]
    fn returning_to_source_reverses_from_current_progress() {
        let mut m = machine();
        m.set_target(StatusIcon::Clock, 0);
        assert!(m.set_target(StatusIcon::None, 55));
        let StatusFrame::CrossFade { from, to, progress } = m.frame(55) else {
            panic!("expected reversed cross-fade");
        };
        assert_eq!((from, to), (StatusIcon::Clock, StatusIcon::None));
        assert!((progress - 0.75).abs() < 1e-6);
        m.advance(110);
        assert_eq!(m.frame(110), StatusFrame::Static(StatusIcon::None));
    }

    #[test]
    fn snap_drops_everything() {
        let mut m = machine();
        m.set_target(StatusIcon::Clock, 0);
        m.set_target(StatusIcon::DoubleCheck, 10);
        m.snap(StatusIcon::SingleCheck);
        assert_eq!(m.frame(20), StatusFrame::Static(StatusIcon::SingleCheck));
        assert!(!m.is_animating(20));
    }
}

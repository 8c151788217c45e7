//! Swipe-to-reveal state machine.
//!
//! ```text
//! Idle --(|drag| > slop)--> Dragging <--(|offset| crosses threshold)--> Committing
//!   ^                           |                                          |
//!   |                           +------------- release / cancel -----------+
//!   |                                               v
//!   +------------------ settle finished ------- Settling
//! ```
//!
//! The offset is clamped to the row width and to the row's reveal side.
//! Entering `Committing` fires one haptic pulse; dropping back below the
//! threshold re-arms it. Releasing while committing settles to the fully
//! revealed offset and reports the action exactly once through
//! [`SwipeGestureController::take_committed`].

use super::haptics::{HapticKind, HapticSink};
use crate::animation::{AnimatedValue, Easing};
use crate::layout::{Point, Rect};
use crate::model::{LayoutDirection, SwipeActionKind};
use std::rc::Rc;
use tracing::debug;

/// Tunables for pointer gestures.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Fraction of the row width past which a release commits.
    pub commit_threshold_ratio: f32,
    /// Movement below which a press is still a tap.
    pub touch_slop_px: f32,
    /// Hold time that turns a press into a long press.
    pub long_press_ms: u64,
    /// Duration of the settle animation after release.
    pub settle_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            commit_threshold_ratio: 0.45,
            touch_slop_px: 8.0,
            long_press_ms: 500,
            settle_ms: 250,
        }
    }
}

/// Phase of the swipe gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwipePhase {
    /// At rest.
    #[default]
    Idle,
    /// Following the pointer below the commit threshold.
    Dragging,
    /// Following the pointer beyond the commit threshold.
    Committing,
    /// Animating toward 0 or the fully revealed offset.
    Settling,
}

/// Observable swipe state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwipeState {
    /// Horizontal translation of the foreground.
    pub offset_px: f32,
    /// Current phase.
    pub phase: SwipePhase,
    /// Absolute offset at which a release commits.
    pub commit_threshold_px: f32,
    /// Action revealed behind the row, `None` for rows that cannot swipe.
    pub action: Option<SwipeActionKind>,
    /// Row width the offset is clamped to.
    pub row_width: f32,
}

impl SwipeState {
    /// Reveal progress in `[0, 1]`: the fraction of the row uncovered.
    pub fn progress(&self) -> f32 {
        if self.row_width <= 0.0 {
            return 0.0;
        }
        (self.offset_px.abs() / self.row_width).clamp(0.0, 1.0)
    }

    /// Returns `true` when the revealed layer needs drawing.
    pub fn is_active(&self) -> bool {
        self.phase != SwipePhase::Idle || self.offset_px != 0.0
    }

    /// Returns `true` when the offset is at or past the threshold.
    pub fn beyond_threshold(&self) -> bool {
        self.commit_threshold_px > 0.0 && self.offset_px.abs() >= self.commit_threshold_px
    }

    /// Area of the row left uncovered by the translated foreground.
    pub fn revealed_area(&self, bounds: &Rect) -> Rect {
        if self.offset_px < 0.0 {
            Rect::new(bounds.right() + self.offset_px, bounds.y, -self.offset_px, bounds.height)
        } else {
            Rect::new(bounds.x, bounds.y, self.offset_px, bounds.height)
        }
    }
}

/// Radius of the circular color wipe behind the action icon.
///
/// Reaches the farthest row corner from `icon_center` at full progress, on
/// an accelerating curve of the same progress that drives the offset.
pub fn reveal_radius(icon_center: Point, bounds: &Rect, progress: f32) -> f32 {
    let max = bounds
        .corners()
        .iter()
        .map(|corner| icon_center.distance_to(*corner))
        .fold(0.0_f32, f32::max);
    max * Easing::Accelerate.apply(progress)
}

/// Turns horizontal drag deltas into a [`SwipeState`].
pub struct SwipeGestureController {
    state: SwipeState,
    config: GestureConfig,
    reveal_sign: f32,
    pending_dx: f32,
    armed: bool,
    settle: Option<AnimatedValue<f32>>,
    committed: Option<SwipeActionKind>,
    haptics: Rc<dyn HapticSink>,
}

impl std::fmt::Debug for SwipeGestureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeGestureController")
            .field("state", &self.state)
            .field("armed", &self.armed)
            .field("committed", &self.committed)
            .finish_non_exhaustive()
    }
}

impl SwipeGestureController {
    /// Creates an idle controller.
    pub fn new(config: GestureConfig, haptics: Rc<dyn HapticSink>) -> Self {
        Self {
            state: SwipeState::default(),
            config,
            reveal_sign: -1.0,
            pending_dx: 0.0,
            armed: false,
            settle: None,
            committed: None,
            haptics,
        }
    }

    /// Current state.
    pub fn state(&self) -> &SwipeState {
        &self.state
    }

    /// Gesture tunables.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Updates row geometry and the revealed action.
    ///
    /// Left-to-right rows reveal from the trailing (right) edge by dragging
    /// left; right-to-left rows mirror that. A row without an action drops
    /// any gesture in progress.
    pub fn set_row(&mut self, row_width: f32, direction: LayoutDirection, action: Option<SwipeActionKind>) {
        let width = if row_width.is_finite() { row_width.max(0.0) } else { 0.0 };
        self.state.row_width = width;
        self.state.commit_threshold_px = width * self.config.commit_threshold_ratio;
        self.reveal_sign = match direction {
            LayoutDirection::Ltr => -1.0,
            LayoutDirection::Rtl => 1.0,
        };
        if action.is_none() && self.state.is_active() {
            self.reset();
        }
        self.state.action = action;
        self.state.offset_px = self.clamp_offset(self.state.offset_px);
    }

    /// Applies a horizontal pointer delta.
    pub fn on_drag(&mut self, dx: f32) -> SwipeState {
        self.sanitize();
        if !dx.is_finite() || self.state.action.is_none() || self.state.row_width <= 0.0 {
            return self.state.clone();
        }

        match self.state.phase {
            SwipePhase::Settling => {}
            SwipePhase::Idle => {
                self.pending_dx += dx;
                if self.pending_dx.abs() > self.config.touch_slop_px {
                    self.state.phase = SwipePhase::Dragging;
                    let start = self.pending_dx;
                    self.pending_dx = 0.0;
                    self.apply_offset(start);
                }
            }
            SwipePhase::Dragging | SwipePhase::Committing => {
                self.apply_offset(self.state.offset_px + dx);
            }
        }
        self.state.clone()
    }

    /// Ends the drag. Commits if the offset is beyond the threshold.
    pub fn on_release(&mut self, now_ms: u64) -> SwipeState {
        self.sanitize();
        self.pending_dx = 0.0;
        if matches!(self.state.phase, SwipePhase::Dragging | SwipePhase::Committing) {
            let target = if self.state.beyond_threshold() {
                self.committed = self.state.action;
                debug!(action = ?self.state.action, offset = self.state.offset_px, "swipe committed");
                self.reveal_sign * self.state.row_width
            } else {
                0.0
            };
            self.start_settle(target, now_ms);
        }
        self.tick(now_ms)
    }

    /// Abandons the drag and springs back without committing.
    pub fn on_cancel(&mut self, now_ms: u64) -> SwipeState {
        self.sanitize();
        self.pending_dx = 0.0;
        if matches!(self.state.phase, SwipePhase::Dragging | SwipePhase::Committing) {
            self.start_settle(0.0, now_ms);
        }
        self.tick(now_ms)
    }

    /// Advances the settle animation.
    pub fn tick(&mut self, now_ms: u64) -> SwipeState {
        if let Some(settle) = self.settle.as_mut() {
            self.state.offset_px = *settle.tick(now_ms);
            if settle.is_idle(now_ms) {
                // A committed row hands off to the data layer, which rebinds it.
                self.reset();
            }
        }
        self.state.clone()
    }

    /// Takes the action committed by the last release, at most once.
    pub fn take_committed(&mut self) -> Option<SwipeActionKind> {
        self.committed.take()
    }

    /// Drops any gesture and returns to rest at offset 0.
    pub fn reset(&mut self) {
        self.state.offset_px = 0.0;
        self.state.phase = SwipePhase::Idle;
        self.pending_dx = 0.0;
        self.armed = false;
        self.settle = None;
    }

    fn start_settle(&mut self, target: f32, now_ms: u64) {
        let mut settle = AnimatedValue::settled(self.state.offset_px);
        settle.retarget(target, now_ms, self.config.settle_ms, Easing::EaseOut);
        self.settle = Some(settle);
        self.state.phase = SwipePhase::Settling;
        self.armed = false;
    }

    fn apply_offset(&mut self, raw: f32) {
        self.state.offset_px = self.clamp_offset(raw);
        let beyond = self.state.beyond_threshold();
        if beyond && !self.armed {
            self.armed = true;
            self.state.phase = SwipePhase::Committing;
            self.haptics.pulse(HapticKind::ThresholdCrossed);
        } else if !beyond && self.armed {
            self.armed = false;
            self.state.phase = SwipePhase::Dragging;
        }
    }

    fn clamp_offset(&self, raw: f32) -> f32 {
        let w = self.state.row_width;
        if !raw.is_finite() {
            return 0.0;
        }
        if self.reveal_sign < 0.0 {
            raw.clamp(-w, 0.0)
        } else {
            raw.clamp(0.0, w)
        }
    }

    fn sanitize(&mut self) {
        let s = &self.state;
        let broken = !s.offset_px.is_finite()
            || (s.phase == SwipePhase::Idle && s.offset_px != 0.0)
            || (s.phase == SwipePhase::Settling && self.settle.is_none());
        if broken {
            debug!(state = ?self.state, "inconsistent swipe state, resetting to idle");
            self.reset();
        }
    }
}

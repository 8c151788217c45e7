//! Pointer stream classification.
//!
//! A press either stays still (tap, or long press once held), turns into a
//! horizontal drag that feeds the swipe controller, or turns vertical, which
//! means the list is scrolling and the row must let go.

use crate::layout::Point;

/// Kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Finger or button went down.
    Down,
    /// Pointer moved while down.
    Move,
    /// Finger or button went up.
    Up,
    /// The host took the stream away.
    Cancel,
}

/// A pointer event in row-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Event kind.
    pub kind: PointerKind,
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Event time.
    pub time_ms: u64,
}

impl PointerEvent {
    /// Creates an event.
    pub fn new(kind: PointerKind, x: f32, y: f32, time_ms: u64) -> Self {
        Self { kind, x, y, time_ms }
    }

    /// Event position.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// What the tracker made of one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// The row does not care about this event.
    Ignored,
    /// A press started.
    Pressed,
    /// Horizontal movement since the previous event.
    Drag(f32),
    /// The press ended. `tap` is set when the pointer never left the slop
    /// and no long press fired.
    Released {
        /// Where a tap landed.
        tap: Option<Point>,
    },
    /// The gesture was taken away (vertical scroll or host cancel).
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Track {
    Undecided,
    Horizontal,
    Vertical,
    LongPressed,
}

/// Turns raw pointer events into [`PointerOutcome`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerTracker {
    slop_px: f32,
    long_press_ms: u64,
    down: Option<(Point, u64)>,
    last_x: f32,
    moved: bool,
    track: Track,
}

impl PointerTracker {
    /// Creates a tracker.
    pub fn new(slop_px: f32, long_press_ms: u64) -> Self {
        Self {
            slop_px,
            long_press_ms,
            down: None,
            last_x: 0.0,
            moved: false,
            track: Track::Undecided,
        }
    }

    /// Returns `true` while a press is in progress.
    pub fn is_pressed(&self) -> bool {
        self.down.is_some()
    }

    /// Feeds one event.
    pub fn on_event(&mut self, event: PointerEvent) -> PointerOutcome {
        if !event.x.is_finite() || !event.y.is_finite() {
            return PointerOutcome::Ignored;
        }
        match event.kind {
            PointerKind::Down => {
                self.down = Some((event.position(), event.time_ms));
                self.last_x = event.x;
                self.moved = false;
                self.track = Track::Undecided;
                PointerOutcome::Pressed
            }
            PointerKind::Move => {
                let Some((origin, _)) = self.down else {
                    return PointerOutcome::Ignored;
                };
                let dx = event.x - self.last_x;
                self.last_x = event.x;
                let total_x = event.x - origin.x;
                let total_y = event.y - origin.y;
                if total_x.abs() > self.slop_px || total_y.abs() > self.slop_px {
                    self.moved = true;
                }
                match self.track {
                    Track::Vertical | Track::LongPressed => PointerOutcome::Ignored,
                    Track::Undecided if total_y.abs() > self.slop_px && total_y.abs() > total_x.abs() => {
                        self.track = Track::Vertical;
                        PointerOutcome::Cancelled
                    }
                    Track::Undecided | Track::Horizontal => {
                        if total_x.abs() > self.slop_px {
                            self.track = Track::Horizontal;
                        }
                        PointerOutcome::Drag(dx)
                    }
                }
            }
            PointerKind::Up => {
                let Some((origin, _)) = self.down.take() else {
                    return PointerOutcome::Ignored;
                };
                match self.track {
                    Track::Vertical => PointerOutcome::Ignored,
                    Track::LongPressed => PointerOutcome::Released { tap: None },
                    Track::Undecided | Track::Horizontal => PointerOutcome::Released {
                        tap: (!self.moved).then_some(origin),
                    },
                }
            }
            PointerKind::Cancel => {
                self.down = None;
                PointerOutcome::Cancelled
            }
        }
    }

    /// Reports a long press once the press has been held still long enough.
    pub fn poll_long_press(&mut self, now_ms: u64) -> bool {
        let Some((_, pressed_at)) = self.down else {
            return false;
        };
        if self.moved || self.track != Track::Undecided {
            return false;
        }
        if now_ms.saturating_sub(pressed_at) >= self.long_press_ms {
            self.track = Track::LongPressed;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(kind: PointerKind, x: f32, y: f32, t: u64) -> PointerEvent {
        PointerEvent::new(kind, x, y, t)
    }

    #[test]
    fn still_press_is_a_tap() {
        let mut p = PointerTracker::new(8.0, 500);
        assert_eq!(p.on_event(ev(PointerKind::Down, 100.0, 30.0, 0)), PointerOutcome::Pressed);
        p.on_event(ev(PointerKind::Move, 102.0, 31.0, 20));
        assert_eq!(
            p.on_event(ev(PointerKind::Up, 102.0, 31.0, 60)),
            PointerOutcome::Released {
                tap: Some(Point::new(100.0, 30.0))
            }
        );
    }

    #[test]
    fn horizontal_movement_produces_deltas() {
        let mut p = PointerTracker::new(8.0, 500);
        p.on_event(ev(PointerKind::Down, 300.0, 30.0, 0));
        assert_eq!(p.on_event(ev(PointerKind::Move, 290.0, 31.0, 16)), PointerOutcome::Drag(-10.0));
        assert_eq!(p.on_event(ev(PointerKind::Move, 250.0, 31.0, 32)), PointerOutcome::Drag(-40.0));
        assert_eq!(
            p.on_event(ev(PointerKind::Up, 250.0, 31.0, 48)),
            PointerOutcome::Released { tap: None }
        );
    }

    #[test]
    fn vertical_movement_cancels_once() {
        let mut p = PointerTracker::new(8.0, 500);
        p.on_event(ev(PointerKind::Down, 100.0, 30.0, 0));
        assert_eq!(p.on_event(ev(PointerKind::Move, 101.0, 50.0, 16)), PointerOutcome::Cancelled);
        assert_eq!(p.on_event(ev(PointerKind::Move, 140.0, 60.0, 32)), PointerOutcome::Ignored);
        assert_eq!(p.on_event(ev(PointerKind::Up, 140.0, 60.0, 48)), PointerOutcome::Ignored);
    }

    #[test]
    fn held_press_becomes_long_press_and_suppresses_tap() {
        let mut p = PointerTracker::new(8.0, 500);
        p.on_event(ev(PointerKind::Down, 100.0, 30.0, 0));
        assert!(!p.poll_long_press(499));
        assert!(p.poll_long_press(500));
        assert!(!p.poll_long_press(600));
        assert_eq!(
            p.on_event(ev(PointerKind::Up, 100.0, 30.0, 700)),
            PointerOutcome::Released { tap: None }
        );
    }

    #[test]
    fn moving_press_never_long_presses() {
        let mut p = PointerTracker::new(8.0, 500);
        p.on_event(ev(PointerKind::Down, 100.0, 30.0, 0));
        p.on_event(ev(PointerKind::Move, 80.0, 30.0, 100));
        assert!(!p.poll_long_press(900));
    }
}

//! Pointer gestures: tap and long-press detection, swipe-to-reveal, haptics.

pub mod haptics;
pub mod pointer;
pub mod swipe;

pub use haptics::{HapticKind, HapticSink, LoggingHaptics, RecordingHaptics};
pub use pointer::{PointerEvent, PointerKind, PointerOutcome, PointerTracker};
pub use swipe::{reveal_radius, GestureConfig, SwipeGestureController, SwipePhase, SwipeState};

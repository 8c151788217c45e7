//! Frame-driven animation: easing, animated values, the counter digit roll,
//! the delivery icon state machine, and the per-row transition coordinator.

pub mod coordinator;
pub mod digit_roll;
pub mod easing;
pub mod status_icon;
pub mod value;

pub use coordinator::{
    call_wave_phase, Channel, CounterSample, FrameSample, StartedTransition, TransitionCoordinator,
    TransitionKind, TransitionTimings, CALL_WAVE_STAGES, CALL_WAVE_STAGE_MS,
};
pub use digit_roll::{DigitRoll, RollCarry, RollFrame, ROLL_SLIDE_PX};
pub use easing::Easing;
pub use status_icon::{StatusFrame, StatusGlyph, StatusIconMachine, StatusLayer, StatusMorph};
pub use value::{AnimatedValue, DigitText, Interpolate};

//! Haptic feedback seam.

use std::cell::RefCell;
use tracing::debug;

/// Why a pulse is fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticKind {
    /// A swipe crossed its commit threshold.
    ThresholdCrossed,
    /// A press was held long enough to count as a long press.
    LongPress,
}

/// Receives haptic pulses.
pub trait HapticSink {
    /// Fires one pulse.
    fn pulse(&self, kind: HapticKind);
}

/// Sink for hosts without a vibrator; pulses go to the debug log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHaptics;

impl HapticSink for LoggingHaptics {
    fn pulse(&self, kind: HapticKind) {
        debug!(?kind, "haptic pulse");
    }
}

/// Sink that remembers every pulse.
#[derive(Debug, Default)]
pub struct RecordingHaptics {
    pulses: RefCell<Vec<HapticKind>>,
}

impl RecordingHaptics {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pulses received so far, oldest first.
    pub fn pulses(&self) -> Vec<HapticKind> {
        self.pulses.borrow().clone()
    }

    /// Number of pulses of `kind`.
    pub fn count(&self, kind: HapticKind) -> usize {
        self.pulses.borrow().iter().filter(|k| **k == kind).count()
    }
}

impl HapticSink for RecordingHaptics {
    fn pulse(&self, kind: HapticKind) {
        self.pulses.borrow_mut().push(kind);
    }
}

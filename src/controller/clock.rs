//! Frame clock seam.

use std::cell::Cell;
use std::time::Instant;

/// Host frame clock.
pub trait FrameClock {
    /// Milliseconds on a monotonic clock.
    fn now_millis(&self) -> u64;

    /// Asks the host to draw another frame soon.
    fn request_redraw(&self);
}

/// Clock that only moves when told to. Counts redraw requests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
    redraws: Cell<usize>,
}

impl ManualClock {
    /// Creates a clock at `now_ms`.
    pub fn new(now_ms: u64) -> Self {
        Self {
            now: Cell::new(now_ms),
            redraws: Cell::new(0),
        }
    }

    /// Jumps to `now_ms`.
    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    /// Moves forward by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }

    /// Redraw requests received so far.
    pub fn redraw_requests(&self) -> usize {
        self.redraws.get()
    }
}

impl FrameClock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }

    fn request_redraw(&self) {
        self.redraws.set(self.redraws.get() + 1);
    }
}

/// Wall clock for interactive hosts.
///
/// Redraw requests set a flag the event loop polls with
/// [`SystemClock::take_redraw`].
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
    redraw: Cell<bool>,
}

impl SystemClock {
    /// Starts the clock at zero.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            redraw: Cell::new(false),
        }
    }

    /// Returns and clears the pending redraw request.
    pub fn take_redraw(&self) -> bool {
        self.redraw.replace(false)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn request_redraw(&self) {
        self.redraw.set(true);
    }
}

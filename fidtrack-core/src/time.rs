//! Clocks for driving the tracking cycle
//!
//! The marker table never reads a clock. Expiry is computed from the
//! timestamp the caller hands to each `apply_frame`, which keeps the
//! core `no_std`-clean and makes timeout behavior testable without
//! sleeping. [`TimeSource`] is the one-method seam between the two
//! clocks below and whatever the host loop wants to run on.

/// Milliseconds since an arbitrary monotonic origin
pub type Timestamp = u64;

/// Where the host loop gets its cycle timestamps
pub trait TimeSource {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// Host clock anchored to an [`Instant`](std::time::Instant) taken at
/// construction
///
/// Reads 0 at construction and never goes backwards; wall-clock
/// adjustments on the host cannot make markers expire early or late.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Anchor a new clock at the current instant
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }
}

/// Hand-cranked clock for tests and deterministic replays
///
/// Time only moves when the caller moves it, so a test can step
/// straight to an expiry boundary instead of sleeping up to it.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Timestamp,
}

impl ManualClock {
    /// Clock starting at `now`
    pub fn new(now: Timestamp) -> Self {
        Self { now }
    }

    /// Jump to an absolute timestamp
    pub fn set(&mut self, now: Timestamp) {
        self.now = now;
    }

    /// Crank the clock forward
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}

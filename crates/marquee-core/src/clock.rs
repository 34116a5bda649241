#![forbid(unsafe_code)]

//! Monotonic time sources.
//!
//! Every state machine in this crate measures time as a [`Duration`] since an
//! arbitrary origin. Hosts choose where the timestamps come from:
//!
//! - [`ManualClock`]: the host sets the time explicitly, typically from the
//!   `requestAnimationFrame` timestamp. Clones share the same reading, so a
//!   presenter and the frame loop observe identical time.
//! - [`SystemClock`]: the platform monotonic clock (via `web-time`, which maps
//!   to `performance.now()` on `wasm32`).

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// Supplies monotonically non-decreasing timestamps.
pub trait ClockSource {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

impl<C: ClockSource + ?Sized> ClockSource for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<C: ClockSource + ?Sized> ClockSource for Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Host-controlled clock.
///
/// Cloning yields a handle to the same reading. Setting a time earlier than
/// the current reading is ignored, keeping the clock monotonic even if the
/// host hands over an out-of-order timestamp.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Create a clock reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current time. Earlier timestamps are ignored.
    pub fn set(&self, now: Duration) {
        if now > self.now.get() {
            self.now.set(now);
        }
    }

    /// Set the current time from a host timestamp in milliseconds.
    ///
    /// Negative and non-finite values are ignored.
    pub fn set_millis(&self, now_ms: f64) {
        if now_ms.is_finite() && now_ms >= 0.0 {
            self.set(duration_from_millis(now_ms));
        }
    }

    /// Advance the current time by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get().saturating_add(dt));
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Convert host milliseconds to a [`Duration`], rounding to the nearest
/// nanosecond. Callers validate that `ms` is finite and non-negative.
pub(crate) fn duration_from_millis(ms: f64) -> Duration {
    Duration::from_nanos((ms * 1_000_000.0).round() as u64)
}

/// Platform monotonic clock measured from its construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

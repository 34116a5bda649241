#![forbid(unsafe_code)]

//! Time-based animation primitives.
//!
//! Animations advance by explicit `dt` steps and expose a normalized `f32`
//! value in [0.0, 1.0]. Elapsed time is tracked as [`Duration`] so repeated
//! small ticks never accumulate floating-point drift.
//!
//! Two primitives cover the hero banner and the project overlay:
//!
//! - [`Fade`]: eased progression over a fixed duration (overlay opacity).
//! - [`Blink`]: square-wave toggle on a fixed period (typewriter cursor).

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Eased progression from 0.0 to 1.0 over a duration.
///
/// A zero duration completes on construction.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade with the given duration and linear easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
            easing: linear,
        }
    }

    /// Set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress before easing, in [0.0, 1.0].
    pub fn raw_progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Blink
// ---------------------------------------------------------------------------

/// Square-wave toggle that flips once per `period`. Never completes.
///
/// Starts in the "on" state. Time past the last flip is carried into the next
/// tick, so a stream of uneven ticks flips exactly as often as one tick of the
/// same total length.
#[derive(Debug, Clone, Copy)]
pub struct Blink {
    period: Duration,
    phase: Duration,
    on: bool,
}

impl Blink {
    /// Create a blink toggling every `period`. A zero period never toggles.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            phase: Duration::ZERO,
            on: true,
        }
    }

    /// Whether the toggle is currently in the "on" state.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// The configured period.
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Animation for Blink {
    fn tick(&mut self, dt: Duration) {
        if self.period.is_zero() {
            return;
        }
        let total = self.phase.saturating_add(dt);
        let period = self.period.as_nanos();
        let flips = total.as_nanos() / period;
        let rest = total.as_nanos() % period;
        if flips % 2 == 1 {
            self.on = !self.on;
        }
        // `rest < period`, which came from a Duration, so it fits in u64.
        self.phase = Duration::from_nanos(rest as u64);
    }

    fn is_complete(&self) -> bool {
        false
    }

    fn value(&self) -> f32 {
        if self.on { 1.0 } else { 0.0 }
    }

    fn reset(&mut self) {
        self.phase = Duration::ZERO;
        self.on = true;
    }
}

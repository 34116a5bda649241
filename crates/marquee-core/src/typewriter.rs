#![forbid(unsafe_code)]

//! Frame-paced typewriter engine for the rotating hero phrase.
//!
//! [`TypewriterEngine`] types a phrase one grapheme at a time, holds it,
//! deletes it, and moves on to the next phrase with wraparound. It is driven
//! by absolute timestamps from a [`ClockSource`](crate::ClockSource), one
//! [`tick`](TypewriterEngine::tick) per display frame.
//!
//! # Invariants
//!
//! 1. The displayed text is always a prefix of the active phrase, cut on a
//!    grapheme boundary.
//! 2. While typing the displayed length never shrinks; while deleting it
//!    never grows.
//! 3. At most one grapheme moves per processed tick. Elapsed time beyond that
//!    is carried forward but capped at one character interval, so a stalled
//!    tab resumes smoothly instead of jumping.
//! 4. Ticks closer together than the frame interval are discarded without
//!    touching the latched timestamp, so throttling never loses time.
//! 5. The cursor blink runs on its own period, independent of character
//!    timing.
//!
//! # Cycle
//!
//! ```text
//! Typing ──(phrase complete)──▶ PausedBeforeDelete ──(pause elapsed)──▶ Deleting
//!   ▲                                                                      │
//!   └──────────────(empty on next tick: next phrase)──────────────────────┘
//! ```

use std::time::Duration;

use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use rand_chacha::ChaCha8Rng;
use unicode_segmentation::UnicodeSegmentation;

use crate::animation::{Animation, Blink};
use crate::config::{ConfigError, SiteConfig, Timing, TimingConfig};

/// Phase of the typing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Typing,
    PausedBeforeDelete,
    Deleting,
}

/// Snapshot of the engine's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterState {
    phrase_index: usize,
    visible: usize,
    mode: Mode,
    accumulated: Duration,
    cursor_visible: bool,
}

impl TypewriterState {
    /// Index of the active phrase.
    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    /// Number of graphemes of the active phrase currently displayed.
    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Time credited toward the next character.
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }
}

/// What the presentation layer renders after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterView<'a> {
    pub text: &'a str,
    pub cursor_visible: bool,
    pub mode: Mode,
    pub phrase_index: usize,
}

/// A phrase with precomputed grapheme boundaries.
#[derive(Debug, Clone)]
struct Phrase {
    text: String,
    /// `bounds[n]` is the byte offset just past the `n`th grapheme.
    bounds: Vec<usize>,
}

impl Phrase {
    fn new(text: String) -> Self {
        let mut bounds = Vec::with_capacity(text.len() + 1);
        bounds.push(0);
        bounds.extend(text.grapheme_indices(true).map(|(i, g)| i + g.len()));
        Self { text, bounds }
    }

    fn graphemes(&self) -> usize {
        self.bounds.len() - 1
    }

    fn prefix(&self, graphemes: usize) -> &str {
        &self.text[..self.bounds[graphemes.min(self.graphemes())]]
    }
}

/// Deterministic typewriter state machine.
#[derive(Debug, Clone)]
pub struct TypewriterEngine {
    phrases: Vec<Phrase>,
    timing: Timing,
    state: TypewriterState,
    last_tick: Option<Duration>,
    pause_start: Option<Duration>,
    blink: Blink,
    jitter: Option<ChaCha8Rng>,
    type_interval: Duration,
}

impl TypewriterEngine {
    /// Build an engine over `phrases` with the given timing.
    ///
    /// Fails when the phrase list is empty or the timing is invalid.
    pub fn new<I, S>(phrases: I, timing: &TimingConfig) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<Phrase> = phrases
            .into_iter()
            .map(|p| Phrase::new(p.into()))
            .collect();
        if phrases.is_empty() {
            return Err(ConfigError::EmptyPhraseList);
        }
        let timing = timing.resolve()?;
        let jitter = (!timing.type_jitter.is_zero())
            .then(|| ChaCha8Rng::seed_from_u64(timing.jitter_seed));

        let mut engine = Self {
            phrases,
            timing,
            state: TypewriterState {
                phrase_index: 0,
                visible: 0,
                mode: Mode::Typing,
                accumulated: Duration::ZERO,
                cursor_visible: true,
            },
            last_tick: None,
            pause_start: None,
            blink: Blink::new(timing.cursor_blink),
            jitter,
            type_interval: timing.type_interval,
        };
        engine.redraw_type_interval();
        Ok(engine)
    }

    /// Build an engine from a site configuration.
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        Self::new(config.phrases.iter().cloned(), &config.timing)
    }

    /// Advance the state machine to `now`.
    ///
    /// The first call only latches the timestamp. Calls less than one frame
    /// interval after the last processed tick are ignored.
    pub fn tick(&mut self, now: Duration) -> TypewriterView<'_> {
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return self.view();
        };

        let delta = now.saturating_sub(last);
        if delta < self.timing.frame_interval {
            return self.view();
        }

        self.blink.tick(delta);
        self.state.cursor_visible = self.blink.is_on();
        self.step(now, delta);
        self.last_tick = Some(now);
        self.view()
    }

    /// Current output without advancing time.
    pub fn view(&self) -> TypewriterView<'_> {
        TypewriterView {
            text: self.displayed_text(),
            cursor_visible: self.state.cursor_visible,
            mode: self.state.mode,
            phrase_index: self.state.phrase_index,
        }
    }

    pub fn state(&self) -> &TypewriterState {
        &self.state
    }

    /// The displayed prefix of the active phrase.
    pub fn displayed_text(&self) -> &str {
        self.active().prefix(self.state.visible)
    }

    /// The full active phrase.
    pub fn current_phrase(&self) -> &str {
        &self.active().text
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    /// Validated timing in effect.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    fn active(&self) -> &Phrase {
        &self.phrases[self.state.phrase_index]
    }

    fn fully_typed(&self) -> bool {
        self.state.visible >= self.active().graphemes()
    }

    fn step(&mut self, now: Duration, delta: Duration) {
        match self.state.mode {
            Mode::Typing if self.fully_typed() => self.enter_pause(now),
            Mode::Typing => {
                if self.credit(delta, self.type_interval) {
                    self.state.visible += 1;
                    self.redraw_type_interval();
                    if self.fully_typed() {
                        self.enter_pause(now);
                    }
                }
            }
            Mode::PausedBeforeDelete => {
                let started = self.pause_start.unwrap_or(now);
                if now.saturating_sub(started) >= self.timing.pause {
                    self.pause_start = None;
                    self.state.mode = Mode::Deleting;
                    tracing::debug!(phrase_index = self.state.phrase_index, "typewriter deleting");
                }
            }
            Mode::Deleting if self.state.visible == 0 => {
                self.state.phrase_index = (self.state.phrase_index + 1) % self.phrases.len();
                self.state.mode = Mode::Typing;
                self.state.accumulated = Duration::ZERO;
                tracing::debug!(phrase_index = self.state.phrase_index, "typewriter typing");
            }
            Mode::Deleting => {
                if self.credit(delta, self.timing.delete_interval) {
                    self.state.visible -= 1;
                }
            }
        }
    }

    /// Add `delta` to the accumulator and consume one `interval` if enough
    /// time has built up. Leftover credit is capped at one interval.
    fn credit(&mut self, delta: Duration, interval: Duration) -> bool {
        let total = self.state.accumulated.saturating_add(delta);
        if total >= interval {
            self.state.accumulated = (total - interval).min(interval);
            true
        } else {
            self.state.accumulated = total;
            false
        }
    }

    fn enter_pause(&mut self, now: Duration) {
        self.state.mode = Mode::PausedBeforeDelete;
        self.state.accumulated = Duration::ZERO;
        self.pause_start = Some(now);
        tracing::debug!(phrase_index = self.state.phrase_index, "typewriter paused");
    }

    fn redraw_type_interval(&mut self) {
        let base = self.timing.type_interval;
        self.type_interval = match self.jitter.as_mut() {
            Some(rng) => {
                let spread = u64::try_from(self.timing.type_jitter.as_nanos()).unwrap_or(u64::MAX);
                base.saturating_add(Duration::from_nanos(rng.gen_range(0..spread)))
            }
            None => base,
        };
        self.state.accumulated = self.state.accumulated.min(self.type_interval);
    }
}

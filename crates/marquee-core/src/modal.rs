#![forbid(unsafe_code)]

//! Project detail overlay lifecycle.
//!
//! [`ModalPresenter`] owns "which project is selected", the open/close phase,
//! and the scroll lock that freezes the page behind the overlay.
//!
//! ```text
//! Closed ──open(i)──▶ Opening ──paint()──▶ Open ──close()──▶ Closing ──delay──▶ Closed
//!                        ▲                                     │
//!                        └───────────────open(j)───────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. The scroll lock is engaged iff the phase is not `Closed`.
//! 2. `selected` is `None` only when the phase is `Closed`; it stays set
//!    through `Closing` so the outgoing overlay can still render its content.
//! 3. At most one close timer is pending. Opening again cancels it, so a
//!    stale timer never clears a newer selection.
//! 4. Every dismissal (backdrop, close button, Escape) goes through
//!    [`ModalPresenter::close`] and produces the same transition.
//! 5. An out-of-range open is rejected without touching any state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::{Animation, Fade, ease_in, ease_out};
use crate::clock::ClockSource;
use crate::config::{ConfigError, Project, SiteConfig};
use crate::event::{InputEvent, KeyCode};
use crate::scroll_lock::{Disposition, InterceptTarget, LockHandle, ScrollLockController};

/// Overlay phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalPhase {
    #[default]
    Closed,
    /// Mounted; the fade-in starts on the next paint.
    Opening,
    Open,
    /// Fading out; content stays addressable until the close delay elapses.
    Closing,
}

impl ModalPhase {
    /// Whether the overlay is mounted (any phase but `Closed`).
    pub const fn is_mounted(self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Stable lowercase name for hosts and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Open => "open",
            Self::Closing => "closing",
        }
    }
}

/// Where a dismissal came from. All sources behave identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissSource {
    Backdrop,
    CloseButton,
    Escape,
}

/// Errors from [`ModalPresenter::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalError {
    /// The requested project index does not exist.
    OutOfRange { index: usize, len: usize },
}

impl std::fmt::Display for ModalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "project index {index} out of range for {len} projects")
            }
        }
    }
}

impl std::error::Error for ModalError {}

/// Overlay state machine composed with a scroll lock and a close timer.
pub struct ModalPresenter<C: ClockSource, T: InterceptTarget> {
    projects: Vec<Project>,
    clock: C,
    lock: ScrollLockController<T>,
    handle: Option<LockHandle<T>>,
    phase: ModalPhase,
    selected: Option<usize>,
    close_delay: Duration,
    close_deadline: Option<Duration>,
    fade: Fade,
    /// Opacity at the moment the close started.
    fade_from: f32,
    last_tick: Option<Duration>,
}

impl<C: ClockSource, T: InterceptTarget> std::fmt::Debug for ModalPresenter<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalPresenter")
            .field("projects", &self.projects.len())
            .field("phase", &self.phase)
            .field("selected", &self.selected)
            .field("close_deadline", &self.close_deadline)
            .finish()
    }
}

impl<C: ClockSource, T: InterceptTarget> ModalPresenter<C, T> {
    /// Create a closed presenter over `projects`.
    ///
    /// `close_delay` is both the fade-out length and the time `selected`
    /// stays set after a dismissal; the fade-in uses the same length.
    pub fn new(projects: Vec<Project>, close_delay: Duration, clock: C, target: T) -> Self {
        Self {
            projects,
            clock,
            lock: ScrollLockController::new(target),
            handle: None,
            phase: ModalPhase::Closed,
            selected: None,
            close_delay,
            close_deadline: None,
            fade: Fade::new(close_delay),
            fade_from: 0.0,
            last_tick: None,
        }
    }

    /// Create a presenter from a site configuration.
    pub fn from_config(config: &SiteConfig, clock: C, target: T) -> Result<Self, ConfigError> {
        let timing = config.timing.resolve()?;
        Ok(Self::new(
            config.projects.clone(),
            timing.close_delay,
            clock,
            target,
        ))
    }

    /// Show project `index`.
    ///
    /// From any phase this cancels a pending close and re-enters `Opening`.
    pub fn open(&mut self, index: usize) -> Result<(), ModalError> {
        let len = self.projects.len();
        if index >= len {
            tracing::warn!(index, len, "rejected out-of-range project");
            return Err(ModalError::OutOfRange { index, len });
        }

        if self.close_deadline.take().is_some() {
            tracing::debug!(index, "pending close cancelled by open");
        }
        self.selected = Some(index);
        self.handle = Some(self.lock.engage());
        self.fade = Fade::new(self.close_delay).easing(ease_out);
        self.set_phase(ModalPhase::Opening);
        Ok(())
    }

    /// Begin closing. No-op unless the overlay is opening or open.
    pub fn close(&mut self) {
        if !matches!(self.phase, ModalPhase::Opening | ModalPhase::Open) {
            return;
        }
        let now = self.clock.now();
        self.fade_from = self.opacity();
        self.fade = Fade::new(self.close_delay).easing(ease_in);
        self.close_deadline = Some(now.saturating_add(self.close_delay));
        self.set_phase(ModalPhase::Closing);
        tracing::debug!(delay = ?self.close_delay, "close scheduled");
    }

    /// Route a dismissal intent into [`close`](Self::close).
    pub fn dismiss(&mut self, source: DismissSource) {
        tracing::debug!(?source, "dismiss");
        self.close();
    }

    /// Paint notification: starts the fade-in of a freshly opened overlay.
    pub fn paint(&mut self) {
        if self.phase == ModalPhase::Opening {
            self.fade = Fade::new(self.close_delay).easing(ease_out);
            self.set_phase(ModalPhase::Open);
        }
    }

    /// Advance fades and fire the close timer if it has elapsed.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        if let Some(last) = self.last_tick {
            self.fade.tick(now.saturating_sub(last));
        }
        self.last_tick = Some(now);

        if let Some(deadline) = self.close_deadline
            && now >= deadline
        {
            self.finish_close();
        }
    }

    /// Classify an input event while the overlay may be mounted.
    ///
    /// Escape dismisses a mounted overlay; everything else is filtered by
    /// the scroll lock.
    pub fn handle_input(&mut self, event: &InputEvent) -> Disposition {
        if self.phase.is_mounted()
            && let InputEvent::Key(key) = event
            && key.is_press_of(&KeyCode::Escape)
        {
            self.dismiss(DismissSource::Escape);
            return Disposition::Handled;
        }
        self.lock.filter(event)
    }

    /// End the session: cancel the close timer and release the lock.
    pub fn teardown(&mut self) {
        if self.close_deadline.is_some() {
            tracing::debug!("pending close cancelled by teardown");
        }
        self.finish_close();
        self.lock.release_all();
    }

    /// Whether the overlay is mounted (`Opening`, `Open`, or `Closing`).
    pub fn is_open(&self) -> bool {
        self.phase.is_mounted()
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected.and_then(|i| self.projects.get(i))
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn lock_engaged(&self) -> bool {
        self.lock.is_engaged()
    }

    /// Whether a close timer is pending.
    pub fn close_pending(&self) -> bool {
        self.close_deadline.is_some()
    }

    /// Overlay opacity in [0, 1] for the presentation layer.
    pub fn opacity(&self) -> f32 {
        match self.phase {
            ModalPhase::Closed | ModalPhase::Opening => 0.0,
            ModalPhase::Open => self.fade.value(),
            ModalPhase::Closing => self.fade_from * (1.0 - self.fade.value()),
        }
    }

    pub fn lock(&self) -> &ScrollLockController<T> {
        &self.lock
    }

    /// The clock the close timer reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn finish_close(&mut self) {
        self.close_deadline = None;
        self.selected = None;
        if let Some(handle) = self.handle.take() {
            handle.release();
        }
        self.set_phase(ModalPhase::Closed);
    }

    fn set_phase(&mut self, phase: ModalPhase) {
        if self.phase != phase {
            tracing::debug!(from = self.phase.as_str(), to = phase.as_str(), selected = ?self.selected, "modal phase");
            self.phase = phase;
        }
    }
}

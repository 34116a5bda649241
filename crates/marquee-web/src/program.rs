#![forbid(unsafe_code)]

//! Step-based runner for the hero banner and project overlay.
//!
//! [`HeroProgram`] composes a [`TypewriterEngine`] and a [`ModalPresenter`]
//! behind a single per-frame entry point. No threads, no blocking: the host
//! controls the loop.
//!
//! 1. Update the clock (for example, from the `requestAnimationFrame`
//!    timestamp pushed into a [`ManualClock`](marquee_core::ManualClock)).
//! 2. Call [`HeroProgram::step`].
//! 3. If [`StepResult::repaint`] is set, read [`HeroProgram::snapshot`] and
//!    update the page.
//!
//! # Example
//!
//! ```
//! use marquee_core::{FlagTarget, ManualClock, SiteConfig};
//! use marquee_web::program::HeroProgram;
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let mut prog = HeroProgram::new(&SiteConfig::default(), clock.clone(), FlagTarget::new())
//!     .unwrap();
//!
//! clock.advance(Duration::from_millis(16));
//! let result = prog.step();
//! if result.repaint {
//!     let json = serde_json::to_string(&prog.snapshot()).unwrap();
//!     assert!(json.contains("\"modal_phase\":\"closed\""));
//! }
//! ```

use marquee_core::event::InputEvent;
use marquee_core::{
    ClockSource, ConfigError, DismissSource, Disposition, InterceptTarget, ModalError,
    ModalPhase, ModalPresenter, Mode, SiteConfig, TypewriterEngine,
};
use serde::{Deserialize, Serialize};

/// Result of a single [`HeroProgram::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the program is still mounted (false after `unmount`).
    pub mounted: bool,
    /// Whether any output signal changed since the last repaint.
    pub repaint: bool,
    /// Number of repaints so far (monotonically increasing).
    pub frame_idx: u64,
}

/// Every output signal the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Displayed prefix of the active phrase.
    pub text: String,
    pub cursor_visible: bool,
    pub mode: Mode,
    pub phrase_index: usize,
    pub modal_phase: ModalPhase,
    pub selected: Option<usize>,
    pub lock_engaged: bool,
    /// Overlay opacity in [0, 1].
    pub opacity: f32,
}

/// Cheap fingerprint of the output signals, compared frame to frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Signals {
    phrase_index: usize,
    visible: usize,
    cursor_visible: bool,
    mode: Mode,
    modal_phase: ModalPhase,
    selected: Option<usize>,
    lock_engaged: bool,
    opacity: f32,
}

/// Host-driven composition of the typewriter and the overlay.
///
/// # Lifecycle
///
/// 1. [`HeroProgram::new`]: validate the configuration and mount.
/// 2. [`HeroProgram::step`]: once per display frame.
/// 3. [`HeroProgram::unmount`]: cancel the close timer and release the
///    scroll lock. Later steps are no-ops.
pub struct HeroProgram<C: ClockSource, T: InterceptTarget> {
    typewriter: TypewriterEngine,
    modal: ModalPresenter<C, T>,
    mounted: bool,
    frame_idx: u64,
    painted: Option<Signals>,
}

impl<C: ClockSource, T: InterceptTarget> std::fmt::Debug for HeroProgram<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeroProgram")
            .field("typewriter", &self.typewriter.state())
            .field("modal", &self.modal)
            .field("mounted", &self.mounted)
            .field("frame_idx", &self.frame_idx)
            .finish()
    }
}

impl<C: ClockSource, T: InterceptTarget> HeroProgram<C, T> {
    /// Validate `config` and mount a program reading time from `clock`.
    pub fn new(config: &SiteConfig, clock: C, target: T) -> Result<Self, ConfigError> {
        let typewriter = TypewriterEngine::from_config(config)?;
        let modal = ModalPresenter::from_config(config, clock, target)?;
        tracing::info!(
            phrases = typewriter.phrase_count(),
            projects = modal.projects().len(),
            "hero mounted"
        );
        Ok(Self {
            typewriter,
            modal,
            mounted: true,
            frame_idx: 0,
            painted: None,
        })
    }

    /// Advance every state machine to the clock's current time.
    pub fn step(&mut self) -> StepResult {
        if !self.mounted {
            return StepResult {
                mounted: false,
                repaint: false,
                frame_idx: self.frame_idx,
            };
        }

        let now = self.modal.clock().now();
        self.typewriter.tick(now);
        self.modal.tick();

        let signals = self.signals();
        let repaint = self.painted != Some(signals);
        if repaint {
            self.painted = Some(signals);
            self.frame_idx += 1;
        }
        StepResult {
            mounted: true,
            repaint,
            frame_idx: self.frame_idx,
        }
    }

    /// Current output signals.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        let view = self.typewriter.view();
        FrameSnapshot {
            text: view.text.to_owned(),
            cursor_visible: view.cursor_visible,
            mode: view.mode,
            phrase_index: view.phrase_index,
            modal_phase: self.modal.phase(),
            selected: self.modal.selected(),
            lock_engaged: self.modal.lock_engaged(),
            opacity: self.modal.opacity(),
        }
    }

    /// Route an input event to the overlay.
    ///
    /// Returns what the host should do with the event's default action.
    pub fn handle_input(&mut self, event: &InputEvent) -> Disposition {
        if !self.mounted {
            return Disposition::PassThrough;
        }
        self.modal.handle_input(event)
    }

    /// Open the overlay on project `index`. Ignored once unmounted.
    pub fn open(&mut self, index: usize) -> Result<(), ModalError> {
        if !self.mounted {
            tracing::debug!(index, "open ignored after unmount");
            return Ok(());
        }
        self.modal.open(index)
    }

    pub fn close(&mut self) {
        self.modal.close();
    }

    pub fn dismiss(&mut self, source: DismissSource) {
        self.modal.dismiss(source);
    }

    /// Paint notification from the host; starts a pending fade-in.
    pub fn paint(&mut self) {
        self.modal.paint();
    }

    /// Tear the session down. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.modal.teardown();
        tracing::info!(frames = self.frame_idx, "hero unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    pub fn typewriter(&self) -> &TypewriterEngine {
        &self.typewriter
    }

    pub fn modal(&self) -> &ModalPresenter<C, T> {
        &self.modal
    }

    fn signals(&self) -> Signals {
        let state = self.typewriter.state();
        Signals {
            phrase_index: state.phrase_index(),
            visible: state.visible(),
            cursor_visible: state.cursor_visible(),
            mode: state.mode(),
            modal_phase: self.modal.phase(),
            selected: self.modal.selected(),
            lock_engaged: self.modal.lock_engaged(),
            opacity: self.modal.opacity(),
        }
    }
}

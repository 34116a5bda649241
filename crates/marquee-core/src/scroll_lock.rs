#![forbid(unsafe_code)]

//! Scoped suppression of background scrolling.
//!
//! While a [`ScrollLockController`] is engaged, every scroll-producing input
//! (wheel steps, scroll keys, single-finger touch drags) is classified as
//! [`Disposition::Suppress`] so the host cancels its default action. The page
//! keeps its scrollbar; only the input is swallowed.
//!
//! The document-level listeners that perform the interception are a
//! process-wide resource, abstracted as an [`InterceptTarget`]. The
//! controller installs them at most once, however many times it is engaged.
//!
//! # Invariants
//!
//! 1. At most one listener set is installed at any time.
//! 2. Engaging while engaged is a no-op; the returned handle shares the
//!    current engagement's release capability.
//! 3. [`LockHandle::release`] is idempotent and never fails. A handle from an
//!    earlier engagement cannot release a later one.
//! 4. Dropping the controller uninstalls an engaged target.
//!
//! # Exemptions
//!
//! Multi-touch gestures pass through so pinch-zoom keeps working. Trackpad
//! pinch arrives as a wheel event with the control modifier and is exempted
//! for the same reason. Key releases pass through.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::event::{InputEvent, KeyCode, KeyPhase, Modifiers, TouchPhase};

/// What the host should do with an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Let the event reach its default handling.
    PassThrough,
    /// Cancel the event's default action.
    Suppress,
    /// The event was consumed by the overlay (for example, Escape to close).
    Handled,
}

impl Disposition {
    /// Whether the host should call `preventDefault` on the event.
    #[must_use]
    pub const fn cancels_default(self) -> bool {
        !matches!(self, Self::PassThrough)
    }
}

/// Whether `event` would scroll the page if left alone.
///
/// This is the classification applied by an engaged lock. It is independent
/// of lock state so listeners installed by a target can call it directly.
#[must_use]
pub fn scrolls_page(event: &InputEvent) -> bool {
    match event {
        InputEvent::Wheel(wheel) => {
            !wheel.mods.contains(Modifiers::CTRL) && (wheel.dx != 0 || wheel.dy != 0)
        }
        InputEvent::Key(key) => key.phase == KeyPhase::Down && is_scroll_key(&key.code),
        InputEvent::Touch(touch) => touch.phase == TouchPhase::Move && touch.touches == 1,
    }
}

fn is_scroll_key(code: &KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Up
            | KeyCode::Down
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::PageUp
            | KeyCode::PageDown
            | KeyCode::Home
            | KeyCode::End
            | KeyCode::Char(' ')
    )
}

/// The host resource that intercepts input while the lock is engaged.
pub trait InterceptTarget {
    /// Start intercepting scroll input.
    fn install(&mut self);

    /// Stop intercepting scroll input.
    fn uninstall(&mut self);
}

/// Target for hosts that apply interception themselves.
///
/// The host polls [`FlagTarget::is_installed`] (or the controller's
/// [`is_engaged`](ScrollLockController::is_engaged)) and routes events
/// through [`ScrollLockController::filter`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlagTarget {
    installed: bool,
    installs: u64,
    uninstalls: u64,
}

impl FlagTarget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Total number of installs over the target's lifetime.
    pub fn installs(&self) -> u64 {
        self.installs
    }

    /// Total number of uninstalls over the target's lifetime.
    pub fn uninstalls(&self) -> u64 {
        self.uninstalls
    }
}

impl InterceptTarget for FlagTarget {
    fn install(&mut self) {
        self.installed = true;
        self.installs += 1;
    }

    fn uninstall(&mut self) {
        self.installed = false;
        self.uninstalls += 1;
    }
}

#[derive(Debug)]
struct LockState<T> {
    target: T,
    /// Generation of the current engagement, if any.
    engaged: Option<u64>,
    next_generation: u64,
}

impl<T: InterceptTarget> LockState<T> {
    fn release(&mut self, generation: u64) {
        if self.engaged == Some(generation) {
            self.engaged = None;
            self.target.uninstall();
            tracing::debug!(generation, "scroll lock released");
        }
    }
}

/// Owner of the intercept target and its single active engagement.
#[derive(Debug)]
pub struct ScrollLockController<T: InterceptTarget> {
    state: Rc<RefCell<LockState<T>>>,
}

impl<T: InterceptTarget> ScrollLockController<T> {
    pub fn new(target: T) -> Self {
        Self {
            state: Rc::new(RefCell::new(LockState {
                target,
                engaged: None,
                next_generation: 0,
            })),
        }
    }

    /// Engage the lock, installing the target if it is not already.
    pub fn engage(&self) -> LockHandle<T> {
        let mut state = self.state.borrow_mut();
        let generation = match state.engaged {
            Some(generation) => generation,
            None => {
                let generation = state.next_generation;
                state.next_generation += 1;
                state.engaged = Some(generation);
                state.target.install();
                tracing::debug!(generation, "scroll lock engaged");
                generation
            }
        };
        LockHandle {
            state: Rc::downgrade(&self.state),
            generation,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.state.borrow().engaged.is_some()
    }

    /// Release whatever engagement is active. No-op when not engaged.
    pub fn release_all(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(generation) = state.engaged {
            state.release(generation);
        }
    }

    /// Classify `event` against the current lock state.
    pub fn filter(&self, event: &InputEvent) -> Disposition {
        if self.is_engaged() && scrolls_page(event) {
            Disposition::Suppress
        } else {
            Disposition::PassThrough
        }
    }

    /// Run `f` with shared access to the target.
    pub fn with_target<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state.borrow().target)
    }
}

impl<T: InterceptTarget> Drop for ScrollLockController<T> {
    fn drop(&mut self) {
        self.release_all();
    }
}

/// Release capability for one engagement of a [`ScrollLockController`].
///
/// Cloning shares the capability; releasing through any clone releases the
/// engagement once.
#[derive(Debug)]
pub struct LockHandle<T: InterceptTarget> {
    state: Weak<RefCell<LockState<T>>>,
    generation: u64,
}

impl<T: InterceptTarget> Clone for LockHandle<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            generation: self.generation,
        }
    }
}

impl<T: InterceptTarget> LockHandle<T> {
    /// Uninstall the target if this handle's engagement is still active.
    pub fn release(&self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().release(self.generation);
        }
    }

    /// Whether this handle's engagement is still active.
    pub fn is_active(&self) -> bool {
        self.state
            .upgrade()
            .is_some_and(|state| state.borrow().engaged == Some(self.generation))
    }
}

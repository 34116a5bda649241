#![forbid(unsafe_code)]

//! Canonical input events seen by the scroll lock and the modal presenter.
//!
//! Hosts normalize their native events (DOM `KeyboardEvent`, `WheelEvent`,
//! `TouchEvent`) into these types. Only the fields needed to decide whether
//! an event scrolls the page are kept: key identity and phase, wheel deltas,
//! and the number of active touch points.

use bitflags::bitflags;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// A keyboard event.
    Key(KeyInput),
    /// A mouse wheel or trackpad scroll.
    Wheel(WheelInput),
    /// A touch event.
    Touch(TouchInput),
}

impl InputEvent {
    /// Shorthand for a key press without modifiers.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key(KeyInput {
            phase: KeyPhase::Down,
            code,
            mods: Modifiers::empty(),
            repeat: false,
        })
    }

    /// Shorthand for a vertical wheel step without modifiers.
    #[must_use]
    pub const fn wheel(dy: i16) -> Self {
        Self::Wheel(WheelInput {
            dx: 0,
            dy,
            mods: Modifiers::empty(),
        })
    }

    /// Shorthand for a touch event with `touches` active points.
    #[must_use]
    pub const fn touch(phase: TouchPhase, touches: u8) -> Self {
        Self::Touch(TouchInput { phase, touches })
    }
}

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Phase for key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    Down,
    Up,
}

/// Normalized key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character; the space bar is `Char(' ')`.
    Char(char),
    Enter,
    Escape,
    Tab,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Any key the lock and presenter do not care about.
    Other(Box<str>),
}

/// Normalized key input event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub phase: KeyPhase,
    pub code: KeyCode,
    pub mods: Modifiers,
    /// Auto-repeat from a held key.
    pub repeat: bool,
}

/// Normalized wheel input (sign-preserving integer deltas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WheelInput {
    pub dx: i16,
    pub dy: i16,
    pub mods: Modifiers,
}

/// Phase for touch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Normalized touch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchInput {
    pub phase: TouchPhase,
    /// Number of touch points currently on the surface.
    pub touches: u8,
}

impl KeyInput {
    /// Whether this is a press (or repeat) of `code`.
    #[must_use]
    pub fn is_press_of(&self, code: &KeyCode) -> bool {
        self.phase == KeyPhase::Down && &self.code == code
    }
}

#![forbid(unsafe_code)]

//! DOM event normalization.
//!
//! Converts the raw fields of `KeyboardEvent`, `WheelEvent` and `TouchEvent`
//! into [`marquee_core::event::InputEvent`]. The functions take plain values
//! rather than `web-sys` types so they are testable on native targets.

use marquee_core::event::{
    InputEvent, KeyCode, KeyInput, KeyPhase, Modifiers, TouchInput, TouchPhase, WheelInput,
};

/// Build [`Modifiers`] from the DOM `shiftKey` / `altKey` / `ctrlKey` /
/// `metaKey` flags.
#[must_use]
pub fn modifiers_from_dom(shift: bool, alt: bool, ctrl: bool, meta: bool) -> Modifiers {
    let mut mods = Modifiers::empty();
    mods.set(Modifiers::SHIFT, shift);
    mods.set(Modifiers::ALT, alt);
    mods.set(Modifiers::CTRL, ctrl);
    mods.set(Modifiers::SUPER, meta);
    mods
}

/// Normalize DOM `KeyboardEvent.key` / `KeyboardEvent.code` into a [`KeyCode`].
///
/// The logical `key` wins for printable characters; the physical `code` is
/// the fallback for named keys some layouts report oddly.
#[must_use]
pub fn normalize_dom_key_code(dom_key: &str, dom_code: &str) -> KeyCode {
    let mut chars = dom_key.chars();
    if let Some(first) = chars.next()
        && chars.next().is_none()
    {
        return KeyCode::Char(first);
    }

    if let Some(code) = named_key(dom_key) {
        return code;
    }
    match dom_key {
        "Esc" => KeyCode::Escape,
        "Spacebar" => KeyCode::Char(' '),
        _ => named_key(dom_code)
            .or_else(|| (dom_code == "Space").then_some(KeyCode::Char(' ')))
            .or_else(|| (dom_code == "NumpadEnter").then_some(KeyCode::Enter))
            .unwrap_or_else(|| KeyCode::Other(dom_key.into())),
    }
}

fn named_key(name: &str) -> Option<KeyCode> {
    Some(match name {
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "ArrowUp" => KeyCode::Up,
        "ArrowDown" => KeyCode::Down,
        "ArrowLeft" => KeyCode::Left,
        "ArrowRight" => KeyCode::Right,
        _ => return None,
    })
}

/// Normalize a `keydown` / `keyup` event.
#[must_use]
pub fn key_event_from_dom(
    phase: KeyPhase,
    dom_key: &str,
    dom_code: &str,
    mods: Modifiers,
    repeat: bool,
) -> InputEvent {
    InputEvent::Key(KeyInput {
        phase,
        code: normalize_dom_key_code(dom_key, dom_code),
        mods,
        repeat,
    })
}

/// Normalize a `wheel` event's deltas.
///
/// Any non-zero delta, however small, stays non-zero with its sign, so a
/// sub-pixel trackpad scroll is still recognized as scrolling. Non-finite
/// deltas become zero.
#[must_use]
pub fn wheel_event_from_dom(delta_x: f64, delta_y: f64, mods: Modifiers) -> InputEvent {
    InputEvent::Wheel(WheelInput {
        dx: wheel_delta(delta_x),
        dy: wheel_delta(delta_y),
        mods,
    })
}

fn wheel_delta(delta: f64) -> i16 {
    if !delta.is_finite() || delta == 0.0 {
        return 0;
    }
    let stepped = if delta > 0.0 {
        delta.ceil()
    } else {
        delta.floor()
    };
    stepped.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

/// Map a DOM touch event type (`touchstart`, `touchmove`, ...) to a phase.
#[must_use]
pub fn touch_phase_from_dom(event_type: &str) -> Option<TouchPhase> {
    match event_type {
        "touchstart" => Some(TouchPhase::Start),
        "touchmove" => Some(TouchPhase::Move),
        "touchend" => Some(TouchPhase::End),
        "touchcancel" => Some(TouchPhase::Cancel),
        _ => None,
    }
}

/// Normalize a touch event from its phase and `touches.length`.
#[must_use]
pub fn touch_event_from_dom(phase: TouchPhase, touches: u32) -> InputEvent {
    InputEvent::Touch(TouchInput {
        phase,
        touches: u8::try_from(touches).unwrap_or(u8::MAX),
    })
}

//! Property-based invariant tests for DOM input normalization.
//!
//! Verifies:
//! 1. Any single-character `key` normalizes to `Char` of that character.
//! 2. Modifier flags map one-to-one onto `Modifiers` bits.
//! 3. Key releases never scroll the page, whatever the key.
//! 4. Ctrl+wheel (trackpad pinch) never scrolls the page.
//! 5. Touch moves scroll only with exactly one touch point.

use marquee_core::event::{KeyCode, KeyPhase, Modifiers, TouchPhase};
use marquee_core::scroll_lock::scrolls_page;
use marquee_web::input::{
    key_event_from_dom, modifiers_from_dom, normalize_dom_key_code, touch_event_from_dom,
    wheel_event_from_dom,
};
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_dom_key() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        any::<char>().prop_map(|c| (c.to_string(), String::new())),
        Just(("ArrowDown".to_string(), "ArrowDown".to_string())),
        Just(("PageUp".to_string(), "PageUp".to_string())),
        Just((" ".to_string(), "Space".to_string())),
        Just(("Escape".to_string(), "Escape".to_string())),
        Just(("Unidentified".to_string(), "Home".to_string())),
        "[A-Z][a-z]{2,10}".prop_map(|k| (k.clone(), k)),
    ]
}

fn arb_flags() -> impl Strategy<Value = (bool, bool, bool, bool)> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>())
}

fn arb_touch_phase() -> impl Strategy<Value = TouchPhase> {
    prop_oneof![
        Just(TouchPhase::Start),
        Just(TouchPhase::Move),
        Just(TouchPhase::End),
        Just(TouchPhase::Cancel),
    ]
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn single_char_key_is_char(c in any::<char>(), code in "[A-Za-z]{0,8}") {
        prop_assert_eq!(normalize_dom_key_code(&c.to_string(), &code), KeyCode::Char(c));
    }

    #[test]
    fn modifier_flags_map_one_to_one((shift, alt, ctrl, meta) in arb_flags()) {
        let mods = modifiers_from_dom(shift, alt, ctrl, meta);
        prop_assert_eq!(mods.contains(Modifiers::SHIFT), shift);
        prop_assert_eq!(mods.contains(Modifiers::ALT), alt);
        prop_assert_eq!(mods.contains(Modifiers::CTRL), ctrl);
        prop_assert_eq!(mods.contains(Modifiers::SUPER), meta);
    }

    #[test]
    fn key_release_never_scrolls(
        (key, code) in arb_dom_key(),
        (shift, alt, ctrl, meta) in arb_flags(),
        repeat in any::<bool>(),
    ) {
        let mods = modifiers_from_dom(shift, alt, ctrl, meta);
        let event = key_event_from_dom(KeyPhase::Up, &key, &code, mods, repeat);
        prop_assert!(!scrolls_page(&event));
    }

    #[test]
    fn ctrl_wheel_never_scrolls(dx in -2000.0f64..2000.0, dy in -2000.0f64..2000.0) {
        let event = wheel_event_from_dom(dx, dy, Modifiers::CTRL);
        prop_assert!(!scrolls_page(&event));
    }

    #[test]
    fn plain_wheel_scrolls_iff_nonzero(dx in -2000.0f64..2000.0, dy in -2000.0f64..2000.0) {
        let event = wheel_event_from_dom(dx, dy, Modifiers::empty());
        prop_assert_eq!(scrolls_page(&event), dx != 0.0 || dy != 0.0);
    }

    #[test]
    fn touch_scrolls_only_single_finger_moves(phase in arb_touch_phase(), touches in 0u32..10) {
        let event = touch_event_from_dom(phase, touches);
        prop_assert_eq!(scrolls_page(&event), phase == TouchPhase::Move && touches == 1);
    }
}

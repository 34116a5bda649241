#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use marquee_core::event::{KeyCode, KeyPhase};
use marquee_core::scroll_lock::scrolls_page;
use marquee_core::{DismissSource, InterceptTarget, ManualClock, SiteConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, KeyboardEvent, TouchEvent, WheelEvent, Window};

use crate::input::{
    key_event_from_dom, modifiers_from_dom, normalize_dom_key_code, touch_event_from_dom,
    touch_phase_from_dom, wheel_event_from_dom,
};
use crate::program::HeroProgram;

type Listener<E> = Closure<dyn FnMut(E)>;

/// Document-level listeners that cancel scroll input while installed.
///
/// Listeners are registered non-passive so `preventDefault` takes effect.
pub struct DocumentTarget {
    document: Document,
    wheel: Option<Listener<WheelEvent>>,
    touch: Option<Listener<TouchEvent>>,
    key: Option<Listener<KeyboardEvent>>,
}

impl DocumentTarget {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            wheel: None,
            touch: None,
            key: None,
        }
    }

    fn listen(&self, kind: &str, callback: &js_sys::Function) {
        let opts = AddEventListenerOptions::new();
        opts.set_passive(false);
        if let Err(err) = self
            .document
            .add_event_listener_with_callback_and_add_event_listener_options(kind, callback, &opts)
        {
            tracing::warn!(kind, ?err, "failed to install scroll listener");
        }
    }

    fn unlisten(&self, kind: &str, callback: &js_sys::Function) {
        if let Err(err) = self
            .document
            .remove_event_listener_with_callback(kind, callback)
        {
            tracing::warn!(kind, ?err, "failed to remove scroll listener");
        }
    }
}

impl InterceptTarget for DocumentTarget {
    fn install(&mut self) {
        let wheel = Listener::<WheelEvent>::new(|e: WheelEvent| {
            let mods = modifiers_from_dom(e.shift_key(), e.alt_key(), e.ctrl_key(), e.meta_key());
            if scrolls_page(&wheel_event_from_dom(e.delta_x(), e.delta_y(), mods)) {
                e.prevent_default();
            }
        });
        let touch = Listener::<TouchEvent>::new(|e: TouchEvent| {
            if let Some(phase) = touch_phase_from_dom(&e.type_())
                && scrolls_page(&touch_event_from_dom(phase, e.touches().length()))
            {
                e.prevent_default();
            }
        });
        let key = Listener::<KeyboardEvent>::new(|e: KeyboardEvent| {
            let mods = modifiers_from_dom(e.shift_key(), e.alt_key(), e.ctrl_key(), e.meta_key());
            let event = key_event_from_dom(KeyPhase::Down, &e.key(), &e.code(), mods, e.repeat());
            if scrolls_page(&event) {
                e.prevent_default();
            }
        });

        self.listen("wheel", wheel.as_ref().unchecked_ref());
        self.listen("touchmove", touch.as_ref().unchecked_ref());
        self.listen("keydown", key.as_ref().unchecked_ref());
        self.wheel = Some(wheel);
        self.touch = Some(touch);
        self.key = Some(key);
    }

    fn uninstall(&mut self) {
        if let Some(wheel) = self.wheel.take() {
            self.unlisten("wheel", wheel.as_ref().unchecked_ref());
        }
        if let Some(touch) = self.touch.take() {
            self.unlisten("touchmove", touch.as_ref().unchecked_ref());
        }
        if let Some(key) = self.key.take() {
            self.unlisten("keydown", key.as_ref().unchecked_ref());
        }
    }
}

struct Session {
    program: HeroProgram<ManualClock, DocumentTarget>,
    clock: ManualClock,
    on_frame: js_sys::Function,
    raf_id: Option<i32>,
}

/// Hero banner and project overlay bound to the page.
///
/// Construction mounts the session: it starts the `requestAnimationFrame`
/// loop and an Escape listener. `onFrame` receives the JSON frame snapshot
/// whenever an output signal changes.
#[wasm_bindgen]
pub struct MarqueeWeb {
    window: Window,
    document: Document,
    session: Rc<RefCell<Session>>,
    frame: Rc<RefCell<Option<Listener<f64>>>>,
    escape: Option<Listener<KeyboardEvent>>,
}

#[wasm_bindgen]
impl MarqueeWeb {
    /// Mount from a JSON site configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, on_frame: js_sys::Function) -> Result<MarqueeWeb, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let config =
            SiteConfig::from_json_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let clock = ManualClock::new();
        let program = HeroProgram::new(&config, clock.clone(), DocumentTarget::new(document.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let session = Rc::new(RefCell::new(Session {
            program,
            clock,
            on_frame,
            raf_id: None,
        }));

        let mut web = MarqueeWeb {
            window,
            document,
            session,
            frame: Rc::new(RefCell::new(None)),
            escape: None,
        };
        web.install_escape()?;
        web.start_frames()?;
        Ok(web)
    }

    /// Open the overlay on project `index`.
    pub fn open(&self, index: usize) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .program
            .open(index)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn close(&self) {
        self.session.borrow_mut().program.close();
    }

    /// Dismiss from `"backdrop"`, `"close_button"` or `"escape"`.
    pub fn dismiss(&self, source: &str) -> Result<(), JsValue> {
        let source = match source {
            "backdrop" => DismissSource::Backdrop,
            "close_button" => DismissSource::CloseButton,
            "escape" => DismissSource::Escape,
            other => return Err(JsValue::from_str(&format!("unknown dismiss source: {other}"))),
        };
        self.session.borrow_mut().program.dismiss(source);
        Ok(())
    }

    /// Host paint notification for a freshly opened overlay.
    pub fn paint(&self) {
        self.session.borrow_mut().program.paint();
    }

    /// Current frame snapshot as JSON.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.borrow().program.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.session.borrow().program.is_mounted()
    }

    /// Cancel the frame loop, remove every listener and release the lock.
    pub fn unmount(&mut self) {
        {
            let mut session = self.session.borrow_mut();
            if let Some(id) = session.raf_id.take()
                && let Err(err) = self.window.cancel_animation_frame(id)
            {
                tracing::warn!(?err, "failed to cancel animation frame");
            }
            session.program.unmount();
        }
        self.frame.borrow_mut().take();
        if let Some(escape) = self.escape.take()
            && let Err(err) = self
                .document
                .remove_event_listener_with_callback("keydown", escape.as_ref().unchecked_ref())
        {
            tracing::warn!(?err, "failed to remove escape listener");
        }
    }
}

impl MarqueeWeb {
    fn install_escape(&mut self) -> Result<(), JsValue> {
        let session = Rc::clone(&self.session);
        let escape = Listener::<KeyboardEvent>::new(move |e: KeyboardEvent| {
            if normalize_dom_key_code(&e.key(), &e.code()) != KeyCode::Escape {
                return;
            }
            let mods = modifiers_from_dom(e.shift_key(), e.alt_key(), e.ctrl_key(), e.meta_key());
            let event = key_event_from_dom(KeyPhase::Down, &e.key(), &e.code(), mods, e.repeat());
            let Ok(mut session) = session.try_borrow_mut() else {
                return;
            };
            if session.program.handle_input(&event).cancels_default() {
                e.prevent_default();
            }
        });
        self.document
            .add_event_listener_with_callback("keydown", escape.as_ref().unchecked_ref())?;
        self.escape = Some(escape);
        Ok(())
    }

    fn start_frames(&mut self) -> Result<(), JsValue> {
        let session = Rc::clone(&self.session);
        let frame = Rc::clone(&self.frame);
        let window = self.window.clone();

        let callback = Listener::<f64>::new(move |timestamp_ms: f64| {
            let snapshot = {
                let Ok(mut s) = session.try_borrow_mut() else {
                    return;
                };
                s.raf_id = None;
                s.clock.set_millis(timestamp_ms);
                let result = s.program.step();
                if !result.mounted {
                    return;
                }
                result
                    .repaint
                    .then(|| serde_json::to_string(&s.program.snapshot()))
            };

            match snapshot {
                Some(Ok(json)) => {
                    let on_frame = session.borrow().on_frame.clone();
                    if let Err(err) = on_frame.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                        tracing::warn!(?err, "onFrame callback failed");
                    }
                }
                Some(Err(err)) => tracing::warn!(%err, "snapshot serialization failed"),
                None => {}
            }

            // The callback may have unmounted the session.
            if let Some(next) = frame.borrow().as_ref()
                && let Ok(mut s) = session.try_borrow_mut()
                && s.program.is_mounted()
            {
                s.raf_id = window
                    .request_animation_frame(next.as_ref().unchecked_ref())
                    .ok();
            }
        });

        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.session.borrow_mut().raf_id = Some(id);
        *self.frame.borrow_mut() = Some(callback);
        tracing::debug!("frame loop started");
        Ok(())
    }
}

impl Drop for MarqueeWeb {
    fn drop(&mut self) {
        self.unmount();
    }
}

#![forbid(unsafe_code)]

//! Web frontend for Marquee.
//!
//! - [`program::HeroProgram`]: host-driven runner that ticks the typewriter
//!   and the project overlay once per display frame and reports when the page
//!   must repaint.
//! - [`input`]: normalization of DOM keyboard, wheel and touch events.
//! - `MarqueeWeb` (`wasm32` only): the `wasm-bindgen` surface owning the
//!   `requestAnimationFrame` loop, the Escape listener, and the document-level
//!   scroll interception.
//!
//! Native builds compile the runner and the normalization layer only, so the
//! whole workspace checks and tests without a browser.

pub mod input;
pub mod program;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{DocumentTarget, MarqueeWeb};

pub use program::{FrameSnapshot, HeroProgram, StepResult};

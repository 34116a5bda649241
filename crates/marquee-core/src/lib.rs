#![forbid(unsafe_code)]

//! Core: frame-paced text animation and modal input locking.
//!
//! # Role in Marquee
//! `marquee-core` holds every state machine of the hero banner and project
//! overlay. Nothing here touches the DOM, spawns threads, or reads a global
//! clock on its own; hosts feed timestamps and input events in, and read the
//! output signals back out.
//!
//! # Primary responsibilities
//! - **ClockSource**: monotonic timestamps per display refresh.
//! - **TypewriterEngine**: the rotating "I'm a ..." typewriter effect.
//! - **ScrollLockController**: scoped suppression of background scrolling.
//! - **ModalPresenter**: open/close lifecycle of the project overlay.
//! - **SiteConfig**: content records and timing constants, loadable from
//!   TOML or JSON.
//!
//! # How it fits in the system
//! `marquee-web` composes these pieces into a host-driven program and binds
//! them to `requestAnimationFrame` and document listeners on `wasm32`.

pub mod animation;
pub mod clock;
pub mod config;
pub mod event;
pub mod modal;
pub mod scroll_lock;
pub mod typewriter;

pub use clock::{ClockSource, ManualClock, SystemClock};
pub use config::{ConfigError, Project, SiteConfig, TimingConfig};
pub use modal::{DismissSource, ModalError, ModalPhase, ModalPresenter};
pub use scroll_lock::{Disposition, FlagTarget, InterceptTarget, LockHandle, ScrollLockController};
pub use typewriter::{Mode, TypewriterEngine, TypewriterState, TypewriterView};

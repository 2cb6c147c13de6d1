//! Input handling: raw window deltas in, camera actions out.
//!
//! # Invariants
//! - No hidden state: drag, last cursor position and held keys live on explicit values.
//! - A drag never produces a look delta on its first cursor sample.
//! - Frame deltas come from the clock on every frame; nothing caches the first one.

pub mod action;
mod clock;
mod keys;
mod mouse;

pub use action::Action;
pub use clock::FrameClock;
pub use keys::MovementKeys;
pub use mouse::MouseLook;

pub fn crate_info() -> &'static str {
    "glcourse-input v0.1.0"
}

//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic clock, frame deltas)
//! - Browser bindings (wasm32 only)

pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use time::{Clock, FrameTimer, ManualClock, SystemClock};

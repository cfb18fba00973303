//! Monotonic time and frame deltas

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::MAX_FRAME_DT;

/// Monotonic time source, in seconds from an arbitrary origin
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock backed by `Instant` (native) or `performance.now()` (web)
#[derive(Debug, Clone)]
pub struct SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    #[cfg(target_arch = "wasm32")]
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now() / 1000.0)
            .unwrap_or_else(|| js_sys::Date::now() / 1000.0)
    }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one
/// handle and give another to the session.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Turns successive clock readings into per-frame deltas
#[derive(Debug, Clone)]
pub struct FrameTimer {
    last: Option<f64>,
    max_dt: f32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameTimer {
    pub fn new(max_dt: f32) -> Self {
        Self { last: None, max_dt }
    }

    /// Seconds since the previous call, clamped to `[0, max_dt]`.
    /// The first call after construction or [`reset`](Self::reset) returns 0.
    pub fn delta(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            Some(last) => (now - last) as f32,
            None => 0.0,
        };
        self.last = Some(now);
        dt.clamp(0.0, self.max_dt)
    }

    /// Forget the previous reading (e.g. after the loop was suspended)
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timer_first_delta_is_zero() {
        let mut timer = FrameTimer::default();
        assert_eq!(timer.delta(5.0), 0.0);
        assert!((timer.delta(5.016) - 0.016).abs() < 1e-5);
    }

    #[test]
    fn test_frame_timer_clamps() {
        let mut timer = FrameTimer::new(0.1);
        timer.delta(0.0);
        // Long stall
        assert_eq!(timer.delta(3.0), 0.1);
        // Clock went backwards
        assert_eq!(timer.delta(2.0), 0.0);
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(1.5);
        assert_eq!(clock.now(), 1.5);
        handle.set(10.0);
        assert_eq!(clock.now(), 10.0);
    }
}

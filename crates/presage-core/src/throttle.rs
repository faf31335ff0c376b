//! Shared evaluation rate gate.

/// Minimum elapsed time between consecutive heuristic evaluations.
pub const THROTTLE_INTERVAL_MS: f64 = 100.0;

/// Single-timestamp throttle shared by every evaluation trigger.
///
/// Timestamps are caller-supplied milliseconds (the browser layer feeds in
/// `performance.now()`), so the gate never reads a clock and stays
/// deterministic under test. A request arriving inside the window is
/// dropped, never queued: the next qualifying trigger re-evaluates fresh
/// page state anyway.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Throttle {
    last_check: Option<f64>,
}

impl Throttle {
    /// Creates a gate that has never been passed; the first request always
    /// qualifies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to pass the gate at `now_ms` with the window widened by
    /// `window_scale`. Passing stamps the shared timestamp.
    pub fn try_pass(&mut self, now_ms: f64, window_scale: f64) -> bool {
        let open = match self.last_check {
            None => true,
            Some(last) => now_ms - last >= THROTTLE_INTERVAL_MS * window_scale,
        };
        if open {
            self.last_check = Some(now_ms);
        }
        open
    }

    /// Stamps the shared timestamp without consulting the window.
    ///
    /// Used by the startup evaluation, which bypasses the gate but still
    /// counts as the most recent check.
    pub fn stamp(&mut self, now_ms: f64) {
        self.last_check = Some(now_ms);
    }
}

//! Device interaction mode and pointer state.

use crate::geom::Point;

/// Raw touch-capability signals probed from the host environment.
///
/// Probes that the host cannot answer degrade to `false`/`0` rather than
/// erroring, so an exotic environment classifies as pointer-driven instead
/// of failing startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchCapability {
    /// Whether the host exposes touch events at all.
    pub touch_events: bool,
    /// Reported maximum number of simultaneous touch points.
    pub max_touch_points: i32,
    /// Vendor-prefixed variant of the touch-point count.
    pub vendor_touch_points: i32,
}

/// Device interaction class, latched once at startup.
///
/// A touch-capable device currently driven by a mouse still classifies as
/// `Touch` for the whole session; the class is never re-evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    /// Pointer-driven device; candidates rank by pointer proximity.
    Pointer,
    /// Touch-capable device; candidates rank by viewport visibility.
    Touch,
}

impl InteractionMode {
    /// Classifies the session mode: any positive signal latches `Touch`.
    pub fn classify(caps: TouchCapability) -> Self {
        if caps.touch_events || caps.max_touch_points > 0 || caps.vendor_touch_points > 0 {
            InteractionMode::Touch
        } else {
            InteractionMode::Pointer
        }
    }
}

/// Last known pointer position.
///
/// Starts unset and stays unset until the first pointer movement, which is
/// how the scheduler distinguishes "pointer at origin" from "pointer never
/// moved". Written only by the pointer-move handler; the selector reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionState {
    pointer: Option<Point>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the most recent pointer position.
    pub fn record_pointer(&mut self, at: Point) {
        self.pointer = Some(at);
    }

    /// Position recorded by the most recent pointer movement, if any.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }
}

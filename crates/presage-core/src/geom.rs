//! Viewport-space geometry for the proximity and visibility heuristics.
//!
//! Coordinates are CSS pixels in the viewport coordinate space that pointer
//! events and element bounding rectangles share, stored as `f64` because
//! that is the precision the layout engine reports. No document-space
//! (scroll-offset) conversion happens here; both inputs are already
//! viewport-relative.

/// A position in viewport coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in CSS pixels.
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// An axis-aligned box in viewport coordinates.
///
/// `right`/`bottom` are derived rather than stored so a box can never carry
/// inconsistent edges.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    /// Center point of the box.
    pub fn center(self) -> Point {
        Point::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    /// Grows the box by `margin` pixels on all four sides.
    pub fn inflate(self, margin: f64) -> Rect {
        Rect::new(
            self.left - margin,
            self.top - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Closed-box overlap test: boxes that merely share an edge intersect.
    pub fn intersects(self, other: Rect) -> bool {
        self.left <= other.right()
            && other.left <= self.right()
            && self.top <= other.bottom()
            && other.top <= self.bottom()
    }
}

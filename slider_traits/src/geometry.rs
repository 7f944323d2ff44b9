//! Pixel-space points produced by the external hand tracker.

/// A point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The two landmarks whose separation drives the slider (thumb tip and index tip).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackedPoints {
    pub a: Point,
    pub b: Point,
}

impl TrackedPoints {
    #[inline]
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Euclidean distance between the two points.
    #[inline]
    pub fn distance(&self) -> f32 {
        (self.b.x - self.a.x).hypot(self.b.y - self.a.y)
    }

    /// Midpoint, used as the anchor for the feedback marker.
    #[inline]
    pub fn midpoint(&self) -> Point {
        Point::new((self.a.x + self.b.x) / 2.0, (self.a.y + self.b.y) / 2.0)
    }

    /// Both points carry finite coordinates.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }
}

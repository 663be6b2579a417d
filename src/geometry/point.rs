//! Point structure for representing 2D coordinates

/// A point on the canvas or in image pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate (pixels from the left)
    pub x: f64,
    /// Y coordinate (pixels from the top)
    pub y: f64,
}

impl Point {
    /// Create a new 2D point
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// The origin (0, 0)
    pub fn origin() -> Self {
        Point::default()
    }

    /// Offset this point by a delta
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Point::new(self.x + dx, self.y + dy)
    }
}

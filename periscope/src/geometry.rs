//! Screen-space primitives shared by the element tree and input synthesis.
//!
//! Everything lives in one logical coordinate space; no DPI or scaling
//! conversion happens in this crate.

use serde::{Deserialize, Serialize};

/// A location on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    /// Width and height are clamped to zero; a degenerate frame keeps a valid
    /// origin.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Edge-inclusive containment.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Shrink the frame by `margin` from the top and bottom edges. Collapses
    /// to a zero-height band at the vertical center rather than inverting.
    pub fn inset_vertical(&self, margin: f64) -> Frame {
        if self.height <= margin * 2.0 {
            return Frame::new(self.x, self.mid_y(), self.width, 0.0);
        }
        Frame::new(self.x, self.y + margin, self.width, self.height - margin * 2.0)
    }
}

impl From<(f64, f64, f64, f64)> for Frame {
    fn from((x, y, width, height): (f64, f64, f64, f64)) -> Self {
        Frame::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_edge_inclusive() {
        let frame = Frame::new(10.0, 20.0, 100.0, 50.0);
        assert!(frame.contains(Point::new(10.0, 20.0)));
        assert!(frame.contains(Point::new(110.0, 70.0)));
        assert!(frame.contains(Point::new(60.0, 45.0)));
        assert!(!frame.contains(Point::new(9.9, 45.0)));
        assert!(!frame.contains(Point::new(60.0, 70.1)));
    }

    #[test]
    fn test_new_clamps_negative_extent() {
        let frame = Frame::new(5.0, 5.0, -10.0, -1.0);
        assert_eq!(frame.width, 0.0);
        assert_eq!(frame.height, 0.0);
        // A degenerate frame still contains its own origin.
        assert!(frame.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_inset_vertical() {
        let frame = Frame::new(0.0, 0.0, 800.0, 600.0);
        let inset = frame.inset_vertical(15.0);
        assert_eq!(inset.y, 15.0);
        assert_eq!(inset.height, 570.0);
        assert_eq!(inset.width, 800.0);
        assert!(!inset.contains(Point::new(400.0, 10.0)));
        assert!(inset.contains(Point::new(400.0, 300.0)));
    }

    #[test]
    fn test_inset_vertical_collapses_short_frames() {
        let frame = Frame::new(0.0, 100.0, 300.0, 20.0);
        let inset = frame.inset_vertical(15.0);
        assert_eq!(inset.height, 0.0);
        assert_eq!(inset.y, 110.0);
    }

    #[test]
    fn test_center_and_mid_y() {
        let frame = Frame::new(10.0, 20.0, 100.0, 60.0);
        assert_eq!(frame.center(), Point::new(60.0, 50.0));
        assert_eq!(frame.mid_y(), 50.0);
        assert_eq!(frame.bottom(), 80.0);
    }
}

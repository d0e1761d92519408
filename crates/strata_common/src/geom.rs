//! Integer geometry in database units.
//!
//! All coordinates in the design database are integers in manufacturing
//! database units (DBU). [`Point`] is a location, [`Rect`] an axis-aligned
//! area such as a die outline or a row band.

use serde::{Deserialize, Serialize};

/// A location in database units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

impl Point {
    /// Creates a point from coordinates.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in database units.
///
/// Stored as the lower-left and upper-right corners; `lo <= hi` on both axes
/// is assumed, not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Lower-left corner.
    pub lo: Point,
    /// Upper-right corner.
    pub hi: Point,
}

impl Rect {
    /// Creates a rectangle from corner coordinates.
    pub fn new(lo_x: i64, lo_y: i64, hi_x: i64, hi_y: i64) -> Self {
        Self {
            lo: Point::new(lo_x, lo_y),
            hi: Point::new(hi_x, hi_y),
        }
    }

    /// Returns the width (x extent).
    pub fn dx(&self) -> i64 {
        self.hi.x - self.lo.x
    }

    /// Returns the height (y extent).
    pub fn dy(&self) -> i64 {
        self.hi.y - self.lo.y
    }

    /// Returns the area.
    pub fn area(&self) -> i64 {
        self.dx() * self.dy()
    }

    /// Returns whether the point lies inside the rectangle (inclusive edges).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.lo.x && p.x <= self.hi.x && p.y >= self.lo.y && p.y <= self.hi.y
    }

    /// Expands the rectangle to cover the given point.
    pub fn expand_to(&mut self, p: Point) {
        self.lo.x = self.lo.x.min(p.x);
        self.lo.y = self.lo.y.min(p.y);
        self.hi.x = self.hi.x.max(p.x);
        self.hi.y = self.hi.y.max(p.y);
    }

    /// Returns the half-perimeter (dx + dy).
    pub fn half_perimeter(&self) -> i64 {
        self.dx() + self.dy()
    }

    /// A degenerate rectangle collapsed onto a single point, used as the
    /// seed for bounding-box accumulation.
    pub fn at_point(p: Point) -> Self {
        Self { lo: p, hi: p }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_extents() {
        let r = Rect::new(10, 20, 110, 220);
        assert_eq!(r.dx(), 100);
        assert_eq!(r.dy(), 200);
        assert_eq!(r.area(), 20_000);
        assert_eq!(r.half_perimeter(), 300);
    }

    #[test]
    fn contains_edges() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(10, 10)));
        assert!(!r.contains(Point::new(11, 5)));
        assert!(!r.contains(Point::new(5, -1)));
    }

    #[test]
    fn expand_to_grows_bbox() {
        let mut r = Rect::at_point(Point::new(5, 5));
        assert_eq!(r.area(), 0);
        r.expand_to(Point::new(0, 8));
        r.expand_to(Point::new(7, 2));
        assert_eq!(r, Rect::new(0, 2, 7, 8));
        assert_eq!(r.half_perimeter(), 13);
    }

    #[test]
    fn serde_roundtrip() {
        let r = Rect::new(-3, 0, 9, 4);
        let json = serde_json::to_string(&r).unwrap();
        let restored: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, restored);
    }
}

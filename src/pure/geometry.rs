//! Geometry primitives
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::cmp::{max, min};

/// An x,y coordinate pair
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    /// An absolute x coordinate relative to the root window
    pub x: i32,
    /// An absolute y coordinate relative to the root window
    pub y: i32,
}

impl Point {
    /// Create a new Point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from(raw: (i32, i32)) -> Self {
        let (x, y) = raw;

        Self { x, y }
    }
}

// A Rect converts to its top left corner
impl From<Rect> for Point {
    fn from(r: Rect) -> Self {
        let Rect { x, y, .. } = r;

        Self { x, y }
    }
}

/// An X window / screen position: top left corner + extent
///
/// Signed throughout so that windows can be parked off screen and so that the
/// intermediate values of layout and size hint calculations can go negative.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Rect {
    /// The x-coordinate of the top left corner of this rect
    pub x: i32,
    /// The y-coordinate of the top left corner of this rect
    pub y: i32,
    /// The width of this rect
    pub w: i32,
    /// The height of this rect
    pub h: i32,
}

impl Rect {
    /// Create a new Rect.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect { x, y, w, h }
    }

    /// The midpoint of this rectangle.
    pub fn midpoint(&self) -> Point {
        Point {
            x: self.x + self.w / 2,
            y: self.y + self.h / 2,
        }
    }

    /// The x coordinate one past the right hand edge of this rect
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// The y coordinate one past the bottom edge of this rect
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Check whether this Rect contains `other` as a sub-Rect
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check whether this Rect contains `p`
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// The area of the intersection of this Rect with `other`: zero if they do not overlap.
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let dx = max(0, min(self.right(), other.right()) - max(self.x, other.x)) as i64;
        let dy = max(0, min(self.bottom(), other.bottom()) - max(self.y, other.y)) as i64;

        dx * dy
    }

    /// Check whether this Rect and `other` share any area.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersection_area(other) > 0
    }

    /// Grow this Rect on all sides by `border` pixels.
    pub fn expanded_by(&self, border: i32) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: self.w + 2 * border,
            h: self.h + 2 * border,
        }
    }

    /// The area covered by this Rect
    pub fn area(&self) -> i64 {
        max(0, self.w) as i64 * max(0, self.h) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case(Rect::new(0, 0, 10, 10), Rect::new(5, 5, 10, 10), 25; "partial overlap")]
    #[test_case(Rect::new(0, 0, 10, 10), Rect::new(10, 0, 10, 10), 0; "touching edges")]
    #[test_case(Rect::new(0, 0, 10, 10), Rect::new(2, 2, 3, 3), 9; "contained")]
    #[test_case(Rect::new(0, 0, 10, 10), Rect::new(50, 50, 3, 3), 0; "disjoint")]
    #[test_case(Rect::new(-5, -5, 10, 10), Rect::new(0, 0, 10, 10), 25; "negative origin")]
    #[test]
    fn intersection_area(a: Rect, b: Rect, expected: i64) {
        assert_eq!(a.intersection_area(&b), expected);
        assert_eq!(b.intersection_area(&a), expected);
    }

    #[test_case(Point::new(0, 0), true; "top left corner")]
    #[test_case(Point::new(9, 9), true; "bottom right pixel")]
    #[test_case(Point::new(10, 5), false; "right edge is exclusive")]
    #[test_case(Point::new(-1, 5), false; "left of rect")]
    #[test]
    fn contains_point(p: Point, expected: bool) {
        assert_eq!(Rect::new(0, 0, 10, 10).contains_point(p), expected);
    }

    #[test]
    fn expanded_by_keeps_origin() {
        let r = Rect::new(10, 20, 100, 50).expanded_by(2);

        assert_eq!(r, Rect::new(10, 20, 104, 54));
    }
}

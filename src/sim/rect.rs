//! Integer axis-aligned rectangles
//!
//! Every entity keeps a float position for smooth movement and snaps it to a
//! `Rect` for collision tests. Edges follow screen conventions: `y` grows
//! downward, `right = x + width`, `bottom = y + height`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Integer-snapped bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Panics on zero or negative area; such boxes can never collide sensibly.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        assert!(
            width > 0 && height > 0,
            "rect must have positive area, got {width}x{height}"
        );
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Snap a float position to a box of the given size (truncating toward zero)
    pub fn at(pos: Vec2, width: i32, height: i32) -> Self {
        Self::new(snap(pos.x), snap(pos.y), width, height)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    #[inline]
    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x() as f32, self.center_y() as f32)
    }

    /// True if the interiors overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// True if `other` lies entirely within `self`
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Smallest box covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Truncate a float coordinate to the pixel grid.
///
/// Panics on NaN or infinity: a non-finite position is a broken simulation.
#[inline]
pub fn snap(value: f32) -> i32 {
    assert!(value.is_finite(), "non-finite coordinate {value}");
    value as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10, 20, 8, 6);
        assert_eq!(r.left(), 10);
        assert_eq!(r.right(), 18);
        assert_eq!(r.top(), 20);
        assert_eq!(r.bottom(), 26);
        assert_eq!(r.center_x(), 14);
        assert_eq!(r.center_y(), 23);
    }

    #[test]
    fn test_overlap_excludes_touching() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.overlaps(&Rect::new(9, 9, 10, 10)));
        assert!(!a.overlaps(&Rect::new(10, 0, 10, 10)));
        assert!(!a.overlaps(&Rect::new(0, 10, 10, 10)));
    }

    #[test]
    fn test_union_covers_both() {
        let a = Rect::new(200, 100, 16, 24);
        let b = Rect::new(216, 100, 16, 24);
        assert_eq!(a.union(&b), Rect::new(200, 100, 32, 24));
        assert_eq!(b.union(&a), a.union(&b));
    }

    #[test]
    fn test_snap_truncates() {
        let r = Rect::at(Vec2::new(12.9, 7.2), 4, 4);
        assert_eq!((r.x, r.y), (12, 7));
    }

    #[test]
    #[should_panic(expected = "positive area")]
    fn test_zero_area_panics() {
        let _ = Rect::new(0, 0, 0, 5);
    }

    #[test]
    #[should_panic(expected = "non-finite")]
    fn test_nan_position_panics() {
        let _ = Rect::at(Vec2::new(f32::NAN, 0.0), 4, 4);
    }
}

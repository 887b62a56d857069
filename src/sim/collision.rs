//! Axis-aligned rectangle overlap tests
//!
//! Everything that can collide in this game is an AABB, so the whole collision
//! story is one overlap predicate. Overlap is open-interval on both axes:
//! rectangles that exactly share an edge do not collide.

use glam::Vec2;

/// An axis-aligned rectangle, anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Right edge x coordinate
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Bottom edge y coordinate
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict AABB overlap: touching edges do not count as a hit
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_contained_rect_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 10.0, 10.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_edge_touch_is_not_a_hit() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Sharing the vertical edge x = 10
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!right.overlaps(&a));
        // Sharing the horizontal edge y = 10
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&below));
        // Corner touch only
        let corner = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&corner));
    }

    #[test]
    fn test_separated_miss() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(50.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Rect::new(0.0, 50.0, 10.0, 10.0);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_sub_pixel_overlap_is_a_hit() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(9.9, 9.9, 10.0, 10.0);
        assert!(a.overlaps(&b));
    }
}

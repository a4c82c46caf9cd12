//! Axis-aligned collision primitives
//!
//! Circles are tested against rectangles using the circle's bounding box,
//! which is exact enough at brick scale and keeps corner hits predictable.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle around a center point
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict point containment (edges excluded)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.left()
            && point.x < self.right()
            && point.y > self.top()
            && point.y < self.bottom()
    }
}

/// A circle (ball footprint)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// How far a circle reaches into a rectangle past each of its faces
///
/// Each value is the distance the circle would have to travel out through
/// that face to stop overlapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Face of a rectangle a circle is pushed out through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    /// Outward normal of the face
    pub fn normal(self) -> Vec2 {
        match self {
            Face::Left => Vec2::NEG_X,
            Face::Right => Vec2::X,
            Face::Top => Vec2::NEG_Y,
            Face::Bottom => Vec2::Y,
        }
    }
}

impl Penetration {
    pub fn min_depth(&self) -> f32 {
        self.left.min(self.right).min(self.top).min(self.bottom)
    }

    /// Face with the shallowest penetration
    ///
    /// Left/right are checked first, so a tie between a side and the
    /// top/bottom resolves as a side hit.
    pub fn shallowest_face(&self) -> Face {
        let min = self.min_depth();
        if min == self.left {
            Face::Left
        } else if min == self.right {
            Face::Right
        } else if min == self.top {
            Face::Top
        } else {
            Face::Bottom
        }
    }
}

/// Check whether a circle's bounding box overlaps a rectangle (strict)
pub fn overlaps(circle: &Circle, rect: &Rect) -> bool {
    let c = circle.center;
    let r = circle.radius;
    c.x + r > rect.left() && c.x - r < rect.right() && c.y + r > rect.top() && c.y - r < rect.bottom()
}

/// Per-face penetration of a circle into a rectangle
///
/// Well defined for any finite input; values are only meaningful (all
/// positive) when `overlaps` holds.
pub fn penetration_depths(circle: &Circle, rect: &Rect) -> Penetration {
    let c = circle.center;
    let r = circle.radius;
    Penetration {
        left: c.x + r - rect.left(),
        right: rect.right() - (c.x - r),
        top: c.y + r - rect.top(),
        bottom: rect.bottom() - (c.y - r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brick() -> Rect {
        Rect::new(100.0, 100.0, 60.0, 24.0)
    }

    #[test]
    fn test_overlap_hit_and_miss() {
        let rect = brick();
        assert!(overlaps(&Circle::new(Vec2::new(130.0, 95.0), 10.0), &rect));
        assert!(!overlaps(&Circle::new(Vec2::new(130.0, 80.0), 10.0), &rect));
        // Touching exactly is not an overlap
        assert!(!overlaps(&Circle::new(Vec2::new(130.0, 90.0), 10.0), &rect));
    }

    #[test]
    fn test_penetration_from_above_picks_top() {
        let rect = brick();
        let circle = Circle::new(Vec2::new(130.0, 95.0), 10.0);
        let depths = penetration_depths(&circle, &rect);
        assert!((depths.top - 5.0).abs() < 1e-5);
        assert_eq!(depths.shallowest_face(), Face::Top);
    }

    #[test]
    fn test_penetration_from_side_picks_left() {
        let rect = brick();
        let circle = Circle::new(Vec2::new(93.0, 112.0), 10.0);
        let depths = penetration_depths(&circle, &rect);
        assert!((depths.left - 3.0).abs() < 1e-5);
        assert_eq!(depths.shallowest_face(), Face::Left);
    }

    #[test]
    fn test_tie_resolves_to_side() {
        let depths = Penetration {
            left: 2.0,
            right: 50.0,
            top: 2.0,
            bottom: 30.0,
        };
        assert_eq!(depths.shallowest_face(), Face::Left);
    }

    #[test]
    fn test_rect_contains_excludes_edges() {
        let rect = brick();
        assert!(rect.contains(Vec2::new(110.0, 110.0)));
        assert!(!rect.contains(Vec2::new(100.0, 110.0)));
        assert_eq!(Rect::from_center(rect.center(), 60.0, 24.0), rect);
    }
}

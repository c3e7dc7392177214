//! Vector and shape types

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point or direction in world space (pixels, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians)
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        (other - *self).length()
    }

    /// Angle of the line from `self` to `other`
    pub fn angle_to(&self, other: Vec2) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Normalized copy, or zero for a zero-length vector
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec2::ZERO
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }

    /// Move toward `target` by at most `max_step`
    pub fn move_toward(&self, target: Vec2, max_step: f32) -> Self {
        let delta = target - *self;
        let dist = delta.length();
        if dist <= max_step || dist <= f32::EPSILON {
            target
        } else {
            *self + delta * (max_step / dist)
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned box given by its two corners
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Rect {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Square box of half-size `radius` centered on `center`
    pub fn from_radius(center: Vec2, radius: f32) -> Self {
        Self::from_center(center, radius, radius)
    }

    pub fn from_center(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self::new(
            center.x - half_width,
            center.y - half_height,
            center.x + half_width,
            center.y + half_height,
        )
    }

    /// Overwrite the corners in place
    pub fn set(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        *self = Self::new(x1, y1, x2, y2);
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.x1 + self.x2) * 0.5, (self.y1 + self.y2) * 0.5)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y1 && point.y <= self.y2
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    /// Closest point inside the box to `point`
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(point.x.clamp(self.x1, self.x2), point.y.clamp(self.y1, self.y2))
    }
}

/// Circle collision volume
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius: radius.max(0.0) }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.radius
    }

    pub fn overlaps_rect(&self, rect: &Rect) -> bool {
        let closest = rect.clamp_point(self.center);
        self.center.distance(closest) <= self.radius
    }

    pub fn overlaps_circle(&self, other: &Circle) -> bool {
        self.center.distance(other.center) <= self.radius + other.radius
    }

    /// Bounding box of the circle
    pub fn bounds(&self) -> Rect {
        Rect::from_radius(self.center, self.radius)
    }
}

/// Any of the supported collision volumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
}

impl Shape {
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Rect(a), Shape::Rect(b)) => a.intersects(b),
            (Shape::Rect(r), Shape::Circle(c)) | (Shape::Circle(c), Shape::Rect(r)) => {
                c.overlaps_rect(r)
            }
            (Shape::Circle(a), Shape::Circle(b)) => a.overlaps_circle(b),
        }
    }

    pub fn overlaps_rect(&self, rect: &Rect) -> bool {
        self.overlaps(&Shape::Rect(*rect))
    }

    pub fn center(&self) -> Vec2 {
        match self {
            Shape::Rect(r) => r.center(),
            Shape::Circle(c) => c.center,
        }
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Shape::Rect(rect)
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_corners() {
        let r = Rect::new(10.0, 10.0, 0.0, 0.0);
        assert_eq!(r.x1, 0.0);
        assert_eq!(r.y2, 10.0);
        assert_eq!(r.width(), 10.0);
    }

    #[test]
    fn test_circle_rect_overlap() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(Circle::new(Vec2::new(15.0, 5.0), 5.0).overlaps_rect(&rect));
        assert!(!Circle::new(Vec2::new(15.1, 5.0), 5.0).overlaps_rect(&rect));
        // Corner case: diagonal distance matters, not the bounding box
        assert!(!Circle::new(Vec2::new(14.0, 14.0), 5.0).overlaps_rect(&rect));
    }

    #[test]
    fn test_shape_overlap_is_symmetric() {
        let a = Shape::from(Rect::from_radius(Vec2::new(0.0, 0.0), 5.0));
        let b = Shape::from(Circle::new(Vec2::new(8.0, 0.0), 4.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_move_toward_does_not_overshoot() {
        let p = Vec2::new(0.0, 0.0).move_toward(Vec2::new(3.0, 4.0), 10.0);
        assert_eq!(p, Vec2::new(3.0, 4.0));
        let q = Vec2::new(0.0, 0.0).move_toward(Vec2::new(3.0, 4.0), 2.5);
        assert!((q.length() - 2.5).abs() < 1e-5);
    }
}

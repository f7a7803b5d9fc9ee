/// World-space geometry: 2D vectors and axis-aligned boxes.
///
/// World coordinates are pixels with x growing right and **y growing down**,
/// so gravity and falling velocities are positive.

use std::ops::{AddAssign, Mul};

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Anchor (pivot) as a fraction of the size: (0,0) = top-left, (0.5,0.5) = centre,
/// (1,1) = bottom-right.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

impl Anchor {
    pub const TOP_LEFT: Anchor = Anchor { x: 0.0, y: 0.0 };
    pub const CENTER: Anchor = Anchor { x: 0.5, y: 0.5 };
    pub const BOTTOM_LEFT: Anchor = Anchor { x: 0.0, y: 1.0 };
    pub const BOTTOM_RIGHT: Anchor = Anchor { x: 1.0, y: 1.0 };

    /// Top-left corner of a box of `size` whose anchor point sits at `at`.
    pub fn top_left(self, at: Vec2, size: Vec2) -> Vec2 {
        Vec2::new(at.x - size.x * self.x, at.y - size.y * self.y)
    }
}

/// Axis-aligned bounding box stored as top-left corner + size.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Aabb { pos, size }
    }

    pub fn left(&self) -> f32 { self.pos.x }
    pub fn right(&self) -> f32 { self.pos.x + self.size.x }
    pub fn top(&self) -> f32 { self.pos.y }
    pub fn bottom(&self) -> f32 { self.pos.y + self.size.y }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x * 0.5, self.pos.y + self.size.y * 0.5)
    }

    /// Strict intersection: boxes that merely share an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Penetration depth on each axis; both positive when the boxes intersect.
    pub fn overlap(&self, other: &Aabb) -> (f32, f32) {
        let ox = self.right().min(other.right()) - self.left().max(other.left());
        let oy = self.bottom().min(other.bottom()) - self.top().max(other.top());
        (ox, oy)
    }
}

/// Rigid-body state owned by each entity, plus the capability traits the
/// physics and animation services work through.
///
/// Entities are plain structs that *hold* a `Body` (composition); nothing
/// inherits from a sprite type. The physics layer only ever sees
/// `Movable` / `Collidable` implementors.

use super::geom::{Aabb, Anchor, Vec2};

/// Per-side contact flags.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Sides {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Sides {
    pub const NONE: Sides = Sides { up: false, down: false, left: false, right: false };
}

#[derive(Clone, Debug)]
pub struct Body {
    /// Top-left corner in world pixels.
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Position at the start of the current frame (before integration).
    pub prev: Vec2,
    pub allow_gravity: bool,
    pub immovable: bool,
    pub collide_world_bounds: bool,
    /// Disabled bodies are skipped by integration, collision and overlap.
    pub enabled: bool,
    /// Contact with another body this frame (solid separation).
    pub touching: Sides,
    /// Contact with the world boundary this frame.
    pub blocked: Sides,
}

impl Body {
    /// A dynamic body whose `anchor` point sits at `at`.
    pub fn new(at: Vec2, size: Vec2, anchor: Anchor) -> Self {
        let pos = anchor.top_left(at, size);
        Body {
            pos,
            size,
            vel: Vec2::ZERO,
            prev: pos,
            allow_gravity: true,
            immovable: false,
            collide_world_bounds: false,
            enabled: true,
            touching: Sides::NONE,
            blocked: Sides::NONE,
        }
    }

    /// Immovable, gravity-exempt solid (platforms, invisible walls).
    pub fn fixed(at: Vec2, size: Vec2, anchor: Anchor) -> Self {
        Body { allow_gravity: false, immovable: true, ..Body::new(at, size, anchor) }
    }

    pub fn with_gravity(mut self, allow: bool) -> Self {
        self.allow_gravity = allow;
        self
    }

    pub fn with_world_bounds(mut self, collide: bool) -> Self {
        self.collide_world_bounds = collide;
        self
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn prev_bounds(&self) -> Aabb {
        Aabb::new(self.prev, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Contact on the right from either a solid or the world edge.
    pub fn against_right(&self) -> bool {
        self.touching.right || self.blocked.right
    }

    pub fn against_left(&self) -> bool {
        self.touching.left || self.blocked.left
    }
}

/// Something the physics service can move (velocity, gravity, bounds).
pub trait Movable {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn velocity(&self) -> Vec2 {
        self.body().vel
    }
}

/// Something with a collider that can take part in solid collision or
/// overlap queries.
pub trait Collidable {
    fn collider(&self) -> &Body;

    fn bounds(&self) -> Aabb {
        self.collider().bounds()
    }

    fn is_collidable(&self) -> bool {
        self.collider().enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_body_is_immovable_and_weightless() {
        let b = Body::fixed(Vec2::new(0.0, 546.0), Vec2::new(960.0, 42.0), Anchor::TOP_LEFT);
        assert!(b.immovable);
        assert!(!b.allow_gravity);
        assert_eq!(b.bounds().bottom(), 588.0);
    }

    #[test]
    fn centred_body_reports_centre() {
        let b = Body::new(Vec2::new(21.0, 525.0), Vec2::new(36.0, 42.0), Anchor::CENTER);
        assert_eq!(b.center(), Vec2::new(21.0, 525.0));
        assert_eq!(b.touching, Sides::NONE);
    }
}

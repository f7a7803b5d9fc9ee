/// Arcade physics service.
///
/// ## Frame contract
///
///   1. `integrate()` every movable body once: clear contact flags, apply
///      gravity, advance position, clamp to world bounds (`blocked` flags).
///   2. `collide()` dynamic bodies against immovable solids. Separation sets
///      `touching` flags and zeroes the velocity component into the solid.
///   3. `overlaps()` for trigger pairs (coins, enemies). No response.
///
/// ## Separation
///
/// The side of contact is decided from the mover's box at the start of the
/// frame (`Body::prev`). Vertical contact is tested first so that a body
/// resting on a platform lands instead of being shoved sideways. A pair that
/// was already interpenetrating is pushed out along the shallower axis.

use super::body::{Body, Collidable, Movable};

/// Downward acceleration in px/s².
pub const GRAVITY: f32 = 1200.0;

pub const WORLD_WIDTH: f32 = 960.0;
pub const WORLD_HEIGHT: f32 = 600.0;

/// Slack allowed when comparing the previous box against a solid edge.
const CONTACT_EPSILON: f32 = 0.01;

#[derive(Clone, Debug)]
pub struct PhysicsWorld {
    pub gravity: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        PhysicsWorld { gravity: GRAVITY, width: WORLD_WIDTH, height: WORLD_HEIGHT }
    }
}

impl PhysicsWorld {
    pub fn new(gravity: f32) -> Self {
        PhysicsWorld { gravity, ..PhysicsWorld::default() }
    }

    /// Advance one body by `dt` seconds.
    pub fn integrate<M: Movable + ?Sized>(&self, mover: &mut M, dt: f32) {
        let body = mover.body_mut();
        if !body.enabled { return; }

        body.touching = Default::default();
        body.blocked = Default::default();
        body.prev = body.pos;

        if body.immovable { return; }

        if body.allow_gravity {
            body.vel.y += self.gravity * dt;
        }
        let step = body.vel * dt;
        body.pos += step;

        if body.collide_world_bounds {
            self.clamp_to_bounds(body);
        }
    }

    fn clamp_to_bounds(&self, body: &mut Body) {
        if body.pos.x < 0.0 {
            body.pos.x = 0.0;
            body.vel.x = 0.0;
            body.blocked.left = true;
        } else if body.pos.x + body.size.x > self.width {
            body.pos.x = self.width - body.size.x;
            body.vel.x = 0.0;
            body.blocked.right = true;
        }

        if body.pos.y < 0.0 {
            body.pos.y = 0.0;
            body.vel.y = 0.0;
            body.blocked.up = true;
        } else if body.pos.y + body.size.y > self.height {
            body.pos.y = self.height - body.size.y;
            body.vel.y = 0.0;
            body.blocked.down = true;
        }
    }
}

/// Separate a dynamic body from an immovable solid.
/// Returns true if the two were in contact.
pub fn collide<M, S>(mover: &mut M, solid: &S) -> bool
where
    M: Movable + Collidable + ?Sized,
    S: Collidable + ?Sized,
{
    if !mover.is_collidable() || !solid.is_collidable() { return false; }

    let other = solid.bounds();
    let body = mover.body_mut();
    let now = body.bounds();
    if !now.intersects(&other) { return false; }

    let before = body.prev_bounds();

    if before.bottom() <= other.top() + CONTACT_EPSILON {
        land_on_top(body, other.top());
    } else if before.top() >= other.bottom() - CONTACT_EPSILON {
        hit_from_below(body, other.bottom());
    } else if before.right() <= other.left() + CONTACT_EPSILON {
        hit_on_right(body, other.left());
    } else if before.left() >= other.right() - CONTACT_EPSILON {
        hit_on_left(body, other.right());
    } else {
        // Already interpenetrating: push out along the shallower axis.
        let (ox, oy) = now.overlap(&other);
        let c = now.center();
        let oc = other.center();
        if oy <= ox {
            if c.y < oc.y { land_on_top(body, other.top()); } else { hit_from_below(body, other.bottom()); }
        } else if c.x < oc.x {
            hit_on_right(body, other.left());
        } else {
            hit_on_left(body, other.right());
        }
    }
    true
}

/// Collide one mover against every solid in a group.
pub fn collide_group<M, S>(mover: &mut M, solids: &[S]) -> bool
where
    M: Movable + Collidable + ?Sized,
    S: Collidable,
{
    let mut hit = false;
    for solid in solids {
        hit |= collide(mover, solid);
    }
    hit
}

/// Non-solid overlap test. Disabled colliders never overlap.
pub fn overlaps<A, B>(a: &A, b: &B) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
{
    a.is_collidable() && b.is_collidable() && a.bounds().intersects(&b.bounds())
}

fn land_on_top(body: &mut Body, top: f32) {
    body.pos.y = top - body.size.y;
    if body.vel.y > 0.0 { body.vel.y = 0.0; }
    body.touching.down = true;
}

fn hit_from_below(body: &mut Body, bottom: f32) {
    body.pos.y = bottom;
    if body.vel.y < 0.0 { body.vel.y = 0.0; }
    body.touching.up = true;
}

fn hit_on_right(body: &mut Body, left: f32) {
    body.pos.x = left - body.size.x;
    if body.vel.x > 0.0 { body.vel.x = 0.0; }
    body.touching.right = true;
}

fn hit_on_left(body: &mut Body, right: f32) {
    body.pos.x = right;
    if body.vel.x < 0.0 { body.vel.x = 0.0; }
    body.touching.left = true;
}

/// Hero control: horizontal intent, the grounded jump gate, stomp bounce.

use super::assets;
use super::body::Body;
use super::entity::{Hero, Intent};
use super::geom::{Anchor, Vec2};

pub const MOVE_SPEED: f32 = 200.0;
pub const JUMP_SPEED: f32 = 600.0;
pub const BOUNCE_SPEED: f32 = 200.0;

impl Hero {
    /// Hero centred at `at`, gravity-enabled and clamped to the world.
    pub fn new(at: Vec2) -> Self {
        Hero {
            body: Body::new(at, assets::HERO_SIZE, Anchor::CENTER).with_world_bounds(true),
            intent: Intent::Idle,
            move_speed: MOVE_SPEED,
            jump_speed: JUMP_SPEED,
            bounce_speed: BOUNCE_SPEED,
        }
    }

    pub fn with_speeds(mut self, move_speed: f32, jump_speed: f32, bounce_speed: f32) -> Self {
        self.move_speed = move_speed;
        self.jump_speed = jump_speed;
        self.bounce_speed = bounce_speed;
        self
    }

    /// Standing on something solid (set by the last collision pass).
    pub fn grounded(&self) -> bool {
        self.body.touching.down
    }

    /// Overwrite horizontal velocity from this frame's intent. No acceleration.
    pub fn set_intent(&mut self, intent: Intent) {
        self.intent = intent;
        self.body.vel.x = intent.sign() * self.move_speed;
    }

    /// Jump if grounded. Returns whether the jump happened.
    pub fn request_jump(&mut self) -> bool {
        let can_jump = self.grounded();
        if can_jump {
            self.body.vel.y = -self.jump_speed;
        }
        can_jump
    }

    /// Stomp reaction; never driven by input.
    pub fn bounce(&mut self) {
        self.body.vel.y = -self.bounce_speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> Hero {
        Hero::new(Vec2::new(100.0, 100.0))
    }

    #[test]
    fn intent_sets_velocity_without_blending() {
        let mut h = hero();
        h.set_intent(Intent::Right);
        assert_eq!(h.body.vel.x, 200.0);
        h.set_intent(Intent::Left);
        assert_eq!(h.body.vel.x, -200.0);
        h.set_intent(Intent::Idle);
        assert_eq!(h.body.vel.x, 0.0);
    }

    #[test]
    fn airborne_jump_is_refused() {
        let mut h = hero();
        h.body.vel.y = 37.0;
        assert!(!h.grounded());
        assert!(!h.request_jump());
        assert_eq!(h.body.vel.y, 37.0);
    }

    #[test]
    fn grounded_jump_launches_upward() {
        let mut h = hero();
        h.body.touching.down = true;
        assert!(h.request_jump());
        assert_eq!(h.body.vel.y, -600.0);
    }

    #[test]
    fn bounce_is_unconditional() {
        let mut h = hero();
        h.body.vel.y = 50.0;
        h.bounce();
        assert_eq!(h.body.vel.y, -200.0);
    }

    #[test]
    fn hero_is_clamped_to_world() {
        let h = hero();
        assert!(h.body.collide_world_bounds);
        assert!(h.body.allow_gravity);
    }
}

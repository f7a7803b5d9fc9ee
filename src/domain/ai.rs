/// Spider behaviour: a reactive patrol plus the death sequence.
///
/// States:
///   - **Crawling**: walks at a fixed speed; flips direction when the last
///     collision pass reported contact on the side it is walking into.
///   - **Dying**: entered by a stomp. Collider disabled at once, death
///     animation playing. Cannot be cancelled.
///   - **Dead**: entered when the death animation reports completion.
///     Removed from the visible set. Terminal.

use super::anim::AnimationEvent;
use super::assets;
use super::body::Body;
use super::entity::{Spider, SpiderState};
use super::geom::{Anchor, Vec2};

pub const SPIDER_SPEED: f32 = 100.0;

impl Spider {
    /// Spider centred at `at`, crawling right.
    pub fn new(at: Vec2, speed: f32) -> Self {
        let mut body = Body::new(at, assets::SPIDER_FRAME, Anchor::CENTER).with_world_bounds(true);
        body.vel.x = speed;
        let mut spider = Spider {
            state: SpiderState::Crawling,
            speed,
            body,
            anim: Default::default(),
        };
        spider.anim.play(assets::SPIDER_CRAWL);
        spider
    }

    pub fn is_crawling(&self) -> bool {
        self.state == SpiderState::Crawling
    }

    /// Visible spiders are crawling or mid-death.
    pub fn is_visible(&self) -> bool {
        self.state != SpiderState::Dead
    }

    /// One patrol evaluation. Call after the frame's collisions.
    pub fn patrol(&mut self) {
        if !self.is_crawling() { return; }
        if self.body.against_right() {
            self.body.vel.x = -self.speed;
        } else if self.body.against_left() {
            self.body.vel.x = self.speed;
        }
    }

    /// Crawling → Dying. Returns false (and does nothing) in any other state.
    pub fn die(&mut self) -> bool {
        if !self.is_crawling() { return false; }
        self.state = SpiderState::Dying;
        self.body.enabled = false;
        self.anim.play(assets::SPIDER_DIE);
        true
    }

    /// Feed an animation event back in. Returns true on the Dying → Dead edge.
    pub fn on_animation(&mut self, event: AnimationEvent) -> bool {
        match (self.state, event) {
            (SpiderState::Dying, AnimationEvent::Completed(name)) if name == assets::SPIDER_DIE.name => {
                self.state = SpiderState::Dead;
                true
            }
            _ => false,
        }
    }
}

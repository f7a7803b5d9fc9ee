/// Entities: Hero, Spider, Coin, Platform, InvisibleWall.
///
/// Each entity owns its physics `Body` (and an `Animator` where it animates)
/// next to its gameplay fields. Behaviour lives in `hero.rs` (player control)
/// and `ai.rs` (spider patrol); this file only defines the shapes and the
/// capability-trait plumbing.

use super::anim::{Animatable, Animator};
use super::assets::{self, PlatformImage};
use super::body::{Body, Collidable, Movable};
use super::geom::{Anchor, Vec2};

/// Horizontal input intent for one frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Intent {
    Left,
    #[default]
    Idle,
    Right,
}

impl Intent {
    /// Direction as -1 / 0 / +1.
    pub fn sign(self) -> f32 {
        match self {
            Intent::Left => -1.0,
            Intent::Idle => 0.0,
            Intent::Right => 1.0,
        }
    }
}

/// Frame input: held movement plus an edge-triggered jump press.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub intent: Intent,
    pub jump: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WallSide {
    Left,
    Right,
}

/// Spider lifecycle. `Dead` is terminal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpiderState {
    Crawling,
    Dying,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Platform {
    pub image: PlatformImage,
    pub body: Body,
}

impl Platform {
    /// `at` is the platform's top-left corner.
    pub fn new(at: Vec2, image: PlatformImage) -> Self {
        Platform { image, body: Body::fixed(at, image.size(), Anchor::TOP_LEFT) }
    }
}

/// Invisible patrol boundary standing on a platform's top edge, just outside
/// its horizontal extent.
#[derive(Clone, Debug)]
pub struct InvisibleWall {
    pub side: WallSide,
    pub body: Body,
}

impl InvisibleWall {
    /// `at` is the platform edge point the wall is anchored to.
    pub fn new(at: Vec2, side: WallSide) -> Self {
        let anchor = match side {
            WallSide::Left => Anchor::BOTTOM_RIGHT,
            WallSide::Right => Anchor::BOTTOM_LEFT,
        };
        InvisibleWall { side, body: Body::fixed(at, assets::WALL_SIZE, anchor) }
    }
}

#[derive(Clone, Debug)]
pub struct Coin {
    pub alive: bool,
    pub body: Body,
    pub anim: Animator,
}

impl Coin {
    pub fn new(at: Vec2) -> Self {
        let mut anim = Animator::new();
        anim.play(assets::COIN_ROTATE);
        Coin {
            alive: true,
            body: Body::new(at, assets::COIN_FRAME, Anchor::CENTER).with_gravity(false),
            anim,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Hero {
    pub body: Body,
    pub intent: Intent,
    pub move_speed: f32,
    pub jump_speed: f32,
    pub bounce_speed: f32,
}

#[derive(Clone, Debug)]
pub struct Spider {
    pub state: SpiderState,
    pub speed: f32,
    pub body: Body,
    pub anim: Animator,
}

// ── Capability traits ──

impl Movable for Hero {
    fn body(&self) -> &Body { &self.body }
    fn body_mut(&mut self) -> &mut Body { &mut self.body }
}

impl Collidable for Hero {
    fn collider(&self) -> &Body { &self.body }
}

impl Movable for Spider {
    fn body(&self) -> &Body { &self.body }
    fn body_mut(&mut self) -> &mut Body { &mut self.body }
}

impl Collidable for Spider {
    fn collider(&self) -> &Body { &self.body }
}

impl Animatable for Spider {
    fn animator(&self) -> &Animator { &self.anim }
    fn animator_mut(&mut self) -> &mut Animator { &mut self.anim }
}

impl Movable for Coin {
    fn body(&self) -> &Body { &self.body }
    fn body_mut(&mut self) -> &mut Body { &mut self.body }
}

impl Collidable for Coin {
    fn collider(&self) -> &Body { &self.body }

    // Collected coins leave the active set.
    fn is_collidable(&self) -> bool {
        self.alive && self.body.enabled
    }
}

impl Animatable for Coin {
    fn animator(&self) -> &Animator { &self.anim }
    fn animator_mut(&mut self) -> &mut Animator { &mut self.anim }
}

impl Collidable for Platform {
    fn collider(&self) -> &Body { &self.body }
}

impl Collidable for InvisibleWall {
    fn collider(&self) -> &Body { &self.body }
}

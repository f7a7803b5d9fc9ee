/// The step function: advances a session by one fixed frame.
///
/// Processing order:
///   1. Input (jump gate uses last frame's contacts, then intent → velocity)
///   2. Physics integration (hero, spiders, live coins)
///   3. Solid collision: hero ↔ platforms, spiders ↔ platforms, spiders ↔ walls
///   4. Coin pickup
///   5. Spider contact (stomp or restart; restart ends the frame)
///   6. Spider patrol
///   7. Animation advance (death completions are consumed here)
///
/// Solids never react to triggers in the same frame: collisions settle first,
/// then overlaps are judged against the settled positions.

use crate::domain::anim::{Animatable, AnimationEvent};
use crate::domain::assets;
use crate::domain::body::Movable;
use crate::domain::entity::{FrameInput, SpiderState};
use crate::domain::physics::{collide_group, overlaps};
use crate::domain::rules;
use super::event::GameEvent;
use super::world::Session;

/// Fixed logic timestep in seconds.
pub const FRAME_DT: f32 = 1.0 / 60.0;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(session: &mut Session, input: FrameInput) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    session.tick += 1;

    apply_input(session, input, &mut events);
    integrate(session, FRAME_DT);
    resolve_solids(session);
    resolve_coin_pickup(session, &mut events);
    if resolve_spider_contact(session, &mut events) { return events; }
    resolve_patrol(session);
    advance_animations(session, FRAME_DT, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Input and motion
// ══════════════════════════════════════════════════════════════

fn apply_input(session: &mut Session, input: FrameInput, events: &mut Vec<GameEvent>) {
    if input.jump && session.hero.request_jump() {
        events.push(GameEvent::Jump);
    }
    session.hero.set_intent(input.intent);
}

fn integrate(session: &mut Session, dt: f32) {
    let physics = &session.physics;
    physics.integrate(&mut session.hero, dt);
    for spider in &mut session.spiders {
        physics.integrate(spider, dt);
    }
    for coin in session.coins.iter_mut().filter(|c| c.alive) {
        physics.integrate(coin, dt);
    }
}

fn resolve_solids(session: &mut Session) {
    collide_group(&mut session.hero, &session.platforms);
    for spider in &mut session.spiders {
        collide_group(spider, &session.platforms);
        collide_group(spider, &session.walls);
    }
}

// ══════════════════════════════════════════════════════════════
// Triggers
// ══════════════════════════════════════════════════════════════

/// Collect every live coin the hero overlaps. A collected coin is out of the
/// overlap set, so a lingering hero cannot collect it twice.
fn resolve_coin_pickup(session: &mut Session, events: &mut Vec<GameEvent>) {
    for (index, coin) in session.coins.iter_mut().enumerate() {
        if overlaps(&session.hero, &*coin) {
            coin.alive = false;
            session.score.collect();
            events.push(GameEvent::CoinCollected { index });
        }
    }
}

/// Judge hero–spider contacts. Returns true when the level restarted; the
/// session is then a fresh instance and the frame must stop.
fn resolve_spider_contact(session: &mut Session, events: &mut Vec<GameEvent>) -> bool {
    let hero_vy = session.hero.velocity().y;
    let touching: Vec<usize> = session.spiders.iter()
        .enumerate()
        .filter(|(_, spider)| spider.is_crawling() && overlaps(&session.hero, *spider))
        .map(|(i, _)| i)
        .collect();

    for &index in &touching {
        events.push(GameEvent::SpiderContact { index });
    }

    let outcome = rules::resolve_contacts(hero_vy, &touching);
    if outcome.fatal {
        let at = session.hero.body.center();
        log::info!("hero hit by spider at ({:.0}, {:.0}), vy {hero_vy:.1}; restarting level", at.x, at.y);
        events.push(GameEvent::HeroKilled);
        session.restart();
        return true;
    }

    for &index in &outcome.stomped {
        if session.spiders[index].die() {
            log::debug!("spider {index} stomped, removed in {:.2}s", assets::SPIDER_DIE.duration());
            events.push(GameEvent::SpiderStomped { index });
        }
    }
    if !outcome.stomped.is_empty() {
        session.hero.bounce();
    }
    false
}

// ══════════════════════════════════════════════════════════════
// Behaviour and animation
// ══════════════════════════════════════════════════════════════

fn resolve_patrol(session: &mut Session) {
    for spider in &mut session.spiders {
        spider.patrol();
    }
}

fn advance_animations(session: &mut Session, dt: f32, events: &mut Vec<GameEvent>) {
    for (index, spider) in session.spiders.iter_mut().enumerate() {
        if spider.state == SpiderState::Dead || !spider.animator().is_playing() { continue; }
        if let Some(event) = tick_animation(spider, dt) {
            if spider.on_animation(event) {
                log::debug!("spider {index} removed");
                events.push(GameEvent::SpiderRemoved { index });
            }
        }
    }
    for coin in session.coins.iter_mut().filter(|c| c.alive) {
        tick_animation(coin, dt);
    }
}

fn tick_animation<A: Animatable>(entity: &mut A, dt: f32) -> Option<AnimationEvent> {
    entity.animator_mut().tick(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::domain::assets::PlatformImage;
    use crate::domain::entity::Intent;
    use crate::domain::geom::{Anchor, Vec2};
    use crate::sim::level::{parse_level, LevelDescriptor, PlatformSpawn};

    const IDLE: FrameInput = FrameInput { intent: Intent::Idle, jump: false };
    const RIGHT: FrameInput = FrameInput { intent: Intent::Right, jump: false };
    const JUMP: FrameInput = FrameInput { intent: Intent::Idle, jump: true };

    fn ground() -> PlatformSpawn {
        PlatformSpawn { at: Vec2::new(0.0, 546.0), image: PlatformImage::Ground }
    }

    fn session(platforms: Vec<PlatformSpawn>, hero: Vec2, spiders: Vec<Vec2>, coins: Vec<Vec2>) -> Session {
        let desc = LevelDescriptor { platforms, hero, spiders, coins };
        Session::new(desc, PhysicsConfig::default())
    }

    /// Place the hero centred at `at`, moving vertically at `vy`.
    fn put_hero(s: &mut Session, at: Vec2, vy: f32) {
        s.hero.body.pos = Anchor::CENTER.top_left(at, s.hero.body.size);
        s.hero.body.vel = Vec2::new(0.0, vy);
    }

    fn run_until<F>(s: &mut Session, input: FrameInput, max: usize, mut pred: F) -> Option<Vec<GameEvent>>
    where
        F: FnMut(&Session, &[GameEvent]) -> bool,
    {
        for _ in 0..max {
            let events = step(s, input);
            if pred(&*s, &events[..]) {
                return Some(events);
            }
        }
        None
    }

    #[test]
    fn quiet_frame_changes_nothing() {
        let mut s = session(
            vec![ground()],
            Vec2::new(21.0, 525.0),
            vec![Vec2::new(600.0, 530.0)],
            vec![Vec2::new(400.0, 200.0)],
        );
        for _ in 0..10 {
            let events = step(&mut s, IDLE);
            assert!(events.is_empty(), "unexpected events {events:?}");
        }
        assert_eq!(s.score.count(), 0);
        assert!(s.coins[0].alive);
        assert_eq!(s.spiders[0].state, SpiderState::Crawling);
        assert_eq!(s.attempt, 0);
        assert!(s.hero.grounded());
    }

    #[test]
    fn coin_counts_once_while_overlap_persists() {
        let mut s = session(vec![ground()], Vec2::new(21.0, 525.0), vec![], vec![Vec2::new(21.0, 525.0)]);

        let events = step(&mut s, IDLE);
        assert_eq!(events, vec![GameEvent::CoinCollected { index: 0 }]);
        assert_eq!(s.score.count(), 1);
        assert!(!s.coins[0].alive);

        for _ in 0..5 {
            assert!(step(&mut s, IDLE).is_empty());
        }
        assert_eq!(s.score.count(), 1);
        assert_eq!(s.coins_remaining(), 0);
    }

    #[test]
    fn several_coins_in_one_frame_all_count() {
        let mut s = session(
            vec![ground()],
            Vec2::new(100.0, 525.0),
            vec![],
            vec![Vec2::new(92.0, 525.0), Vec2::new(108.0, 525.0)],
        );
        step(&mut s, IDLE);
        assert_eq!(s.score.text(), "x2");
    }

    #[test]
    fn jump_only_from_the_ground() {
        let mut s = session(vec![ground()], Vec2::new(21.0, 525.0), vec![], vec![]);
        step(&mut s, IDLE);
        assert!(s.hero.grounded());

        let events = step(&mut s, JUMP);
        assert_eq!(events, vec![GameEvent::Jump]);
        assert!(s.hero.body.vel.y < -500.0);

        let vy = s.hero.body.vel.y;
        let events = step(&mut s, JUMP);
        assert!(events.is_empty(), "no jump while airborne");
        assert!(s.hero.body.vel.y > vy, "gravity only");
    }

    #[test]
    fn falling_contact_stomps() {
        let mut s = session(vec![ground()], Vec2::new(21.0, 525.0), vec![Vec2::new(300.0, 530.0)], vec![]);
        put_hero(&mut s, Vec2::new(300.0, 500.0), 50.0);

        let mut events = Vec::new();
        assert!(!resolve_spider_contact(&mut s, &mut events));
        assert_eq!(
            events,
            vec![GameEvent::SpiderContact { index: 0 }, GameEvent::SpiderStomped { index: 0 }],
        );
        assert_eq!(s.spiders[0].state, SpiderState::Dying);
        assert!(!s.spiders[0].body.enabled);
        assert_eq!(s.hero.body.vel.y, -200.0);
        assert_eq!(s.attempt, 0);
    }

    #[test]
    fn rising_contact_restarts_the_level() {
        let mut s = session(
            vec![ground()],
            Vec2::new(21.0, 525.0),
            vec![Vec2::new(300.0, 530.0)],
            vec![Vec2::new(700.0, 525.0)],
        );
        s.coins[0].alive = false;
        s.score.collect();
        put_hero(&mut s, Vec2::new(300.0, 500.0), -10.0);

        let mut events = Vec::new();
        assert!(resolve_spider_contact(&mut s, &mut events));
        assert_eq!(events, vec![GameEvent::SpiderContact { index: 0 }, GameEvent::HeroKilled]);
        assert_eq!(s.score.count(), 0);
        assert_eq!(s.attempt, 1);
        assert!(s.coins[0].alive);
        assert_eq!(s.spiders[0].state, SpiderState::Crawling);
        assert_eq!(s.hero.body.center(), Vec2::new(21.0, 525.0));
    }

    #[test]
    fn landing_on_two_spiders_stomps_both() {
        let mut s = session(
            vec![ground()],
            Vec2::new(21.0, 525.0),
            vec![Vec2::new(280.0, 530.0), Vec2::new(320.0, 530.0)],
            vec![],
        );
        put_hero(&mut s, Vec2::new(300.0, 500.0), 80.0);

        let mut events = Vec::new();
        assert!(!resolve_spider_contact(&mut s, &mut events));
        assert!(s.spiders.iter().all(|sp| sp.state == SpiderState::Dying));
        assert_eq!(s.hero.body.vel.y, -200.0);
    }

    #[test]
    fn walking_into_a_spider_restarts() {
        let mut s = session(
            vec![ground()],
            Vec2::new(21.0, 525.0),
            vec![Vec2::new(100.0, 530.0)],
            vec![Vec2::new(50.0, 525.0)],
        );

        let events = run_until(&mut s, RIGHT, 120, |_, ev| ev.contains(&GameEvent::HeroKilled))
            .expect("hero never met the spider");
        assert!(events.contains(&GameEvent::SpiderContact { index: 0 }));
        assert_eq!(s.attempt, 1);
        assert_eq!(s.score.count(), 0, "coin picked on the way is lost");
        assert!(s.coins[0].alive);
        assert_eq!(s.tick, 0);
    }

    #[test]
    fn dropping_onto_a_spider_kills_it() {
        let mut s = session(vec![ground()], Vec2::new(310.0, 470.0), vec![Vec2::new(300.0, 530.0)], vec![]);

        run_until(&mut s, IDLE, 60, |_, ev| ev.contains(&GameEvent::SpiderStomped { index: 0 }))
            .expect("hero never landed on the spider");
        assert_eq!(s.spiders[0].state, SpiderState::Dying);
        assert_eq!(s.hero.body.vel.y, -200.0);

        run_until(&mut s, IDLE, 120, |_, ev| ev.contains(&GameEvent::SpiderRemoved { index: 0 }))
            .expect("death animation never finished");
        assert_eq!(s.spiders[0].state, SpiderState::Dead);
        assert_eq!(s.spiders_visible(), 0);
        assert_eq!(s.attempt, 0);
    }

    #[test]
    fn spider_turns_at_platform_edges() {
        let ledge = PlatformSpawn { at: Vec2::new(400.0, 300.0), image: PlatformImage::Grass2x1 };
        let mut s = session(vec![ground(), ledge], Vec2::new(21.0, 525.0), vec![Vec2::new(442.0, 284.0)], vec![]);

        let mut saw_left = false;
        let mut saw_right = false;
        for _ in 0..300 {
            step(&mut s, IDLE);
            let b = s.spiders[0].body.bounds();
            assert!(b.left() >= 400.0 - 0.01 && b.right() <= 484.0 + 0.01, "spider left its ledge: {b:?}");
            saw_left |= s.spiders[0].body.vel.x < 0.0;
            saw_right |= s.spiders[0].body.vel.x > 0.0;
        }
        assert!(saw_left && saw_right);
        assert_eq!(s.spiders[0].body.bounds().bottom(), 300.0);
    }

    #[test]
    fn three_platform_level_end_to_end() {
        let desc = parse_level(r#"{
            "platforms": [
                { "image": "ground", "x": 0, "y": 546 },
                { "image": "grass:4x1", "x": 420, "y": 336 },
                { "image": "grass:2x1", "x": 680, "y": 252 }
            ],
            "hero": { "x": 21, "y": 525 },
            "spiders": [{ "x": 121, "y": 399 }],
            "coins": [{ "x": 300, "y": 200 }, { "x": 340, "y": 200 }]
        }"#).unwrap();
        let s = Session::new(desc, PhysicsConfig::default());

        assert_eq!(s.platforms.len(), 3);
        assert_eq!(s.walls.len(), 6);
        assert_eq!(s.coins_remaining(), 2);
        assert_eq!(s.spiders.len(), 1);
        assert_eq!(s.spiders[0].state, SpiderState::Crawling);
        assert_eq!(s.score.count(), 0);
    }
}

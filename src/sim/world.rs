/// Session: the complete state of one running level.
///
/// A session is built from a validated descriptor and owns every entity.
/// There is no global: the host holds the session and passes it to `step`.
///
/// ## Restart
///
/// Restart is a hard reset. `restart()` rebuilds the session from the stored
/// descriptor through the entity factory, so score, coins and spiders all
/// return to their initial state. Only the attempt counter survives.

use crate::config::PhysicsConfig;
use crate::domain::entity::{Coin, Hero, InvisibleWall, Platform, Spider};
use crate::domain::physics::PhysicsWorld;
use super::hud::ScoreState;
use super::level::LevelDescriptor;
use super::spawn::{spawn_level, Spawned};

#[derive(Clone, Debug)]
pub struct Session {
    pub descriptor: LevelDescriptor,
    pub tuning: PhysicsConfig,
    pub physics: PhysicsWorld,

    pub hero: Hero,
    pub platforms: Vec<Platform>,
    pub walls: Vec<InvisibleWall>,
    pub spiders: Vec<Spider>,
    pub coins: Vec<Coin>,

    pub score: ScoreState,
    /// Frames stepped since this instance was created.
    pub tick: u64,
    /// Number of restarts since the level was first loaded.
    pub attempt: u32,
}

impl Session {
    pub fn new(descriptor: LevelDescriptor, tuning: PhysicsConfig) -> Self {
        let Spawned { platforms, walls, hero, spiders, coins } = spawn_level(&descriptor, &tuning);
        Session {
            physics: PhysicsWorld::new(tuning.gravity),
            descriptor,
            tuning,
            hero,
            platforms,
            walls,
            spiders,
            coins,
            score: ScoreState::new(),
            tick: 0,
            attempt: 0,
        }
    }

    /// Replace this instance with a fresh one built from the same descriptor.
    pub fn restart(&mut self) {
        let attempt = self.attempt + 1;
        let fresh = Session::new(self.descriptor.clone(), self.tuning.clone());
        *self = fresh;
        self.attempt = attempt;
        log::info!("level restarted (attempt {attempt})");
    }

    pub fn coins_remaining(&self) -> usize {
        self.coins.iter().filter(|c| c.alive).count()
    }

    pub fn spiders_visible(&self) -> usize {
        self.spiders.iter().filter(|s| s.is_visible()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::SpiderState;
    use crate::sim::level::builtin_level;

    fn session() -> Session {
        Session::new(builtin_level().unwrap(), PhysicsConfig::default())
    }

    #[test]
    fn fresh_session_is_at_rest() {
        let s = session();
        assert_eq!(s.score.count(), 0);
        assert_eq!(s.tick, 0);
        assert_eq!(s.attempt, 0);
        assert_eq!(s.coins_remaining(), s.descriptor.coins.len());
        assert_eq!(s.spiders_visible(), s.descriptor.spiders.len());
        assert_eq!(s.walls.len(), 2 * s.platforms.len());
    }

    #[test]
    fn restart_restores_everything_but_attempts() {
        let mut s = session();
        s.score.collect();
        s.coins[0].alive = false;
        s.spiders[0].die();
        s.hero.body.pos.x = 500.0;
        s.tick = 99;

        s.restart();

        assert_eq!(s.score.count(), 0);
        assert_eq!(s.tick, 0);
        assert_eq!(s.attempt, 1);
        assert!(s.coins.iter().all(|c| c.alive));
        assert!(s.spiders.iter().all(|sp| sp.state == SpiderState::Crawling));
        assert_eq!(s.hero.body.center(), s.descriptor.hero);
    }
}

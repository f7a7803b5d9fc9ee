/// Entity factory: validated level descriptors in, live entities out.
///
/// Spawning is eager. Every platform gets a pair of invisible walls on its
/// top corners so spiders turn around at platform edges instead of walking
/// off them.

use crate::config::PhysicsConfig;
use crate::domain::entity::{Coin, Hero, InvisibleWall, Platform, Spider, WallSide};
use crate::domain::geom::Vec2;
use super::level::{LevelDescriptor, PlatformSpawn};

/// Everything one level instance contains.
#[derive(Clone, Debug)]
pub struct Spawned {
    pub platforms: Vec<Platform>,
    pub walls: Vec<InvisibleWall>,
    pub hero: Hero,
    pub spiders: Vec<Spider>,
    pub coins: Vec<Coin>,
}

pub fn spawn_level(desc: &LevelDescriptor, tuning: &PhysicsConfig) -> Spawned {
    let mut platforms = Vec::with_capacity(desc.platforms.len());
    let mut walls = Vec::with_capacity(desc.platforms.len() * 2);
    for spawn in &desc.platforms {
        let (platform, left, right) = spawn_platform(spawn);
        platforms.push(platform);
        walls.push(left);
        walls.push(right);
    }

    let hero = Hero::new(desc.hero)
        .with_speeds(tuning.move_speed, tuning.jump_speed, tuning.bounce_speed);

    let spiders: Vec<Spider> = desc.spiders.iter()
        .map(|&at| Spider::new(at, tuning.spider_speed))
        .collect();

    let coins: Vec<Coin> = desc.coins.iter().map(|&at| Coin::new(at)).collect();

    log::debug!(
        "spawned {} platforms, {} walls, {} spiders, {} coins",
        platforms.len(), walls.len(), spiders.len(), coins.len(),
    );

    Spawned { platforms, walls, hero, spiders, coins }
}

/// A platform plus the walls at its left and right top corners.
fn spawn_platform(spawn: &PlatformSpawn) -> (Platform, InvisibleWall, InvisibleWall) {
    let platform = Platform::new(spawn.at, spawn.image);
    let width = platform.body.size.x;
    let left = InvisibleWall::new(spawn.at, WallSide::Left);
    let right = InvisibleWall::new(Vec2::new(spawn.at.x + width, spawn.at.y), WallSide::Right);
    (platform, left, right)
}

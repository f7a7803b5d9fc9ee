/// Asset manifest: every image, spritesheet and sound cue the level uses,
/// keyed the same way level files refer to them.
///
/// There is no image decoding here. The terminal host draws glyphs, so the
/// manifest only has to carry what gameplay depends on: pixel sizes, anchors
/// and animation frame sequences.

use super::anim::Animation;
use super::geom::Vec2;

/// Side length of one grass tile; platform widths are multiples of it.
pub const TILE: f32 = 42.0;

pub const HERO_SIZE: Vec2 = Vec2::new(36.0, 42.0);
pub const SPIDER_FRAME: Vec2 = Vec2::new(42.0, 32.0);
pub const COIN_FRAME: Vec2 = Vec2::new(22.0, 22.0);
pub const WALL_SIZE: Vec2 = Vec2::new(8.0, 64.0);
pub const COIN_ICON_SIZE: Vec2 = Vec2::new(22.0, 22.0);

// ── Animations ──

pub const SPIDER_CRAWL: Animation = Animation {
    name: "crawl",
    frames: &[0, 1, 2],
    fps: 8.0,
    looping: true,
};

pub const SPIDER_DIE: Animation = Animation {
    name: "die",
    frames: &[0, 4, 0, 4, 0, 4, 3, 3, 3, 3, 3, 3],
    fps: 12.0,
    looping: false,
};

pub const COIN_ROTATE: Animation = Animation {
    name: "rotate",
    frames: &[0, 1, 2, 1],
    fps: 6.0,
    looping: true,
};

// ── Platform images ──

/// Platform width variants selectable from level data by image key.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlatformImage {
    Ground,
    Grass8x1,
    Grass6x1,
    Grass4x1,
    Grass2x1,
    Grass1x1,
}

impl PlatformImage {
    pub const ALL: [PlatformImage; 6] = [
        PlatformImage::Ground,
        PlatformImage::Grass8x1,
        PlatformImage::Grass6x1,
        PlatformImage::Grass4x1,
        PlatformImage::Grass2x1,
        PlatformImage::Grass1x1,
    ];

    pub fn from_key(key: &str) -> Option<PlatformImage> {
        Self::ALL.into_iter().find(|img| img.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            PlatformImage::Ground => "ground",
            PlatformImage::Grass8x1 => "grass:8x1",
            PlatformImage::Grass6x1 => "grass:6x1",
            PlatformImage::Grass4x1 => "grass:4x1",
            PlatformImage::Grass2x1 => "grass:2x1",
            PlatformImage::Grass1x1 => "grass:1x1",
        }
    }

    pub fn size(self) -> Vec2 {
        let tiles = match self {
            PlatformImage::Ground => return Vec2::new(960.0, TILE),
            PlatformImage::Grass8x1 => 8.0,
            PlatformImage::Grass6x1 => 6.0,
            PlatformImage::Grass4x1 => 4.0,
            PlatformImage::Grass2x1 => 2.0,
            PlatformImage::Grass1x1 => 1.0,
        };
        Vec2::new(tiles * TILE, TILE)
    }
}

// ── Sound cues ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    Jump,
    Coin,
    Stomp,
}

impl Sfx {
    pub fn key(self) -> &'static str {
        match self {
            Sfx::Jump => "sfx:jump",
            Sfx::Coin => "sfx:coin",
            Sfx::Stomp => "sfx:stomp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_keys_round_trip() {
        for img in PlatformImage::ALL {
            assert_eq!(PlatformImage::from_key(img.key()), Some(img));
        }
        assert_eq!(PlatformImage::from_key("grass:3x1"), None);
    }

    #[test]
    fn grass_widths_are_tile_multiples() {
        assert_eq!(PlatformImage::Grass6x1.size(), Vec2::new(252.0, 42.0));
        assert_eq!(PlatformImage::Ground.size().x, 960.0);
    }

    #[test]
    fn spider_death_lasts_one_second() {
        assert!((SPIDER_DIE.duration() - 1.0).abs() < 1e-6);
        assert!(!SPIDER_DIE.looping);
    }
}

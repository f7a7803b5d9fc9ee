/// Level data loader.
///
/// ## Format (JSON):
///   ```json
///   {
///     "platforms": [{ "image": "grass:4x1", "x": 420, "y": 294 }],
///     "hero":      { "x": 21, "y": 525 },
///     "spiders":   [{ "x": 300, "y": 399 }],
///     "coins":     [{ "x": 250, "y": 390 }]
///   }
///   ```
///
/// Coordinates are world pixels (y down). Platform positions are top-left
/// corners; hero, spider and coin positions are sprite centres. Unknown keys
/// (decorations and the like) are ignored.
///
/// ## Sources (priority order):
///   1. `general.level_file` from config.toml, if set
///   2. Built-in embedded level
///
/// Loading is all-or-nothing: the first missing or invalid field fails the
/// whole document with `MalformedLevel`.

use std::path::Path;

use serde::Deserialize;

use crate::config::GameConfig;
use crate::domain::assets::PlatformImage;
use crate::domain::geom::Vec2;
use super::error::{LevelError, MalformedLevel};

// ══════════════════════════════════════════════════════════════
// Document (as parsed) and descriptor (as validated)
// ══════════════════════════════════════════════════════════════

/// Raw level document. Every field is optional so that absence is reported
/// with the field's path instead of a generic serde message.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct LevelDoc {
    pub platforms: Option<Vec<PlatformDoc>>,
    pub hero: Option<PointDoc>,
    pub spiders: Option<Vec<PointDoc>>,
    pub coins: Option<Vec<PointDoc>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct PointDoc {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct PlatformDoc {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlatformSpawn {
    pub at: Vec2,
    pub image: PlatformImage,
}

/// Validated spawn descriptors for one level.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelDescriptor {
    pub platforms: Vec<PlatformSpawn>,
    pub hero: Vec2,
    pub spiders: Vec<Vec2>,
    pub coins: Vec<Vec2>,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Parse and validate a level from JSON text.
pub fn parse_level(text: &str) -> Result<LevelDescriptor, MalformedLevel> {
    let doc: LevelDoc = serde_json::from_str(text)
        .map_err(|e| MalformedLevel::Parse(e.to_string()))?;
    validate(&doc)
}

/// Validate a parsed document into spawn descriptors.
pub fn validate(doc: &LevelDoc) -> Result<LevelDescriptor, MalformedLevel> {
    let platforms = required(&doc.platforms, "platforms")?
        .iter()
        .enumerate()
        .map(|(i, p)| platform_spawn(p, &format!("platforms[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let hero = point(required(&doc.hero, "hero")?, "hero")?;

    let spiders = points(required(&doc.spiders, "spiders")?, "spiders")?;
    let coins = points(required(&doc.coins, "coins")?, "coins")?;

    Ok(LevelDescriptor { platforms, hero, spiders, coins })
}

/// Read and validate a level file.
pub fn load_level_file(path: &Path) -> Result<LevelDescriptor, LevelError> {
    let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_level(&text).map_err(|source| LevelError::Malformed {
        origin: path.display().to_string(),
        source,
    })
}

/// The level shipped with the game.
pub fn builtin_level() -> Result<LevelDescriptor, LevelError> {
    parse_level(BUILTIN_LEVEL).map_err(|source| LevelError::Malformed {
        origin: "<built-in>".to_string(),
        source,
    })
}

/// Resolve the level to play from config: the configured file, else built-in.
/// Returns a display name for the source alongside the descriptor.
pub fn resolve_level(config: &GameConfig) -> Result<(String, LevelDescriptor), LevelError> {
    match &config.level_file {
        Some(path) => {
            let desc = load_level_file(path)?;
            Ok((path.display().to_string(), desc))
        }
        None => Ok(("built-in".to_string(), builtin_level()?)),
    }
}

// ══════════════════════════════════════════════════════════════
// Field validation
// ══════════════════════════════════════════════════════════════

fn required<'a, T>(field: &'a Option<T>, name: &str) -> Result<&'a T, MalformedLevel> {
    field.as_ref().ok_or_else(|| MalformedLevel::MissingField { field: name.to_string() })
}

fn coord(value: Option<f64>, field: String) -> Result<f32, MalformedLevel> {
    let v = value.ok_or_else(|| MalformedLevel::MissingField { field: field.clone() })?;
    let v = v as f32;
    if !v.is_finite() {
        return Err(MalformedLevel::NonFinite { field });
    }
    Ok(v)
}

fn point(p: &PointDoc, path: &str) -> Result<Vec2, MalformedLevel> {
    Ok(Vec2::new(
        coord(p.x, format!("{path}.x"))?,
        coord(p.y, format!("{path}.y"))?,
    ))
}

fn points(list: &[PointDoc], name: &str) -> Result<Vec<Vec2>, MalformedLevel> {
    list.iter()
        .enumerate()
        .map(|(i, p)| point(p, &format!("{name}[{i}]")))
        .collect()
}

fn platform_spawn(p: &PlatformDoc, path: &str) -> Result<PlatformSpawn, MalformedLevel> {
    let x = coord(p.x, format!("{path}.x"))?;
    let y = coord(p.y, format!("{path}.y"))?;
    let field = format!("{path}.image");
    let key = p.image.as_deref()
        .ok_or_else(|| MalformedLevel::MissingField { field: field.clone() })?;
    let image = PlatformImage::from_key(key).ok_or_else(|| MalformedLevel::UnknownImage {
        field,
        key: key.to_string(),
    })?;
    Ok(PlatformSpawn { at: Vec2::new(x, y), image })
}

// ══════════════════════════════════════════════════════════════
// Embedded level
// ══════════════════════════════════════════════════════════════

const BUILTIN_LEVEL: &str = r#"{
    "hero": { "x": 21, "y": 525 },
    "platforms": [
        { "image": "ground",    "x": 0,   "y": 546 },
        { "image": "grass:8x1", "x": 208, "y": 420 },
        { "image": "grass:4x1", "x": 0,   "y": 294 },
        { "image": "grass:4x1", "x": 420, "y": 294 },
        { "image": "grass:6x1", "x": 600, "y": 168 },
        { "image": "grass:1x1", "x": 882, "y": 336 },
        { "image": "grass:2x1", "x": 130, "y": 168 }
    ],
    "spiders": [
        { "x": 300, "y": 399 },
        { "x": 700, "y": 147 },
        { "x": 520, "y": 525 }
    ],
    "coins": [
        { "x": 250, "y": 390 }, { "x": 292, "y": 390 }, { "x": 334, "y": 390 },
        { "x": 40,  "y": 264 }, { "x": 82,  "y": 264 },
        { "x": 462, "y": 264 }, { "x": 504, "y": 264 },
        { "x": 650, "y": 138 }, { "x": 692, "y": 138 }, { "x": 734, "y": 138 },
        { "x": 903, "y": 306 },
        { "x": 151, "y": 138 }, { "x": 193, "y": 138 },
        { "x": 600, "y": 516 }, { "x": 700, "y": 516 }
    ]
}"#;

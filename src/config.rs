/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// ```toml
/// [physics]
/// gravity = 1200.0
/// move_speed = 200.0
/// jump_speed = 600.0
/// bounce_speed = 200.0
/// spider_speed = 100.0
///
/// [general]
/// level_file = "levels/level01.json"   # omit for the built-in level
/// tick_rate_hz = 60
/// log_file = "spidercoin.log"
/// show_walls = false
///
/// [gamepad]
/// jump = ["A", "B", "Up"]
/// quit = ["Select"]
/// ```

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::ai::SPIDER_SPEED;
use crate::domain::hero::{BOUNCE_SPEED, JUMP_SPEED, MOVE_SPEED};
use crate::domain::physics::GRAVITY;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub gamepad: GamepadConfig,
    /// Level JSON to play; `None` plays the built-in level.
    pub level_file: Option<PathBuf>,
    pub tick_rate_hz: u32,
    pub log_file: PathBuf,
    /// Draw the invisible patrol walls (debug aid).
    pub show_walls: bool,
    /// The config.toml that was read, if any.
    pub source: Option<PathBuf>,
    /// Problems found while loading. Logged once the logger is up, since
    /// the log file location itself comes from this config.
    pub warnings: Vec<String>,
}

/// Tuning knobs for the rule layer. Defaults match the stock game.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_speed: f32,
    pub bounce_speed: f32,
    pub spider_speed: f32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub quit: Vec<String>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_speed: JUMP_SPEED,
            bounce_speed: BOUNCE_SPEED,
            spider_speed: SPIDER_SPEED,
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_move_speed")]
    move_speed: f32,
    #[serde(default = "default_jump_speed")]
    jump_speed: f32,
    #[serde(default = "default_bounce_speed")]
    bounce_speed: f32,
    #[serde(default = "default_spider_speed")]
    spider_speed: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump")]
    jump: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    level_file: Option<String>,
    #[serde(default = "default_tick_rate")]
    tick_rate_hz: u32,
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default)]
    show_walls: bool,
}

// ── Defaults ──

fn default_gravity() -> f32 { GRAVITY }
fn default_move_speed() -> f32 { MOVE_SPEED }
fn default_jump_speed() -> f32 { JUMP_SPEED }
fn default_bounce_speed() -> f32 { BOUNCE_SPEED }
fn default_spider_speed() -> f32 { SPIDER_SPEED }

fn default_jump() -> Vec<String> { vec!["A".into(), "B".into(), "Up".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_tick_rate() -> u32 { 60 }
fn default_log_file() -> String { "spidercoin.log".into() }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            gravity: default_gravity(),
            move_speed: default_move_speed(),
            jump_speed: default_jump_speed(),
            bounce_speed: default_bounce_speed(),
            spider_speed: default_spider_speed(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { jump: default_jump(), quit: default_quit() }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            level_file: None,
            tick_rate_hz: default_tick_rate(),
            log_file: default_log_file(),
            show_walls: false,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut warnings = Vec::new();
        let (toml_cfg, source) = load_toml(&search_dirs, &mut warnings);
        let mut cfg = Self::from_toml(toml_cfg, &search_dirs);
        cfg.source = source;
        warnings.append(&mut cfg.warnings);
        cfg.warnings = warnings;
        cfg
    }

    /// Build a config from TOML text. Relative level paths resolve against CWD.
    #[cfg(test)]
    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(toml_cfg, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // A relative level path is looked up in each candidate dir, then CWD.
        let level_file = toml_cfg.general.level_file.map(|name| {
            let path = PathBuf::from(&name);
            if path.is_absolute() {
                return path;
            }
            search_dirs.iter()
                .map(|d| d.join(&name))
                .find(|p| p.is_file())
                .unwrap_or(path)
        });

        let mut warnings = Vec::new();
        let tick_rate_hz = if toml_cfg.general.tick_rate_hz == 0 {
            warnings.push(format!("tick_rate_hz = 0 is invalid, using {}", default_tick_rate()));
            default_tick_rate()
        } else {
            toml_cfg.general.tick_rate_hz
        };

        GameConfig {
            physics: PhysicsConfig {
                gravity: toml_cfg.physics.gravity,
                move_speed: toml_cfg.physics.move_speed,
                jump_speed: toml_cfg.physics.jump_speed,
                bounce_speed: toml_cfg.physics.bounce_speed,
                spider_speed: toml_cfg.physics.spider_speed,
            },
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                quit: toml_cfg.gamepad.quit,
            },
            level_file,
            tick_rate_hz,
            log_file: PathBuf::from(toml_cfg.general.log_file),
            show_walls: toml_cfg.general.show_walls,
            source: None,
            warnings,
        }
    }

    /// Wall-clock time between logic updates.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), &[])
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> (TomlConfig, Option<PathBuf>) {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return (cfg, Some(path)),
                    Err(e) => {
                        warnings.push(format!("{} parse error: {e}; using default settings", path.display()));
                        return (TomlConfig::default(), None);
                    }
                },
                Err(e) => {
                    warnings.push(format!("could not read {}: {e}", path.display()));
                }
            }
        }
    }
    (TomlConfig::default(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.physics, PhysicsConfig::default());
        assert_eq!(cfg.physics.jump_speed, 600.0);
        assert_eq!(cfg.tick_rate_hz, 60);
        assert!(cfg.level_file.is_none());
        assert_eq!(cfg.log_file, PathBuf::from("spidercoin.log"));
        assert_eq!(cfg.gamepad.jump, vec!["A".to_string(), "B".to_string(), "Up".to_string()]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[physics]\ngravity = 900.0\n\n[general]\nlevel_file = \"/tmp/level.json\"\nshow_walls = true\n",
        ).unwrap();
        assert_eq!(cfg.physics.gravity, 900.0);
        assert_eq!(cfg.physics.move_speed, 200.0);
        assert_eq!(cfg.level_file, Some(PathBuf::from("/tmp/level.json")));
        assert!(cfg.show_walls);
    }

    #[test]
    fn zero_tick_rate_falls_back() {
        let cfg = GameConfig::parse("[general]\ntick_rate_hz = 0\n").unwrap();
        assert_eq!(cfg.tick_rate_hz, 60);
        assert_eq!(cfg.warnings.len(), 1);
        assert_eq!(cfg.tick_interval(), Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(GameConfig::parse("[physics\ngravity = ").is_err());
    }
}

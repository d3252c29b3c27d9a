//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to defaults if the file is missing, unreadable, or
//! incomplete.

use log::warn;
use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Structs ──

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub motion: MotionConfig,
    pub sandbox: SandboxConfig,
}

/// Timing and jump tuning read by the movement resolver.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionConfig {
    pub frame_ms: u32,
    /// Continuous blocked time against a ledge before a jump starts.
    pub jump_charge_ms: u32,
    pub jump_min_tiles: i32,
    pub jump_max_tiles: i32,
    /// Ground speed of a jump, pixels per frame.
    pub jump_speed: f32,
    pub jump_gravity: f32,
    /// Push time before a block slides one pixel.
    pub push_delay_ms: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SandboxConfig {
    /// Hero speed in pixels per frame.
    pub hero_speed: f32,
    /// Level file; `None` uses the built-in level.
    pub level: Option<PathBuf>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    motion: TomlMotion,
    #[serde(default)]
    sandbox: TomlSandbox,
}

#[derive(Deserialize, Debug)]
struct TomlMotion {
    #[serde(default = "default_frame_ms")]
    frame_ms: u32,
    #[serde(default = "default_jump_charge")]
    jump_charge_ms: u32,
    #[serde(default = "default_jump_min")]
    jump_min_tiles: i32,
    #[serde(default = "default_jump_max")]
    jump_max_tiles: i32,
    #[serde(default = "default_jump_speed")]
    jump_speed: f32,
    #[serde(default = "default_jump_gravity")]
    jump_gravity: f32,
    #[serde(default = "default_push_delay")]
    push_delay_ms: u32,
}

#[derive(Deserialize, Debug)]
struct TomlSandbox {
    #[serde(default = "default_hero_speed")]
    hero_speed: f32,
    #[serde(default)]
    level: String,
}

// ── Defaults ──

fn default_frame_ms() -> u32 { 16 }
fn default_jump_charge() -> u32 { 250 }
fn default_jump_min() -> i32 { 2 }
fn default_jump_max() -> i32 { 6 }
fn default_jump_speed() -> f32 { 2.0 }
fn default_jump_gravity() -> f32 { 0.5 }
fn default_push_delay() -> u32 { 200 }
fn default_hero_speed() -> f32 { 1.5 }

impl Default for TomlMotion {
    fn default() -> Self {
        TomlMotion {
            frame_ms: default_frame_ms(),
            jump_charge_ms: default_jump_charge(),
            jump_min_tiles: default_jump_min(),
            jump_max_tiles: default_jump_max(),
            jump_speed: default_jump_speed(),
            jump_gravity: default_jump_gravity(),
            push_delay_ms: default_push_delay(),
        }
    }
}

impl Default for TomlSandbox {
    fn default() -> Self {
        TomlSandbox { hero_speed: default_hero_speed(), level: String::new() }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        TomlMotion::default().into()
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        TomlSandbox::default().into()
    }
}

impl From<TomlMotion> for MotionConfig {
    fn from(t: TomlMotion) -> Self {
        let frame_ms = if t.frame_ms == 0 {
            warn!("motion.frame_ms must be positive, using {}", default_frame_ms());
            default_frame_ms()
        } else {
            t.frame_ms
        };
        let jump_min_tiles = t.jump_min_tiles.max(1);
        MotionConfig {
            frame_ms,
            jump_charge_ms: t.jump_charge_ms,
            jump_min_tiles,
            jump_max_tiles: t.jump_max_tiles.max(jump_min_tiles),
            jump_speed: t.jump_speed,
            jump_gravity: t.jump_gravity,
            push_delay_ms: t.push_delay_ms,
        }
    }
}

impl From<TomlSandbox> for SandboxConfig {
    fn from(t: TomlSandbox) -> Self {
        let level = t.level.trim();
        SandboxConfig {
            hero_speed: t.hero_speed,
            level: (!level.is_empty()).then(|| PathBuf::from(level)),
        }
    }
}

// ── Loading ──

impl Config {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        let mut config = Config::from(toml_cfg);

        // Relative level paths resolve against the search dirs.
        if let Some(level) = config.sandbox.level.clone().filter(|p| p.is_relative()) {
            if let Some(found) = search_dirs.iter().map(|d| d.join(&level)).find(|p| p.is_file()) {
                config.sandbox.level = Some(found);
            }
        }
        config
    }

    /// Parse config text directly.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Config::from)
    }
}

impl From<TomlConfig> for Config {
    fn from(t: TomlConfig) -> Self {
        Config { motion: t.motion.into(), sandbox: t.sandbox.into() }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

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
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!("{} parse error, using defaults: {e}", path.display());
                    return TomlConfig::default();
                }
            },
            Err(e) => warn!("could not read {}: {e}", path.display()),
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.motion.frame_ms, 16);
        assert_eq!(cfg.motion.jump_charge_ms, 250);
        assert_eq!((cfg.motion.jump_min_tiles, cfg.motion.jump_max_tiles), (2, 6));
        assert_eq!(cfg.sandbox.hero_speed, 1.5);
        assert_eq!(cfg.sandbox.level, None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::from_toml_str("[motion]\njump_charge_ms = 400\n").unwrap();
        assert_eq!(cfg.motion.jump_charge_ms, 400);
        assert_eq!(cfg.motion.push_delay_ms, 200);
        assert_eq!(cfg.sandbox, SandboxConfig::default());
    }

    #[test]
    fn level_path_and_clamps() {
        let text = "[motion]\nframe_ms = 0\njump_min_tiles = 3\njump_max_tiles = 1\n[sandbox]\nlevel = \"maps/a.txt\"\n";
        let cfg = Config::from_toml_str(text).unwrap();
        assert_eq!(cfg.motion.frame_ms, 16);
        assert_eq!(cfg.motion.jump_max_tiles, 3);
        assert_eq!(cfg.sandbox.level, Some(PathBuf::from("maps/a.txt")));
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(Config::from_toml_str("[motion\n").is_err());
    }
}

/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing, unreadable or invalid;
/// missing keys take their individual defaults.
///
/// Physics constants are not configurable.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::sim::world::{MaskTiming, SimOptions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} parse error: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub sim: SimConfig,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
    /// Level file; `None` = embedded level.
    pub level: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct SimConfig {
    pub tick_rate_ms: u64,
    pub mask_timing: MaskTiming,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub filter: String,
    pub file: PathBuf,
}

impl SimConfig {
    pub fn options(&self) -> SimOptions {
        SimOptions::from_tick_rate(self.tick_rate_ms, self.mask_timing)
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    sim: TomlSim,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlSim {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_mask_timing")]
    mask_timing: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump")]
    jump: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    level: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_filter")]
    filter: String,
    #[serde(default = "default_log_file")]
    file: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }
fn default_mask_timing() -> String { "immediate".into() }
fn default_jump() -> Vec<String> { vec!["A".into(), "B".into()] }
fn default_log_filter() -> String { "info".into() }
fn default_log_file() -> String { "ladders.log".into() }

impl Default for TomlSim {
    fn default() -> Self {
        TomlSim {
            tick_rate_ms: default_tick_rate(),
            mask_timing: default_mask_timing(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { jump: default_jump() }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            filter: default_log_filter(),
            file: default_log_file(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Any error is reported and defaults are used.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        match load_toml(&search_dirs) {
            Ok(Some(toml_cfg)) => GameConfig::from_toml(toml_cfg, &search_dirs),
            Ok(None) => GameConfig::default(),
            Err(e) => {
                // Logging is not up yet; the terminal is still in cooked mode
                eprintln!("Warning: {e}");
                eprintln!("Using default settings.");
                warn!(error = %e, "config fallback to defaults");
                GameConfig::default()
            }
        }
    }

    /// Parse config text. Relative paths resolve against the CWD.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let toml_cfg = toml::from_str::<TomlConfig>(text).map_err(|source| ConfigError::Toml {
            path: origin.to_path_buf(),
            source,
        })?;
        Ok(GameConfig::from_toml(toml_cfg, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let mask_timing = MaskTiming::from_name(&toml_cfg.sim.mask_timing).unwrap_or_else(|| {
            warn!(value = %toml_cfg.sim.mask_timing, "unknown mask_timing, using immediate");
            MaskTiming::Immediate
        });

        let level = toml_cfg
            .general
            .level
            .filter(|s| !s.trim().is_empty())
            .map(|s| resolve_path(&s, search_dirs));

        GameConfig {
            sim: SimConfig {
                tick_rate_ms: toml_cfg.sim.tick_rate_ms.max(1),
                mask_timing,
            },
            gamepad: GamepadConfig { jump: toml_cfg.gamepad.jump },
            log: LogConfig {
                filter: toml_cfg.log.filter,
                file: PathBuf::from(toml_cfg.log.file),
            },
            level,
        }
    }
}

/// Absolute paths are kept; relative ones are looked up in the search dirs,
/// falling back to the CWD.
fn resolve_path(s: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let p = PathBuf::from(s);
    if p.is_absolute() {
        return p;
    }
    if let Some(found) = search_dirs.iter().map(|d| d.join(&p)).find(|c| c.is_file()) {
        return found;
    }
    p
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

/// First `config.toml` found in the candidate directories, if any.
fn load_toml(search_dirs: &[PathBuf]) -> Result<Option<TomlConfig>, ConfigError> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let cfg = toml::from_str::<TomlConfig>(&text).map_err(|source| ConfigError::Toml {
            path: path.clone(),
            source,
        })?;
        return Ok(Some(cfg));
    }
    Ok(None)
}

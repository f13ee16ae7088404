use std::env;
use std::fs;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generation::LevelConfig;

pub const CONFIG_PATH_ENV_VAR: &str = "ISO_SANDBOX_CONFIG";
pub const SEED_ENV_VAR: &str = "ISO_SANDBOX_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid seed '{value}': {source}")]
    InvalidSeed {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SandboxConfig {
    /// Tiles per second along the input direction.
    pub player_speed: f32,
    pub player_size: f32,
    pub render_scale: f32,
    pub debug_collision: bool,
    pub debug_node_tree: bool,
    /// Spawn a static marker at every room centre.
    pub room_markers: bool,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            player_speed: 10.0,
            player_size: 0.75,
            render_scale: 2.0,
            debug_collision: false,
            debug_node_tree: false,
            room_markers: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub target_tps: u32,
    pub max_catch_up_steps: u32,
    pub metrics_log_interval_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Iso Sandbox".to_string(),
            width: 1280,
            height: 720,
            target_tps: 60,
            max_catch_up_steps: 6,
            metrics_log_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub level: LevelConfig,
    pub sandbox: SandboxConfig,
    pub window: WindowConfig,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `ISO_SANDBOX_CONFIG` and `ISO_SANDBOX_SEED`.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let path = env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from);
        let seed = env::var(SEED_ENV_VAR).ok();
        Self::resolve(path.as_deref(), seed.as_deref())
    }

    /// Defaults unless `path` is given, then applies a seed override.
    pub fn resolve(path: Option<&Path>, seed_override: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(value) = seed_override {
            let trimmed = value.trim();
            let seed = trimmed
                .parse::<u64>()
                .map_err(|source| ConfigError::InvalidSeed {
                    value: trimmed.to_string(),
                    source,
                })?;
            config.seed = Some(seed);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = &self.level;
        if level.room_size_min < 1 {
            return Err(invalid(format!(
                "level.room_size_min must be at least 1, got {}",
                level.room_size_min
            )));
        }
        if level.room_size_min > level.room_size_max {
            return Err(invalid(format!(
                "level.room_size_min ({}) exceeds level.room_size_max ({})",
                level.room_size_min, level.room_size_max
            )));
        }
        if level.room_size_max >= level.grid_cell() {
            return Err(invalid(format!(
                "level.room_size_max ({}) must be smaller than twice level.room_padding ({})",
                level.room_size_max,
                level.grid_cell()
            )));
        }
        if level.corridor_radius_min < 0 || level.corridor_radius_min > level.corridor_radius_max {
            return Err(invalid(format!(
                "level.corridor_radius_min ({}) must be within 0..=level.corridor_radius_max ({})",
                level.corridor_radius_min, level.corridor_radius_max
            )));
        }
        let sandbox = &self.sandbox;
        if !(sandbox.render_scale.is_finite() && sandbox.render_scale > 0.0) {
            return Err(invalid(format!(
                "sandbox.render_scale must be positive, got {}",
                sandbox.render_scale
            )));
        }
        if !(sandbox.player_size.is_finite() && sandbox.player_size > 0.0 && sandbox.player_size < 1.0) {
            return Err(invalid(format!(
                "sandbox.player_size must be within (0, 1), got {}",
                sandbox.player_size
            )));
        }
        if !(sandbox.player_speed.is_finite() && sandbox.player_speed >= 0.0) {
            return Err(invalid(format!(
                "sandbox.player_speed must be non-negative, got {}",
                sandbox.player_speed
            )));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window size must be non-zero".to_string()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

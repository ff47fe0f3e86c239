//! Configuration loading and typed config structures for the Life simulation.
//!
//! Configuration lives in `life-config.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure, and provides a
//! loader that reads and validates the file. Every field has a default, so
//! an empty file (or no file at all) yields the reference behavior: a 40x40
//! grid, 200 ms ticks, 25% seeding density, idle at startup.

use std::path::{Path, PathBuf};

use life_grid::{Dimensions, MAX_DENSITY_PERCENT, SaveFormat};
use serde::Deserialize;

use crate::playback::MIN_TICK_INTERVAL_MS;

/// Environment variable that overrides `persistence.save_path`.
pub const SAVE_PATH_ENV: &str = "LIFE_SAVE_PATH";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `life-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LifeConfig {
    /// Grid dimensions.
    #[serde(default)]
    pub grid: GridConfig,

    /// Animator timing and bounds.
    #[serde(default)]
    pub animation: AnimationConfig,

    /// Random seeding parameters.
    #[serde(default)]
    pub seeding: SeedingConfig,

    /// Save file location and format.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Console frame rendering.
    #[serde(default)]
    pub render: RenderConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LifeConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The result is validated before it is returned. Environment overrides
    /// are not applied; see [`LifeConfig::apply_env_overrides`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml rejects an empty document; treat it as all defaults.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides, then re-validate.
    ///
    /// - `LIFE_SAVE_PATH` overrides `persistence.save_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if an override produces an invalid
    /// configuration.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.persistence
            .apply_save_path_override(std::env::var(SAVE_PATH_ENV).ok());
        self.validate()
    }

    /// Check every range constraint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.dimensions()?;
        if self.animation.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "animation.tick_interval_ms must be at least {MIN_TICK_INTERVAL_MS}, got {}",
                    self.animation.tick_interval_ms
                ),
            });
        }
        if self.seeding.density_percent > MAX_DENSITY_PERCENT {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "seeding.density_percent must be within 0..={MAX_DENSITY_PERCENT}, got {}",
                    self.seeding.density_percent
                ),
            });
        }
        if self.persistence.save_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "persistence.save_path must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}

/// Grid size configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GridConfig {
    /// Number of columns.
    #[serde(default = "default_grid_extent")]
    pub width: usize,

    /// Number of rows.
    #[serde(default = "default_grid_extent")]
    pub height: usize,
}

impl GridConfig {
    /// Validated grid dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero sizes or sides longer than
    /// [`MAX_GRID_EXTENT`].
    ///
    /// [`MAX_GRID_EXTENT`]: life_grid::MAX_GRID_EXTENT
    pub fn dimensions(&self) -> Result<Dimensions, ConfigError> {
        Dimensions::new(self.width, self.height).map_err(|e| ConfigError::Invalid {
            reason: format!("grid: {e}"),
        })
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_grid_extent(),
            height: default_grid_extent(),
        }
    }
}

/// Animator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnimationConfig {
    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Stop the animator after this many generations (0 = unlimited).
    #[serde(default)]
    pub max_generations: u64,

    /// Begin in the playing state instead of idle.
    #[serde(default)]
    pub start_playing: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_generations: 0,
            start_playing: false,
        }
    }
}

/// Random seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedingConfig {
    /// Density used by `randomize` when no explicit value is given.
    #[serde(default = "default_density_percent")]
    pub density_percent: u32,

    /// Fixed RNG seed for reproducible runs; drawn from the OS when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            density_percent: default_density_percent(),
            rng_seed: None,
        }
    }
}

/// Save file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Location of the save file.
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,

    /// Layout written on save. Load accepts either layout.
    #[serde(default)]
    pub format: SaveFormat,
}

impl PersistenceConfig {
    /// Replace the save path when an override is present and non-empty.
    pub fn apply_save_path_override(&mut self, value: Option<String>) {
        if let Some(path) = value.filter(|v| !v.is_empty()) {
            self.save_path = PathBuf::from(path);
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
            format: SaveFormat::default(),
        }
    }
}

/// Console rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderConfig {
    /// Print frames to stdout.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Character drawn for a live cell.
    #[serde(default = "default_live_char")]
    pub live_char: char,

    /// Character drawn for a dead cell.
    #[serde(default = "default_dead_char")]
    pub dead_char: char,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            live_char: default_live_char(),
            dead_char: default_dead_char(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_grid_extent() -> usize {
    40
}

const fn default_tick_interval_ms() -> u64 {
    200
}

const fn default_density_percent() -> u32 {
    25
}

fn default_save_path() -> PathBuf {
    PathBuf::from("save.txt")
}

const fn default_live_char() -> char {
    '#'
}

const fn default_dead_char() -> char {
    '.'
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LifeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.width, 40);
        assert_eq!(config.grid.height, 40);
        assert_eq!(config.animation.tick_interval_ms, 200);
        assert_eq!(config.seeding.density_percent, 25);
        assert!(!config.animation.start_playing);
        assert_eq!(config.persistence.format, SaveFormat::V1);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
grid:
  width: 64
  height: 32

animation:
  tick_interval_ms: 50
  max_generations: 1000
  start_playing: true

seeding:
  density_percent: 40
  rng_seed: 1234

persistence:
  format: legacy

render:
  enabled: false
  live_char: "o"
  dead_char: " "

logging:
  level: "debug"
  json: true
"#;
        let config = LifeConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.grid.width, 64);
        assert_eq!(config.grid.height, 32);
        assert_eq!(config.animation.tick_interval_ms, 50);
        assert_eq!(config.animation.max_generations, 1000);
        assert!(config.animation.start_playing);
        assert_eq!(config.seeding.density_percent, 40);
        assert_eq!(config.seeding.rng_seed, Some(1234));
        assert_eq!(config.persistence.format, SaveFormat::Legacy);
        assert!(!config.render.enabled);
        assert_eq!(config.render.live_char, 'o');
        assert_eq!(config.render.dead_char, ' ');
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = LifeConfig::parse("seeding:\n  density_percent: 10\n");
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        // Density is overridden
        assert_eq!(config.seeding.density_percent, 10);
        // Everything else uses defaults
        assert_eq!(config.grid.width, 40);
        assert_eq!(config.animation.tick_interval_ms, 200);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let yaml = include_str!("../../../life-config.yaml");
        let parsed = serde_yml::from_str::<LifeConfig>(yaml);
        assert!(parsed.is_ok(), "{parsed:?}");
        assert_eq!(parsed.ok(), Some(LifeConfig::default()));
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(LifeConfig::parse("").is_ok());
    }

    #[test]
    fn zero_width_rejected() {
        let config = LifeConfig::parse("grid:\n  width: 0\n");
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn oversized_grid_rejected() {
        let config = LifeConfig::parse("grid:\n  width: 18446744073709551615\n  height: 1\n");
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
        let config = LifeConfig::parse("grid:\n  width: 4097\n  height: 40\n");
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
        let config = LifeConfig::parse("grid:\n  width: 4096\n  height: 4096\n");
        assert!(config.is_ok());
    }

    #[test]
    fn parse_keeps_file_save_path() {
        let config = LifeConfig::parse("persistence:\n  save_path: from-file.txt\n");
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.persistence.save_path, PathBuf::from("from-file.txt"));
    }

    #[test]
    fn density_above_hundred_rejected() {
        let config = LifeConfig::parse("seeding:\n  density_percent: 101\n");
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn tick_interval_below_minimum_rejected() {
        let config = LifeConfig::parse("animation:\n  tick_interval_ms: 1\n");
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn unknown_format_is_a_yaml_error() {
        let config = LifeConfig::parse("persistence:\n  format: v9\n");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn save_path_override() {
        let mut persistence = PersistenceConfig::default();
        persistence.apply_save_path_override(None);
        assert_eq!(persistence.save_path, PathBuf::from("save.txt"));
        persistence.apply_save_path_override(Some(String::new()));
        assert_eq!(persistence.save_path, PathBuf::from("save.txt"));
        persistence.apply_save_path_override(Some("/var/lib/life/grid.txt".to_owned()));
        assert_eq!(persistence.save_path, PathBuf::from("/var/lib/life/grid.txt"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("life_config_does_not_exist.yaml");
        let config = LifeConfig::from_file(&path);
        assert!(matches!(config, Err(ConfigError::Io { .. })));
    }
}

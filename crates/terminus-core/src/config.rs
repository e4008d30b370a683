//! Configuration loading and typed config structures for Terminus.
//!
//! The canonical configuration lives in `terminus-config.yaml` at the
//! project root. Every section is optional; missing keys fall back to the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use terminus_station::{StationError, StationSettings};

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

    /// The file parsed but a value is out of range.
    #[error("invalid configuration: {source}")]
    Invalid {
        /// The rejected station settings.
        #[from]
        source: StationError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Everything read from `terminus-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, map size).
    #[serde(default)]
    pub world: WorldConfig,

    /// Station rules: catchment radii, spread, neutral industries.
    #[serde(default)]
    pub station: StationSettings,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
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
        let config: Self = serde_yml::from_str(yaml)?;
        config.station.validate()?;
        Ok(config)
    }
}

/// Map size, name and random seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Name shown in the engine log.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for station tie-break bits.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Map width in tiles, border included.
    #[serde(default = "default_map_size")]
    pub size_x: u32,

    /// Map height in tiles, border included.
    #[serde(default = "default_map_size")]
    pub size_y: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            size_x: default_map_size(),
            size_y: default_map_size(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_world_name() -> String {
    String::from("Terminus")
}

const fn default_seed() -> u64 {
    42
}

const fn default_map_size() -> u32 {
    64
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.world.size_x, 64);
        assert_eq!(config.station.station_spread, 12);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let yaml = r"
world:
  name: Test Valley
  size_x: 128
station:
  catchment_increase: 2
  serve_neutral_industries: true
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "Test Valley");
        assert_eq!(config.world.size_x, 128);
        assert_eq!(config.world.size_y, 64);
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.station.catchment_increase, 2);
        assert!(config.station.serve_neutral_industries);
        assert!(config.station.modified_catchment);
    }

    #[test]
    fn out_of_range_spread_is_rejected() {
        let err = SimulationConfig::parse("station:\n  station_spread: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = SimulationConfig::parse("world: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SimulationConfig::from_file(Path::new("/nonexistent/terminus.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn round_trips_through_json() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}

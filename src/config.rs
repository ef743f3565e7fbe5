//! Simulation configuration.
//!
//! All options have defaults, so an empty JSON object (or no file at all)
//! yields the stock 32×32 grid ticking every 200ms.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::simulation::patterns::SeedPattern;

/// Largest tile side accepted for the compute dispatch. 16×16 = 256
/// invocations, the downlevel per-workgroup limit.
pub const MAX_TILE_SIZE: u32 = 16;

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Side length of the square grid, in cells.
    pub grid_size: u32,
    /// Side length of one compute workgroup tile.
    pub tile_size: u32,
    /// Time between ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Probability that a cell starts alive when seeding randomly.
    pub seed_density: f32,
    /// Fixed RNG seed; `None` draws from the thread RNG.
    pub seed: Option<u64>,
    /// Generation-0 pattern.
    pub pattern: SeedPattern,
    /// Initial window side length in logical pixels.
    pub window_size: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 32,
            tile_size: 8,
            tick_interval_ms: 200,
            seed_density: 0.4,
            seed: None,
            pattern: SeedPattern::Random,
            window_size: 800,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON text and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_grid(self.grid_size, self.grid_size, self.tile_size)?;
        if !(0.0..=1.0).contains(&self.seed_density) {
            return Err(ConfigError::InvalidSeedDensity(self.seed_density));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }
        Ok(())
    }

    /// Alive iff a uniform draw exceeds this value.
    #[inline]
    pub fn seed_threshold(&self) -> f32 {
        1.0 - self.seed_density
    }

    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Check grid dimensions against the dispatch tile size.
pub fn validate_grid(width: u32, height: u32, tile_size: u32) -> Result<(), ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::InvalidDimensions { width, height });
    }
    if tile_size == 0 || tile_size > MAX_TILE_SIZE {
        return Err(ConfigError::InvalidTileSize(tile_size));
    }
    if width % tile_size != 0 || height % tile_size != 0 {
        return Err(ConfigError::UnevenTiling {
            width,
            height,
            tile_size,
        });
    }
    Ok(())
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Tile size must be between 1 and 16, got {0}")]
    InvalidTileSize(u32),
    #[error("Tile size {tile_size} does not evenly cover a {width}x{height} grid")]
    UnevenTiling {
        width: u32,
        height: u32,
        tile_size: u32,
    },
    #[error("Seed density must lie in [0, 1], got {0}")]
    InvalidSeedDensity(f32),
    #[error("Tick interval must be non-zero")]
    InvalidTickInterval,
    #[error("Expected {expected} cells, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.seed_threshold() - 0.6).abs() < 1e-6);
        assert_eq!(config.tick_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = SimulationConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = SimulationConfig::from_json_str(
            r#"{ "grid_size": 64, "tick_interval_ms": 50, "seed": 7, "pattern": "gosper_gun" }"#,
        )
        .unwrap();
        assert_eq!(config.grid_size, 64);
        assert_eq!(config.tick_interval_ms, 50);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.pattern, SeedPattern::GosperGun);
        assert_eq!(config.tile_size, 8);
    }

    #[test]
    fn test_rejects_zero_grid() {
        let config = SimulationConfig {
            grid_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_rejects_uneven_tiling() {
        let config = SimulationConfig {
            grid_size: 30,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnevenTiling { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_tile_size() {
        for tile_size in [0, MAX_TILE_SIZE * 2] {
            let config = SimulationConfig {
                grid_size: 64,
                tile_size,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidTileSize(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_seed_density() {
        for seed_density in [-0.1, 1.5, f32::NAN] {
            let config = SimulationConfig {
                seed_density,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidSeedDensity(_))
            ));
        }
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = SimulationConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTickInterval)
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            SimulationConfig::from_json_str("{ grid_size: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            SimulationConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}

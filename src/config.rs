//! World configuration
//!
//! Terrain thresholds, grid size and display settings, loadable from a TOML file.
//! Every loader validates before returning, so downstream code can rely on
//! `water_level < mountain_level < snow_level`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::palette::Tileset;

/// Default thresholds on the 0-255 height scale (0.4, 0.6 and 0.8 of full range).
pub const DEFAULT_WATER_LEVEL: u8 = 102;
pub const DEFAULT_MOUNTAIN_LEVEL: u8 = 153;
pub const DEFAULT_SNOW_LEVEL: u8 = 204;

/// Grid units per noise lattice unit.
pub const DEFAULT_NOISE_SCALE: f64 = 64.0;

pub const DEFAULT_BLOCK_SIZE: u32 = 12;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("terrain levels must satisfy water < mountain < snow (got {water}, {mountain}, {snow})")]
    Levels { water: u8, mountain: u8, snow: u8 },
    #[error("grid must be at least 1x1 (got {width}x{height})")]
    EmptyGrid { width: usize, height: usize },
    #[error("noise scale must be a positive finite number (got {0})")]
    NoiseScale(f64),
    #[error("block size must be at least 1 pixel (got {0})")]
    BlockSize(u32),
}

/// Which border coordinates get forced to height 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeClamp {
    /// Sample when either axis lies strictly inside the grid; only coordinates
    /// outside the interior on both axes read as 0.
    #[default]
    Either,
    /// Sample only when both axes lie strictly inside the grid.
    Both,
}

impl EdgeClamp {
    /// Whether `(x, y)` is sampled from the noise field for a `width × height` grid.
    pub fn samples(self, x: i64, y: i64, width: usize, height: usize) -> bool {
        let inside_x = 0 < x && x < width as i64;
        let inside_y = 0 < y && y < height as i64;
        match self {
            EdgeClamp::Either => inside_y || inside_x,
            EdgeClamp::Both => inside_y && inside_x,
        }
    }
}

/// Terrain generation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    /// Heights strictly below this are water
    pub water_level: u8,
    /// Heights strictly above this are stone
    pub mountain_level: u8,
    /// Heights strictly above this are snow
    pub snow_level: u8,
    /// Grid units per noise lattice unit (higher = larger features)
    pub noise_scale: f64,
    pub edge_clamp: EdgeClamp,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            seed: 0,
            water_level: DEFAULT_WATER_LEVEL,
            mountain_level: DEFAULT_MOUNTAIN_LEVEL,
            snow_level: DEFAULT_SNOW_LEVEL,
            noise_scale: DEFAULT_NOISE_SCALE,
            edge_clamp: EdgeClamp::Either,
        }
    }
}

impl TerrainConfig {
    /// Default thresholds for a `width × height` grid.
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            ..Self::default()
        }
    }

    pub fn with_levels(mut self, water: u8, mountain: u8, snow: u8) -> Self {
        self.water_level = water;
        self.mountain_level = mountain;
        self.snow_level = snow;
        self
    }

    pub fn with_noise_scale(mut self, scale: f64) -> Self {
        self.noise_scale = scale;
        self
    }

    pub fn with_edge_clamp(mut self, edge_clamp: EdgeClamp) -> Self {
        self.edge_clamp = edge_clamp;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.water_level < self.mountain_level && self.mountain_level < self.snow_level) {
            return Err(ConfigError::Levels {
                water: self.water_level,
                mountain: self.mountain_level,
                snow: self.snow_level,
            });
        }
        if !self.noise_scale.is_finite() || self.noise_scale <= 0.0 {
            return Err(ConfigError::NoiseScale(self.noise_scale));
        }
        Ok(())
    }
}

/// Presentation settings. Changing these never touches the generated grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// On-screen edge length of one cell in pixels
    pub block_size: u32,
    pub tileset: Tileset,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            tileset: Tileset::default(),
        }
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::BlockSize(self.block_size));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub terrain: TerrainConfig,
    pub display: DisplayConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.terrain.validate()?;
        self.display.validate()
    }
}

/// Parse and validate a TOML configuration string.
pub fn parse_config(s: &str) -> Result<AppConfig, ConfigError> {
    let cfg: AppConfig = toml::from_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg = parse_config(&s)?;
    log::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

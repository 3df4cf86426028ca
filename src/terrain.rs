//! Height field and block classification
//!
//! Heights come from a single octave of simplex noise, folded with `abs` onto
//! 0..=255. Blocks are then assigned by threshold, with any land cell next to
//! water turned into sand.

use noise::{NoiseFn, Simplex};
use serde::{Deserialize, Serialize};

use crate::config::TerrainConfig;
use crate::tilemap::Tilemap;

/// Seed offsets are reduced modulo this before being added to noise
/// coordinates, so `x / noise_scale` keeps full f64 precision for any seed.
const SEED_OFFSET_PERIOD: u64 = 65_536;

/// Axis-aligned neighbours checked by the shoreline rule: up, down, left, right.
const NEIGHBOURS: [(i64, i64); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];

/// Terrain category of a single cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockType {
    Water = 0,
    Sand = 1,
    Grass = 2,
    Stone = 3,
    Snow = 4,
}

impl BlockType {
    pub const ALL: [BlockType; 5] = [
        BlockType::Water,
        BlockType::Sand,
        BlockType::Grass,
        BlockType::Stone,
        BlockType::Snow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BlockType::Water => "Water",
            BlockType::Sand => "Sand",
            BlockType::Grass => "Grass",
            BlockType::Stone => "Stone",
            BlockType::Snow => "Snow",
        }
    }
}

/// Classify a height `z` given whether any 4-neighbour lies below the water level.
///
/// All comparisons are strict: a cell exactly at `water_level` is land, a cell
/// exactly at `snow_level` is stone.
pub fn classify(z: u8, next_to_water: bool, config: &TerrainConfig) -> BlockType {
    if z < config.water_level {
        BlockType::Water
    } else if next_to_water {
        BlockType::Sand
    } else if z > config.snow_level {
        BlockType::Snow
    } else if z > config.mountain_level {
        BlockType::Stone
    } else {
        BlockType::Grass
    }
}

/// A terrain generation strategy.
///
/// Implementors provide the height field; block classification is shared.
pub trait TerrainGenerator: Send + Sync {
    fn config(&self) -> &TerrainConfig;

    /// Height at `(x, y)` on the 0-255 scale. Defined for every coordinate.
    fn get_height(&self, x: i64, y: i64) -> u8;

    fn get_block(&self, x: i64, y: i64) -> BlockType {
        let config = self.config();
        let z = self.get_height(x, y);
        if z < config.water_level {
            return BlockType::Water;
        }

        let next_to_water = NEIGHBOURS.iter().any(|&(dx, dy)| {
            self.get_height(x.saturating_add(dx), y.saturating_add(dy)) < config.water_level
        });
        classify(z, next_to_water, config)
    }
}

/// Simplex height field sampled at `(seed + x / scale, seed + y / scale)`.
pub struct StandardGenerator {
    config: TerrainConfig,
    noise: Simplex,
    offset: f64,
}

impl StandardGenerator {
    pub fn new(config: TerrainConfig) -> Self {
        // High half folded into the permutation seed
        let noise = Simplex::new((config.seed ^ (config.seed >> 32)) as u32);
        let offset = (config.seed % SEED_OFFSET_PERIOD) as f64;
        Self {
            config,
            noise,
            offset,
        }
    }
}

impl TerrainGenerator for StandardGenerator {
    fn config(&self) -> &TerrainConfig {
        &self.config
    }

    fn get_height(&self, x: i64, y: i64) -> u8 {
        let cfg = &self.config;
        if !cfg.edge_clamp.samples(x, y, cfg.width, cfg.height) {
            return 0;
        }

        let nx = self.offset + x as f64 / cfg.noise_scale;
        let ny = self.offset + y as f64 / cfg.noise_scale;
        let n = self.noise.get([nx, ny]);
        (n.abs().min(1.0) * 255.0) as u8
    }
}

/// Memoises another generator's heights over the grid plus a one-cell ring,
/// which covers every lookup `get_block` makes for in-grid cells.
pub struct CachedGenerator<G> {
    inner: G,
    heights: Tilemap<u8>,
}

impl<G: TerrainGenerator> CachedGenerator<G> {
    pub fn new(inner: G) -> Self {
        let width = inner.config().width + 2;
        let height = inner.config().height + 2;

        let heights = Tilemap::from_fn(width, height, |x, y| {
            inner.get_height(x as i64 - 1, y as i64 - 1)
        });
        log::debug!("cached {} heights ({}x{} with border)", heights.len(), width, height);

        Self { inner, heights }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: TerrainGenerator> TerrainGenerator for CachedGenerator<G> {
    fn config(&self) -> &TerrainConfig {
        self.inner.config()
    }

    fn get_height(&self, x: i64, y: i64) -> u8 {
        match self.heights.try_get(x.saturating_add(1), y.saturating_add(1)) {
            Some(&h) => h,
            None => self.inner.get_height(x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgeClamp;

    /// Generator with hand-placed heights; everything off the map reads as 255.
    struct FixedHeights {
        config: TerrainConfig,
        heights: Tilemap<u8>,
    }

    impl FixedHeights {
        fn filled(value: u8) -> Self {
            Self {
                config: TerrainConfig::new(3, 3, 0),
                heights: Tilemap::new_with(3, 3, value),
            }
        }
    }

    impl TerrainGenerator for FixedHeights {
        fn config(&self) -> &TerrainConfig {
            &self.config
        }

        fn get_height(&self, x: i64, y: i64) -> u8 {
            self.heights.try_get(x, y).copied().unwrap_or(255)
        }
    }

    #[test]
    fn test_low_cell_is_water() {
        let mut terrain = FixedHeights::filled(150);
        terrain.heights.set(1, 1, 50);
        assert_eq!(terrain.get_block(1, 1), BlockType::Water);
    }

    #[test]
    fn test_water_level_tie_is_land() {
        let mut terrain = FixedHeights::filled(150);
        terrain.heights.set(1, 1, 102);
        assert_eq!(terrain.get_block(1, 1), BlockType::Grass);
    }

    #[test]
    fn test_shoreline_becomes_sand() {
        let mut terrain = FixedHeights::filled(150);
        terrain.heights.set(1, 1, 110);
        terrain.heights.set(1, 0, 90);
        assert_eq!(terrain.get_block(1, 1), BlockType::Sand);
    }

    #[test]
    fn test_shoreline_overrides_every_tier() {
        for (x, y) in [(1, 2), (1, 0), (0, 1), (2, 1)] {
            let mut terrain = FixedHeights::filled(250);
            terrain.heights.set(x, y, 10);
            assert_eq!(terrain.get_block(1, 1), BlockType::Sand, "water neighbour at ({}, {})", x, y);
        }
    }

    #[test]
    fn test_diagonal_water_is_not_shore() {
        let mut terrain = FixedHeights::filled(250);
        terrain.heights.set(0, 0, 10);
        assert_eq!(terrain.get_block(1, 1), BlockType::Snow);
    }

    #[test]
    fn test_high_cell_is_snow() {
        let terrain = FixedHeights::filled(250);
        assert_eq!(terrain.get_block(1, 1), BlockType::Snow);
    }

    #[test]
    fn test_classify_thresholds() {
        let cfg = TerrainConfig::default();
        assert_eq!(classify(101, false, &cfg), BlockType::Water);
        assert_eq!(classify(101, true, &cfg), BlockType::Water);
        assert_eq!(classify(102, false, &cfg), BlockType::Grass);
        assert_eq!(classify(153, false, &cfg), BlockType::Grass);
        assert_eq!(classify(154, false, &cfg), BlockType::Stone);
        assert_eq!(classify(204, false, &cfg), BlockType::Stone);
        assert_eq!(classify(205, false, &cfg), BlockType::Snow);
        assert_eq!(classify(205, true, &cfg), BlockType::Sand);
    }

    #[test]
    fn test_height_is_deterministic() {
        let cfg = TerrainConfig::new(10, 10, 0);
        let a = StandardGenerator::new(cfg.clone());
        let b = StandardGenerator::new(cfg);

        let h = a.get_height(5, 5);
        for _ in 0..10 {
            assert_eq!(a.get_height(5, 5), h);
        }
        for y in -2..12 {
            for x in -2..12 {
                assert_eq!(a.get_height(x, y), b.get_height(x, y));
                assert_eq!(a.get_block(x, y), b.get_block(x, y));
            }
        }
    }

    #[test]
    fn test_seed_zero_values_are_pinned() {
        // Guards against drift in the noise backend or in seeding
        let terrain = StandardGenerator::new(TerrainConfig::new(10, 10, 0));
        assert_eq!(terrain.get_height(5, 5), 55);
        assert_eq!(terrain.get_block(5, 5), BlockType::Water);
    }

    #[test]
    fn test_height_field_varies() {
        let terrain = StandardGenerator::new(TerrainConfig::new(64, 64, 0));
        let heights: Vec<u8> = (1..64).flat_map(|y| (1..64).map(move |x| (x, y)))
            .map(|(x, y)| terrain.get_height(x, y))
            .collect();
        let min = heights.iter().min().copied().unwrap_or(0);
        let max = heights.iter().max().copied().unwrap_or(0);
        assert!(max > min);
    }

    #[test]
    fn test_seeds_differ() {
        let a = StandardGenerator::new(TerrainConfig::new(32, 32, 1));
        let b = StandardGenerator::new(TerrainConfig::new(32, 32, 2));
        let differs = (1..32).any(|y| (1..32).any(|x| a.get_height(x, y) != b.get_height(x, y)));
        assert!(differs);
    }

    #[test]
    fn test_high_seed_bits_change_field() {
        // Same sampling offset, different permutation seed
        let low = 7u64;
        let high = low | (1 << 32);
        assert_eq!(low % SEED_OFFSET_PERIOD, high % SEED_OFFSET_PERIOD);

        let a = StandardGenerator::new(TerrainConfig::new(32, 32, low));
        let b = StandardGenerator::new(TerrainConfig::new(32, 32, high));
        let differs = (1..32).any(|y| (1..32).any(|x| a.get_height(x, y) != b.get_height(x, y)));
        assert!(differs);
    }

    #[test]
    fn test_huge_seed_keeps_detail() {
        let terrain = StandardGenerator::new(TerrainConfig::new(64, 64, u64::MAX - 3));
        let first = terrain.get_height(1, 1);
        let varied = (1..64).any(|y| (1..64).any(|x| terrain.get_height(x, y) != first));
        assert!(varied);
    }

    #[test]
    fn test_edge_clamp_either() {
        let terrain = StandardGenerator::new(TerrainConfig::new(10, 10, 0));
        assert_eq!(terrain.get_height(0, 0), 0);
        assert_eq!(terrain.get_height(-1, -1), 0);
        assert_eq!(terrain.get_height(10, 10), 0);
        assert_eq!(terrain.get_height(0, 10), 0);
        assert_eq!(terrain.get_height(-5, 12), 0);
    }

    #[test]
    fn test_edge_clamp_both() {
        let cfg = TerrainConfig::new(10, 10, 0).with_edge_clamp(EdgeClamp::Both);
        let terrain = StandardGenerator::new(cfg);
        for i in -1..=10 {
            assert_eq!(terrain.get_height(0, i), 0);
            assert_eq!(terrain.get_height(i, 0), 0);
            assert_eq!(terrain.get_height(10, i), 0);
        }
        // Every border cell reads 0, so the border ring is water
        assert_eq!(terrain.get_block(0, 4), BlockType::Water);
    }

    #[test]
    fn test_edge_clamp_policies_agree_inside() {
        let either = StandardGenerator::new(TerrainConfig::new(16, 16, 5));
        let both = StandardGenerator::new(
            TerrainConfig::new(16, 16, 5).with_edge_clamp(EdgeClamp::Both),
        );
        for y in 1..16 {
            for x in 1..16 {
                assert_eq!(either.get_height(x, y), both.get_height(x, y));
            }
        }
    }

    #[test]
    fn test_shoreline_property_on_noise() {
        let terrain = StandardGenerator::new(TerrainConfig::new(48, 48, 3).with_noise_scale(8.0));
        let water = terrain.config().water_level;
        for y in 0..48 {
            for x in 0..48 {
                let z = terrain.get_height(x, y);
                let shore = NEIGHBOURS.iter().any(|&(dx, dy)| terrain.get_height(x + dx, y + dy) < water);
                let block = terrain.get_block(x, y);
                if z < water {
                    assert_eq!(block, BlockType::Water);
                } else if shore {
                    assert_eq!(block, BlockType::Sand);
                } else {
                    assert_ne!(block, BlockType::Sand);
                    assert_ne!(block, BlockType::Water);
                }
            }
        }
    }

    #[test]
    fn test_cached_generator_matches() {
        let cfg = TerrainConfig::new(20, 12, 42).with_noise_scale(16.0);
        let plain = StandardGenerator::new(cfg.clone());
        let cached = CachedGenerator::new(StandardGenerator::new(cfg));
        for y in -3..15 {
            for x in -3..23 {
                assert_eq!(cached.get_height(x, y), plain.get_height(x, y));
                assert_eq!(cached.get_block(x, y), plain.get_block(x, y));
            }
        }
    }

    #[test]
    fn test_extreme_coordinates_do_not_panic() {
        let terrain = StandardGenerator::new(TerrainConfig::new(10, 10, 0));
        let _ = terrain.get_block(i64::MAX, 5);
        let _ = terrain.get_block(i64::MIN, i64::MIN);
        let cached = CachedGenerator::new(StandardGenerator::new(TerrainConfig::new(4, 4, 0)));
        let _ = cached.get_block(i64::MAX, i64::MAX);
    }
}

//! A generated world: the immutable cell grid plus its presentation settings.

use crate::config::{ConfigError, DisplayConfig, TerrainConfig};
use crate::palette::{Color, ColorMapper};
use crate::terrain::{BlockType, CachedGenerator, StandardGenerator, TerrainGenerator};
use crate::tilemap::Tilemap;

/// One grid cell, computed once when the world is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub height: u8,
    pub block: BlockType,
}

impl Cell {
    pub fn generate(generator: &dyn TerrainGenerator, x: usize, y: usize) -> Self {
        let (gx, gy) = (x as i64, y as i64);
        Self {
            x,
            y,
            height: generator.get_height(gx, gy),
            block: generator.get_block(gx, gy),
        }
    }

    /// Display colour of this cell.
    pub fn render(&self, mapper: &ColorMapper, water_level: u8) -> Color {
        mapper.render_color(self.block, self.height, water_level)
    }
}

/// Standard generator for `config`, optionally behind a height cache.
pub fn build_generator(config: TerrainConfig, cached: bool) -> Box<dyn TerrainGenerator> {
    let standard = StandardGenerator::new(config);
    if cached {
        Box::new(CachedGenerator::new(standard))
    } else {
        Box::new(standard)
    }
}

pub struct World {
    generator: Box<dyn TerrainGenerator>,
    cells: Tilemap<Cell>,
    mapper: ColorMapper,
    block_size: u32,
    pixel_width: usize,
    pixel_height: usize,
}

impl World {
    /// Validate `config` and generate with the standard generator.
    pub fn new(config: TerrainConfig, display: DisplayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::with_generator(Box::new(StandardGenerator::new(config)), display)
    }

    /// Generate the grid from any terrain generator.
    pub fn with_generator(
        generator: Box<dyn TerrainGenerator>,
        display: DisplayConfig,
    ) -> Result<Self, ConfigError> {
        let config = generator.config();
        config.validate()?;
        display.validate()?;

        let (width, height) = (config.width, config.height);
        if !config.edge_clamp.samples(1, 1, width, height) {
            log::warn!(
                "{}x{} grid has no sampled interior under {:?} edge clamp; every height is 0",
                width, height, config.edge_clamp
            );
        }

        let cells = Tilemap::from_fn(width, height, |x, y| Cell::generate(generator.as_ref(), x, y));
        log::debug!("generated {}x{} world with seed {}", width, height, config.seed);

        let block_size = display.block_size;
        Ok(Self {
            generator,
            cells,
            mapper: ColorMapper::new(display.tileset),
            block_size,
            pixel_width: width * block_size as usize,
            pixel_height: height * block_size as usize,
        })
    }

    pub fn config(&self) -> &TerrainConfig {
        self.generator.config()
    }

    pub fn generator(&self) -> &dyn TerrainGenerator {
        self.generator.as_ref()
    }

    pub fn cells(&self) -> &Tilemap<Cell> {
        &self.cells
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.cells.try_get(x as i64, y as i64)
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn mapper(&self) -> &ColorMapper {
        &self.mapper
    }

    /// Display colour of the cell at `(x, y)`.
    pub fn render_color(&self, x: usize, y: usize) -> Option<Color> {
        let water_level = self.config().water_level;
        self.cell(x, y).map(|cell| cell.render(&self.mapper, water_level))
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn pixel_width(&self) -> usize {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> usize {
        self.pixel_height
    }

    /// Grow or shrink the on-screen block size by `delta` pixels (never below 1).
    /// Only presentation state changes; the grid is untouched.
    pub fn change_block_size(&mut self, delta: i32) -> u32 {
        let size = (self.block_size as i64 + delta as i64).clamp(1, u32::MAX as i64) as u32;
        self.block_size = size;
        self.pixel_width = self.width() * size as usize;
        self.pixel_height = self.height() * size as usize;
        size
    }

    /// Number of cells of each block type, indexed by `BlockType as usize`.
    pub fn block_counts(&self) -> [usize; 5] {
        let mut counts = [0usize; 5];
        for (_, _, cell) in self.cells.iter() {
            counts[cell.block as usize] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_world() -> World {
        World::new(TerrainConfig::new(24, 16, 9).with_noise_scale(8.0), DisplayConfig::default()).unwrap()
    }

    #[test]
    fn test_grid_matches_generator() {
        let world = small_world();
        assert_eq!(world.width(), 24);
        assert_eq!(world.height(), 16);

        let generator = StandardGenerator::new(world.config().clone());
        for (x, y, cell) in world.cells().iter() {
            assert_eq!((cell.x, cell.y), (x, y));
            assert_eq!(cell.height, generator.get_height(x as i64, y as i64));
            assert_eq!(cell.block, generator.get_block(x as i64, y as i64));
        }
        assert!(world.cell(24, 0).is_none());
    }

    #[test]
    fn test_cached_world_is_identical() {
        let config = TerrainConfig::new(24, 16, 9).with_noise_scale(8.0);
        let plain = World::new(config.clone(), DisplayConfig::default()).unwrap();
        let cached = World::with_generator(build_generator(config, true), DisplayConfig::default()).unwrap();
        for (x, y, cell) in plain.cells().iter() {
            assert_eq!(cached.cell(x, y), Some(cell));
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = TerrainConfig::new(8, 8, 0).with_levels(200, 100, 50);
        assert!(matches!(
            World::new(config, DisplayConfig::default()),
            Err(ConfigError::Levels { .. })
        ));

        let display = DisplayConfig {
            block_size: 0,
            ..DisplayConfig::default()
        };
        assert!(matches!(
            World::new(TerrainConfig::new(8, 8, 0), display),
            Err(ConfigError::BlockSize(0))
        ));
    }

    #[test]
    fn test_change_block_size_updates_pixels_only() {
        let mut world = small_world();
        let before: Vec<Cell> = world.cells().iter().map(|(_, _, c)| *c).collect();

        assert_eq!(world.pixel_width(), 24 * 12);
        assert_eq!(world.change_block_size(4), 16);
        assert_eq!(world.pixel_width(), 24 * 16);
        assert_eq!(world.pixel_height(), 16 * 16);

        assert_eq!(world.change_block_size(-100), 1);
        assert_eq!(world.pixel_width(), 24);

        let after: Vec<Cell> = world.cells().iter().map(|(_, _, c)| *c).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_block_counts_cover_grid() {
        let world = small_world();
        let counts = world.block_counts();
        assert_eq!(counts.iter().sum::<usize>(), 24 * 16);
    }

    #[test]
    fn test_render_color_uses_cell() {
        let world = small_world();
        let cell = *world.cell(3, 4).unwrap();
        let expected = world.mapper().render_color(cell.block, cell.height, world.config().water_level);
        assert_eq!(world.render_color(3, 4), Some(expected));
        assert_eq!(world.render_color(99, 0), None);
    }

    #[test]
    fn test_corner_cell_is_water() {
        // (0, 0) is outside the interior on both axes, so its height is 0
        let world = small_world();
        let corner = world.cell(0, 0).unwrap();
        assert_eq!(corner.height, 0);
        assert_eq!(corner.block, BlockType::Water);
    }
}

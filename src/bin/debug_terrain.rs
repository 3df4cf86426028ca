//! Debug script to dump terrain as ASCII with height statistics per block type

use std::fs::File;
use std::io::{self, Write};

use tile_world::ascii::{block_char, block_legend, block_stats, render_ascii_map, AsciiMode};
use tile_world::config::{DisplayConfig, EdgeClamp, TerrainConfig};
use tile_world::terrain::BlockType;
use tile_world::world::World;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let width = 128;
    let height = 64;
    let seed = 12345u64;

    let mut file = File::create("terrain_debug.txt")?;

    for edge_clamp in [EdgeClamp::Either, EdgeClamp::Both] {
        let config = TerrainConfig::new(width, height, seed)
            .with_noise_scale(32.0)
            .with_edge_clamp(edge_clamp);
        let world = World::new(config, DisplayConfig::default())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        writeln!(file, "=== TERRAIN DEBUG MAP ({}x{}) seed={} edge={:?} ===", width, height, seed, edge_clamp)?;
        write!(file, "{}", block_legend())?;
        writeln!(file)?;

        writeln!(file, "BLOCK MAP:")?;
        write!(file, "{}", render_ascii_map(&world, AsciiMode::Block))?;
        writeln!(file)?;

        writeln!(file, "BLOCK COUNTS:")?;
        write!(file, "{}", block_stats(&world))?;
        writeln!(file)?;

        // Height range per block type
        writeln!(file, "HEIGHT RANGES:")?;
        for block in BlockType::ALL {
            let heights: Vec<u8> = world
                .cells()
                .iter()
                .filter(|(_, _, c)| c.block == block)
                .map(|(_, _, c)| c.height)
                .collect();
            match (heights.iter().min(), heights.iter().max()) {
                (Some(min), Some(max)) => {
                    writeln!(file, "  {} {:<6} {:>3}..={:>3}", block_char(&block), block.name(), min, max)?
                }
                _ => writeln!(file, "  {} {:<6} (none)", block_char(&block), block.name())?,
            }
        }

        // Border heights show the edge clamp at work
        let zero_border = world
            .cells()
            .iter()
            .filter(|(x, y, c)| (*x == 0 || *y == 0) && c.height == 0)
            .count();
        writeln!(file, "Zero-height cells on first row/column: {}", zero_border)?;
        writeln!(file)?;
    }

    println!("Wrote terrain_debug.txt");
    Ok(())
}

//! ASCII rendering and export module for generated worlds
//!
//! Renders the cell grid as plain characters, as 24-bit ANSI colour for the
//! terminal, or as a text world file with legend and statistics.

use std::fs::File;
use std::io::{self, Write};

use chrono::Local;

use crate::palette::{darken, Color};
use crate::terrain::BlockType;
use crate::world::World;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// One character per block type
    Block,
    /// Elevation gradient
    Height,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Block => "Block",
            AsciiMode::Height => "Height",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Block, AsciiMode::Height]
    }
}

pub fn block_char(block: &BlockType) -> char {
    match block {
        BlockType::Water => '~',
        BlockType::Sand => '.',
        BlockType::Grass => '"',
        BlockType::Stone => '^',
        BlockType::Snow => 'A',
    }
}

/// Character ramp from low to high ground
pub fn height_char(height: u8) -> char {
    const RAMP: &[u8] = b" .:-=+*#%@";
    let idx = height as usize * RAMP.len() / 256;
    RAMP[idx] as char
}

pub fn render_ascii_map(world: &World, mode: AsciiMode) -> String {
    let mut result = String::with_capacity((world.width() + 1) * world.height());

    for y in 0..world.height() {
        for cell in world.cells().row(y) {
            let ch = match mode {
                AsciiMode::Block => block_char(&cell.block),
                AsciiMode::Height => height_char(cell.height),
            };
            result.push(ch);
        }
        result.push('\n');
    }

    result
}

/// Format a character with ANSI true color (24-bit) foreground and background
pub fn ansi_colored_char(ch: char, fg: Color, bg: Color) -> String {
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}\x1b[0m",
        fg.r, fg.g, fg.b,
        bg.r, bg.g, bg.b,
        ch
    )
}

/// Render the world with each cell drawn in its shaded display colour.
pub fn render_ansi_map(world: &World) -> String {
    let water_level = world.config().water_level;
    let mut result = String::new();

    for y in 0..world.height() {
        for cell in world.cells().row(y) {
            let bg = cell.render(world.mapper(), water_level);
            let fg = darken(bg, -0.5);
            result.push_str(&ansi_colored_char(block_char(&cell.block), fg, bg));
        }
        result.push('\n');
    }

    result
}

pub fn block_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== LEGEND ===\n");
    for block in BlockType::ALL {
        legend.push_str(&format!("  {} {}\n", block_char(&block), block.name()));
    }
    legend
}

/// Per-type cell counts with percentages, one line each.
pub fn block_stats(world: &World) -> String {
    let counts = world.block_counts();
    let total = (world.width() * world.height()).max(1);
    let mut stats = String::new();
    for block in BlockType::ALL {
        let count = counts[block as usize];
        stats.push_str(&format!(
            "  {:<6} {:>7} ({:>5.1}%)\n",
            block.name(),
            count,
            100.0 * count as f64 / total as f64
        ));
    }
    stats
}

/// Export a world file with header, block map, height map, legend and statistics.
pub fn export_world_file(world: &World, path: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    let cfg = world.config();

    // Header
    writeln!(file, "=== TILE WORLD FILE ===")?;
    writeln!(file, "Seed: {}", cfg.seed)?;
    writeln!(file, "Size: {}x{}", world.width(), world.height())?;
    writeln!(
        file,
        "Levels: water {} / mountain {} / snow {}",
        cfg.water_level, cfg.mountain_level, cfg.snow_level
    )?;
    writeln!(file, "Noise scale: {}  Edge clamp: {:?}", cfg.noise_scale, cfg.edge_clamp)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    for &mode in AsciiMode::all() {
        writeln!(file, "=== MAP ({} View) ===", mode.name())?;
        write!(file, "{}", render_ascii_map(world, mode))?;
        writeln!(file)?;
    }

    write!(file, "{}", block_legend())?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "Total tiles: {}", world.width() * world.height())?;
    write!(file, "{}", block_stats(world))?;

    log::info!("wrote world file to {}", path);
    Ok(())
}

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use tile_world::config::{load_config, AppConfig};
use tile_world::world::{build_generator, World};
use tile_world::{ascii, export, viewer};

/// Largest window the viewer opens with; bigger worlds scroll.
const MAX_WINDOW_WIDTH: usize = 1280;
const MAX_WINDOW_HEIGHT: usize = 800;

#[derive(Parser, Debug)]
#[command(name = "tile_world")]
#[command(about = "Generate procedural tile terrain and explore it in a scrollable viewer")]
struct Args {
    /// Width of the grid in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the grid in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Terrain seed (default: 0, or the value from the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Use a random seed instead of --seed
    #[arg(long)]
    random_seed: bool,

    /// On-screen size of one cell in pixels
    #[arg(short, long)]
    block_size: Option<u32>,

    /// TOML config file with [terrain] and [display] sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Precompute the height field before classifying cells
    #[arg(long)]
    cached: bool,

    /// Export the shaded map to a PNG file
    #[arg(long)]
    png: Option<String>,

    /// Export raw heights as a grayscale PNG
    #[arg(long)]
    heightmap: Option<String>,

    /// Export ASCII maps, legend and statistics to a text file
    #[arg(long)]
    world_file: Option<String>,

    /// Print the map to the terminal in 24-bit colour
    #[arg(long)]
    ascii: bool,

    /// Do not open the interactive viewer
    #[arg(long)]
    no_view: bool,
}

fn build_config(args: &Args) -> Result<AppConfig, Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    if let Some(width) = args.width {
        cfg.terrain.width = width;
    }
    if let Some(height) = args.height {
        cfg.terrain.height = height;
    }
    if let Some(seed) = args.seed {
        cfg.terrain.seed = seed;
    }
    if args.random_seed {
        cfg.terrain.seed = rand::random();
    }
    if let Some(block_size) = args.block_size {
        cfg.display.block_size = block_size;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let cfg = build_config(&args)?;

    println!("Generating world with seed: {}", cfg.terrain.seed);
    println!("Map size: {}x{}", cfg.terrain.width, cfg.terrain.height);
    println!(
        "Levels: water {} / mountain {} / snow {}",
        cfg.terrain.water_level, cfg.terrain.mountain_level, cfg.terrain.snow_level
    );

    let generator = build_generator(cfg.terrain.clone(), args.cached);
    let world = World::with_generator(generator, cfg.display.clone())?;

    println!("Block counts:");
    print!("{}", ascii::block_stats(&world));

    if let Some(path) = &args.png {
        println!("Exporting map to {}...", path);
        export::export_world_png(&world, world.block_size(), path)?;
    }
    if let Some(path) = &args.heightmap {
        println!("Exporting heightmap to {}...", path);
        export::export_heightmap_png(&world, path)?;
    }
    if let Some(path) = &args.world_file {
        println!("Exporting world file to {}...", path);
        ascii::export_world_file(&world, path)?;
    }
    if args.ascii {
        print!("{}", ascii::render_ansi_map(&world));
        print!("{}", ascii::block_legend());
    }

    if !args.no_view {
        let window_width = world.pixel_width().clamp(1, MAX_WINDOW_WIDTH);
        let window_height = world.pixel_height().clamp(1, MAX_WINDOW_HEIGHT);
        viewer::run_viewer(world, window_width, window_height, args.cached)?;
    }

    Ok(())
}

use image::{ImageBuffer, Rgb, RgbImage};

use crate::world::World;

/// Render the world with every cell drawn as a `block_size` square.
pub fn render_world_image(world: &World, block_size: u32) -> RgbImage {
    let block_size = block_size.max(1);
    let img_width = world.width() as u32 * block_size;
    let img_height = world.height() as u32 * block_size;
    let water_level = world.config().water_level;

    let mut img: RgbImage = ImageBuffer::new(img_width, img_height);
    for (x, y, cell) in world.cells().iter() {
        let color: Rgb<u8> = cell.render(world.mapper(), water_level).into();
        let (px, py) = (x as u32 * block_size, y as u32 * block_size);
        for dy in 0..block_size {
            for dx in 0..block_size {
                img.put_pixel(px + dx, py + dy, color);
            }
        }
    }
    img
}

/// Raw heights as a grayscale image, one pixel per cell.
pub fn render_heightmap(world: &World) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(world.width() as u32, world.height() as u32);
    for (x, y, cell) in world.cells().iter() {
        img.put_pixel(x as u32, y as u32, Rgb([cell.height; 3]));
    }
    img
}

pub fn export_world_png(world: &World, block_size: u32, path: &str) -> Result<(), image::ImageError> {
    render_world_image(world, block_size).save(path)?;
    log::info!("wrote world image to {}", path);
    Ok(())
}

pub fn export_heightmap_png(world: &World, path: &str) -> Result<(), image::ImageError> {
    render_heightmap(world).save(path)?;
    log::info!("wrote heightmap to {}", path);
    Ok(())
}

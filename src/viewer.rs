use std::error::Error;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::config::DisplayConfig;
use crate::viewport::Viewport;
use crate::world::{build_generator, World};

/// Dark background behind the map
const BACKGROUND: u32 = (5 << 16) | (5 << 8) | 15;

const TITLE: &str = "Tile World - Drag/Arrows: Scroll, +/-: Zoom, R: Regenerate, Esc: Exit";

/// Render the part of the world under the viewport into a window-sized buffer.
pub fn render_frame(world: &World, view: &Viewport) -> Vec<u32> {
    let (out_width, out_height) = view.window_size();
    let mut buffer = vec![BACKGROUND; out_width * out_height];

    let block = world.block_size() as usize;
    let (offset_x, offset_y) = view.offset();
    let (cols, rows) = view.visible_cells(world);

    for y in rows {
        for x in cols.clone() {
            let Some(color) = world.render_color(x, y) else {
                continue;
            };
            let color = color.to_u32();

            // Cell rectangle in window coordinates, clipped to the window
            let left = (x * block).saturating_sub(offset_x);
            let top = (y * block).saturating_sub(offset_y);
            let right = ((x + 1) * block).saturating_sub(offset_x).min(out_width);
            let bottom = ((y + 1) * block).saturating_sub(offset_y).min(out_height);

            for oy in top..bottom {
                buffer[oy * out_width + left..oy * out_width + right].fill(color);
            }
        }
    }

    buffer
}

fn describe_cell(world: &World, x: usize, y: usize) -> Option<String> {
    let cell = world.cell(x, y)?;
    Some(format!(
        "({}, {}) height {} {}",
        x,
        y,
        cell.height,
        cell.block.name()
    ))
}

/// Run the interactive viewer until the window is closed or Escape is pressed.
pub fn run_viewer(
    mut world: World,
    window_width: usize,
    window_height: usize,
    cached: bool,
) -> Result<(), Box<dyn Error>> {
    let mut window = Window::new(
        TITLE,
        window_width,
        window_height,
        WindowOptions {
            resize: true,
            scale: minifb::Scale::X1,
            ..WindowOptions::default()
        },
    )?;

    // Limit to ~60fps
    window.set_target_fps(60);

    let mut view = Viewport::new(window_width, window_height);
    let mut buffer = render_frame(&world, &view);

    println!("Viewer started. Controls:");
    println!("  Left drag / arrows: Scroll");
    println!("  +/-: Zoom");
    println!("  Right click: Inspect cell");
    println!("  R: Regenerate");
    println!("  Esc: Exit");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let mut needs_redraw = false;

        let (width, height) = window.get_size();
        if width == 0 || height == 0 {
            // Minimised
            window.update();
            continue;
        }
        if view.resize(&world, width, height) {
            needs_redraw = true;
        }

        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            let mut config = world.config().clone();
            config.seed = rand::random();
            println!("Regenerating with seed: {}", config.seed);

            let display = DisplayConfig {
                block_size: world.block_size(),
                tileset: world.mapper().tileset().clone(),
            };
            world = World::with_generator(build_generator(config, cached), display)?;
            view = Viewport::new(width, height);
            needs_redraw = true;
        }

        let (mut dx, mut dy) = (0, 0);
        if window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
            dx -= 1;
        }
        if window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
            dx += 1;
        }
        if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            dy -= 1;
        }
        if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            dy += 1;
        }
        if (dx, dy) != (0, 0) && view.scroll(&world, dx, dy) {
            needs_redraw = true;
        }

        let zoom_in = window.is_key_pressed(Key::Equal, KeyRepeat::Yes)
            || window.is_key_pressed(Key::NumPadPlus, KeyRepeat::Yes);
        let zoom_out = window.is_key_pressed(Key::Minus, KeyRepeat::Yes)
            || window.is_key_pressed(Key::NumPadMinus, KeyRepeat::Yes);
        if zoom_in && view.zoom(&mut world, 1) {
            needs_redraw = true;
        }
        if zoom_out && view.zoom(&mut world, -1) {
            needs_redraw = true;
        }

        if let Some((mx, my)) = window.get_mouse_pos(MouseMode::Clamp) {
            if window.get_mouse_down(MouseButton::Left) {
                if view.is_dragging() {
                    if view.drag(&world, mx as i32, my as i32) {
                        needs_redraw = true;
                    }
                } else {
                    view.grab(mx as i32, my as i32);
                }
            } else {
                view.release();
            }

            if window.get_mouse_down(MouseButton::Right) {
                if let Some(info) = view
                    .cell_at(&world, mx as usize, my as usize)
                    .and_then(|(x, y)| describe_cell(&world, x, y))
                {
                    window.set_title(&info);
                }
            }
        }

        if needs_redraw {
            buffer = render_frame(&world, &view);
        }

        let (buf_width, buf_height) = view.window_size();
        window.update_with_buffer(&buffer, buf_width, buf_height)?;
    }

    Ok(())
}

//! Scrollable window onto a world.
//!
//! Offsets are kept in pixels. The scrollable region spans
//! `(0, 0)..(pixel_width - block_size, pixel_height - block_size)` and every
//! scroll step moves by one block.

use std::ops::Range;

use crate::world::World;

#[derive(Clone, Debug)]
pub struct Viewport {
    window_width: usize,
    window_height: usize,
    offset_x: usize,
    offset_y: usize,
    last_pointer: Option<(i32, i32)>,
}

impl Viewport {
    pub fn new(window_width: usize, window_height: usize) -> Self {
        Self {
            window_width,
            window_height,
            offset_x: 0,
            offset_y: 0,
            last_pointer: None,
        }
    }

    pub fn window_size(&self) -> (usize, usize) {
        (self.window_width, self.window_height)
    }

    /// Top-left corner of the view in world pixels.
    pub fn offset(&self) -> (usize, usize) {
        (self.offset_x, self.offset_y)
    }

    fn max_offset(&self, world: &World) -> (usize, usize) {
        let block = world.block_size() as usize;
        let region_w = world.pixel_width().saturating_sub(block);
        let region_h = world.pixel_height().saturating_sub(block);
        (
            region_w.saturating_sub(self.window_width),
            region_h.saturating_sub(self.window_height),
        )
    }

    fn set_offset(&mut self, world: &World, x: usize, y: usize) -> bool {
        let (max_x, max_y) = self.max_offset(world);
        let (x, y) = (x.min(max_x), y.min(max_y));
        let changed = (x, y) != (self.offset_x, self.offset_y);
        self.offset_x = x;
        self.offset_y = y;
        changed
    }

    /// Scroll by whole blocks. Returns whether the view moved.
    pub fn scroll(&mut self, world: &World, dx: i32, dy: i32) -> bool {
        let block = world.block_size() as i64;
        let x = (self.offset_x as i64 + dx as i64 * block).max(0) as usize;
        let y = (self.offset_y as i64 + dy as i64 * block).max(0) as usize;
        self.set_offset(world, x, y)
    }

    /// Start a drag at window position `(x, y)`.
    pub fn grab(&mut self, x: i32, y: i32) {
        self.last_pointer = Some((x, y));
    }

    pub fn release(&mut self) {
        self.last_pointer = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.last_pointer.is_some()
    }

    /// Continue a drag. Each call scrolls at most one block per axis: forward
    /// when the pointer moved down/right since the last event, back when it
    /// moved up/left.
    pub fn drag(&mut self, world: &World, x: i32, y: i32) -> bool {
        let Some((last_x, last_y)) = self.last_pointer else {
            self.grab(x, y);
            return false;
        };
        self.last_pointer = Some((x, y));

        let dx = (x - last_x).signum();
        let dy = (y - last_y).signum();
        if dx == 0 && dy == 0 {
            return false;
        }
        self.scroll(world, dx, dy)
    }

    /// Window was resized; keeps the offset inside the new bounds.
    pub fn resize(&mut self, world: &World, window_width: usize, window_height: usize) -> bool {
        let changed = (window_width, window_height) != (self.window_width, self.window_height);
        self.window_width = window_width;
        self.window_height = window_height;
        let moved = self.set_offset(world, self.offset_x, self.offset_y);
        changed || moved
    }

    /// Change the world's block size, keeping the top-left cell in place.
    pub fn zoom(&mut self, world: &mut World, delta: i32) -> bool {
        let old = world.block_size() as usize;
        let (cell_x, cell_y) = (self.offset_x / old, self.offset_y / old);
        let new = world.change_block_size(delta) as usize;
        self.set_offset(world, cell_x * new, cell_y * new);
        old != new
    }

    /// Columns and rows of cells at least partly inside the window.
    pub fn visible_cells(&self, world: &World) -> (Range<usize>, Range<usize>) {
        let block = world.block_size() as usize;
        let x0 = (self.offset_x / block).min(world.width());
        let y0 = (self.offset_y / block).min(world.height());
        let x1 = (self.offset_x + self.window_width).div_ceil(block).min(world.width());
        let y1 = (self.offset_y + self.window_height).div_ceil(block).min(world.height());
        (x0..x1, y0..y1)
    }

    /// Cell under window position `(x, y)`, if any.
    pub fn cell_at(&self, world: &World, x: usize, y: usize) -> Option<(usize, usize)> {
        if x >= self.window_width || y >= self.window_height {
            return None;
        }
        let block = world.block_size() as usize;
        let cx = (self.offset_x + x) / block;
        let cy = (self.offset_y + y) / block;
        (cx < world.width() && cy < world.height()).then_some((cx, cy))
    }
}

use image::{Rgba, RgbaImage};

use crate::cells::Direction;
use crate::errors::*;
use crate::grid::WallGrid;

/// Side length of a cell in pixels, walls included. Neighbouring cells share a wall line.
pub const CELL_PIXELS: u32 = 10;

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Pixel dimensions of the image for a `width` x `height` grid.
///
/// Fails with `InvalidArgument` when a side does not fit in a `u32`.
pub fn image_dimensions(width: usize, height: usize) -> Result<(u32, u32)> {
    let side_pixels = |cells: usize| {
        (cells as u64)
            .checked_mul(u64::from(CELL_PIXELS))
            .and_then(|pixels| pixels.checked_add(1))
            .filter(|&pixels| pixels <= u64::from(u32::max_value()))
            .map(|pixels| pixels as u32)
    };
    match (side_pixels(width), side_pixels(height)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => bail!(ErrorKind::InvalidArgument(
            format!("a {}x{} grid is too large to render at {} pixels per cell",
                    width, height, CELL_PIXELS))),
    }
}

/// Draw the walls of a grid in black on white.
///
/// The image is `width * 10 + 1` by `height * 10 + 1` pixels. The outer boundary is
/// closed apart from an entrance above the top left cell, pixels (1, 0) to (9, 0).
pub fn render_maze(grid: &WallGrid) -> Result<RgbaImage> {
    let (image_width, image_height) = image_dimensions(grid.width(), grid.height())?;
    let mut image = RgbaImage::from_pixel(image_width, image_height, WHITE);

    image.put_pixel(0, 0, BLACK);
    for x in CELL_PIXELS..image.width() {
        image.put_pixel(x, 0, BLACK);
    }
    for y in 0..image.height() {
        image.put_pixel(0, y, BLACK);
    }

    for coord in grid.iter() {
        let (x, y) = (coord.x, coord.y);

        // can_travel is false for the boundary, so the right and bottom edges are drawn too
        if !grid.can_travel(x, y, Direction::Right).unwrap_or(false) {
            for k in 0..=CELL_PIXELS {
                image.put_pixel((x + 1) * CELL_PIXELS, y * CELL_PIXELS + k, BLACK);
            }
        }
        if !grid.can_travel(x, y, Direction::Down).unwrap_or(false) {
            for k in 0..=CELL_PIXELS {
                image.put_pixel(x * CELL_PIXELS + k, (y + 1) * CELL_PIXELS, BLACK);
            }
        }
    }

    Ok(image)
}

/// `render_maze` with the path drawn in red through the middle of each cell, starting from
/// the top left cell, and an exit opened below the cell the path ends on.
pub fn render_maze_with_solution(grid: &WallGrid, path: &[Direction]) -> Result<RgbaImage> {
    let mut image = render_maze(grid)?;
    if grid.size() == 0 {
        return Ok(image);
    }

    let half_cell = (CELL_PIXELS / 2) as i64;
    let (mut x, mut y) = (half_cell, half_cell);
    for dir in path {
        let (dx, dy) = match *dir {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        };
        for j in 0..=(CELL_PIXELS as i64) {
            put_pixel_checked(&mut image, x + dx * j, y + dy * j, RED);
        }
        x += dx * CELL_PIXELS as i64;
        y += dy * CELL_PIXELS as i64;
    }

    // Move from the cell centre to the bottom left corner of the final cell
    x -= half_cell;
    y += half_cell;
    for j in 1..(CELL_PIXELS as i64) {
        put_pixel_checked(&mut image, x + j, y, WHITE);
    }

    Ok(image)
}

fn put_pixel_checked(image: &mut RgbaImage, x: i64, y: i64, pixel: Rgba<u8>) {
    if x >= 0 && y >= 0 && x < image.width() as i64 && y < image.height() as i64 {
        image.put_pixel(x as u32, y as u32, pixel);
    }
}

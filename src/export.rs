//! Preview images of the occupancy grid.
//!
//! Each cell is drawn in its state color. Images put grid row 0 at the bottom,
//! so the picture matches the mesh seen from above with +z pointing up.

use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::Result;
use crate::grid::OccupancyGrid;

/// One pixel per cell.
pub fn color_buffer(grid: &OccupancyGrid) -> RgbImage {
    render_grid(grid, grid.width() as u32, grid.height() as u32)
}

/// Render the grid into a `texture_width × texture_height` image.
///
/// Cell `(x, y)` covers pixels from `round(x * w / width)` up to
/// `round((x + 1) * w / width)`, and likewise on y, so cells tile the image
/// without gaps even when the size doesn't divide evenly.
pub fn render_grid(grid: &OccupancyGrid, texture_width: u32, texture_height: u32) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(texture_width, texture_height);
    if grid.width() == 0 || grid.height() == 0 {
        return img;
    }

    let cell_w = texture_width as f64 / grid.width() as f64;
    let cell_h = texture_height as f64 / grid.height() as f64;
    let span = |i: usize, size: f64| ((i as f64 * size).round() as u32, ((i + 1) as f64 * size).round() as u32);

    for (x, y, state) in grid.cells().iter() {
        let color = Rgb(state.color());
        let (x0, x1) = span(x, cell_w);
        let (y0, y1) = span(y, cell_h);
        for py in y0..y1.min(texture_height) {
            let row = texture_height - 1 - py;
            for px in x0..x1.min(texture_width) {
                img.put_pixel(px, row, color);
            }
        }
    }

    img
}

/// Render and save the grid as an image; the format follows the extension.
pub fn export_grid(grid: &OccupancyGrid, texture_width: u32, texture_height: u32, path: &str) -> Result<()> {
    render_grid(grid, texture_width, texture_height).save(path)?;
    Ok(())
}

/// Lay out labeled panels in a grid of `cols` columns. Panels are expected to
/// share one size; smaller ones are padded, larger ones cropped.
pub fn compose_panels(panels: &[(String, RgbImage)], cols: u32) -> RgbImage {
    let label_height = 12u32;
    let tile_w = panels.iter().map(|(_, p)| p.width()).max().unwrap_or(0);
    let tile_h = panels.iter().map(|(_, p)| p.height()).max().unwrap_or(0);
    let cols = cols.max(1);
    let rows = (panels.len() as u32).div_ceil(cols);

    let sheet_w = tile_w * cols;
    let sheet_h = (tile_h + label_height) * rows;
    let mut sheet: RgbImage = ImageBuffer::from_pixel(sheet_w, sheet_h, Rgb([30, 30, 30]));

    for (idx, (label, panel)) in panels.iter().enumerate() {
        let col = idx as u32 % cols;
        let row = idx as u32 / cols;
        let offset_x = col * tile_w;
        let label_y = row * (tile_h + label_height);

        for (tx, ty, pixel) in panel.enumerate_pixels() {
            if tx < tile_w && ty < tile_h {
                sheet.put_pixel(offset_x + tx, label_y + label_height + ty, *pixel);
            }
        }
        draw_label(&mut sheet, label, offset_x + 2, label_y + 2);
    }

    sheet
}

fn draw_label(img: &mut RgbImage, text: &str, x: u32, y: u32) {
    let color = Rgb([220, 220, 220]);
    for (i, c) in text.chars().enumerate() {
        let cx = x + i as u32 * 6;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..5 {
                if (bits >> (4 - col)) & 1 == 1 {
                    let (px, py) = (cx + col, y + row as u32);
                    if px < img.width() && py < img.height() {
                        img.put_pixel(px, py, color);
                    }
                }
            }
        }
    }
}

/// 5x7 digits; anything else draws as blank space.
fn glyph(c: char) -> [u8; 7] {
    match c {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '/' => [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000],
        _ => [0; 7],
    }
}

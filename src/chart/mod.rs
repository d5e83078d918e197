//! Chart rendering module
//!
//! Draws the annotated dual-axis earnings move chart onto an RGB canvas and
//! provides the shared pixel-level drawing helpers.

mod colormap;
mod font;
mod renderer;

pub use colormap::{rainbow, spectrum};
pub use font::{draw_text, draw_text_rotated, text_width, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use renderer::{
    MoveChartRenderer, BAND_LOWER, BAND_UPPER, CHART_TITLE, CRUSH_MAX, CRUSH_MIN, MOVE_MAX,
    MOVE_MIN, SECTOR_DIVIDERS, SECTOR_LABELS, X_MAX, X_MIN,
};

use image::{Rgb, RgbImage};

/// Common color definitions
pub mod colors {
    use image::Rgb;

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    pub const GREEN: Rgb<u8> = Rgb([0, 140, 60]);
    pub const GREY: Rgb<u8> = Rgb([128, 128, 128]);
    pub const DARK_GREY: Rgb<u8> = Rgb([60, 60, 60]);
    pub const LIGHT_GREY: Rgb<u8> = Rgb([180, 180, 180]);
    /// ggplot-style plot area background
    pub const PLOT_BACKGROUND: Rgb<u8> = Rgb([234, 234, 234]);
}

/// Chart canvas configuration
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    /// Margins around the plot area: left, right, top, bottom
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub background: Rgb<u8>,
    pub plot_background: Rgb<u8>,
    pub grid_color: Rgb<u8>,
    pub band_color: Rgb<u8>,
    pub band_alpha: f64,
    pub bar_color: Rgb<u8>,
    pub bar_alpha: f64,
    /// Bar width in x-axis units
    pub bar_width: f64,
    /// Scatter dot radius in pixels
    pub dot_radius: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
            margin_left: 80,
            margin_right: 80,
            margin_top: 60,
            margin_bottom: 40,
            background: colors::WHITE,
            plot_background: colors::PLOT_BACKGROUND,
            grid_color: colors::WHITE,
            band_color: colors::GREEN,
            band_alpha: 0.08,
            bar_color: colors::GREY,
            bar_alpha: 0.2,
            bar_width: 0.6,
            dot_radius: 5,
        }
    }
}

/// Helper function to draw a filled rectangle
pub fn draw_filled_rect(
    img: &mut RgbImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    color: Rgb<u8>,
) {
    let img_width = img.width();
    let img_height = img.height();

    for dy in 0..height {
        for dx in 0..width {
            let px = x + dx;
            let py = y + dy;
            if px < img_width && py < img_height {
                img.put_pixel(px, py, color);
            }
        }
    }
}

/// Helper function to blend a filled rectangle over the existing pixels
pub fn blend_filled_rect(
    img: &mut RgbImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    color: Rgb<u8>,
    alpha: f64,
) {
    let img_width = img.width();
    let img_height = img.height();

    for dy in 0..height {
        for dx in 0..width {
            let px = x + dx;
            let py = y + dy;
            if px < img_width && py < img_height {
                blend_pixel(img, px, py, color, alpha);
            }
        }
    }
}

/// Helper function to draw a vertical line
pub fn draw_vertical_line(img: &mut RgbImage, x: u32, y1: u32, y2: u32, color: Rgb<u8>) {
    let (start, end) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    let img_height = img.height();
    let img_width = img.width();

    if x < img_width {
        for y in start..=end.min(img_height - 1) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Helper function to draw a horizontal line
pub fn draw_horizontal_line(img: &mut RgbImage, y: u32, x1: u32, x2: u32, color: Rgb<u8>) {
    let (start, end) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let img_width = img.width();
    let img_height = img.height();

    if y < img_height {
        for x in start..=end.min(img_width - 1) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Helper function to draw a filled circle
pub fn draw_filled_circle(img: &mut RgbImage, cx: i64, cy: i64, radius: u32, color: Rgb<u8>) {
    let r = radius as i64;
    let r2 = r * r;

    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let px = cx + dx;
            let py = cy + dy;
            if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

/// Blend a color onto a single pixel with the given opacity
pub fn blend_pixel(img: &mut RgbImage, x: u32, y: u32, color: Rgb<u8>, alpha: f64) {
    let base = *img.get_pixel(x, y);
    img.put_pixel(x, y, blend(base, color, alpha));
}

/// Blend `over` onto `base` with the given opacity
pub fn blend(base: Rgb<u8>, over: Rgb<u8>, alpha: f64) -> Rgb<u8> {
    interpolate_color(base, over, alpha)
}

/// Interpolate between two colors
pub fn interpolate_color(c1: Rgb<u8>, c2: Rgb<u8>, t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    Rgb([
        ((1.0 - t) * c1.0[0] as f64 + t * c2.0[0] as f64) as u8,
        ((1.0 - t) * c1.0[1] as f64 + t * c2.0[1] as f64) as u8,
        ((1.0 - t) * c1.0[2] as f64 + t * c2.0[2] as f64) as u8,
    ])
}

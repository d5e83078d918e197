//! Predicted vs. actual move chart renderer
//!
//! Draws the dual-axis earnings chart: a scatter of actual-to-predicted move
//! ratios with ticker labels over a background bar series of IV percentile
//! crush ranks, framed by the fixed sector dividers and the shaded band that
//! marks moves inside the predicted envelope.

use image::RgbImage;

use crate::chart::{
    blend_filled_rect, colors, draw_filled_circle, draw_filled_rect, draw_horizontal_line,
    draw_text, draw_text_rotated, draw_vertical_line, font, spectrum, ChartConfig,
};
use crate::data::ObservationSet;
use crate::error::ChartError;

/// Chart title; also the stem of the default output file name
pub const CHART_TITLE: &str = "Predicted (MMM) vs. Actual Move - Q1 2018";

/// Fixed x-axis range (row indices)
pub const X_MIN: f64 = -1.0;
pub const X_MAX: f64 = 29.0;

/// Fixed primary axis range (move ratio)
pub const MOVE_MIN: f64 = -3.5;
pub const MOVE_MAX: f64 = 3.5;

/// Fixed secondary axis range (IV percentile crush)
pub const CRUSH_MIN: f64 = -80.0;
pub const CRUSH_MAX: f64 = 80.0;

/// Bounds of the shaded "move within predicted expectation" band
pub const BAND_LOWER: f64 = -1.0;
pub const BAND_UPPER: f64 = 1.0;

/// Secondary axis tick step
const CRUSH_TICK_STEP: f64 = 20.0;
/// Secondary tick labels above this index are hidden so the two axes do not
/// both print a zero marker
const CRUSH_LAST_LABELED_TICK: usize = 4;

/// Vertical divider positions separating the sector groups
pub const SECTOR_DIVIDERS: [f64; 5] = [4.5, 9.5, 13.5, 16.5, 21.5];

/// Sector names with their label anchor points in data coordinates
pub const SECTOR_LABELS: [(&str, f64, f64); 6] = [
    ("Basic Materials", -0.3, -2.0),
    ("Consumer Goods", 4.7, -2.0),
    ("Financial", 10.3, -2.0),
    ("Healthcare", 13.55, -2.0),
    ("Services", 17.9, -2.0),
    ("Technology", 23.8, -2.0),
];

const PRIMARY_AXIS_LABEL: &str = "Actual Move : Predicted Move";
const SECONDARY_AXIS_LABEL: &str = "IV Percentile Crush";

/// Dual-axis scatter/bar chart renderer
pub struct MoveChartRenderer {
    config: ChartConfig,
}

impl MoveChartRenderer {
    /// Create a renderer with the default configuration
    pub fn new() -> Self {
        Self {
            config: ChartConfig::default(),
        }
    }

    /// Create a renderer with a custom configuration
    pub fn with_config(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Set the canvas size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Get the active configuration
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn plot_left(&self) -> u32 {
        self.config.margin_left
    }

    fn plot_right(&self) -> u32 {
        self.config.width - self.config.margin_right
    }

    fn plot_top(&self) -> u32 {
        self.config.margin_top
    }

    fn plot_bottom(&self) -> u32 {
        self.config.height - self.config.margin_bottom
    }

    fn plot_width(&self) -> u32 {
        self.plot_right() - self.plot_left()
    }

    fn plot_height(&self) -> u32 {
        self.plot_bottom() - self.plot_top()
    }

    /// Map an x-axis value (row index) to a pixel column
    ///
    /// Values outside the fixed range clip to the plot edge.
    pub fn x_to_px(&self, x: f64) -> u32 {
        let v = x.clamp(X_MIN, X_MAX);
        let frac = (v - X_MIN) / (X_MAX - X_MIN);
        self.plot_left() + (frac * self.plot_width() as f64).round() as u32
    }

    /// Map a move ratio to a pixel row on the primary axis
    pub fn move_to_px(&self, value: f64) -> u32 {
        let v = value.clamp(MOVE_MIN, MOVE_MAX);
        let frac = (MOVE_MAX - v) / (MOVE_MAX - MOVE_MIN);
        self.plot_top() + (frac * self.plot_height() as f64).round() as u32
    }

    /// Map a crush rank to a pixel row on the secondary axis
    pub fn crush_to_px(&self, value: f64) -> u32 {
        let v = value.clamp(CRUSH_MIN, CRUSH_MAX);
        let frac = (CRUSH_MAX - v) / (CRUSH_MAX - CRUSH_MIN);
        self.plot_top() + (frac * self.plot_height() as f64).round() as u32
    }

    /// Render the chart for an ordered set of observations
    ///
    /// Fails fast on an empty set rather than producing a decorations-only
    /// image.
    pub fn render(&self, observations: &ObservationSet) -> Result<RgbImage, ChartError> {
        if observations.is_empty() {
            return Err(ChartError::EmptyDataset);
        }

        let mut img =
            RgbImage::from_pixel(self.config.width, self.config.height, self.config.background);

        self.draw_frame(&mut img);
        self.draw_band(&mut img);
        self.draw_bars(&mut img, observations);
        self.draw_sector_overlays(&mut img);
        self.draw_points(&mut img, observations);
        self.draw_axes(&mut img);

        Ok(img)
    }

    /// Plot area background and gridlines at the primary integer ticks
    fn draw_frame(&self, img: &mut RgbImage) {
        draw_filled_rect(
            img,
            self.plot_left(),
            self.plot_top(),
            self.plot_width(),
            self.plot_height(),
            self.config.plot_background,
        );

        let mut tick = MOVE_MIN.ceil();
        while tick <= MOVE_MAX {
            draw_horizontal_line(
                img,
                self.move_to_px(tick),
                self.plot_left(),
                self.plot_right() - 1,
                self.config.grid_color,
            );
            tick += 1.0;
        }
    }

    /// Shaded band between the predicted move bounds, plus reference lines
    fn draw_band(&self, img: &mut RgbImage) {
        let y_upper = self.move_to_px(BAND_UPPER);
        let y_lower = self.move_to_px(BAND_LOWER);

        blend_filled_rect(
            img,
            self.plot_left(),
            y_upper,
            self.plot_width(),
            y_lower - y_upper,
            self.config.band_color,
            self.config.band_alpha,
        );

        draw_horizontal_line(
            img,
            y_upper,
            self.plot_left(),
            self.plot_right() - 1,
            self.config.band_color,
        );
        draw_horizontal_line(
            img,
            y_lower,
            self.plot_left(),
            self.plot_right() - 1,
            self.config.band_color,
        );
    }

    /// Low-opacity crush rank bars on the secondary axis, anchored at zero
    fn draw_bars(&self, img: &mut RgbImage, observations: &ObservationSet) {
        let unit_px = self.plot_width() as f64 / (X_MAX - X_MIN);
        let half_width = ((self.config.bar_width * unit_px) / 2.0).round().max(1.0) as u32;
        let y_zero = self.crush_to_px(0.0);

        for (index, obs) in observations.data.iter().enumerate() {
            let cx = self.x_to_px(index as f64);
            let y_value = self.crush_to_px(obs.iv_crush_rank);

            let (top, bottom) = if y_value < y_zero {
                (y_value, y_zero)
            } else {
                (y_zero, y_value)
            };

            blend_filled_rect(
                img,
                cx.saturating_sub(half_width),
                top,
                half_width * 2,
                bottom - top,
                self.config.bar_color,
                self.config.bar_alpha,
            );
        }
    }

    /// Static decorations: sector dividers and sector name labels
    fn draw_sector_overlays(&self, img: &mut RgbImage) {
        for divider in SECTOR_DIVIDERS {
            draw_vertical_line(
                img,
                self.x_to_px(divider),
                self.plot_top(),
                self.plot_bottom(),
                colors::GREY,
            );
        }

        for (name, x, y) in SECTOR_LABELS {
            draw_text(
                img,
                name,
                self.x_to_px(x) as i64,
                self.move_to_px(y) as i64 - font::GLYPH_HEIGHT as i64 / 2,
                1,
                colors::GREY,
            );
        }
    }

    /// Scatter dots in their per-row spectrum colors with ticker labels
    fn draw_points(&self, img: &mut RgbImage, observations: &ObservationSet) {
        let palette = spectrum(observations.len());

        for (index, obs) in observations.data.iter().enumerate() {
            let cx = self.x_to_px(index as f64) as i64;
            let cy = self.move_to_px(obs.move_ratio) as i64;

            draw_filled_circle(img, cx, cy, self.config.dot_radius, palette[index]);

            draw_text(
                img,
                &obs.ticker,
                cx + self.config.dot_radius as i64 + 3,
                cy - self.config.dot_radius as i64 - font::GLYPH_HEIGHT as i64,
                1,
                colors::DARK_GREY,
            );
        }
    }

    /// Title, tick labels, and axis titles; the x axis stays hidden
    fn draw_axes(&self, img: &mut RgbImage) {
        let title_width = font::text_width(CHART_TITLE, 2);
        let title_x = (self.config.width.saturating_sub(title_width) / 2) as i64;
        let title_y = (self.plot_top() / 2) as i64 - font::GLYPH_HEIGHT as i64;
        // Double-struck for a bold face
        draw_text(img, CHART_TITLE, title_x, title_y, 2, colors::BLACK);
        draw_text(img, CHART_TITLE, title_x + 1, title_y, 2, colors::BLACK);

        // Primary tick labels, right-aligned against the plot edge
        let mut tick = MOVE_MIN.ceil();
        while tick <= MOVE_MAX {
            let label = format!("{}", tick as i64);
            let x = self.plot_left() as i64 - font::text_width(&label, 1) as i64 - 8;
            let y = self.move_to_px(tick) as i64 - font::GLYPH_HEIGHT as i64 / 2;
            draw_text(img, &label, x, y, 1, colors::DARK_GREY);
            tick += 1.0;
        }

        // Secondary tick labels; ticks above the zero mark go unlabeled so
        // the zero marker is not printed twice
        let mut value = CRUSH_MIN;
        let mut tick_index = 0usize;
        while value <= CRUSH_MAX {
            if tick_index <= CRUSH_LAST_LABELED_TICK {
                let label = format!("{}", value as i64);
                let x = self.plot_right() as i64 + 8;
                let y = self.crush_to_px(value) as i64 - font::GLYPH_HEIGHT as i64 / 2;
                draw_text(img, &label, x, y, 1, colors::DARK_GREY);
            }
            value += CRUSH_TICK_STEP;
            tick_index += 1;
        }

        // Rotated axis titles
        let primary_label_width = font::text_width(PRIMARY_AXIS_LABEL, 1);
        let primary_y =
            self.plot_top() as i64 + (self.plot_height() + primary_label_width) as i64 / 2;
        draw_text_rotated(img, PRIMARY_AXIS_LABEL, 12, primary_y, 1, colors::DARK_GREY);

        let secondary_label_width = font::text_width(SECONDARY_AXIS_LABEL, 1);
        let secondary_y =
            self.plot_top() as i64 + (self.plot_height() + secondary_label_width) as i64 / 2;
        let secondary_x = self.config.width as i64 - font::GLYPH_HEIGHT as i64 - 12;
        draw_text_rotated(
            img,
            SECONDARY_AXIS_LABEL,
            secondary_x,
            secondary_y,
            1,
            colors::DARK_GREY,
        );
    }
}

impl Default for MoveChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::blend;
    use crate::data::Observation;
    use chrono::NaiveDate;

    fn obs(ticker: &str, move_ratio: f64, iv_crush_rank: f64) -> Observation {
        let date = NaiveDate::from_ymd_opt(2018, 1, 29).unwrap();
        Observation::new(date, ticker, move_ratio, iv_crush_rank)
    }

    #[test]
    fn test_render_dimensions() {
        let renderer = MoveChartRenderer::new();
        let set = ObservationSet::with_data(vec![obs("ABC", 1.5, -20.0)]);

        let img = renderer.render(&set).unwrap();
        assert_eq!(img.width(), 1280);
        assert_eq!(img.height(), 960);

        let small = MoveChartRenderer::new().with_size(640, 480);
        let img = small.render(&set).unwrap();
        assert_eq!(img.width(), 640);
        assert_eq!(img.height(), 480);
    }

    #[test]
    fn test_empty_dataset_fails_fast() {
        let renderer = MoveChartRenderer::new();
        let err = renderer.render(&ObservationSet::new()).unwrap_err();
        assert!(matches!(err, ChartError::EmptyDataset));
    }

    #[test]
    fn test_axis_mapping_endpoints() {
        let renderer = MoveChartRenderer::new();
        let cfg = renderer.config();

        assert_eq!(renderer.x_to_px(X_MIN), cfg.margin_left);
        assert_eq!(renderer.x_to_px(X_MAX), cfg.width - cfg.margin_right);
        assert_eq!(renderer.move_to_px(MOVE_MAX), cfg.margin_top);
        assert_eq!(renderer.move_to_px(MOVE_MIN), cfg.height - cfg.margin_bottom);
        assert_eq!(renderer.crush_to_px(CRUSH_MAX), cfg.margin_top);
        assert_eq!(renderer.crush_to_px(CRUSH_MIN), cfg.height - cfg.margin_bottom);
    }

    #[test]
    fn test_axis_mapping_clips_out_of_range() {
        let renderer = MoveChartRenderer::new();

        assert_eq!(renderer.move_to_px(10.0), renderer.move_to_px(MOVE_MAX));
        assert_eq!(renderer.move_to_px(-10.0), renderer.move_to_px(MOVE_MIN));
        assert_eq!(renderer.crush_to_px(500.0), renderer.crush_to_px(CRUSH_MAX));
        assert_eq!(renderer.x_to_px(100.0), renderer.x_to_px(X_MAX));
    }

    #[test]
    fn test_axis_mapping_monotonic() {
        let renderer = MoveChartRenderer::new();

        assert!(renderer.x_to_px(0.0) < renderer.x_to_px(1.0));
        // Pixel rows grow downward, so a larger ratio maps to a smaller row
        assert!(renderer.move_to_px(1.0) < renderer.move_to_px(0.0));
        assert!(renderer.crush_to_px(0.0) < renderer.crush_to_px(-40.0));
    }

    #[test]
    fn test_zero_axes_share_a_row() {
        let renderer = MoveChartRenderer::new();
        assert_eq!(renderer.move_to_px(0.0), renderer.crush_to_px(0.0));
    }

    #[test]
    fn test_single_point_sits_above_band() {
        let renderer = MoveChartRenderer::new();
        let set = ObservationSet::with_data(vec![obs("ABC", 1.5, -20.0)]);
        let img = renderer.render(&set).unwrap();

        let cx = renderer.x_to_px(0.0);
        let cy = renderer.move_to_px(1.5);
        assert!(cy < renderer.move_to_px(BAND_UPPER));

        let palette = spectrum(1);
        assert_eq!(*img.get_pixel(cx, cy), palette[0]);
    }

    #[test]
    fn test_band_tint_is_exact_and_data_independent() {
        let renderer = MoveChartRenderer::new();
        let cfg = renderer.config().clone();
        let set = ObservationSet::with_data(vec![obs("ABC", 1.5, -20.0)]);
        let img = renderer.render(&set).unwrap();

        // A quiet spot inside the band: far from the lone bar/dot, off the
        // gridlines, away from dividers and sector labels
        let inside = *img.get_pixel(renderer.x_to_px(25.0), renderer.move_to_px(0.5));
        let expected = blend(cfg.plot_background, cfg.band_color, cfg.band_alpha);
        assert_eq!(inside, expected);

        // Just above the band the plot background is untouched
        let outside = *img.get_pixel(renderer.x_to_px(25.0), renderer.move_to_px(2.7));
        assert_eq!(outside, cfg.plot_background);
    }

    #[test]
    fn test_bar_is_drawn_at_row_index() {
        let renderer = MoveChartRenderer::new();
        let cfg = renderer.config().clone();
        let set = ObservationSet::with_data(vec![obs("ABC", 1.5, -50.0)]);
        let img = renderer.render(&set).unwrap();

        // Probe below the band's reach on the secondary scale, between ticks
        let probe = *img.get_pixel(renderer.x_to_px(0.0), renderer.crush_to_px(-33.0));
        let expected = blend(cfg.plot_background, cfg.bar_color, cfg.bar_alpha);
        assert_eq!(probe, expected);
    }

    #[test]
    fn test_sector_divider_pixels() {
        let renderer = MoveChartRenderer::new();
        let set = ObservationSet::with_data(vec![obs("ABC", 1.5, -20.0)]);
        let img = renderer.render(&set).unwrap();

        for divider in SECTOR_DIVIDERS {
            let probe = *img.get_pixel(renderer.x_to_px(divider), renderer.move_to_px(2.7));
            assert_eq!(probe, colors::GREY);
        }
    }
}

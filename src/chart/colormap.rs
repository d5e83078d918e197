//! Rainbow colormap
//!
//! Maps row indices onto an even sampling of a violet-to-red spectrum so
//! every scatter dot gets its own color.

use image::Rgb;

use crate::chart::interpolate_color;

/// Spectrum anchor colors, violet through red
const ANCHORS: [Rgb<u8>; 6] = [
    Rgb([148, 0, 211]), // violet
    Rgb([0, 0, 255]),   // blue
    Rgb([0, 255, 255]), // cyan
    Rgb([0, 255, 0]),   // green
    Rgb([255, 255, 0]), // yellow
    Rgb([255, 0, 0]),   // red
];

/// Create a color from a value in range [0, 1] along the rainbow spectrum
pub fn rainbow(value: f64) -> Rgb<u8> {
    let v = value.clamp(0.0, 1.0);

    let segments = (ANCHORS.len() - 1) as f64;
    let position = v * segments;
    let index = (position.floor() as usize).min(ANCHORS.len() - 2);
    let t = position - index as f64;

    interpolate_color(ANCHORS[index], ANCHORS[index + 1], t)
}

/// Sample `n` evenly spaced colors across the spectrum
///
/// Deterministic for a fixed `n`; the sampling stride changes with `n`, so
/// colors are not stable across datasets of different sizes.
pub fn spectrum(n: usize) -> Vec<Rgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![rainbow(0.0)];
    }

    (0..n)
        .map(|i| rainbow(i as f64 / (n - 1) as f64))
        .collect()
}

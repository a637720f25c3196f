//! Point transforms: gamma, negative, logarithmic.

use crate::consts::{LEVELS, MAX_SAMPLE};
use crate::image::Image;

/// Gamma correction: `O = 255 * (I/255)^gamma`, via a 256-entry lookup
/// table. `gamma <= 0` is a documented passthrough, not an error.
///
/// gamma < 1 expands the dark range (brightens), gamma > 1 compresses it.
pub fn gamma(img: &Image, gamma: f32) -> Image {
    if gamma <= 0.0 {
        return img.clone();
    }
    let mut table = [0u8; LEVELS];
    for (i, entry) in table.iter_mut().enumerate() {
        let normalized = i as f32 / MAX_SAMPLE;
        *entry = (normalized.powf(gamma) * MAX_SAMPLE).round().min(MAX_SAMPLE) as u8;
    }
    img.map_samples(|v| table[v as usize])
}

/// Negative transform: `O = 255 - I`. Involution.
pub fn negative(img: &Image) -> Image {
    img.map_samples(|v| 255 - v)
}

/// Logarithmic transform: `O = c_auto * c * ln(1 + I)` with
/// `c_auto = 255 / ln(256)` so the default output spans the full range.
pub fn log_transform(img: &Image, c: f32) -> Image {
    let c_auto = MAX_SAMPLE / (1.0f32 + MAX_SAMPLE).ln();
    let mut table = [0u8; LEVELS];
    for (i, entry) in table.iter_mut().enumerate() {
        let v = c_auto * c * (1.0 + i as f32).ln();
        *entry = v.clamp(0.0, MAX_SAMPLE).round() as u8;
    }
    img.map_samples(|v| table[v as usize])
}

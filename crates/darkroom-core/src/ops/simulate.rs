//! Degradation simulators: resolution loss and bit-depth reduction.

use crate::consts::{LEVELS, MAX_SAMPLE};
use crate::image::Image;

/// Simulate resolution loss: shrink by `factor` with nearest-neighbor,
/// then scale back to the original size. Output dimensions always match
/// the input; `factor >= 1.0` is a no-op.
pub fn downsample(img: &Image, factor: f32) -> Image {
    if factor >= 1.0 {
        return img.clone();
    }
    let h = img.height();
    let w = img.width();
    let small_h = ((h as f32 * factor) as usize).max(1);
    let small_w = ((w as f32 * factor) as usize).max(1);

    img.resize_nearest(small_h, small_w).resize_nearest(h, w)
}

/// Simulate bit-depth reduction: round every sample to the nearest of
/// `2^bits` evenly spaced levels across [0, 255]. Bits are clamped to
/// 1..=8; bits = 8 keeps all 256 levels.
pub fn quantize(img: &Image, bits: u32) -> Image {
    let bits = bits.clamp(1, 8);
    let levels = 1u32 << bits;
    if levels as usize >= LEVELS {
        return img.clone();
    }
    let step = MAX_SAMPLE / (levels - 1) as f32;

    img.map_samples(|v| {
        let q = (v as f32 / step).round() * step;
        q.clamp(0.0, MAX_SAMPLE).round() as u8
    })
}

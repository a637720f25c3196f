//! Contrast enhancement: histogram equalization, CLAHE, percentile stretch.

use ndarray::{Array2, Array3};

use crate::color::{rgb_to_ycbcr, ycbcr_to_rgb};
use crate::consts::{LEVELS, MAX_SAMPLE};
use crate::image::Image;
use crate::metrics::stats::percentile_of_sorted;

/// Global histogram equalization.
///
/// Color images are equalized on the luma plane only (YCbCr round trip)
/// to avoid hue shifts; full per-channel equalization is deliberately
/// not offered.
pub fn equalize(img: &Image) -> Image {
    if img.is_color() {
        let (y, cb, cr) = rgb_to_ycbcr(img);
        let eq = equalize_plane(&y);
        ycbcr_to_rgb(&eq, &cb, &cr)
    } else {
        Image::from_gray(equalize_plane(&img.luma()))
    }
}

fn equalize_plane(plane: &Array2<u8>) -> Array2<u8> {
    let total = plane.len() as u64;
    let mut hist = [0u64; LEVELS];
    for &v in plane.iter() {
        hist[v as usize] += 1;
    }

    // Standard CDF remap anchored at the first non-empty bin.
    let mut cdf = [0u64; LEVELS];
    let mut running = 0u64;
    for (i, &h) in hist.iter().enumerate() {
        running += h;
        cdf[i] = running;
    }
    let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
    let denom = total.saturating_sub(cdf_min);

    let mut lut = [0u8; LEVELS];
    if denom == 0 {
        // Constant plane: identity mapping.
        for (i, entry) in lut.iter_mut().enumerate() {
            *entry = i as u8;
        }
    } else {
        for (i, entry) in lut.iter_mut().enumerate() {
            let scaled = (cdf[i].saturating_sub(cdf_min)) as f64 * 255.0 / denom as f64;
            *entry = scaled.round().clamp(0.0, 255.0) as u8;
        }
    }
    plane.mapv(|v| lut[v as usize])
}

/// Contrast Limited Adaptive Histogram Equalization.
///
/// The plane is divided into a `tile_grid x tile_grid` grid; each tile
/// gets its own clipped equalization mapping and pixels interpolate
/// bilinearly between the four nearest tile mappings. Color images are
/// processed on the lightness (luma) plane only.
pub fn clahe(img: &Image, clip_limit: f32, tile_grid: usize) -> Image {
    if img.is_color() {
        let (y, cb, cr) = rgb_to_ycbcr(img);
        let out = clahe_plane(&y, clip_limit, tile_grid);
        ycbcr_to_rgb(&out, &cb, &cr)
    } else {
        Image::from_gray(clahe_plane(&img.luma(), clip_limit, tile_grid))
    }
}

fn clahe_plane(plane: &Array2<u8>, clip_limit: f32, tile_grid: usize) -> Array2<u8> {
    let (h, w) = plane.dim();
    let grid = tile_grid.max(1);
    let tile_h = h.div_ceil(grid).max(1);
    let tile_w = w.div_ceil(grid).max(1);

    // One 256-entry mapping per tile.
    let mut luts = vec![[0u8; LEVELS]; grid * grid];
    for ty in 0..grid {
        for tx in 0..grid {
            let r0 = ty * tile_h;
            let c0 = tx * tile_w;
            let lut = &mut luts[ty * grid + tx];
            if r0 >= h || c0 >= w {
                // Grid larger than the image: identity for phantom tiles.
                for (i, entry) in lut.iter_mut().enumerate() {
                    *entry = i as u8;
                }
                continue;
            }
            let r1 = (r0 + tile_h).min(h);
            let c1 = (c0 + tile_w).min(w);
            let tile_pixels = (r1 - r0) * (c1 - c0);

            let mut hist = [0u32; LEVELS];
            for row in r0..r1 {
                for col in c0..c1 {
                    hist[plane[[row, col]] as usize] += 1;
                }
            }

            // Clip and redistribute the excess uniformly.
            let limit = ((clip_limit * tile_pixels as f32 / LEVELS as f32).max(1.0)) as u32;
            let mut excess = 0u32;
            for bin in hist.iter_mut() {
                if *bin > limit {
                    excess += *bin - limit;
                    *bin = limit;
                }
            }
            let bonus = excess / LEVELS as u32;
            let remainder = (excess % LEVELS as u32) as usize;
            for (i, bin) in hist.iter_mut().enumerate() {
                *bin += bonus + u32::from(i < remainder);
            }

            let scale = 255.0 / tile_pixels as f64;
            let mut running = 0u64;
            for (i, entry) in lut.iter_mut().enumerate() {
                running += hist[i] as u64;
                *entry = (running as f64 * scale).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    // Bilinear interpolation between tile mappings, clamped at borders.
    let tile_coord = |pos: usize, tile_size: usize| -> (usize, usize, f64) {
        let f = (pos as f64 + 0.5) / tile_size as f64 - 0.5;
        if f <= 0.0 {
            (0, 0, 0.0)
        } else if f >= (grid - 1) as f64 {
            (grid - 1, grid - 1, 0.0)
        } else {
            let t = f.floor() as usize;
            (t, t + 1, f - t as f64)
        }
    };

    Array2::from_shape_fn((h, w), |(row, col)| {
        let (ty0, ty1, wy) = tile_coord(row, tile_h);
        let (tx0, tx1, wx) = tile_coord(col, tile_w);
        let v = plane[[row, col]] as usize;
        let top = luts[ty0 * grid + tx0][v] as f64 * (1.0 - wx)
            + luts[ty0 * grid + tx1][v] as f64 * wx;
        let bottom = luts[ty1 * grid + tx0][v] as f64 * (1.0 - wx)
            + luts[ty1 * grid + tx1][v] as f64 * wx;
        (top * (1.0 - wy) + bottom * wy).round().clamp(0.0, 255.0) as u8
    })
}

/// Contrast stretching: linearly remap the [low, high] percentile window
/// of each channel to [0, 255]. A zero-width window passes the channel
/// through unchanged (divide-by-zero guard).
pub fn contrast_stretching(img: &Image, low_percentile: f64, high_percentile: f64) -> Image {
    let (h, w, c) = img.data().dim();
    let mut out = Array3::<u8>::zeros((h, w, c));

    for ch in 0..c {
        let mut samples: Vec<f64> = Vec::with_capacity(h * w);
        for row in 0..h {
            for col in 0..w {
                samples.push(img.data()[[row, col, ch]] as f64);
            }
        }
        samples.sort_by(|a, b| a.total_cmp(b));
        let low = percentile_of_sorted(&samples, low_percentile);
        let high = percentile_of_sorted(&samples, high_percentile);

        if high - low > 0.0 {
            let scale = MAX_SAMPLE as f64 / (high - low);
            for row in 0..h {
                for col in 0..w {
                    let v = (img.data()[[row, col, ch]] as f64 - low) * scale;
                    out[[row, col, ch]] = v.clamp(0.0, 255.0).round() as u8;
                }
            }
        } else {
            for row in 0..h {
                for col in 0..w {
                    out[[row, col, ch]] = img.data()[[row, col, ch]];
                }
            }
        }
    }
    Image::from_valid(out)
}

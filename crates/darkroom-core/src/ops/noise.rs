//! Noise simulators. Both take the caller's RNG so tests can seed
//! deterministically; everything else in the operator library is pure.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{DarkroomError, Result};
use crate::image::Image;

/// Additive Gaussian noise: per-sample independent `N(mean, sigma)`,
/// added and clipped to [0, 255]. A negative or NaN sigma is invalid;
/// sigma 0 adds the mean to every sample.
pub fn gaussian_noise<R: Rng + ?Sized>(
    img: &Image,
    mean: f32,
    sigma: f32,
    rng: &mut R,
) -> Result<Image> {
    let normal = Normal::new(mean, sigma).map_err(|e| DarkroomError::InvalidParams {
        op: "noise_gaussian".to_string(),
        reason: e.to_string(),
    })?;
    let mut data = img.to_f32();
    for v in data.iter_mut() {
        *v += normal.sample(rng);
    }
    Ok(Image::from_f32_clipped(data))
}

/// Salt-and-pepper noise: `ceil(prob * N / 2)` sample coordinates set to
/// 255 and the same number set to 0, where N counts every stored sample
/// (pixels x channels).
///
/// Coordinates are drawn uniformly with replacement and independently
/// per axis, so the affected count is approximate: the same sample can
/// be hit twice, or receive salt and then pepper. This mirrors the
/// classic formulation and is kept as documented behavior.
pub fn salt_pepper_noise<R: Rng + ?Sized>(img: &Image, prob: f64, rng: &mut R) -> Image {
    let mut data = img.data().clone();
    let (h, w, c) = data.dim();
    let count = (prob.clamp(0.0, 1.0) * data.len() as f64 * 0.5).ceil() as usize;

    for _ in 0..count {
        let coord = [
            rng.random_range(0..h),
            rng.random_range(0..w),
            rng.random_range(0..c),
        ];
        data[coord] = 255;
    }
    for _ in 0..count {
        let coord = [
            rng.random_range(0..h),
            rng.random_range(0..w),
            rng.random_range(0..c),
        ];
        data[coord] = 0;
    }
    Image::from_valid(data)
}

//! Neighborhood filters: median, Gaussian, unsharp masking.

use ndarray::{Array2, Array3};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::image::Image;

/// Force a kernel size odd and report whether it is large enough to act.
/// Sizes below 3 mean "no filtering" for both median and Gaussian.
fn effective_kernel(kernel_size: i64) -> Option<usize> {
    if kernel_size < 3 {
        return None;
    }
    let k = kernel_size as usize;
    Some(if k % 2 == 0 { k + 1 } else { k })
}

/// Median filter with a k x k window and replicated borders.
/// Even kernel sizes are bumped to the next odd value; k < 3 is a no-op.
pub fn median_filter(img: &Image, kernel_size: i64) -> Image {
    let Some(k) = effective_kernel(kernel_size) else {
        return img.clone();
    };
    let radius = k / 2;
    let (h, w, c) = img.data().dim();
    let data = img.data();

    let process_row = |row: usize| -> Vec<u8> {
        let mut out_row = vec![0u8; w * c];
        let mut window = Vec::with_capacity(k * k);
        for col in 0..w {
            for ch in 0..c {
                window.clear();
                for dy in 0..k {
                    let src_row = (row as isize + dy as isize - radius as isize)
                        .clamp(0, h as isize - 1) as usize;
                    for dx in 0..k {
                        let src_col = (col as isize + dx as isize - radius as isize)
                            .clamp(0, w as isize - 1) as usize;
                        window.push(data[[src_row, src_col, ch]]);
                    }
                }
                let mid = window.len() / 2;
                let (_, median, _) = window.select_nth_unstable(mid);
                out_row[col * c + ch] = *median;
            }
        }
        out_row
    };

    let rows: Vec<Vec<u8>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(process_row).collect()
    } else {
        (0..h).map(process_row).collect()
    };

    let mut out = Array3::<u8>::zeros((h, w, c));
    for (row, row_data) in rows.into_iter().enumerate() {
        for col in 0..w {
            for ch in 0..c {
                out[[row, col, ch]] = row_data[col * c + ch];
            }
        }
    }
    Image::from_valid(out)
}

/// Gaussian smoothing with an odd-forced k x k kernel.
/// `sigma <= 0` derives sigma from the kernel size; k < 3 is a no-op.
pub fn gaussian_filter(img: &Image, kernel_size: i64, sigma: f32) -> Image {
    let Some(k) = effective_kernel(kernel_size) else {
        return img.clone();
    };
    let planes = blur_planes(img, k, sigma);
    planes_to_image(img, planes)
}

/// Unsharp masking: `O = I + strength * (I - blurred)`, clipped to [0, 255].
pub fn unsharp_mask(img: &Image, kernel_size: i64, sigma: f32, strength: f32) -> Image {
    let Some(k) = effective_kernel(kernel_size) else {
        // Blurring is a no-op, so the mask is zero everywhere.
        return img.clone();
    };
    let (h, w, c) = img.data().dim();
    let blurred = blur_planes(img, k, sigma);

    let mut out = Array3::<u8>::zeros((h, w, c));
    for ch in 0..c {
        for row in 0..h {
            for col in 0..w {
                let orig = img.data()[[row, col, ch]] as f32;
                let sharpened = orig + strength * (orig - blurred[ch][[row, col]]);
                out[[row, col, ch]] = sharpened.clamp(0.0, 255.0).round() as u8;
            }
        }
    }
    Image::from_valid(out)
}

/// Gaussian-blur every channel plane in f32, returning one plane per channel.
fn blur_planes(img: &Image, k: usize, sigma: f32) -> Vec<Array2<f32>> {
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        // Derived sigma for a given aperture, matching the common
        // 0.3*((k-1)*0.5 - 1) + 0.8 convention.
        0.3 * ((k as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let kernel = make_gaussian_kernel(k, sigma);
    let (h, w, c) = img.data().dim();

    (0..c)
        .map(|ch| {
            let plane =
                Array2::from_shape_fn((h, w), |(row, col)| img.data()[[row, col, ch]] as f32);
            let row_pass = convolve_rows(&plane, &kernel);
            convolve_cols(&row_pass, &kernel)
        })
        .collect()
}

fn planes_to_image(img: &Image, planes: Vec<Array2<f32>>) -> Image {
    let (h, w, c) = img.data().dim();
    let mut out = Array3::<u8>::zeros((h, w, c));
    for (ch, plane) in planes.iter().enumerate() {
        for row in 0..h {
            for col in 0..w {
                out[[row, col, ch]] = plane[[row, col]].clamp(0.0, 255.0).round() as u8;
            }
        }
    }
    Image::from_valid(out)
}

fn make_gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let radius = size / 2;
    let s2 = 2.0 * sigma * sigma;
    let mut kernel = vec![0.0f32; size];
    let mut sum = 0.0f32;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *k = (-x * x / s2).exp();
        sum += *k;
    }
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

fn convolve_rows(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    let process_row = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let src_col = (col as isize + ki as isize - radius as isize)
                        .clamp(0, w as isize - 1) as usize;
                    sum += data[[row, src_col]] * kv;
                }
                sum
            })
            .collect()
    };

    let rows: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(process_row).collect()
    } else {
        (0..h).map(process_row).collect()
    };

    collect_rows(rows, h, w)
}

fn convolve_cols(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    let process_row = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let src_row = (row as isize + ki as isize - radius as isize)
                        .clamp(0, h as isize - 1) as usize;
                    sum += data[[src_row, col]] * kv;
                }
                sum
            })
            .collect()
    };

    let rows: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(process_row).collect()
    } else {
        (0..h).map(process_row).collect()
    };

    collect_rows(rows, h, w)
}

fn collect_rows(rows: Vec<Vec<f32>>, h: usize, w: usize) -> Array2<f32> {
    let mut result = Array2::<f32>::zeros((h, w));
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }
    result
}

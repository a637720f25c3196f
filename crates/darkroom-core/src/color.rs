//! RGB <-> YCbCr conversion (BT.601, full range).
//!
//! Color images are equalized on the luma plane only, so enhancement
//! operators round-trip through this module to avoid hue shifts.

use ndarray::{Array2, Array3};

use crate::image::Image;

/// Split an RGB image into (Y, Cb, Cr) planes. Y is quantized to u8 so
/// histogram-based operators can work on it directly; chroma stays f32
/// to keep the round trip lossless where possible.
pub fn rgb_to_ycbcr(img: &Image) -> (Array2<u8>, Array2<f32>, Array2<f32>) {
    debug_assert!(img.is_color());
    let (h, w, _) = img.data().dim();
    let mut y = Array2::<u8>::zeros((h, w));
    let mut cb = Array2::<f32>::zeros((h, w));
    let mut cr = Array2::<f32>::zeros((h, w));

    for row in 0..h {
        for col in 0..w {
            let r = img.data()[[row, col, 0]] as f32;
            let g = img.data()[[row, col, 1]] as f32;
            let b = img.data()[[row, col, 2]] as f32;
            let yv = 0.299 * r + 0.587 * g + 0.114 * b;
            y[[row, col]] = yv.clamp(0.0, 255.0).round() as u8;
            cb[[row, col]] = 128.0 + 0.564 * (b - yv);
            cr[[row, col]] = 128.0 + 0.713 * (r - yv);
        }
    }
    (y, cb, cr)
}

/// Recombine (Y, Cb, Cr) planes into an RGB image, clamping to [0, 255].
pub fn ycbcr_to_rgb(y: &Array2<u8>, cb: &Array2<f32>, cr: &Array2<f32>) -> Image {
    let (h, w) = y.dim();
    let data = Array3::from_shape_fn((h, w, 3), |(row, col, ch)| {
        let yv = y[[row, col]] as f32;
        let cbv = cb[[row, col]] - 128.0;
        let crv = cr[[row, col]] - 128.0;
        let v = match ch {
            0 => yv + 1.403 * crv,
            1 => yv - 0.344 * cbv - 0.714 * crv,
            _ => yv + 1.773 * cbv,
        };
        v.clamp(0.0, 255.0).round() as u8
    });
    Image::new(data).expect("three channels by construction")
}

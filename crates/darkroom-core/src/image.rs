use ndarray::{Array2, Array3};

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{DarkroomError, Result};

/// An 8-bit image buffer.
///
/// Pixel data is row-major, shape = (height, width, channels) with
/// channels 1 (grayscale) or 3 (RGB). Every operator takes a shared
/// reference and returns a freshly allocated result; sample values
/// always stay in [0, 255].
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    data: Array3<u8>,
}

impl Image {
    /// Wrap a raw buffer, validating the channel count.
    pub fn new(data: Array3<u8>) -> Result<Self> {
        let channels = data.dim().2;
        if channels != 1 && channels != 3 {
            return Err(DarkroomError::InvalidChannels(channels));
        }
        Ok(Self { data })
    }

    /// Internal constructor for buffers whose channel count is already
    /// known to be valid (operators preserve the input's channel count).
    pub(crate) fn from_valid(data: Array3<u8>) -> Self {
        debug_assert!(matches!(data.dim().2, 1 | 3));
        Self { data }
    }

    /// Build a grayscale image from a 2-D array.
    pub fn from_gray(gray: Array2<u8>) -> Self {
        let (h, w) = gray.dim();
        let data = gray.into_shape_with_order((h, w, 1)).expect("same element count");
        Self { data }
    }

    /// Uniform grayscale image, useful for tests and synthetic inputs.
    pub fn gray_filled(height: usize, width: usize, value: u8) -> Self {
        Self {
            data: Array3::from_elem((height, width, 1), value),
        }
    }

    /// Uniform RGB image.
    pub fn rgb_filled(height: usize, width: usize, rgb: [u8; 3]) -> Self {
        Self {
            data: Array3::from_shape_fn((height, width, 3), |(_, _, ch)| rgb[ch]),
        }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn is_color(&self) -> bool {
        self.channels() == 3
    }

    /// Total number of stored samples (pixels x channels).
    pub fn sample_count(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn into_data(self) -> Array3<u8> {
        self.data
    }

    /// Apply a per-sample mapping, e.g. a 256-entry lookup table.
    pub fn map_samples(&self, f: impl Fn(u8) -> u8) -> Image {
        Image {
            data: self.data.mapv(&f),
        }
    }

    /// Extract the luma plane: BT.601 weighted sum for color,
    /// the single channel as-is for grayscale.
    pub fn luma(&self) -> Array2<u8> {
        let (h, w, c) = self.data.dim();
        if c == 1 {
            Array2::from_shape_fn((h, w), |(row, col)| self.data[[row, col, 0]])
        } else {
            Array2::from_shape_fn((h, w), |(row, col)| {
                let r = self.data[[row, col, 0]] as f32;
                let g = self.data[[row, col, 1]] as f32;
                let b = self.data[[row, col, 2]] as f32;
                (LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b).round() as u8
            })
        }
    }

    /// Convert samples to f32 for intermediate computation.
    pub fn to_f32(&self) -> Array3<f32> {
        self.data.mapv(|v| v as f32)
    }

    /// Clip a float buffer to [0, 255], round, and re-wrap as an image.
    /// The float buffer must keep a valid channel count.
    pub fn from_f32_clipped(data: Array3<f32>) -> Image {
        Image {
            data: data.mapv(|v| v.clamp(0.0, 255.0).round() as u8),
        }
    }

    /// Nearest-neighbor resize to the given dimensions.
    pub fn resize_nearest(&self, new_height: usize, new_width: usize) -> Image {
        let (h, w, c) = self.data.dim();
        let new_height = new_height.max(1);
        let new_width = new_width.max(1);
        let data = Array3::from_shape_fn((new_height, new_width, c), |(row, col, ch)| {
            let src_row = ((row as f32 + 0.5) * h as f32 / new_height as f32) as usize;
            let src_col = ((col as f32 + 0.5) * w as f32 / new_width as f32) as usize;
            self.data[[src_row.min(h - 1), src_col.min(w - 1), ch]]
        });
        Image { data }
    }
}

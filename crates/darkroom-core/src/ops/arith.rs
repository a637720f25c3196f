//! Point-wise arithmetic between two images, plus N-image averaging.

use std::fmt;

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::error::{DarkroomError, Result};
use crate::image::Image;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArithOp {
    /// Blended average: `0.5*A + 0.5*B` (prevents overflow).
    Add,
    /// Absolute difference: `|A - B|` (change detection).
    Subtract,
    /// Normalized product: `A*B / 255`, clipped.
    Multiply,
    /// `A / (B+1) * 255`, then min-max normalized to [0, 255] so the
    /// result stays visualizable. Note the normalization depends on the
    /// global image extrema, not on single pixel pairs.
    Divide,
}

impl ArithOp {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "add" => Ok(Self::Add),
            "subtract" => Ok(Self::Subtract),
            "multiply" => Ok(Self::Multiply),
            "divide" => Ok(Self::Divide),
            other => Err(DarkroomError::UnsupportedArithmetic(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply a point-wise arithmetic operation between two images.
/// The second image is resized (nearest-neighbor) to match the first
/// when dimensions differ; channel counts must agree.
pub fn arithmetic(a: &Image, b: &Image, op: ArithOp) -> Result<Image> {
    if b.channels() != a.channels() {
        return Err(DarkroomError::ChannelMismatch {
            expected: a.channels(),
            got: b.channels(),
        });
    }
    let resized;
    let b = if b.height() != a.height() || b.width() != a.width() {
        resized = b.resize_nearest(a.height(), a.width());
        &resized
    } else {
        b
    };

    let out = match op {
        ArithOp::Add => {
            let mut data = a.to_f32();
            for (v, &bv) in data.iter_mut().zip(b.data().iter()) {
                *v = 0.5 * *v + 0.5 * bv as f32;
            }
            Image::from_f32_clipped(data)
        }
        ArithOp::Subtract => {
            let mut data = a.data().clone();
            for (v, &bv) in data.iter_mut().zip(b.data().iter()) {
                *v = v.abs_diff(bv);
            }
            Image::from_valid(data)
        }
        ArithOp::Multiply => {
            let mut data = a.to_f32();
            for (v, &bv) in data.iter_mut().zip(b.data().iter()) {
                *v = *v * bv as f32 / 255.0;
            }
            Image::from_f32_clipped(data)
        }
        ArithOp::Divide => {
            let mut data = a.to_f32();
            for (v, &bv) in data.iter_mut().zip(b.data().iter()) {
                *v = *v / (bv as f32 + 1.0) * 255.0;
            }
            let min = data.iter().copied().fold(f32::INFINITY, f32::min);
            let max = data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            if max > min {
                let scale = 255.0 / (max - min);
                data.mapv_inplace(|v| (v - min) * scale);
            } else {
                data.fill(0.0);
            }
            Image::from_f32_clipped(data)
        }
    };
    Ok(out)
}

/// Average N images in floating point, the classic noise-reduction stack.
/// Images with mismatched dimensions are resized to the first image's.
pub fn average(images: &[Image]) -> Result<Image> {
    let first = images.first().ok_or(DarkroomError::EmptySequence)?;
    let (h, w, c) = first.data().dim();
    let mut accum = Array3::<f32>::zeros((h, w, c));

    for img in images {
        if img.channels() != c {
            return Err(DarkroomError::ChannelMismatch {
                expected: c,
                got: img.channels(),
            });
        }
        if img.height() != h || img.width() != w {
            accum += &img.resize_nearest(h, w).to_f32();
        } else {
            accum += &img.to_f32();
        }
    }
    accum /= images.len() as f32;
    Ok(Image::from_f32_clipped(accum))
}

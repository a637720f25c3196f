//! Image codec boundary: decode files into [`Image`] buffers and back.

use std::path::{Path, PathBuf};

use image::{ColorType, GrayImage, Luma, Rgb, RgbImage};
use ndarray::Array3;

use crate::error::{DarkroomError, Result};
use crate::image::Image;

/// File extensions considered images when scanning a directory.
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff"];

/// Load an image file.
///
/// Grayscale sources stay single-channel; everything else is decoded to RGB.
pub fn load_image(path: &Path) -> Result<Image> {
    if !path.exists() {
        return Err(DarkroomError::NotFound(path.to_path_buf()));
    }
    let decoded =
        image::open(path).map_err(|_| DarkroomError::Decode(path.to_path_buf()))?;

    let img = match decoded.color() {
        ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16 => {
            let gray = decoded.to_luma8();
            let (w, h) = gray.dimensions();
            let data = Array3::from_shape_fn((h as usize, w as usize, 1), |(row, col, _)| {
                gray.get_pixel(col as u32, row as u32).0[0]
            });
            Image::new(data)?
        }
        _ => {
            let rgb = decoded.to_rgb8();
            let (w, h) = rgb.dimensions();
            let data = Array3::from_shape_fn((h as usize, w as usize, 3), |(row, col, ch)| {
                rgb.get_pixel(col as u32, row as u32).0[ch]
            });
            Image::new(data)?
        }
    };
    Ok(img)
}

/// Save an image, choosing the format from the path extension.
pub fn save_image(img: &Image, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let h = img.height();
    let w = img.width();

    if img.is_color() {
        let mut out = RgbImage::new(w as u32, h as u32);
        for row in 0..h {
            for col in 0..w {
                let px = [
                    img.data()[[row, col, 0]],
                    img.data()[[row, col, 1]],
                    img.data()[[row, col, 2]],
                ];
                out.put_pixel(col as u32, row as u32, Rgb(px));
            }
        }
        out.save(path)?;
    } else {
        let mut out = GrayImage::new(w as u32, h as u32);
        for row in 0..h {
            for col in 0..w {
                out.put_pixel(col as u32, row as u32, Luma([img.data()[[row, col, 0]]]));
            }
        }
        out.save(path)?;
    }
    Ok(())
}

/// List supported image files in a directory, sorted by path.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    Ok(paths)
}

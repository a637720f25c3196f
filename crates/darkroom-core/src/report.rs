//! Visual summary rendering.
//!
//! Rendering is a best-effort collaborator: `Ok(None)` means "no report
//! available", which callers treat as a skipped artifact, not a failure.

use ndarray::Array3;

use crate::error::Result;
use crate::image::Image;
use crate::metrics::luma_histogram;

pub trait ReportRenderer {
    /// Produce a composite visualization of the image for human
    /// inspection, or `Ok(None)` when rendering is unavailable.
    fn render(&self, img: &Image, title: &str) -> Result<Option<Image>>;
}

/// Renderer that never produces a report. Useful for batch runs where
/// only the transformed images matter.
pub struct NullRenderer;

impl ReportRenderer for NullRenderer {
    fn render(&self, _img: &Image, _title: &str) -> Result<Option<Image>> {
        Ok(None)
    }
}

const HIST_PANEL_WIDTH: usize = 256;
const HIST_PANEL_HEIGHT: usize = 160;
const PANEL_MARGIN: usize = 12;
const BACKGROUND: u8 = 24;
const BAR_COLOR: [u8; 3] = [200, 200, 200];

/// Default renderer: the source image composited beside its 256-bin
/// luma histogram.
pub struct HistogramRenderer;

impl ReportRenderer for HistogramRenderer {
    fn render(&self, img: &Image, _title: &str) -> Result<Option<Image>> {
        let h = img.height();
        let w = img.width();

        let canvas_h = h.max(HIST_PANEL_HEIGHT + 2 * PANEL_MARGIN);
        let canvas_w = w + HIST_PANEL_WIDTH + 3 * PANEL_MARGIN;
        let mut canvas = Array3::<u8>::from_elem((canvas_h, canvas_w, 3), BACKGROUND);

        // Source image, top-left with a margin.
        for row in 0..h {
            for col in 0..w {
                for ch in 0..3 {
                    let src_ch = if img.is_color() { ch } else { 0 };
                    canvas[[row + PANEL_MARGIN.min(canvas_h - h), col + PANEL_MARGIN, ch]] =
                        img.data()[[row, col, src_ch]];
                }
            }
        }

        // Histogram bars, scaled to the tallest bin.
        let hist = luma_histogram(img);
        let peak = hist.iter().copied().max().unwrap_or(1).max(1);
        let x0 = w + 2 * PANEL_MARGIN;
        let y0 = PANEL_MARGIN;
        for (bin, &count) in hist.iter().enumerate() {
            let bar = (count as f64 / peak as f64 * HIST_PANEL_HEIGHT as f64).round() as usize;
            for dy in 0..bar {
                let row = y0 + HIST_PANEL_HEIGHT - 1 - dy;
                for (ch, &color) in BAR_COLOR.iter().enumerate() {
                    canvas[[row, x0 + bin, ch]] = color;
                }
            }
        }

        Ok(Some(Image::new(canvas)?))
    }
}

//! Quantitative image-quality metrics.
//!
//! Numeric edge cases (constant images, zero mean) are part of normal
//! control flow here: each has a defined fallback, never an error.

pub mod stats;

use serde::Serialize;

use crate::consts::{DARK_MEAN_THRESHOLD, ENTROPY_EPSILON, LEVELS};
use crate::image::Image;

/// 256-bin histogram of the luma plane.
pub fn luma_histogram(img: &Image) -> [u64; LEVELS] {
    let mut hist = [0u64; LEVELS];
    for &v in img.luma().iter() {
        hist[v as usize] += 1;
    }
    hist
}

/// Signal-to-noise ratio in dB: `20 * log10(mean / std)` of the luma plane.
///
/// Constant non-black images have no noise and score +inf; fully black
/// images score 0.
pub fn snr_db(img: &Image) -> f64 {
    let luma = img.luma();
    let n = luma.len() as f64;
    let mean = luma.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = luma
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    let std = var.sqrt();

    if std == 0.0 {
        return if mean > 0.0 { f64::INFINITY } else { 0.0 };
    }
    if mean <= 0.0 {
        return 0.0;
    }
    20.0 * (mean / std).log10()
}

/// Shannon entropy of the 256-bin luma histogram:
/// `-sum(p * log2(p + eps))`, epsilon guarding log(0).
pub fn entropy(img: &Image) -> f64 {
    let hist = luma_histogram(img);
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let mut h = 0.0f64;
    for &count in hist.iter() {
        let p = count as f64 / total as f64;
        h -= p * (p + ENTROPY_EPSILON).log2();
    }
    h
}

/// Per-image-state metrics recorded once for the original and once per
/// candidate result. Mean/std/min/max run over every stored sample.
#[derive(Clone, Debug, Serialize)]
pub struct MetricsSnapshot {
    pub snr_db: f64,
    pub entropy: f64,
    pub mean: f64,
    pub std: f64,
    pub min: u8,
    pub max: u8,
    pub contrast_ratio: f64,
    pub histogram_range: [u8; 2],
}

impl MetricsSnapshot {
    pub fn measure(img: &Image) -> Self {
        let n = img.sample_count() as f64;
        let mean = img.data().iter().map(|&v| v as f64).sum::<f64>() / n;
        let var = img
            .data()
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let min = img.data().iter().copied().min().unwrap_or(0);
        let max = img.data().iter().copied().max().unwrap_or(0);
        let contrast_ratio = if max != min {
            (max - min) as f64 / 255.0
        } else {
            0.0
        };

        Self {
            snr_db: snr_db(img),
            entropy: entropy(img),
            mean,
            std: var.sqrt(),
            min,
            max,
            contrast_ratio,
            histogram_range: [min, max],
        }
    }
}

/// Headline quality diagnosis for one image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosisVerdict {
    #[serde(rename = "Low Contrast/Dark")]
    LowContrastDark,
    #[serde(rename = "OK")]
    Ok,
}

impl std::fmt::Display for DiagnosisVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowContrastDark => write!(f, "Low Contrast/Dark"),
            Self::Ok => write!(f, "OK"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Diagnosis {
    pub snr_db: f64,
    pub entropy: f64,
    pub mean_intensity: f64,
    pub dynamic_range_usage_pct: f64,
    pub dark_pixels_pct: f64,
    pub outliers_pct: f64,
    pub verdict: DiagnosisVerdict,
}

/// Diagnose quality issues: SNR, entropy, distribution shape, outliers.
/// Images with mean luma below 50 are flagged as low contrast / dark.
pub fn diagnose(img: &Image) -> Diagnosis {
    let s = stats::advanced_statistics(img);
    let outliers = stats::detect_outliers_iqr(img, crate::consts::DEFAULT_IQR_K);

    Diagnosis {
        snr_db: round_to(snr_db(img), 2),
        entropy: round_to(entropy(img), 3),
        mean_intensity: round_to(s.mean, 1),
        dynamic_range_usage_pct: round_to(s.dynamic_usage_pct, 1),
        dark_pixels_pct: round_to(s.dark_percentage, 1),
        outliers_pct: round_to(outliers.outlier_percentage, 2),
        verdict: if s.mean < DARK_MEAN_THRESHOLD {
            DiagnosisVerdict::LowContrastDark
        } else {
            DiagnosisVerdict::Ok
        },
    }
}

fn round_to(v: f64, digits: u32) -> f64 {
    if !v.is_finite() {
        return v;
    }
    let factor = 10f64.powi(digits as i32);
    (v * factor).round() / factor
}

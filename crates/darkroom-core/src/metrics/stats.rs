//! Distribution statistics and robust outlier detection on the luma plane.

use serde::Serialize;

use crate::image::Image;

/// Percentile of a sorted sample with linear interpolation between ranks.
/// `q` is in [0, 100].
pub fn percentile_of_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = q.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

fn sorted_luma(img: &Image) -> Vec<f64> {
    let mut data: Vec<f64> = img.luma().iter().map(|&v| v as f64).collect();
    data.sort_by(|a, b| a.total_cmp(b));
    data
}

/// Comprehensive distribution statistics for analysis and reporting.
#[derive(Clone, Debug, Serialize)]
pub struct ImageStats {
    pub mean: f64,
    pub std: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub iqr: f64,
    pub dynamic_range: f64,
    /// Fraction of the possible [0, 255] range actually used, in percent.
    pub dynamic_usage_pct: f64,
    /// Third standardized moment; 0 for constant images.
    pub skewness: f64,
    /// Fraction of pixels below 128, in percent.
    pub dark_percentage: f64,
}

pub fn advanced_statistics(img: &Image) -> ImageStats {
    let data = sorted_luma(img);
    let n = data.len() as f64;

    let mean = data.iter().sum::<f64>() / n;
    let var = data
        .iter()
        .map(|&v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    let std = var.sqrt();

    let p5 = percentile_of_sorted(&data, 5.0);
    let p25 = percentile_of_sorted(&data, 25.0);
    let p50 = percentile_of_sorted(&data, 50.0);
    let p75 = percentile_of_sorted(&data, 75.0);
    let p95 = percentile_of_sorted(&data, 95.0);

    let min = data[0];
    let max = data[data.len() - 1];
    let dynamic_range = max - min;

    let skewness = if std > 0.0 {
        data.iter()
            .map(|&v| {
                let z = (v - mean) / std;
                z * z * z
            })
            .sum::<f64>()
            / n
    } else {
        0.0
    };

    let dark_count = data.iter().filter(|&&v| v < 128.0).count() as f64;

    ImageStats {
        mean,
        std,
        median: p50,
        min,
        max,
        p5,
        p25,
        p50,
        p75,
        p95,
        iqr: p75 - p25,
        dynamic_range,
        dynamic_usage_pct: dynamic_range / 255.0 * 100.0,
        skewness,
        dark_percentage: dark_count / n * 100.0,
    }
}

/// IQR outlier report: values outside `[Q1 - k*IQR, Q3 + k*IQR]`.
#[derive(Clone, Debug, Serialize)]
pub struct OutlierReport {
    pub q25: f64,
    pub q75: f64,
    pub iqr: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub outliers_low: usize,
    pub outliers_high: usize,
    pub total_outliers: usize,
    pub outlier_percentage: f64,
}

/// Detect outlier pixels with the IQR rule. `k` = 1.5 flags mild
/// outliers, 3.0 only extreme ones.
pub fn detect_outliers_iqr(img: &Image, k: f64) -> OutlierReport {
    let data = sorted_luma(img);
    let q25 = percentile_of_sorted(&data, 25.0);
    let q75 = percentile_of_sorted(&data, 75.0);
    let iqr = q75 - q25;
    let lower_bound = q25 - k * iqr;
    let upper_bound = q75 + k * iqr;

    let outliers_low = data.iter().filter(|&&v| v < lower_bound).count();
    let outliers_high = data.iter().filter(|&&v| v > upper_bound).count();
    let total_outliers = outliers_low + outliers_high;

    OutlierReport {
        q25,
        q75,
        iqr,
        lower_bound,
        upper_bound,
        outliers_low,
        outliers_high,
        total_outliers,
        outlier_percentage: total_outliers as f64 / data.len() as f64 * 100.0,
    }
}

/// Optimal histogram bin count by the Freedman-Diaconis rule:
/// width = 2*IQR / cbrt(n). Constant images fall back to 256 bins.
/// Returns (bin_count, bin_width).
pub fn freedman_diaconis_bins(img: &Image) -> (usize, f64) {
    let data = sorted_luma(img);
    let n = data.len() as f64;

    let q25 = percentile_of_sorted(&data, 25.0);
    let q75 = percentile_of_sorted(&data, 75.0);
    let iqr = q75 - q25;
    if iqr == 0.0 {
        return (256, 1.0);
    }

    let bin_width = 2.0 * iqr / n.cbrt();
    let range = data[data.len() - 1] - data[0];
    let bins = ((range / bin_width).ceil() as usize).clamp(1, 256);
    (bins, bin_width)
}

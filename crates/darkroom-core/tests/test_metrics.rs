use approx::assert_abs_diff_eq;
use ndarray::Array3;

use darkroom_core::image::Image;
use darkroom_core::metrics::stats::{
    advanced_statistics, detect_outliers_iqr, freedman_diaconis_bins, percentile_of_sorted,
};
use darkroom_core::metrics::{
    diagnose, entropy, luma_histogram, snr_db, DiagnosisVerdict, MetricsSnapshot,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_ramp(h: usize, w: usize) -> Image {
    let data = Array3::from_shape_fn((h, w, 1), |(row, col, _)| ((row * w + col) % 256) as u8);
    Image::new(data).unwrap()
}

// ---------------------------------------------------------------------------
// snr_db
// ---------------------------------------------------------------------------

#[test]
fn test_snr_constant_nonblack_is_infinite() {
    let img = Image::gray_filled(8, 8, 128);
    assert_eq!(snr_db(&img), f64::INFINITY);
}

#[test]
fn test_snr_black_image_is_zero() {
    let img = Image::gray_filled(8, 8, 0);
    assert_eq!(snr_db(&img), 0.0);
}

#[test]
fn test_snr_finite_for_varied_image() {
    let img = make_ramp(16, 16);
    let snr = snr_db(&img);
    assert!(snr.is_finite());
    assert!(snr > 0.0, "a bright ramp has mean > std, got {snr}");
}

#[test]
fn test_snr_uses_luma_for_color() {
    // A color image constant in luma scores infinite even though the
    // channels differ.
    let img = Image::rgb_filled(8, 8, [100, 100, 100]);
    assert_eq!(snr_db(&img), f64::INFINITY);
}

// ---------------------------------------------------------------------------
// entropy / luma_histogram
// ---------------------------------------------------------------------------

#[test]
fn test_entropy_constant_is_near_zero() {
    let img = Image::gray_filled(16, 16, 99);
    assert!(entropy(&img).abs() < 1e-5);
}

#[test]
fn test_entropy_uniform_ramp_is_eight_bits() {
    // One pixel per intensity level: maximal entropy for 256 bins.
    let img = make_ramp(16, 16);
    assert_abs_diff_eq!(entropy(&img), 8.0, epsilon = 0.01);
}

#[test]
fn test_entropy_ordering() {
    let flat = Image::gray_filled(16, 16, 50);
    let ramp = make_ramp(16, 16);
    assert!(entropy(&ramp) > entropy(&flat));
}

#[test]
fn test_luma_histogram_counts_every_pixel() {
    let img = make_ramp(16, 16);
    let hist = luma_histogram(&img);
    assert_eq!(hist.iter().sum::<u64>(), 256);
    for &count in hist.iter() {
        assert_eq!(count, 1);
    }
}

// ---------------------------------------------------------------------------
// MetricsSnapshot
// ---------------------------------------------------------------------------

#[test]
fn test_snapshot_of_ramp() {
    let img = make_ramp(16, 16);
    let snap = MetricsSnapshot::measure(&img);
    assert_eq!(snap.min, 0);
    assert_eq!(snap.max, 255);
    assert_eq!(snap.histogram_range, [0, 255]);
    assert_abs_diff_eq!(snap.mean, 127.5, epsilon = 1e-9);
    assert_abs_diff_eq!(snap.contrast_ratio, 1.0, epsilon = 1e-9);
}

#[test]
fn test_snapshot_of_constant() {
    let img = Image::gray_filled(8, 8, 60);
    let snap = MetricsSnapshot::measure(&img);
    assert_eq!(snap.std, 0.0);
    assert_eq!(snap.contrast_ratio, 0.0);
    assert_eq!(snap.histogram_range, [60, 60]);
}

// ---------------------------------------------------------------------------
// diagnose
// ---------------------------------------------------------------------------

#[test]
fn test_diagnose_flags_dark_image() {
    let img = Image::gray_filled(32, 32, 20);
    let d = diagnose(&img);
    assert_eq!(d.verdict, DiagnosisVerdict::LowContrastDark);
    assert_eq!(d.mean_intensity, 20.0);
    assert_eq!(d.dark_pixels_pct, 100.0);
}

#[test]
fn test_diagnose_accepts_bright_image() {
    let img = Image::gray_filled(32, 32, 200);
    let d = diagnose(&img);
    assert_eq!(d.verdict, DiagnosisVerdict::Ok);
    assert_eq!(d.dark_pixels_pct, 0.0);
}

#[test]
fn test_diagnose_rounds_but_keeps_infinities() {
    let img = Image::gray_filled(8, 8, 128);
    let d = diagnose(&img);
    assert_eq!(d.snr_db, f64::INFINITY);
}

// ---------------------------------------------------------------------------
// percentile_of_sorted
// ---------------------------------------------------------------------------

#[test]
fn test_percentile_endpoints_and_median() {
    let data = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(percentile_of_sorted(&data, 0.0), 1.0);
    assert_eq!(percentile_of_sorted(&data, 50.0), 3.0);
    assert_eq!(percentile_of_sorted(&data, 100.0), 5.0);
}

#[test]
fn test_percentile_interpolates() {
    let data = [0.0, 10.0];
    assert!((percentile_of_sorted(&data, 25.0) - 2.5).abs() < 1e-9);
}

#[test]
fn test_percentile_degenerate_inputs() {
    assert_eq!(percentile_of_sorted(&[], 50.0), 0.0);
    assert_eq!(percentile_of_sorted(&[7.0], 90.0), 7.0);
}

// ---------------------------------------------------------------------------
// advanced_statistics / detect_outliers_iqr / freedman_diaconis_bins
// ---------------------------------------------------------------------------

#[test]
fn test_advanced_statistics_on_ramp() {
    let img = make_ramp(16, 16);
    let s = advanced_statistics(&img);
    assert_abs_diff_eq!(s.mean, 127.5, epsilon = 1e-9);
    assert_eq!(s.min, 0.0);
    assert_eq!(s.max, 255.0);
    assert_eq!(s.dynamic_range, 255.0);
    assert_abs_diff_eq!(s.dynamic_usage_pct, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(s.median, 127.5, epsilon = 1e-9);
    assert!(s.skewness.abs() < 1e-9, "a symmetric ramp has no skew");
    assert_eq!(s.dark_percentage, 50.0);
}

#[test]
fn test_advanced_statistics_constant_has_zero_skew() {
    let img = Image::gray_filled(8, 8, 100);
    let s = advanced_statistics(&img);
    assert_eq!(s.std, 0.0);
    assert_eq!(s.skewness, 0.0);
    assert_eq!(s.dynamic_usage_pct, 0.0);
}

#[test]
fn test_outliers_none_on_constant() {
    let img = Image::gray_filled(16, 16, 80);
    let report = detect_outliers_iqr(&img, 1.5);
    assert_eq!(report.total_outliers, 0);
    assert_eq!(report.outlier_percentage, 0.0);
}

#[test]
fn test_outliers_detects_extreme_pixels() {
    // Mostly constant with a handful of extreme samples: IQR is 0, so
    // anything off the plateau is an outlier.
    let mut data = Array3::from_elem((16, 16, 1), 100u8);
    data[[0, 0, 0]] = 255;
    data[[0, 1, 0]] = 0;
    let img = Image::new(data).unwrap();
    let report = detect_outliers_iqr(&img, 1.5);
    assert_eq!(report.outliers_high, 1);
    assert_eq!(report.outliers_low, 1);
    assert_eq!(report.total_outliers, 2);
}

#[test]
fn test_fd_bins_constant_falls_back() {
    let img = Image::gray_filled(16, 16, 42);
    let (bins, width) = freedman_diaconis_bins(&img);
    assert_eq!(bins, 256);
    assert_eq!(width, 1.0);
}

#[test]
fn test_fd_bins_ramp_is_bounded() {
    let img = make_ramp(16, 16);
    let (bins, width) = freedman_diaconis_bins(&img);
    assert!(bins >= 1 && bins <= 256);
    assert!(width > 0.0);
}

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Number of intensity levels for 8-bit samples.
pub const LEVELS: usize = 256;

/// Maximum sample value.
pub const MAX_SAMPLE: f32 = 255.0;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Epsilon added inside log2 when computing histogram entropy.
pub const ENTROPY_EPSILON: f64 = 1e-7;

/// Default IQR multiplier for outlier bounds (1.5 = mild, 3.0 = extreme).
pub const DEFAULT_IQR_K: f64 = 1.5;

/// Mean intensity below which an image is diagnosed as low-contrast/dark.
pub const DARK_MEAN_THRESHOLD: f64 = 50.0;

/// SNR improvement (dB) above which a strategy is rated Recommended.
pub const RECOMMENDED_DELTA_SNR: f64 = 5.0;

/// SNR improvement (dB) above which a strategy is rated Good.
pub const GOOD_DELTA_SNR: f64 = 2.0;

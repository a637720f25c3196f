//! Step executor: the single point where an operation name plus a loose
//! parameter map becomes a typed, validated operator call.
//!
//! New operators are registered here and nowhere else, so single-step,
//! pipeline, and experiment execution all agree on names and defaults.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DarkroomError, Result};
use crate::image::Image;
use crate::io;
use crate::ops::arith::{self, ArithOp};
use crate::ops::{enhance, filter, noise, point, simulate};

/// Wire shape of one step: `{op: <name>, params: <mapping>}`.
/// Unknown param keys are ignored; missing keys take documented defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OperationSpec {
    pub op: String,
    #[serde(default)]
    pub params: Value,
}

impl OperationSpec {
    pub fn new(op: impl Into<String>, params: Value) -> Self {
        Self {
            op: op.into(),
            params,
        }
    }

    /// A step with all-default parameters.
    pub fn bare(op: impl Into<String>) -> Self {
        Self::new(op, Value::Null)
    }
}

/// Parse a wire-format step list: a JSON array of `{op, params}` objects.
///
/// Malformed JSON is an invalid request. Unknown names and bad parameter
/// types inside a well-formed list surface later, from [`Operation::parse`].
pub fn parse_step_list(json: &str) -> Result<Vec<OperationSpec>> {
    serde_json::from_str(json).map_err(|e| DarkroomError::InvalidRequest(e.to_string()))
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GammaParams {
    pub gamma: f32,
}

impl Default for GammaParams {
    fn default() -> Self {
        Self { gamma: 1.0 }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ClaheParams {
    pub clip_limit: f32,
    pub tile_grid_size: usize,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tile_grid_size: 8,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LogParams {
    pub c: f32,
}

impl Default for LogParams {
    fn default() -> Self {
        Self { c: 1.0 }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MedianParams {
    pub kernel_size: i64,
}

impl Default for MedianParams {
    fn default() -> Self {
        Self { kernel_size: 3 }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GaussianParams {
    pub kernel_size: i64,
    /// 0 = derive sigma from the kernel size.
    pub sigma: f32,
}

impl Default for GaussianParams {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            sigma: 0.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct UnsharpParams {
    pub kernel_size: i64,
    pub sigma: f32,
    pub strength: f32,
}

impl Default for UnsharpParams {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            sigma: 1.0,
            strength: 1.5,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StretchParams {
    pub low_percentile: f64,
    pub high_percentile: f64,
}

impl Default for StretchParams {
    fn default() -> Self {
        Self {
            low_percentile: 2.0,
            high_percentile: 98.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct NoiseGaussianParams {
    pub mean: f32,
    pub sigma: f32,
}

impl Default for NoiseGaussianParams {
    fn default() -> Self {
        Self {
            mean: 0.0,
            sigma: 25.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct NoiseSaltPepperParams {
    pub prob: f64,
}

impl Default for NoiseSaltPepperParams {
    fn default() -> Self {
        Self { prob: 0.05 }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DownsamplingParams {
    pub factor: f32,
}

impl Default for DownsamplingParams {
    fn default() -> Self {
        Self { factor: 0.5 }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct QuantizationParams {
    pub bits: u32,
}

impl Default for QuantizationParams {
    fn default() -> Self {
        Self { bits: 3 }
    }
}

/// Raw arithmetic params as they arrive on the wire.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct ArithmeticRawParams {
    operation: Option<String>,
    image2_path: Option<PathBuf>,
}

/// Validated arithmetic params: a known sub-operation and a second image.
#[derive(Clone, Debug)]
pub struct ArithmeticParams {
    pub operation: ArithOp,
    pub image2_path: PathBuf,
}

/// Closed set of operations. Parsing an [`OperationSpec`] into this enum
/// is the validation boundary; execution is an exhaustive match below.
#[derive(Clone, Debug)]
pub enum Operation {
    Gamma(GammaParams),
    Clahe(ClaheParams),
    Equalize,
    Log(LogParams),
    Median(MedianParams),
    Gaussian(GaussianParams),
    Unsharp(UnsharpParams),
    ContrastStretching(StretchParams),
    Negative,
    NoiseGaussian(NoiseGaussianParams),
    NoiseSaltPepper(NoiseSaltPepperParams),
    SimDownsampling(DownsamplingParams),
    SimQuantization(QuantizationParams),
    Arithmetic(ArithmeticParams),
}

fn typed<T: DeserializeOwned>(op: &str, params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|e| DarkroomError::InvalidParams {
        op: op.to_string(),
        reason: e.to_string(),
    })
}

impl Operation {
    /// Resolve an operation name and parameter map into a typed operation.
    pub fn parse(spec: &OperationSpec) -> Result<Self> {
        let params = if spec.params.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            spec.params.clone()
        };
        let op = spec.op.as_str();

        match op {
            "gamma" => Ok(Self::Gamma(typed(op, params)?)),
            "clahe" => Ok(Self::Clahe(typed(op, params)?)),
            "equalize" => Ok(Self::Equalize),
            "log" => Ok(Self::Log(typed(op, params)?)),
            "median" => Ok(Self::Median(typed(op, params)?)),
            "gaussian" => Ok(Self::Gaussian(typed(op, params)?)),
            "unsharp" => Ok(Self::Unsharp(typed(op, params)?)),
            "contrast_stretching" => Ok(Self::ContrastStretching(typed(op, params)?)),
            "negative" => Ok(Self::Negative),
            "noise_gaussian" => Ok(Self::NoiseGaussian(typed(op, params)?)),
            "noise_salt_pepper" => Ok(Self::NoiseSaltPepper(typed(op, params)?)),
            "sim_downsampling" => Ok(Self::SimDownsampling(typed(op, params)?)),
            "sim_quantization" => Ok(Self::SimQuantization(typed(op, params)?)),
            "arithmetic" => {
                let raw: ArithmeticRawParams = typed(op, params)?;
                let operation = ArithOp::parse(raw.operation.as_deref().unwrap_or("add"))?;
                let image2_path = raw.image2_path.ok_or_else(|| {
                    DarkroomError::MissingOperand(
                        "arithmetic requires an 'image2_path' parameter".to_string(),
                    )
                })?;
                Ok(Self::Arithmetic(ArithmeticParams {
                    operation,
                    image2_path,
                }))
            }
            other => Err(DarkroomError::UnknownOperation(other.to_string())),
        }
    }

    /// Stable operation name, matching the wire contract.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gamma(_) => "gamma",
            Self::Clahe(_) => "clahe",
            Self::Equalize => "equalize",
            Self::Log(_) => "log",
            Self::Median(_) => "median",
            Self::Gaussian(_) => "gaussian",
            Self::Unsharp(_) => "unsharp",
            Self::ContrastStretching(_) => "contrast_stretching",
            Self::Negative => "negative",
            Self::NoiseGaussian(_) => "noise_gaussian",
            Self::NoiseSaltPepper(_) => "noise_salt_pepper",
            Self::SimDownsampling(_) => "sim_downsampling",
            Self::SimQuantization(_) => "sim_quantization",
            Self::Arithmetic(_) => "arithmetic",
        }
    }

    /// Artifact category this operation files under.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Median(_) | Self::Gaussian(_) => "Restoration",
            Self::Gamma(_)
            | Self::Clahe(_)
            | Self::Equalize
            | Self::Log(_)
            | Self::Unsharp(_)
            | Self::ContrastStretching(_)
            | Self::Negative => "Enhancement",
            Self::NoiseGaussian(_)
            | Self::NoiseSaltPepper(_)
            | Self::SimDownsampling(_)
            | Self::SimQuantization(_) => "Simulation",
            Self::Arithmetic(_) => "Arithmetic",
        }
    }

    /// Meaningful filename suffix describing the parameters in play.
    pub fn suffix(&self) -> String {
        match self {
            Self::Gamma(p) => format!("gamma{}", p.gamma),
            Self::Clahe(p) => format!("clahe{}", p.clip_limit),
            Self::Equalize => "equalize".to_string(),
            Self::Log(_) => "log".to_string(),
            Self::Median(p) => format!("median{}", p.kernel_size),
            Self::Gaussian(p) => format!("gauss{}", p.kernel_size),
            Self::Unsharp(p) => format!("unsharp{}", p.strength),
            Self::ContrastStretching(p) => {
                format!("stretch{}_{}", p.low_percentile, p.high_percentile)
            }
            Self::Negative => "negative".to_string(),
            Self::NoiseGaussian(p) => format!("gaussian_sigma{}", p.sigma),
            Self::NoiseSaltPepper(p) => format!("salt_pepper_prob{}", p.prob),
            Self::SimDownsampling(p) => format!("downsampling_{}", p.factor),
            Self::SimQuantization(p) => format!("quantization_{}bits", p.bits),
            Self::Arithmetic(p) => p.operation.name().to_string(),
        }
    }
}

/// Per-run execution state: the randomness source feeding the noise
/// simulators. Seed it for reproducible runs.
pub struct ExecContext {
    rng: StdRng,
}

impl ExecContext {
    /// Entropy-seeded context for normal use.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic context for tests and reproducible experiments.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Mutable access to the run's randomness source.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Default for ExecContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a single parsed operation to an in-memory image.
pub fn execute_step(img: &Image, op: &Operation, ctx: &mut ExecContext) -> Result<Image> {
    match op {
        Operation::Gamma(p) => Ok(point::gamma(img, p.gamma)),
        Operation::Clahe(p) => Ok(enhance::clahe(img, p.clip_limit, p.tile_grid_size)),
        Operation::Equalize => Ok(enhance::equalize(img)),
        Operation::Log(p) => Ok(point::log_transform(img, p.c)),
        Operation::Median(p) => Ok(filter::median_filter(img, p.kernel_size)),
        Operation::Gaussian(p) => Ok(filter::gaussian_filter(img, p.kernel_size, p.sigma)),
        Operation::Unsharp(p) => Ok(filter::unsharp_mask(img, p.kernel_size, p.sigma, p.strength)),
        Operation::ContrastStretching(p) => Ok(enhance::contrast_stretching(
            img,
            p.low_percentile,
            p.high_percentile,
        )),
        Operation::Negative => Ok(point::negative(img)),
        Operation::NoiseGaussian(p) => noise::gaussian_noise(img, p.mean, p.sigma, &mut ctx.rng),
        Operation::NoiseSaltPepper(p) => Ok(noise::salt_pepper_noise(img, p.prob, &mut ctx.rng)),
        Operation::SimDownsampling(p) => Ok(simulate::downsample(img, p.factor)),
        Operation::SimQuantization(p) => Ok(simulate::quantize(img, p.bits)),
        Operation::Arithmetic(p) => {
            let second = io::load_image(&p.image2_path).map_err(|e| {
                DarkroomError::MissingOperand(format!(
                    "cannot load second image '{}': {e}",
                    p.image2_path.display()
                ))
            })?;
            arith::arithmetic(img, &second, p.operation)
        }
    }
}

/// Parse and execute one wire-format step.
pub fn execute_spec(img: &Image, spec: &OperationSpec, ctx: &mut ExecContext) -> Result<Image> {
    let op = Operation::parse(spec)?;
    execute_step(img, &op, ctx)
}

//! Experiment runner: apply competing strategies to one image, score
//! each against the original, and rank by measured SNR improvement.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::artifacts::persist_with_report;
use crate::consts::{GOOD_DELTA_SNR, RECOMMENDED_DELTA_SNR};
use crate::error::{DarkroomError, Result};
use crate::image::Image;
use crate::metrics::MetricsSnapshot;
use crate::pipeline::PipelineContext;
use crate::step::{execute_spec, OperationSpec};

/// A named strategy under test.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub steps: Vec<OperationSpec>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_topic")]
    pub topic: String,
}

fn default_category() -> String {
    "Custom".to_string()
}

fn default_topic() -> String {
    "N/A".to_string()
}

impl Candidate {
    pub fn new(name: impl Into<String>, steps: Vec<OperationSpec>) -> Self {
        Self {
            name: name.into(),
            steps,
            category: default_category(),
            topic: default_topic(),
        }
    }

    fn battery(name: &str, steps: Vec<OperationSpec>, category: &str, topic: &str) -> Self {
        Self {
            name: name.to_string(),
            steps,
            category: category.to_string(),
            topic: topic.to_string(),
        }
    }
}

/// Parse a wire-format candidate list: a JSON array of
/// `{name, steps[, category, topic]}` objects.
pub fn parse_candidate_list(json: &str) -> Result<Vec<Candidate>> {
    serde_json::from_str(json).map_err(|e| DarkroomError::InvalidRequest(e.to_string()))
}

/// Categorical judgment of a candidate's improvement over baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Recommended,
    Good,
    Marginal,
}

impl Verdict {
    pub fn classify(delta_snr: f64) -> Self {
        if delta_snr > RECOMMENDED_DELTA_SNR {
            Self::Recommended
        } else if delta_snr > GOOD_DELTA_SNR {
            Self::Good
        } else {
            Self::Marginal
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recommended => write!(f, "Recommended"),
            Self::Good => write!(f, "Good"),
            Self::Marginal => write!(f, "Marginal"),
        }
    }
}

/// Measured outcome of one candidate.
#[derive(Clone, Debug, Serialize)]
pub struct CandidateOutcome {
    pub strategy: String,
    pub category: String,
    pub topic: String,
    pub steps_applied: Vec<String>,
    pub metrics: MetricsSnapshot,
    pub delta_snr: f64,
    pub verdict: Verdict,
    pub image_artifact: PathBuf,
    pub report_artifact: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExperimentSummary {
    pub best_strategy: Option<String>,
    pub best_delta_snr: f64,
    pub total_strategies_tested: usize,
    pub recommended_strategies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExperimentResult {
    pub experiment_dir: PathBuf,
    pub original: MetricsSnapshot,
    /// Sorted descending by `delta_snr`; ties keep candidate order.
    pub results: Vec<CandidateOutcome>,
    pub summary: ExperimentSummary,
}

/// The fixed default battery: baseline plus one-step and compound
/// strategies spanning enhancement and restoration.
pub fn default_battery() -> Vec<Candidate> {
    vec![
        Candidate::battery("Original", vec![], "Baseline", "N/A"),
        Candidate::battery(
            "Gamma_0.5",
            vec![OperationSpec::new("gamma", json!({"gamma": 0.5}))],
            "Enhancement",
            "Point transforms",
        ),
        Candidate::battery(
            "CLAHE_Clip2.0",
            vec![OperationSpec::new("clahe", json!({"clip_limit": 2.0}))],
            "Enhancement",
            "Adaptive equalization",
        ),
        Candidate::battery(
            "CLAHE_Clip4.0",
            vec![OperationSpec::new("clahe", json!({"clip_limit": 4.0}))],
            "Enhancement",
            "Adaptive equalization",
        ),
        Candidate::battery(
            "Log_Transform",
            vec![OperationSpec::bare("log")],
            "Enhancement",
            "Point transforms",
        ),
        Candidate::battery(
            "Equalization",
            vec![OperationSpec::bare("equalize")],
            "Enhancement",
            "Histogram equalization",
        ),
        Candidate::battery(
            "Median_K3",
            vec![OperationSpec::new("median", json!({"kernel_size": 3}))],
            "Restoration",
            "Order-statistic filtering",
        ),
        Candidate::battery(
            "Median_K5",
            vec![OperationSpec::new("median", json!({"kernel_size": 5}))],
            "Restoration",
            "Order-statistic filtering",
        ),
        Candidate::battery(
            "Denoise_Enhance",
            vec![
                OperationSpec::new("median", json!({"kernel_size": 3})),
                OperationSpec::new("gamma", json!({"gamma": 0.5})),
            ],
            "Pipeline",
            "Restoration + enhancement",
        ),
    ]
}

/// Run every candidate against a fresh copy of `img`, rank by SNR delta.
///
/// `candidates = None` uses the default battery. A candidate whose steps
/// fail is logged and excluded; the experiment itself only fails on
/// artifact-store I/O errors.
pub fn run_experiment(
    img: &Image,
    candidates: Option<Vec<Candidate>>,
    stem: &str,
    ctx: &mut PipelineContext,
) -> Result<ExperimentResult> {
    let experiment_dir = ctx.store.experiment_dir(stem);
    std::fs::create_dir_all(&experiment_dir)?;

    let original = MetricsSnapshot::measure(img);
    let candidates = candidates.unwrap_or_else(default_battery);
    info!(total = candidates.len(), "running experiment");

    let mut results: Vec<CandidateOutcome> = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        match run_candidate(img, candidate, &experiment_dir, &original, ctx) {
            Ok(outcome) => results.push(outcome),
            Err(e) => {
                warn!(candidate = %candidate.name, error = %e, "candidate failed; excluded from results");
            }
        }
    }

    // Stable sort: equal deltas keep original candidate order.
    results.sort_by(|a, b| b.delta_snr.total_cmp(&a.delta_snr));

    let best = results.first();
    let summary = ExperimentSummary {
        best_strategy: best.map(|r| r.strategy.clone()),
        best_delta_snr: best.map(|r| r.delta_snr).unwrap_or(0.0),
        total_strategies_tested: results.len(),
        recommended_strategies: results
            .iter()
            .filter(|r| r.verdict == Verdict::Recommended)
            .map(|r| r.strategy.clone())
            .collect(),
    };

    Ok(ExperimentResult {
        experiment_dir,
        original,
        results,
        summary,
    })
}

fn run_candidate(
    img: &Image,
    candidate: &Candidate,
    experiment_dir: &std::path::Path,
    original: &MetricsSnapshot,
    ctx: &mut PipelineContext,
) -> Result<CandidateOutcome> {
    // Each candidate starts from a fresh copy of the source image.
    let mut current = img.clone();
    let mut steps_applied = Vec::with_capacity(candidate.steps.len());
    for spec in &candidate.steps {
        current = execute_spec(&current, spec, &mut ctx.exec)?;
        steps_applied.push(spec.op.clone());
    }

    let metrics = MetricsSnapshot::measure(&current);
    let delta_snr = metrics.snr_db - original.snr_db;
    let verdict = Verdict::classify(delta_snr);

    let safe_name = candidate.name.replace(' ', "_");
    let image_artifact = experiment_dir.join(format!("{safe_name}.png"));
    let report_artifact =
        persist_with_report(&current, &image_artifact, &candidate.name, ctx.renderer)?;

    Ok(CandidateOutcome {
        strategy: candidate.name.clone(),
        category: candidate.category.clone(),
        topic: candidate.topic.clone(),
        steps_applied,
        metrics,
        delta_snr,
        verdict,
        image_artifact,
        report_artifact,
    })
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use darkroom_core::experiment::{parse_candidate_list, run_experiment, Candidate};
use darkroom_core::io::load_image;
use darkroom_core::pipeline::PipelineContext;

use crate::summary;

use super::{read_json_arg, renderer_for, stem_of};

#[derive(Args)]
pub struct ExperimentArgs {
    /// Input image file
    pub file: PathBuf,

    /// Candidates as a JSON array of {name, steps[, category, topic]},
    /// inline or @file. Omit to run the default battery.
    #[arg(long)]
    pub candidates: Option<String>,

    /// RNG seed for the noise simulators
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the per-candidate report artifacts
    #[arg(long)]
    pub no_reports: bool,

    /// Print the full result as JSON instead of a formatted summary
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &ExperimentArgs, output_root: &Path) -> Result<()> {
    let img = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let candidates: Option<Vec<Candidate>> = match &args.candidates {
        Some(arg) => {
            let text = read_json_arg(arg)?;
            Some(parse_candidate_list(&text).context("Expected [{\"name\": ..., \"steps\": [...]}]")?)
        }
        None => None,
    };

    let renderer = renderer_for(args.no_reports);
    let mut ctx = match args.seed {
        Some(seed) => PipelineContext::seeded(output_root, renderer.as_ref(), seed),
        None => PipelineContext::new(output_root, renderer.as_ref()),
    };

    let result = run_experiment(&img, candidates, &stem_of(&args.file), &mut ctx)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        summary::print_experiment_summary(&result);
    }
    Ok(())
}

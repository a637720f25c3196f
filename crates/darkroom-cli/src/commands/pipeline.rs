use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use darkroom_core::io::load_image;
use darkroom_core::pipeline::{apply_pipeline, PipelineContext};

use super::{parse_steps, renderer_for, stem_of};

#[derive(Args)]
pub struct PipelineArgs {
    /// Input image file
    pub file: PathBuf,

    /// Steps as a JSON array of {op, params} objects, inline or @file
    #[arg(long)]
    pub steps: String,

    /// RNG seed for the noise simulators
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the per-step report artifacts
    #[arg(long)]
    pub no_reports: bool,
}

pub fn run(args: &PipelineArgs, output_root: &Path) -> Result<()> {
    let img = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let steps = parse_steps(&args.steps)?;

    let renderer = renderer_for(args.no_reports);
    let mut ctx = match args.seed {
        Some(seed) => PipelineContext::seeded(output_root, renderer.as_ref(), seed),
        None => PipelineContext::new(output_root, renderer.as_ref()),
    };

    let result = apply_pipeline(&img, &steps, &stem_of(&args.file), &mut ctx)?;
    println!("Flow directory: {}", result.flow_dir.display());
    for (i, artifact) in result.artifacts.iter().enumerate() {
        println!("  step {i:02}: {}", artifact.display());
    }
    println!("Final image: {}", result.final_image.display());
    Ok(())
}

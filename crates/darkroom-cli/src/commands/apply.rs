use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use darkroom_core::io::load_image;
use darkroom_core::pipeline::{apply_single, PipelineContext};
use darkroom_core::step::OperationSpec;

use super::{read_json_arg, renderer_for, stem_of};

#[derive(Args)]
pub struct ApplyArgs {
    /// Input image file
    pub file: PathBuf,

    /// Operation name (e.g. gamma, clahe, median)
    #[arg(long)]
    pub op: String,

    /// Operation parameters as JSON, inline or @file
    #[arg(long, default_value = "{}")]
    pub params: String,

    /// RNG seed for the noise simulators
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the companion report artifact
    #[arg(long)]
    pub no_reports: bool,
}

pub fn run(args: &ApplyArgs, output_root: &Path) -> Result<()> {
    let img = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let params: serde_json::Value =
        serde_json::from_str(&read_json_arg(&args.params)?).context("Invalid params JSON")?;
    let spec = OperationSpec::new(args.op.clone(), params);

    let renderer = renderer_for(args.no_reports);
    let mut ctx = match args.seed {
        Some(seed) => PipelineContext::seeded(output_root, renderer.as_ref(), seed),
        None => PipelineContext::new(output_root, renderer.as_ref()),
    };

    let path = apply_single(&img, &spec, &stem_of(&args.file), &mut ctx)?;
    println!("Saved to {}", path.display());
    Ok(())
}

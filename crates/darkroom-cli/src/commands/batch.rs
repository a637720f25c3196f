use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use darkroom_core::io::list_images;
use darkroom_core::pipeline::{process_batch, PipelineContext};
use indicatif::{ProgressBar, ProgressStyle};

use super::{parse_steps, renderer_for};

#[derive(Args)]
pub struct BatchArgs {
    /// Directory of input images
    pub dir: PathBuf,

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

pub fn run(args: &BatchArgs, output_root: &Path) -> Result<()> {
    let steps = parse_steps(&args.steps)?;
    let total = list_images(&args.dir)?.len();

    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
            .expect("valid template")
            .progress_chars("=> "),
    );
    bar.set_message("Processing");

    let renderer = renderer_for(args.no_reports);
    let mut ctx = match args.seed {
        Some(seed) => PipelineContext::seeded(output_root, renderer.as_ref(), seed),
        None => PipelineContext::new(output_root, renderer.as_ref()),
    };

    let on_progress = |done: usize| bar.set_position(done as u64);
    let results = process_batch(&args.dir, &steps, &mut ctx, Some(&on_progress))?;
    bar.finish_and_clear();

    println!("Processed {} of {} images", results.len(), total);
    for path in &results {
        println!("  {}", path.display());
    }
    if results.len() < total {
        println!("{} image(s) failed; rerun with --verbose for details", total - results.len());
    }
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use darkroom_core::demo::run_median_demo;
use darkroom_core::io::load_image;
use darkroom_core::pipeline::PipelineContext;

use super::{renderer_for, stem_of};

#[derive(Args)]
pub struct DemoArgs {
    /// Input image file
    pub file: PathBuf,

    /// Salt-and-pepper noise probability
    #[arg(long, default_value_t = 0.05)]
    pub prob: f64,

    /// Median filter kernel size (odd, >= 3)
    #[arg(long, default_value_t = 3)]
    pub kernel_size: i64,

    /// RNG seed for the noise simulator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the per-stage report artifacts
    #[arg(long)]
    pub no_reports: bool,
}

pub fn run(args: &DemoArgs, output_root: &Path) -> Result<()> {
    let img = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let renderer = renderer_for(args.no_reports);
    let mut ctx = match args.seed {
        Some(seed) => PipelineContext::seeded(output_root, renderer.as_ref(), seed),
        None => PipelineContext::new(output_root, renderer.as_ref()),
    };

    let result = run_median_demo(&img, args.prob, args.kernel_size, &stem_of(&args.file), &mut ctx)?;
    println!("Demo directory: {}", result.demo_dir.display());
    println!(
        "SNR: original {:.2} dB, noisy {:.2} dB, filtered {:.2} dB",
        result.original.snr_db, result.noisy.snr_db, result.filtered.snr_db
    );
    println!("SNR recovered by filtering: {:.2} dB", result.snr_recovery_db);
    Ok(())
}

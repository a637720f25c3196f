use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use darkroom_core::pipeline::{average_directory, PipelineContext};

use super::renderer_for;

#[derive(Args)]
pub struct AverageArgs {
    /// Directory of input images to average
    pub dir: PathBuf,

    /// Skip the companion report artifact
    #[arg(long)]
    pub no_reports: bool,
}

pub fn run(args: &AverageArgs, output_root: &Path) -> Result<()> {
    let renderer = renderer_for(args.no_reports);
    let mut ctx = PipelineContext::new(output_root, renderer.as_ref());

    let path = average_directory(&args.dir, &mut ctx)?;
    println!("Saved averaged image to {}", path.display());
    Ok(())
}

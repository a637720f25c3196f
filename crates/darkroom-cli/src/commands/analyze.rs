use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use darkroom_core::io::load_image;
use darkroom_core::metrics::diagnose;

use crate::summary;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input image file
    pub file: PathBuf,

    /// Print the diagnosis as JSON instead of a formatted summary
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let img = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let diagnosis = diagnose(&img);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&diagnosis)?);
    } else {
        summary::print_diagnosis(&args.file, &diagnosis);
    }
    Ok(())
}

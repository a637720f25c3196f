mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "darkroom", about = "Image-processing experimentation toolkit")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Root directory for generated artifacts
    #[arg(long, global = true, default_value = "output")]
    output_root: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute quality diagnostics for an image
    Analyze(commands::analyze::AnalyzeArgs),
    /// Apply a single operation to an image
    Apply(commands::apply::ApplyArgs),
    /// Run a multi-step pipeline over one image
    Pipeline(commands::pipeline::PipelineArgs),
    /// Run a pipeline over every image in a directory
    Batch(commands::batch::BatchArgs),
    /// Compare enhancement strategies on one image
    Experiment(commands::experiment::ExperimentArgs),
    /// Average all images in a directory to reduce noise
    Average(commands::average::AverageArgs),
    /// Demonstrate median filtering of salt-and-pepper noise
    Demo(commands::demo::DemoArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Apply(args) => commands::apply::run(args, &cli.output_root),
        Commands::Pipeline(args) => commands::pipeline::run(args, &cli.output_root),
        Commands::Batch(args) => commands::batch::run(args, &cli.output_root),
        Commands::Experiment(args) => commands::experiment::run(args, &cli.output_root),
        Commands::Average(args) => commands::average::run(args, &cli.output_root),
        Commands::Demo(args) => commands::demo::run(args, &cli.output_root),
    }
}

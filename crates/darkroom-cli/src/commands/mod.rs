pub mod analyze;
pub mod apply;
pub mod average;
pub mod batch;
pub mod demo;
pub mod experiment;
pub mod pipeline;

use std::path::Path;

use anyhow::{Context, Result};
use darkroom_core::report::{HistogramRenderer, NullRenderer, ReportRenderer};
use darkroom_core::step::OperationSpec;

/// A JSON argument is either inline text or `@path` to a file.
pub fn read_json_arg(arg: &str) -> Result<String> {
    if let Some(path) = arg.strip_prefix('@') {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
    } else {
        Ok(arg.to_string())
    }
}

/// Parse a steps argument: a JSON array of `{op, params}` objects.
pub fn parse_steps(arg: &str) -> Result<Vec<OperationSpec>> {
    let text = read_json_arg(arg)?;
    darkroom_core::step::parse_step_list(&text)
        .context("Expected [{\"op\": ..., \"params\": ...}]")
}

/// Derive the artifact stem from an input path.
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

/// Pick the report renderer: histograms by default, nothing with --no-reports.
pub fn renderer_for(no_reports: bool) -> Box<dyn ReportRenderer> {
    if no_reports {
        Box::new(NullRenderer)
    } else {
        Box::new(HistogramRenderer)
    }
}

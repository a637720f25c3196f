//! Pipeline runner: ordered steps over one image with per-step artifact
//! capture, and directory-wide batch application.
//!
//! Failure policy: a single-image pipeline is fail-fast with no rollback
//! (artifacts from completed steps stay on disk for diagnosis), while
//! batch items are isolated: one image's failure never stops the rest.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::artifacts::{persist_with_report, ArtifactStore};
use crate::error::{DarkroomError, Result};
use crate::image::Image;
use crate::io;
use crate::report::ReportRenderer;
use crate::step::{execute_step, ExecContext, Operation, OperationSpec};

/// Everything a top-level run needs: the artifact store (a snapshot of
/// the output root), the report renderer, and the execution state.
pub struct PipelineContext<'a> {
    pub store: ArtifactStore,
    pub renderer: &'a dyn ReportRenderer,
    pub exec: ExecContext,
}

impl<'a> PipelineContext<'a> {
    pub fn new(output_root: impl Into<PathBuf>, renderer: &'a dyn ReportRenderer) -> Self {
        Self {
            store: ArtifactStore::new(output_root),
            renderer,
            exec: ExecContext::new(),
        }
    }

    /// Context with a deterministic RNG, for reproducible runs.
    pub fn seeded(
        output_root: impl Into<PathBuf>,
        renderer: &'a dyn ReportRenderer,
        seed: u64,
    ) -> Self {
        Self {
            store: ArtifactStore::new(output_root),
            renderer,
            exec: ExecContext::seeded(seed),
        }
    }
}

/// One pipeline run: ordered artifact references (step 0 = unmodified
/// input), the final artifact, and the flow directory they live in.
#[derive(Clone, Debug, Serialize)]
pub struct PipelineResult {
    pub flow_dir: PathBuf,
    pub artifacts: Vec<PathBuf>,
    pub final_image: PathBuf,
}

/// Execute `steps` strictly in order over `img`, persisting one artifact
/// per step under `{root}/Pipelines/{stem}_Flow/`.
///
/// Step 0 is the unmodified input. An invalid or failing step aborts the
/// run with [`DarkroomError::StepFailed`]; artifacts already written stay
/// on disk.
pub fn apply_pipeline(
    img: &Image,
    steps: &[OperationSpec],
    stem: &str,
    ctx: &mut PipelineContext,
) -> Result<PipelineResult> {
    let flow_dir = ctx.store.flow_dir(stem);
    std::fs::create_dir_all(&flow_dir)?;

    let mut artifacts = Vec::with_capacity(steps.len() + 1);
    let mut current = img.clone();

    let step0 = flow_dir.join("00_original.png");
    persist_with_report(&current, &step0, "Step 0: original", ctx.renderer)?;
    artifacts.push(step0);

    for (i, spec) in steps.iter().enumerate() {
        let index = i + 1;
        current = Operation::parse(spec)
            .and_then(|op| execute_step(&current, &op, &mut ctx.exec))
            .map_err(|e| DarkroomError::StepFailed {
                index,
                op: spec.op.clone(),
                source: Box::new(e),
            })?;

        let path = flow_dir.join(format!("{index:02}_{}.png", spec.op));
        let title = format!("Step {index}: {}", spec.op);
        persist_with_report(&current, &path, &title, ctx.renderer)?;
        artifacts.push(path);
        info!(step = index, op = %spec.op, "pipeline step complete");
    }

    Ok(PipelineResult {
        final_image: artifacts.last().cloned().expect("step 0 always present"),
        flow_dir,
        artifacts,
    })
}

/// Apply the same pipeline independently to every image in a directory.
///
/// A failing image is logged and skipped; the returned final-artifact
/// paths keep the directory's sorted input order. `on_progress`, when
/// given, is called with the number of images attempted so far.
pub fn process_batch(
    dir: &Path,
    steps: &[OperationSpec],
    ctx: &mut PipelineContext,
    on_progress: Option<&dyn Fn(usize)>,
) -> Result<Vec<PathBuf>> {
    let images = io::list_images(dir)?;
    let mut results = Vec::with_capacity(images.len());

    for (done, path) in images.iter().enumerate() {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        match io::load_image(path).and_then(|img| apply_pipeline(&img, steps, &stem, ctx)) {
            Ok(result) => results.push(result.final_image),
            Err(e) => {
                warn!(image = %path.display(), error = %e, "batch item failed; continuing");
            }
        }
        if let Some(progress) = on_progress {
            progress(done + 1);
        }
    }
    Ok(results)
}

/// Average every image in a directory into one noise-reduced result,
/// persisted as a semantic artifact under the Restoration category.
pub fn average_directory(dir: &Path, ctx: &mut PipelineContext) -> Result<PathBuf> {
    let paths = io::list_images(dir)?;
    let mut images = Vec::with_capacity(paths.len());
    for path in &paths {
        images.push(io::load_image(path)?);
    }
    let averaged = crate::ops::arith::average(&images)?;

    let stem = dir
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "images".to_string());
    let out = ctx
        .store
        .semantic_path("Restoration", "average", &format!("{stem}_average"), "result");
    persist_with_report(&averaged, &out, "average", ctx.renderer)?;
    Ok(out)
}

/// Apply one operation to one image and persist it at its semantic path.
pub fn apply_single(
    img: &Image,
    spec: &OperationSpec,
    stem: &str,
    ctx: &mut PipelineContext,
) -> Result<PathBuf> {
    let op = Operation::parse(spec)?;
    let result = execute_step(img, &op, &mut ctx.exec)?;

    // Arithmetic files under its sub-operation name.
    let op_name = match &op {
        Operation::Arithmetic(p) => p.operation.name(),
        _ => op.name(),
    };
    let suffix = op.suffix();
    let path = ctx
        .store
        .semantic_path(op.category(), op_name, stem, &suffix);
    let title = format!("{op_name} ({suffix})");
    persist_with_report(&result, &path, &title, ctx.renderer)?;
    Ok(path)
}

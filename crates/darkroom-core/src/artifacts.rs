//! Artifact persistence: structured destination paths plus best-effort
//! visual reports. The output root is snapshotted into an [`ArtifactStore`]
//! at the start of each top-level call; nothing here is process-global.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::image::Image;
use crate::io::save_image;
use crate::report::ReportRenderer;

/// Handle to an output root, computing structured destination paths.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `{root}/{Category}/{operation}/{stem}_{suffix}.png`
    pub fn semantic_path(&self, category: &str, operation: &str, stem: &str, suffix: &str) -> PathBuf {
        let file = if suffix.is_empty() || stem.ends_with(suffix) {
            format!("{stem}.png")
        } else {
            format!("{stem}_{suffix}.png")
        };
        self.root.join(category).join(operation).join(file)
    }

    /// Directory holding one pipeline run's per-step artifacts.
    pub fn flow_dir(&self, stem: &str) -> PathBuf {
        self.root.join("Pipelines").join(format!("{stem}_Flow"))
    }

    /// Directory holding one experiment's per-candidate artifacts.
    pub fn experiment_dir(&self, stem: &str) -> PathBuf {
        self.root.join("Experiments").join(stem)
    }

    /// Directory holding one median-demo run's artifacts.
    pub fn demo_dir(&self, stem: &str) -> PathBuf {
        self.root.join("MedianDemo").join(stem)
    }
}

/// Companion report path: `name.png` -> `name_REPORT.png`.
pub fn report_path_for(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = image_path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    image_path.with_file_name(format!("{stem}_REPORT.{ext}"))
}

/// Write an image artifact, then try to write its visual report.
///
/// The image write is mandatory; a rendering or report-write failure is
/// logged and swallowed. The policy that reports are non-fatal lives
/// here, explicitly. Returns the report path when one was written.
pub fn persist_with_report(
    img: &Image,
    path: &Path,
    title: &str,
    renderer: &dyn ReportRenderer,
) -> Result<Option<PathBuf>> {
    save_image(img, path)?;

    match renderer.render(img, title) {
        Ok(Some(report)) => {
            let report_path = report_path_for(path);
            match save_image(&report, &report_path) {
                Ok(()) => Ok(Some(report_path)),
                Err(e) => {
                    warn!(path = %report_path.display(), error = %e, "failed to write report; continuing");
                    Ok(None)
                }
            }
        }
        Ok(None) => Ok(None),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "report rendering failed; continuing");
            Ok(None)
        }
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;
use tracing::debug;
use vdiff_engine::{ComparisonOptions, DiffResult, SavedArtifacts};

/// A compared pair, with the decoded inputs kept for artifact rendering.
pub struct PairComparison {
    pub result: DiffResult,
    pub expected: RgbaImage,
    pub actual: RgbaImage,
}

impl PairComparison {
    /// Write all artifacts for this pair into `dir` as `{base_name}-*`.
    pub fn save(&self, base_name: &str, dir: &Path) -> Result<SavedArtifacts> {
        vdiff_engine::render_artifacts(&self.result, &self.expected, &self.actual, base_name, dir)
            .with_context(|| format!("Failed to write artifacts for {base_name}"))
    }
}

fn read_image(path: &Path, which: &'static str) -> Result<RgbaImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    vdiff_engine::decode(&bytes, which)
        .with_context(|| format!("Failed to decode {}", path.display()))
}

/// Read, decode and compare two image files.
///
/// Runs synchronously; call via `spawn_blocking` from async code.
pub fn compare_files(
    expected_path: &Path,
    actual_path: &Path,
    options: &ComparisonOptions,
) -> Result<PairComparison> {
    let expected = read_image(expected_path, "expected")?;
    let actual = read_image(actual_path, "actual")?;
    let result = vdiff_engine::compare_images(&expected, &actual, options).with_context(|| {
        format!(
            "Failed to compare {} with {}",
            expected_path.display(),
            actual_path.display()
        )
    })?;
    debug!(
        expected = %expected_path.display(),
        actual = %actual_path.display(),
        diff_pixels = result.diff_pixels,
        passed = result.passed,
        "compared files"
    );
    Ok(PairComparison {
        result,
        expected,
        actual,
    })
}

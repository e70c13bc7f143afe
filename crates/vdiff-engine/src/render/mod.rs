//! Artifact output: diff mask, side-by-side composite, HTML report, JSON.
//!
//! Files land in `dir` as `{base}-diff.png`, `{base}-comparison.png`,
//! `{base}-report.html` and `{base}-result.json`. Writes happen in that order
//! and stop at the first failure.

pub mod composite;
pub mod html;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use tracing::debug;

use self::composite::Panel;
use self::html::ReportImages;
use crate::{DiffError, DiffResult, Result};

/// Paths written by [`save_diff_result`] / [`render_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifacts {
    pub diff_image_path: Option<PathBuf>,
    pub comparison_path: Option<PathBuf>,
    pub report_path: PathBuf,
    pub json_path: PathBuf,
}

/// Write the diff mask (if kept), the HTML report and the JSON result.
pub fn save_diff_result(
    result: &DiffResult,
    base_name: &str,
    output_dir: &Path,
) -> Result<SavedArtifacts> {
    ensure_dir(output_dir)?;
    let diff_image_path = write_diff_image(result, base_name, output_dir)?;
    finish(result, base_name, output_dir, diff_image_path, None)
}

/// Write the side-by-side composite (Expected | Actual | Difference).
pub fn save_comparison_image(
    result: &DiffResult,
    expected: &RgbaImage,
    actual: &RgbaImage,
    base_name: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    ensure_dir(output_dir)?;
    let mut panels = vec![(Panel::Expected, expected), (Panel::Actual, actual)];
    if let Some(diff) = &result.diff_image {
        panels.push((Panel::Difference, diff));
    }
    let canvas = composite::side_by_side(&panels);
    let path = output_dir.join(format!("{base_name}-comparison.png"));
    write_png(&canvas, &path)?;
    Ok(path)
}

/// Write all four artifacts, linking the composite from the report.
pub fn render_artifacts(
    result: &DiffResult,
    expected: &RgbaImage,
    actual: &RgbaImage,
    base_name: &str,
    output_dir: &Path,
) -> Result<SavedArtifacts> {
    ensure_dir(output_dir)?;
    let diff_image_path = write_diff_image(result, base_name, output_dir)?;
    let comparison_path = save_comparison_image(result, expected, actual, base_name, output_dir)?;
    finish(result, base_name, output_dir, diff_image_path, Some(comparison_path))
}

fn finish(
    result: &DiffResult,
    base_name: &str,
    output_dir: &Path,
    diff_image_path: Option<PathBuf>,
    comparison_path: Option<PathBuf>,
) -> Result<SavedArtifacts> {
    let images = ReportImages {
        comparison: comparison_path.as_deref().and_then(file_name),
        diff: diff_image_path.as_deref().and_then(file_name),
    };
    let report = html::build_html(result, base_name, &images);
    let report_path = output_dir.join(format!("{base_name}-report.html"));
    write_file(&report_path, report.as_bytes())?;

    let json = serde_json::to_vec_pretty(result)?;
    let json_path = output_dir.join(format!("{base_name}-result.json"));
    write_file(&json_path, &json)?;

    Ok(SavedArtifacts {
        diff_image_path,
        comparison_path,
        report_path,
        json_path,
    })
}

fn write_diff_image(
    result: &DiffResult,
    base_name: &str,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    let Some(diff) = &result.diff_image else {
        return Ok(None);
    };
    let path = output_dir.join(format!("{base_name}-diff.png"));
    write_png(diff, &path)?;
    Ok(Some(path))
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| DiffError::Filesystem {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_png(img: &RgbaImage, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|source| DiffError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    write_file(path, &buf)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|source| DiffError::Filesystem {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    Ok(())
}

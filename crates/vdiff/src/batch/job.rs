use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// One current image and, if present, its reference counterpart.
#[derive(Clone, Debug)]
pub struct PairJob {
    /// Relative path without extension, `/`-separated (e.g. `button/hover`).
    pub id: String,
    pub current: PathBuf,
    pub reference: Option<PathBuf>,
}

impl PairJob {
    /// Artifact directory and base name: nested like the image itself.
    pub fn artifact_location(&self, output_dir: &Path) -> (PathBuf, String) {
        match self.id.rsplit_once('/') {
            Some((parent, stem)) => (output_dir.join(parent), stem.to_string()),
            None => (output_dir.to_path_buf(), self.id.clone()),
        }
    }
}

/// Result of pairing two directory trees.
#[derive(Debug, Default)]
pub struct Discovery {
    pub jobs: Vec<PairJob>,
    /// Reference IDs with no current image.
    pub orphans: Vec<String>,
}

/// Match `pattern` under both directories and pair files by relative path.
pub fn discover(reference_dir: &Path, current_dir: &Path, pattern: &str) -> Result<Discovery> {
    let current = matching_files(current_dir, pattern)?;
    let mut reference = matching_files(reference_dir, pattern)?;

    let jobs = current
        .into_iter()
        .map(|(id, path)| PairJob {
            reference: reference.remove(&id),
            current: path,
            id,
        })
        .collect();

    Ok(Discovery {
        jobs,
        orphans: reference.into_keys().collect(),
    })
}

/// Files under `dir` matching `pattern`, keyed by ID.
fn matching_files(dir: &Path, pattern: &str) -> Result<BTreeMap<String, PathBuf>> {
    let mut files = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(files);
    }

    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let full = format!("{base}/{pattern}");
    let entries = glob::glob(&full).with_context(|| format!("Invalid pattern {pattern:?}"))?;

    for entry in entries {
        let path = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        if !path.is_file() {
            continue;
        }
        if let Ok(rel) = path.strip_prefix(dir) {
            files.insert(id_for(rel), path.clone());
        }
    }
    Ok(files)
}

fn id_for(rel: &Path) -> String {
    rel.with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

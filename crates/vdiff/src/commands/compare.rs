use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use crate::compare::pair;
use crate::config::ResolvedRunConfig;
use crate::report::terminal;

/// `vdiff compare`: compare one pair.
/// Returns exit code: 0 = pass, 1 = differences beyond the pass threshold.
pub fn compare(
    config: &ResolvedRunConfig,
    expected: &Path,
    actual: &Path,
    name: Option<&str>,
    save: bool,
    json: bool,
) -> Result<i32> {
    let start = Instant::now();
    let comparison = pair::compare_files(expected, actual, &config.options)?;
    let elapsed = start.elapsed();
    let result = &comparison.result;

    let saved = if save || !result.passed {
        let base_name = match name {
            Some(n) => n.to_string(),
            None => default_base_name(actual)?,
        };
        let saved = comparison.save(&base_name, &config.output_dir)?;
        info!(report = %saved.report_path.display(), "wrote artifacts");
        Some(saved)
    } else {
        None
    };

    if json {
        let out = serde_json::to_string_pretty(result).context("Failed to serialize result")?;
        println!("{out}");
    } else {
        terminal::print_result(result, elapsed);
        if let Some(saved) = &saved {
            terminal::print_artifacts(saved);
        }
    }

    Ok(if result.passed { 0 } else { 1 })
}

fn default_base_name(actual: &Path) -> Result<String> {
    actual
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .with_context(|| format!("Cannot derive a name from {}; pass --name", actual.display()))
}

use std::path::Path;

use anyhow::{Context, Result};

use super::{CONFIG_DIR, CONFIG_FILE};

/// Hand-crafted config template with commented-out keys.
/// Used by `vdiff init` instead of `toml::to_string_pretty()` so that
/// users can see the available knobs and their defaults.
pub(crate) const CONFIG_TEMPLATE: &str = r#"# ─────────────────────────────────────────────────────────
# Comparison: all fields optional.
# ─────────────────────────────────────────────────────────
[diff]
# threshold = 0.1                   # per-pixel colour tolerance (0.0 = exact)
# pass_threshold = 0.01             # max share of differing pixels; defaults to threshold
# include_anti_aliasing = false     # count anti-aliased edge pixels as differences
# alpha_threshold = 0.0             # pixels this transparent (or more) always match
# generate_diff_mask = true
# diff_color = [255, 0, 0]
# analyze_regions = false
# region_min_size = 1

# ─────────────────────────────────────────────────────────
# Artifacts: diff images, HTML reports and JSON results.
# ─────────────────────────────────────────────────────────
[output]
# dir = ".vdiff/output"
"#;

pub fn config_file_exists() -> bool {
    Path::new(CONFIG_DIR).join(CONFIG_FILE).exists()
}

pub fn write_gitignore(force: bool) -> Result<()> {
    let path = Path::new(CONFIG_DIR).join(".gitignore");
    if !force && path.exists() {
        return Ok(());
    }
    std::fs::write(&path, "output/\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write the hand-crafted config template (with commented-out keys).
pub fn write_template() -> Result<()> {
    let dir = Path::new(CONFIG_DIR);
    std::fs::create_dir_all(dir).context("Failed to create .vdiff directory")?;
    let path = dir.join(CONFIG_FILE);
    std::fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

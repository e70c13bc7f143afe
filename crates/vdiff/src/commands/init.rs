use anyhow::{Result, bail};

use crate::config;

/// `vdiff init`: create .vdiff/config.toml.
pub fn init(force: bool) -> Result<()> {
    if !force && config::config_file_exists() {
        bail!(".vdiff/config.toml already exists (use --force to overwrite)");
    }

    config::write_template()?;
    config::write_gitignore(force)?;

    let verb = if force { "Regenerated" } else { "Created" };
    println!("{verb} {}", config::config_path().display());
    Ok(())
}

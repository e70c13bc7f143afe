pub mod diff_args;
pub mod resolve;
pub mod template;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vdiff_engine::ComparisonOptions;

pub use self::diff_args::DiffArgs;
pub use self::resolve::{CliOverrides, ResolvedRunConfig};
pub use self::template::{config_file_exists, write_gitignore, write_template};

pub(crate) const CONFIG_DIR: &str = ".vdiff";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving diff images, reports and JSON results.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    Path::new(CONFIG_DIR).join("output")
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub diff: ComparisonOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

pub fn config_path() -> PathBuf {
    Path::new(CONFIG_DIR).join(CONFIG_FILE)
}

/// Load `.vdiff/config.toml`, falling back to defaults when it does not exist.
pub fn load() -> Result<Config> {
    let path = config_path();
    if !path.exists() {
        return Ok(Config::default());
    }
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    config
        .diff
        .validate()
        .map_err(|e| anyhow::anyhow!("diff: {e}"))?;
    Ok(config)
}

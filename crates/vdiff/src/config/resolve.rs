use std::path::PathBuf;

use anyhow::{Context, Result};
use vdiff_engine::ComparisonOptions;

use super::diff_args::DiffArgs;
use super::{Config, load};

/// Values extracted from the CLI that participate in the merge.
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub diff: DiffArgs,
}

/// Fully resolved config after CLI > env > file > defaults merge.
#[derive(Debug)]
pub struct ResolvedRunConfig {
    pub options: ComparisonOptions,
    pub output_dir: PathBuf,
}

/// Environment layer, read once so tests can inject it.
#[derive(Debug, Default)]
struct EnvOverrides {
    threshold: Option<f64>,
    output_dir: Option<PathBuf>,
}

impl EnvOverrides {
    fn from_env() -> Result<Self> {
        let threshold = std::env::var("VDIFF_THRESHOLD")
            .ok()
            .map(|v| v.parse::<f64>())
            .transpose()
            .context("VDIFF_THRESHOLD must be a valid float")?;
        let output_dir = std::env::var_os("VDIFF_OUTPUT_DIR").map(PathBuf::from);
        Ok(Self {
            threshold,
            output_dir,
        })
    }
}

impl ResolvedRunConfig {
    pub fn new(cli: CliOverrides) -> Result<Self> {
        // 1. File layer (defaults when absent)
        let file_config = load()?;

        // 2. Env layer
        let env = EnvOverrides::from_env()?;

        Self::merge(file_config, env, cli)
    }

    fn merge(file_config: Config, env: EnvOverrides, cli: CliOverrides) -> Result<Self> {
        // 3. CLI > env > file (env sits between file and flags)
        let mut options = file_config.diff;
        if let Some(threshold) = env.threshold {
            options.threshold = threshold;
        }
        cli.diff.apply(&mut options);
        options.validate().context("Invalid comparison options")?;

        let output_dir = cli
            .output
            .or(env.output_dir)
            .unwrap_or(file_config.output.dir);

        Ok(Self {
            options,
            output_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(threshold: Option<f64>, output: Option<&str>) -> CliOverrides {
        CliOverrides {
            output: output.map(PathBuf::from),
            diff: DiffArgs {
                threshold,
                ..DiffArgs::default()
            },
        }
    }

    #[test]
    fn defaults_when_nothing_set() {
        let r =
            ResolvedRunConfig::merge(Config::default(), EnvOverrides::default(), cli(None, None))
                .unwrap();
        assert_eq!(r.options, ComparisonOptions::default());
        assert_eq!(r.output_dir, PathBuf::from(".vdiff/output"));
    }

    #[test]
    fn env_beats_file_and_cli_beats_env() {
        let mut file = Config::default();
        file.diff.threshold = 0.3;
        file.output.dir = PathBuf::from("from-file");

        let env = EnvOverrides {
            threshold: Some(0.2),
            output_dir: Some(PathBuf::from("from-env")),
        };
        let r = ResolvedRunConfig::merge(file, env, cli(None, None)).unwrap();
        assert_eq!(r.options.threshold, 0.2);
        assert_eq!(r.output_dir, PathBuf::from("from-env"));

        let env = EnvOverrides {
            threshold: Some(0.2),
            output_dir: Some(PathBuf::from("from-env")),
        };
        let r = ResolvedRunConfig::merge(Config::default(), env, cli(Some(0.05), Some("from-cli")))
            .unwrap();
        assert_eq!(r.options.threshold, 0.05);
        assert_eq!(r.output_dir, PathBuf::from("from-cli"));
    }

    #[test]
    fn invalid_env_threshold_rejected() {
        let env = EnvOverrides {
            threshold: Some(4.0),
            output_dir: None,
        };
        assert!(ResolvedRunConfig::merge(Config::default(), env, cli(None, None)).is_err());
    }
}

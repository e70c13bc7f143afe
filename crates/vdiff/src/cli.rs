use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DiffArgs;

#[derive(Parser)]
#[command(
    name = "vdiff",
    about = "Pixel-level visual difference checks for screenshots"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create .vdiff/config.toml with default settings
    Init {
        /// Overwrite existing config and gitignore
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Compare two images (exit 0 = pass, 1 = differences, 2 = error)
    Compare {
        /// Expected / reference image
        expected: PathBuf,
        /// Actual / current image
        actual: PathBuf,
        /// Base name for artifacts (defaults to the actual image's file stem)
        #[arg(long)]
        name: Option<String>,
        /// Artifact directory (overrides config)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Write artifacts even when the comparison passes
        #[arg(long)]
        save: bool,
        /// Print the result as JSON instead of a summary line
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        diff: DiffArgs,
    },

    /// Compare every image under CURRENT against its counterpart under REFERENCE
    Batch {
        /// Directory holding reference images
        #[arg(long)]
        reference: PathBuf,
        /// Directory holding current images
        #[arg(long)]
        current: PathBuf,
        /// Glob, relative to both directories, selecting the images to compare
        #[arg(long, default_value = "**/*.png")]
        pattern: String,
        /// Number of comparisons to run at once
        #[arg(long, short = 'p', default_value_t = 4)]
        parallel: usize,
        /// Artifact directory (overrides config)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        #[command(flatten)]
        diff: DiffArgs,
    },
}

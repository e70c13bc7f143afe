mod batch;
mod cli;
mod commands;
mod compare;
mod config;
mod report;

use clap::Parser;
use config::{CliOverrides, ResolvedRunConfig};
use tracing_subscriber::EnvFilter;

/// Exit code for infrastructure failures (bad input, I/O, config), kept
/// distinct from `1`, which means a comparison ran and found differences.
const EXIT_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vdiff=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let code = match run(cli::Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            EXIT_ERROR
        }
    };
    std::process::exit(code);
}

async fn run(cli: cli::Cli) -> anyhow::Result<i32> {
    match cli.command {
        cli::Command::Init { force } => {
            commands::init(force)?;
            Ok(0)
        }
        cli::Command::Compare {
            expected,
            actual,
            name,
            output,
            save,
            json,
            diff,
        } => {
            let config = ResolvedRunConfig::new(CliOverrides { output, diff })?;
            commands::compare(&config, &expected, &actual, name.as_deref(), save, json)
        }
        cli::Command::Batch {
            reference,
            current,
            pattern,
            parallel,
            output,
            diff,
        } => {
            let config = ResolvedRunConfig::new(CliOverrides { output, diff })?;
            commands::batch(config, &reference, &current, &pattern, parallel).await
        }
    }
}

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use crate::batch;
use crate::compare::PairStatus;
use crate::config::ResolvedRunConfig;
use crate::report::terminal::{self, Tally};

/// `vdiff batch`: compare every current image against its reference.
/// Returns exit code: 0 = all pass, 1 = any fail or new, 2 = any pair errored.
pub async fn batch(
    config: ResolvedRunConfig,
    reference_dir: &Path,
    current_dir: &Path,
    pattern: &str,
    parallel: usize,
) -> Result<i32> {
    let discovery = batch::discover(reference_dir, current_dir, pattern)?;
    let total = discovery.jobs.len();
    debug!(total, orphans = discovery.orphans.len(), "discovered pairs");

    let run_start = Instant::now();
    let mut rx = batch::compare_all(
        discovery.jobs,
        config.options.clone(),
        config.output_dir.clone(),
        parallel,
    );

    let mut tally = Tally {
        total,
        orphaned: discovery.orphans.len(),
        ..Tally::default()
    };
    let mut failed_names: Vec<String> = Vec::new();
    let mut new_names: Vec<String> = Vec::new();
    let mut errored_names: Vec<String> = Vec::new();
    let mut done = 0usize;

    while let Some(outcome) = rx.recv().await {
        done += 1;
        let name = outcome.job.id;
        tally.record(&outcome.status);
        match &outcome.status {
            PairStatus::Pass => {}
            PairStatus::Fail { .. } => failed_names.push(name.clone()),
            PairStatus::New => new_names.push(name.clone()),
            PairStatus::Error(_) => errored_names.push(name.clone()),
        }
        terminal::print_line(&name, &outcome.status, outcome.elapsed);
        terminal::show_progress(done, total);
    }

    for id in &discovery.orphans {
        terminal::print_orphan_line(id);
    }

    // Completion order depends on scheduling; list names sorted.
    failed_names.sort();
    new_names.sort();
    errored_names.sort();

    terminal::print_actionable_summary(
        &failed_names,
        &new_names,
        &errored_names,
        &discovery.orphans,
    );
    terminal::print_summary(&tally, &config.output_dir, run_start.elapsed());

    Ok(exit_code(&tally))
}

/// Orphaned references do NOT affect the exit code.
fn exit_code(tally: &Tally) -> i32 {
    if tally.errored > 0 {
        2
    } else if tally.failed > 0 || tally.new > 0 {
        1
    } else {
        0
    }
}

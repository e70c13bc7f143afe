use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinError;
use tracing::{Instrument, debug, info_span, warn};
use vdiff_engine::ComparisonOptions;

use super::job::PairJob;
use crate::compare::PairStatus;
use crate::compare::pair;

/// Per-pair outcome streamed back to the caller.
pub struct PairOutcome {
    pub job: PairJob,
    pub status: PairStatus,
    pub elapsed: Duration,
}

/// Compare, and for failures write artifacts. Blocking.
fn run_job(job: &PairJob, options: &ComparisonOptions, output_dir: &Path) -> PairStatus {
    let Some(reference) = &job.reference else {
        return PairStatus::New;
    };

    let comparison = match pair::compare_files(reference, &job.current, options) {
        Ok(c) => c,
        Err(e) => return PairStatus::Error(format!("{e:#}")),
    };

    let status = PairStatus::from_result(&comparison.result);
    if status != PairStatus::Pass {
        let (dir, base_name) = job.artifact_location(output_dir);
        if let Err(e) = comparison.save(&base_name, &dir) {
            return PairStatus::Error(format!("{e:#}"));
        }
    }
    status
}

/// A comparison that panicked still counts as a pair that could not be compared.
fn settle(joined: Result<PairStatus, JoinError>) -> PairStatus {
    joined.unwrap_or_else(|e| {
        warn!(error = %e, "comparison task panicked");
        PairStatus::Error(format!("comparison panicked: {e}"))
    })
}

/// Compare all jobs on a pool of `parallel` workers.
///
/// Individual failures are reported per pair rather than aborting the run.
/// Returns a `Receiver` immediately; outcomes stream in as comparisons finish.
pub fn compare_all(
    jobs: Vec<PairJob>,
    options: ComparisonOptions,
    output_dir: PathBuf,
    parallel: usize,
) -> mpsc::Receiver<PairOutcome> {
    let worker_count = jobs.len().min(parallel.max(1));
    debug!(jobs = jobs.len(), workers = worker_count, "starting batch");

    let queue = Arc::new(Mutex::new(jobs));
    let options = Arc::new(options);
    let output_dir = Arc::new(output_dir);
    let (tx, rx) = mpsc::channel(parallel.max(1) * 2);

    let mut set = tokio::task::JoinSet::new();
    for idx in 0..worker_count {
        let queue = queue.clone();
        let tx = tx.clone();
        let options = options.clone();
        let output_dir = output_dir.clone();
        set.spawn(
            async move {
                loop {
                    let Some(job) = queue.lock().await.pop() else {
                        debug!("queue empty, exiting");
                        break;
                    };

                    let started = Instant::now();
                    let options = options.clone();
                    let output_dir = output_dir.clone();
                    let blocking_job = job.clone();
                    let joined = tokio::task::spawn_blocking(move || {
                        run_job(&blocking_job, &options, &output_dir)
                    })
                    .await;
                    let status = settle(joined);

                    let outcome = PairOutcome {
                        job,
                        status,
                        elapsed: started.elapsed(),
                    };
                    if tx.send(outcome).await.is_err() {
                        warn!("receiver dropped, stopping");
                        break;
                    }
                }
            }
            .instrument(info_span!("worker", id = idx)),
        );
    }

    // Channel closes once every worker's sender is gone.
    drop(tx);

    tokio::spawn(async move {
        while let Some(result) = set.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "worker task panicked");
            }
        }
    });

    rx
}

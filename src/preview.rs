//! Dry-run: discover and parse without touching the remote service.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::engine::outcome::OutcomeRecorder;
use crate::engine::progress::setup_progress;
use crate::engine::tracker::ProgressTracker;
use crate::parser::RecordParser;
use crate::pipeline::{discover, is_cancelled, read_and_parse, report_skipped_paths};
use crate::utils::config::PREVIEW_BATCH_PER_WORKER;
use crate::utils::{Colors, effective_concurrency};
use crate::{IngestConfig, Outcome, RunResult};

/// Parse one file. Parsed counts as imported (no content ID), a parse failure as failed.
fn preview_item(
    parser: &dyn RecordParser,
    tracker: &ProgressTracker,
    cancel: &AtomicBool,
    path: &Path,
) -> Outcome {
    if is_cancelled(cancel) {
        return Outcome::cancelled(path.to_path_buf());
    }
    tracker.set_current_file(path);
    match read_and_parse(parser, path) {
        Ok(_) => Outcome::imported(path.to_path_buf(), None, None),
        Err(e) => Outcome::failed(path.to_path_buf(), e),
    }
}

/// Preview an ingestion of `root`: no job is created and nothing is submitted.
///
/// Files are parsed in batches on a rayon pool sized to the effective concurrency;
/// each batch is recorded in discovery order before the next one starts.
pub fn preview_path(
    root: &Path,
    config: &IngestConfig,
    parser: &dyn RecordParser,
    cancel: &AtomicBool,
) -> Result<RunResult> {
    warn!("RUNNING IN DRY-RUN MODE. NOTHING WILL BE SUBMITTED.");
    let discovery = discover(root, config)?;
    report_skipped_paths(config, &discovery.skipped_paths);
    let total = discovery.files.len();

    let workers = effective_concurrency(config.concurrency, total);
    debug!("Preview tuning: {} parser threads", workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("preview-worker-{i}"))
        .build()
        .context("build preview thread pool")?;

    let tracker = Arc::new(ProgressTracker::new(total));
    let bar = setup_progress(config.show_progress, total, true);
    let mut recorder =
        OutcomeRecorder::new(RunResult::new(None, total, true), Arc::clone(&tracker), None, bar);

    for batch in discovery.files.chunks(workers * PREVIEW_BATCH_PER_WORKER) {
        let outcomes: Vec<Outcome> = pool.install(|| {
            batch
                .par_iter()
                .map(|path| preview_item(parser, &tracker, cancel, path))
                .collect()
        });
        for outcome in outcomes {
            recorder.record(outcome);
        }
    }

    let result = recorder.finish();
    info!(
        "Dry run: {} would be submitted, {} failed to parse",
        Colors::colorize(Colors::IMPORTED, &result.imported.to_string()),
        Colors::colorize(Colors::FAILED, &result.failed.to_string())
    );
    Ok(result)
}

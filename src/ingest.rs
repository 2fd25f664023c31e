//! Live ingestion run: discover → create/resume job → process items → finalize.

use anyhow::Result;
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::engine::job::{establish_job, finalize_job};
use crate::engine::outcome::{OutcomeRecorder, RemoteSink};
use crate::engine::progress::setup_progress;
use crate::engine::tracker::ProgressTracker;
use crate::parser::RecordParser;
use crate::pipeline::{WorkerContext, discover, report_skipped_paths, run_items};
use crate::preview::preview_path;
use crate::remote::IngestService;
use crate::utils::effective_concurrency;
use crate::{IngestConfig, RunResult};

/// Ingest every email file under `root` through `service`.
///
/// Only discovery and job creation are fatal. Per-item failures land in
/// [`RunResult::errors`] and the job is finalized exactly once, also after cancellation.
/// With `config.dry_run` this delegates to [`preview_path`] and `service` is never called.
pub fn ingest_path(
    root: &Path,
    config: &IngestConfig,
    service: Arc<dyn IngestService>,
    parser: Arc<dyn RecordParser>,
    cancel: Arc<AtomicBool>,
) -> Result<RunResult> {
    if config.dry_run {
        return preview_path(root, config, parser.as_ref(), &cancel);
    }

    let discovery = discover(root, config)?;
    report_skipped_paths(config, &discovery.skipped_paths);
    let total = discovery.files.len();
    info!("Discovered {} files under {}", total, discovery.root.display());

    let job_id = establish_job(service.as_ref(), &discovery.root, config, total)?;

    let workers = effective_concurrency(config.concurrency, total);
    debug!("Tuning: {} workers (requested {})", workers, config.concurrency);

    let tracker = Arc::new(ProgressTracker::new(total));
    let bar = setup_progress(config.show_progress, total, false);
    let ctx = Arc::new(WorkerContext::new(
        config,
        job_id.clone(),
        Arc::clone(&service),
        parser,
        Arc::clone(&tracker),
        cancel,
    ));

    let result = {
        let sink = RemoteSink {
            service: service.as_ref(),
            job_id: &job_id,
        };
        let mut recorder = OutcomeRecorder::new(
            RunResult::new(Some(job_id.clone()), total, false),
            tracker,
            Some(sink),
            bar,
        );
        run_items(discovery.files, ctx, workers, &mut recorder);
        recorder.finish()
    };

    finalize_job(service.as_ref(), &job_id, &result);
    if result.cancelled {
        info!("Run cancelled; items not yet started were recorded as skipped");
    }
    Ok(result)
}

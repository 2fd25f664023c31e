use log::{debug, error, warn};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use super::context::{PipelineChannels, WorkerContext, create_pipeline_channels};
use super::worker::{is_cancelled, process_item, spawn_workers, worker_loop};
use crate::Outcome;
use crate::error::ItemError;
use crate::engine::outcome::OutcomeRecorder;

/// Process `items` one at a time on the calling thread, in discovery order.
pub fn run_sequential(
    items: Vec<PathBuf>,
    ctx: &WorkerContext,
    recorder: &mut OutcomeRecorder<'_>,
) {
    debug!("Processing {} items sequentially", items.len());
    for path in items {
        let outcome = if is_cancelled(&ctx.cancel) {
            Outcome::cancelled(path)
        } else {
            process_item(ctx, path)
        };
        recorder.record(outcome);
    }
}

/// Fan `items` out to `num_workers` threads; the calling thread is the only collector.
/// Outcomes are recorded in completion order. Items lost to a panicked worker are recorded
/// as failed so every item still gets exactly one outcome.
pub fn run_parallel(
    items: Vec<PathBuf>,
    ctx: Arc<WorkerContext>,
    num_workers: usize,
    recorder: &mut OutcomeRecorder<'_>,
) {
    debug!("Processing {} items with {} workers", items.len(), num_workers);
    let PipelineChannels {
        path_tx,
        path_rx,
        outcome_tx,
        outcome_rx,
    } = create_pipeline_channels(items.len());

    let mut outstanding: HashSet<PathBuf> = items.iter().cloned().collect();
    // Capacity equals the item count, so this never blocks.
    for path in items {
        if let Err(e) = path_tx.send(path) {
            error!("Work queue closed early; dropping {}", e.0.display());
        }
    }
    drop(path_tx);

    let worker_handles = spawn_workers(&path_rx, &outcome_tx, &ctx, num_workers);
    if worker_handles.is_empty() {
        warn!("No worker threads available; processing on the collector thread");
        worker_loop(path_rx.clone(), outcome_tx.clone(), Arc::clone(&ctx));
    }
    drop(path_rx);
    // Dropping the last sender closes the results channel once every worker exits.
    drop(outcome_tx);

    while let Ok(outcome) = outcome_rx.recv() {
        outstanding.remove(&outcome.path);
        recorder.record(outcome);
    }
    let panicked = shutdown_workers(worker_handles);

    if !outstanding.is_empty() {
        error!(
            "{} worker(s) panicked; recording {} item(s) as failed",
            panicked,
            outstanding.len()
        );
        let mut lost: Vec<PathBuf> = outstanding.into_iter().collect();
        lost.sort();
        for path in lost {
            recorder.record(Outcome::failed(path, ItemError::WorkerPanicked));
        }
    }
}

/// Join worker threads after the results channel is drained. Returns how many panicked.
pub fn shutdown_workers(worker_handles: Vec<JoinHandle<()>>) -> usize {
    let mut panicked = 0;
    for h in worker_handles {
        if h.join().is_err() {
            error!("A worker thread panicked");
            panicked += 1;
        }
    }
    panicked
}

/// Sequential when `num_workers <= 1`, parallel otherwise.
pub fn run_items(
    items: Vec<PathBuf>,
    ctx: Arc<WorkerContext>,
    num_workers: usize,
    recorder: &mut OutcomeRecorder<'_>,
) {
    if num_workers <= 1 {
        run_sequential(items, &ctx, recorder);
    } else {
        run_parallel(items, ctx, num_workers, recorder);
    }
}

use crossbeam_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use super::context::WorkerContext;
use crate::error::ItemError;
use crate::parser::RecordParser;
use crate::remote::SubmitItemRequest;
use crate::{Outcome, ParsedRecord, SkipReason};

pub fn is_cancelled(cancel: &AtomicBool) -> bool {
    cancel.load(Ordering::Relaxed)
}

/// Read `path` from disk and hand the bytes to the parser.
pub fn read_and_parse(parser: &dyn RecordParser, path: &Path) -> Result<ParsedRecord, ItemError> {
    let raw = std::fs::read(path)?;
    Ok(parser.parse(&raw)?)
}

/// Parse → mint content ID → submit, for one item. Never panics on item errors; they become
/// a failed [`Outcome`].
pub fn process_item(ctx: &WorkerContext, path: PathBuf) -> Outcome {
    ctx.tracker.set_current_file(&path);
    let record = match read_and_parse(ctx.parser.as_ref(), &path) {
        Ok(r) => r,
        Err(e) => return Outcome::failed(path, e),
    };
    let content_id = ctx.ids.next_id();
    let response = ctx.service.submit_item(&SubmitItemRequest {
        job_id: &ctx.job_id,
        tenant_id: &ctx.tenant_id,
        content_id: &content_id,
        source: &ctx.source,
        source_path: &path,
        labels: &ctx.labels,
        record: &record,
    });
    match response {
        Ok(resp) if resp.was_duplicate => Outcome::skipped(
            path,
            SkipReason::Duplicate {
                existing_source_id: resp.existing_source_id.or(resp.source_id),
            },
        ),
        Ok(resp) => {
            let id = if resp.content_id.is_empty() {
                content_id
            } else {
                resp.content_id
            };
            Outcome::imported(path, Some(id), resp.source_id)
        }
        Err(e) => Outcome::failed(path, e.into()),
    }
}

/// Single worker: take paths until the queue closes. Once cancelled, remaining paths are
/// drained as skipped without touching them.
pub(crate) fn worker_loop(
    path_rx: Receiver<PathBuf>,
    outcome_tx: Sender<Outcome>,
    ctx: Arc<WorkerContext>,
) {
    while let Ok(path) = path_rx.recv() {
        let outcome = if is_cancelled(&ctx.cancel) {
            Outcome::cancelled(path)
        } else {
            process_item(&ctx, path)
        };
        if outcome_tx.send(outcome).is_err() {
            break;
        }
    }
    drop(outcome_tx);
}

/// Spawn `num_workers` workers. Caller must drop its own `outcome_tx` afterwards so the
/// results channel closes when the last worker exits.
pub fn spawn_workers(
    path_rx: &Receiver<PathBuf>,
    outcome_tx: &Sender<Outcome>,
    ctx: &Arc<WorkerContext>,
    num_workers: usize,
) -> Vec<JoinHandle<()>> {
    (0..num_workers)
        .map(|i| {
            let path_rx = path_rx.clone();
            let outcome_tx = outcome_tx.clone();
            let ctx = Arc::clone(ctx);
            thread::Builder::new()
                .name(format!("ingest-worker-{i}"))
                .spawn(move || worker_loop(path_rx, outcome_tx, ctx))
        })
        .filter_map(|spawned| match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("Could not spawn worker thread: {}", e);
                None
            }
        })
        .collect()
}

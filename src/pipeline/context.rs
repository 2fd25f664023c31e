//! Pipeline context: shared state handed to every worker, and the channels between
//! producer, workers and collector.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::engine::content_id::ContentIdGenerator;
use crate::engine::tracker::ProgressTracker;
use crate::parser::RecordParser;
use crate::remote::IngestService;
use crate::{IngestConfig, Outcome};

/// Everything a worker needs to process one item. Immutable for the run; shared via `Arc`.
pub struct WorkerContext {
    pub service: Arc<dyn IngestService>,
    pub parser: Arc<dyn RecordParser>,
    pub ids: ContentIdGenerator,
    pub job_id: String,
    pub tenant_id: String,
    pub source: String,
    pub labels: Vec<String>,
    pub tracker: Arc<ProgressTracker>,
    pub cancel: Arc<AtomicBool>,
}

impl WorkerContext {
    pub fn new(
        config: &IngestConfig,
        job_id: String,
        service: Arc<dyn IngestService>,
        parser: Arc<dyn RecordParser>,
        tracker: Arc<ProgressTracker>,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            service,
            parser,
            ids: ContentIdGenerator::default(),
            job_id,
            tenant_id: config.tenant_id.clone(),
            source: config.source.clone(),
            labels: config.labels.clone(),
            tracker,
            cancel,
        }
    }
}

/// Work queue (producer → workers) and results queue (workers → collector).
pub struct PipelineChannels {
    pub path_tx: Sender<PathBuf>,
    pub path_rx: Receiver<PathBuf>,
    pub outcome_tx: Sender<Outcome>,
    pub outcome_rx: Receiver<Outcome>,
}

/// Both channels are bounded by the item count, so queuing every item never blocks the
/// producer and workers never block on a result the collector has yet to drain.
pub fn create_pipeline_channels(total: usize) -> PipelineChannels {
    let cap = total.max(1);
    let (path_tx, path_rx) = bounded::<PathBuf>(cap);
    let (outcome_tx, outcome_rx) = bounded::<Outcome>(cap);
    PipelineChannels {
        path_tx,
        path_rx,
        outcome_tx,
        outcome_rx,
    }
}

//! Public and internal types for the emlpush API and pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ErrorKind, ItemError};
use crate::utils::config::{DEFAULT_CONCURRENCY, DEFAULT_SOURCE_TAG};

/// Attachment metadata extracted by the record parser (content is not kept).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentMeta {
    pub filename: Option<String>,
    pub content_type: String,
    pub size: usize,
}

/// Structured record produced by a [`RecordParser`](crate::parser::RecordParser) for one file.
///
/// `content_hash` is for the remote side's duplicate detection; the engine never compares it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub message_id: Option<String>,
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub date: Option<DateTime<Utc>>,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
    pub attachments: Vec<AttachmentMeta>,
    /// Hex blake3 of the raw bytes.
    pub content_hash: String,
    pub headers: BTreeMap<String, String>,
}

/// Final status of one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Imported,
    Skipped,
    Failed,
}

/// Why an item was counted as skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The remote service already holds this content.
    Duplicate { existing_source_id: Option<String> },
    /// Cancellation fired before a worker started the item.
    Cancelled,
}

/// Result of processing one candidate file. Produced by one worker, consumed once by the recorder.
#[derive(Debug)]
pub struct Outcome {
    pub path: PathBuf,
    pub status: OutcomeStatus,
    pub content_id: Option<String>,
    pub source_id: Option<String>,
    pub skip_reason: Option<SkipReason>,
    pub error: Option<ItemError>,
}

impl Outcome {
    pub fn imported(path: PathBuf, content_id: Option<String>, source_id: Option<String>) -> Self {
        Self {
            path,
            status: OutcomeStatus::Imported,
            content_id,
            source_id,
            skip_reason: None,
            error: None,
        }
    }

    pub fn skipped(path: PathBuf, reason: SkipReason) -> Self {
        Self {
            path,
            status: OutcomeStatus::Skipped,
            content_id: None,
            source_id: None,
            skip_reason: Some(reason),
            error: None,
        }
    }

    pub fn cancelled(path: PathBuf) -> Self {
        Self::skipped(path, SkipReason::Cancelled)
    }

    pub fn failed(path: PathBuf, error: ItemError) -> Self {
        Self {
            path,
            status: OutcomeStatus::Failed,
            content_id: None,
            source_id: None,
            skip_reason: None,
            error: Some(error),
        }
    }
}

/// Immutable read of the live progress counters.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub processed: usize,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
    pub elapsed: Duration,
    /// Estimated time to finish. `None` until at least one item was processed.
    pub eta: Option<Duration>,
}

impl ProgressSnapshot {
    /// `processed / total * 100`, 0 when total is 0, never above 100.
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.processed as f64 / self.total as f64 * 100.0).min(100.0)
    }

    pub fn eta_seconds(&self) -> Option<f64> {
        self.eta.map(|d| d.as_secs_f64())
    }
}

/// One failed file in the run result.
#[derive(Clone, Debug, Serialize)]
pub struct FileError {
    pub path: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

/// Aggregate result for the whole invocation. Written only by the collector.
#[derive(Clone, Debug, Serialize)]
pub struct RunResult {
    /// `None` for dry-run.
    pub job_id: Option<String>,
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub success: bool,
    pub errors: Vec<FileError>,
    pub content_ids: Vec<String>,
    pub dry_run: bool,
    pub cancelled: bool,
}

impl RunResult {
    pub fn new(job_id: Option<String>, total: usize, dry_run: bool) -> Self {
        Self {
            job_id,
            total,
            imported: 0,
            skipped: 0,
            failed: 0,
            started_at: Utc::now(),
            finished_at: None,
            success: false,
            errors: Vec::new(),
            content_ids: Vec::new(),
            dry_run,
            cancelled: false,
        }
    }

    pub fn processed(&self) -> usize {
        self.imported + self.skipped + self.failed
    }
}

/// Per-invocation configuration. Built once (CLI, settings file, env) and passed by reference.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// Tenant that owns the job and the submitted items.
    pub tenant_id: String,
    /// Platform / source tag sent with the job and with each item (e.g. `email`).
    pub source: String,
    /// Labels attached to the job metadata and to each submitted item.
    pub labels: Vec<String>,
    /// Worker count. 1 runs strictly sequentially on the calling thread.
    pub concurrency: usize,
    /// Parse only; never create a job or submit.
    pub dry_run: bool,
    /// Reuse this job instead of creating one. Already-processed items are not tracked.
    pub resume_job_id: Option<String>,
    /// Human-readable job name. Derived from source and path when None.
    pub job_name: Option<String>,
    /// Exclude patterns (glob syntax, e.g. `drafts`, `*.tmp.eml`).
    pub exclude: Vec<String>,
    /// Follow symbolic links during discovery.
    pub follow_links: bool,
    /// Strict mode: fail discovery on the first walk error instead of skipping.
    pub strict: bool,
    /// Show the live progress bar.
    pub show_progress: bool,
    /// Verbose output (list skipped walk paths).
    pub verbose: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            source: DEFAULT_SOURCE_TAG.to_string(),
            labels: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
            resume_job_id: None,
            job_name: None,
            exclude: Vec::new(),
            follow_links: false,
            strict: false,
            show_progress: false,
            verbose: false,
        }
    }
}

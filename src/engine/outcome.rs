//! Outcome recorder: the single owner of the run result.
//!
//! Every [`Outcome`] passes through [`OutcomeRecorder::record`] exactly once, from one thread
//! (the collector). It updates the shared [`ProgressTracker`], accumulates the [`RunResult`],
//! and makes the best-effort remote side calls (error reports, progress deltas).

use chrono::Utc;
use log::debug;
use std::sync::Arc;

use crate::engine::progress::{ProgressBar, advance_progress_bar, finish_progress_bar};
use crate::engine::tracker::ProgressTracker;
use crate::error::{ErrorKind, ItemError};
use crate::remote::{ErrorReport, IngestService, ProgressDelta};
use crate::utils::config::ProgressConsts;
use crate::{FileError, Outcome, OutcomeStatus, RunResult, SkipReason};

/// Classification and retryability for a per-item error.
pub fn classify(error: &ItemError) -> (ErrorKind, bool) {
    let kind = error.kind();
    (kind, kind.is_retryable())
}

/// Where remote side calls go. Absent for dry-run.
pub struct RemoteSink<'a> {
    pub service: &'a dyn IngestService,
    pub job_id: &'a str,
}

pub struct OutcomeRecorder<'a> {
    tracker: Arc<ProgressTracker>,
    remote: Option<RemoteSink<'a>>,
    bar: Option<ProgressBar>,
    result: RunResult,
    pending: ProgressDelta,
    report_interval: usize,
}

impl<'a> OutcomeRecorder<'a> {
    pub fn new(
        result: RunResult,
        tracker: Arc<ProgressTracker>,
        remote: Option<RemoteSink<'a>>,
        bar: Option<ProgressBar>,
    ) -> Self {
        Self {
            tracker,
            remote,
            bar,
            result,
            pending: ProgressDelta::default(),
            report_interval: ProgressConsts::REMOTE_REPORT_INTERVAL,
        }
    }

    pub fn tracker(&self) -> &Arc<ProgressTracker> {
        &self.tracker
    }

    /// Read-only view of the result so far.
    pub fn result(&self) -> &RunResult {
        &self.result
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.tracker.record(outcome.status);
        self.pending.processed += 1;
        match outcome.status {
            OutcomeStatus::Imported => {
                self.result.imported += 1;
                self.pending.imported += 1;
                if let Some(id) = outcome.content_id {
                    self.result.content_ids.push(id);
                }
            }
            OutcomeStatus::Skipped => {
                self.result.skipped += 1;
                self.pending.skipped += 1;
                match outcome.skip_reason {
                    Some(SkipReason::Cancelled) => self.result.cancelled = true,
                    Some(SkipReason::Duplicate { existing_source_id }) => debug!(
                        "Duplicate: {} (existing source {})",
                        outcome.path.display(),
                        existing_source_id.as_deref().unwrap_or("unknown")
                    ),
                    None => {}
                }
            }
            OutcomeStatus::Failed => {
                self.result.failed += 1;
                self.pending.failed += 1;
                if let Some(err) = &outcome.error {
                    self.record_failure(&outcome.path, err);
                }
            }
        }

        if let Some(bar) = &self.bar {
            advance_progress_bar(bar, &self.tracker.snapshot(), &outcome.path);
        }
        if self.pending.processed >= self.report_interval {
            self.flush_progress();
        }
    }

    fn record_failure(&mut self, path: &std::path::Path, err: &ItemError) {
        let (kind, retryable) = classify(err);
        let message = err.to_string();
        debug!("Failed: {} ({}): {}", path.display(), kind, message);
        if let Some(sink) = &self.remote {
            let report = ErrorReport {
                job_id: sink.job_id,
                file_path: path,
                error_kind: kind,
                message: &message,
                retryable,
            };
            if let Err(e) = sink.service.record_error(&report) {
                debug!("record_error for {} ignored: {}", path.display(), e);
            }
        }
        self.result.errors.push(FileError {
            path: path.to_path_buf(),
            kind,
            message,
            retryable,
        });
    }

    /// Send accumulated deltas (best-effort) and reset them.
    fn flush_progress(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let delta = std::mem::take(&mut self.pending);
        if let Some(sink) = &self.remote
            && let Err(e) = sink.service.update_progress(sink.job_id, &delta)
        {
            debug!("update_progress ignored: {}", e);
        }
    }

    /// Flush the last progress delta and freeze the result.
    pub fn finish(mut self) -> RunResult {
        self.flush_progress();
        if let Some(bar) = &self.bar {
            finish_progress_bar(bar, &self.tracker.snapshot());
        }
        self.result.success = self.result.failed == 0;
        self.result.finished_at = Some(Utc::now());
        self.result
    }
}

//! Live progress counters shared between workers, the collector and any display.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::{OutcomeStatus, ProgressSnapshot};

#[derive(Debug)]
struct Counters {
    processed: usize,
    imported: usize,
    skipped: usize,
    failed: usize,
    current_file: Option<PathBuf>,
}

/// Thread-safe counter set. One mutex guards every mutation and snapshot construction,
/// so `processed == imported + skipped + failed` holds in every snapshot.
#[derive(Debug)]
pub struct ProgressTracker {
    total: usize,
    started: Instant,
    counters: Mutex<Counters>,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            started: Instant::now(),
            counters: Mutex::new(Counters {
                processed: 0,
                imported: 0,
                skipped: 0,
                failed: 0,
                current_file: None,
            }),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        // Counters stay consistent even if a holder panicked; every update is a single step.
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record_imported(&self) {
        let mut c = self.lock();
        c.imported += 1;
        c.processed += 1;
    }

    pub fn record_skipped(&self) {
        let mut c = self.lock();
        c.skipped += 1;
        c.processed += 1;
    }

    pub fn record_failed(&self) {
        let mut c = self.lock();
        c.failed += 1;
        c.processed += 1;
    }

    pub fn record(&self, status: OutcomeStatus) {
        match status {
            OutcomeStatus::Imported => self.record_imported(),
            OutcomeStatus::Skipped => self.record_skipped(),
            OutcomeStatus::Failed => self.record_failed(),
        }
    }

    /// Advisory, for live display only.
    pub fn set_current_file(&self, path: &Path) {
        self.lock().current_file = Some(path.to_path_buf());
    }

    pub fn current_file(&self) -> Option<PathBuf> {
        self.lock().current_file.clone()
    }

    /// Consistent read of all counters. ETA = elapsed / processed * remaining, once processed > 0.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let c = self.lock();
        let elapsed = self.started.elapsed();
        let eta = (c.processed > 0).then(|| {
            let remaining = self.total.saturating_sub(c.processed);
            elapsed.mul_f64(remaining as f64 / c.processed as f64)
        });
        ProgressSnapshot {
            total: self.total,
            processed: c.processed,
            imported: c.imported,
            skipped: c.skipped,
            failed: c.failed,
            elapsed,
            eta,
        }
    }
}

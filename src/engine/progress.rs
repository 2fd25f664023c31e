//! Progress bar utilities for displaying ingestion status

use kdam::{Animation, Bar, BarExt};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::ProgressSnapshot;
use crate::utils::config::ProgressConsts;

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    /// Create a new progress bar configuration
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a progress bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation,
        unit = " files"
    )))
}

/// Bar for a run, or None when display is off.
pub fn setup_progress(show: bool, total: usize, dry_run: bool) -> Option<ProgressBar> {
    show.then(|| {
        let desc = if dry_run { "Previewing" } else { "Ingesting" };
        create_progress_bar(ProgressBarConfig::new(total, desc, Animation::Classic))
    })
}

/// Shorten a file name for the postfix, keeping the tail (the unique part of most names).
fn short_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let max = ProgressConsts::POSTFIX_NAME_MAX;
    let count = name.chars().count();
    if count <= max {
        return name;
    }
    let tail: String = name.chars().skip(count - (max - 1)).collect();
    format!("…{tail}")
}

/// Advance the bar by one and show counters plus the current file.
/// Uses try_lock so a contended bar never blocks the collector; the next update catches up.
pub fn advance_progress_bar(pb: &ProgressBar, snapshot: &ProgressSnapshot, current: &Path) {
    if let Ok(mut bar) = pb.try_lock() {
        bar.set_postfix(format!(
            "ok={} skip={} fail={} {}",
            snapshot.imported,
            snapshot.skipped,
            snapshot.failed,
            short_name(current)
        ));
        let _ = bar.update_to(snapshot.processed);
    }
}

/// Force a final refresh so the bar shows the end state.
pub fn finish_progress_bar(pb: &ProgressBar, snapshot: &ProgressSnapshot) {
    if let Ok(mut bar) = pb.lock() {
        let _ = bar.update_to(snapshot.processed);
        let _ = bar.refresh();
        eprintln!();
    }
}
